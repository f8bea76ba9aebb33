//! Scalar value parsing shared by the classifier, line parser and edits

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use rust_decimal::Decimal;

/// Leading decimal number, the way a browser `parseFloat` reads one
static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").expect("static regex")
});

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Numeric prefix of `s` after leading whitespace, if any
pub fn numeric_prefix(s: &str) -> Option<&str> {
    NUMERIC_PREFIX.find(s.trim_start()).map(|m| m.as_str())
}

/// True if the field starts with a finite number
pub fn is_numeric(s: &str) -> bool {
    numeric_prefix(s).is_some()
}

/// Keep only digits, `.` and `-`
///
/// Drops currency symbols, thousand separators and text such as `USD`.
pub fn clean_amount(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect()
}

/// Amount of a classified amount field: cleaned, then its numeric prefix
pub fn parse_amount(s: &str) -> Option<Decimal> {
    parse_leading_decimal(&clean_amount(s))
}

/// Decimal value of the numeric prefix of `s`
pub fn parse_leading_decimal(s: &str) -> Option<Decimal> {
    let prefix = numeric_prefix(s)?;
    let unsigned = prefix.strip_prefix('+').unwrap_or(prefix);

    if unsigned.contains(&['e', 'E'][..]) {
        return Decimal::from_scientific(unsigned).ok();
    }

    let (negative, digits) = match unsigned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, unsigned),
    };
    let digits = digits.strip_suffix('.').unwrap_or(digits);
    let normalized = if digits.starts_with('.') {
        format!("0{}", digits)
    } else {
        digits.to_string()
    };

    let value = Decimal::from_str(&normalized).ok()?;
    Some(if negative { -value } else { value })
}

/// Parse a calendar date, ignoring any time of day
///
/// RFC 3339 and ISO date-times are tried first, then `formats` in order.
pub fn parse_date(s: &str, formats: &[String]) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImportSettings;

    fn formats() -> Vec<String> {
        ImportSettings::default().date_formats
    }

    #[test]
    fn test_is_numeric_uses_prefix() {
        assert!(is_numeric("-4.50"));
        assert!(is_numeric("2500.00"));
        assert!(is_numeric("12abc"));
        assert!(is_numeric(".5"));
        assert!(is_numeric("2024-01-15"));
        assert!(!is_numeric("$4.50"));
        assert!(!is_numeric("Paycheck"));
        assert!(!is_numeric(""));
        assert!(!is_numeric("Infinity"));
        assert!(!is_numeric("-"));
    }

    #[test]
    fn test_parse_amount_cleans_noise() {
        assert_eq!(parse_amount("$1,234.56"), Some(Decimal::new(123456, 2)));
        assert_eq!(parse_amount("-4.50"), Some(Decimal::new(-450, 2)));
        assert_eq!(parse_amount("4.50 USD"), Some(Decimal::new(450, 2)));
        assert_eq!(parse_amount("1.2.3"), Some(Decimal::new(12, 1)));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("--5"), None);
    }

    #[test]
    fn test_parse_leading_decimal_edge_forms() {
        assert_eq!(parse_leading_decimal("12."), Some(Decimal::new(12, 0)));
        assert_eq!(parse_leading_decimal("-.5"), Some(Decimal::new(-5, 1)));
        assert_eq!(parse_leading_decimal("+7"), Some(Decimal::new(7, 0)));
        assert_eq!(parse_leading_decimal("1e3"), Some(Decimal::new(1000, 0)));
        assert_eq!(parse_leading_decimal("abc"), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date("2024-01-15", &formats()), Some(expected));
        assert_eq!(parse_date("01/15/2024", &formats()), Some(expected));
        assert_eq!(parse_date("2024/01/15", &formats()), Some(expected));
        assert_eq!(parse_date("Jan 15, 2024", &formats()), Some(expected));
        assert_eq!(parse_date("2024-01-15T08:30:00Z", &formats()), Some(expected));
        assert_eq!(parse_date("2024-01-15 08:30:00", &formats()), Some(expected));
        assert_eq!(parse_date("not a date", &formats()), None);
        assert_eq!(parse_date("2024-02-30", &formats()), None);
        assert_eq!(parse_date("", &formats()), None);
    }
}
