//! Transaction domain model

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

static NULL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bnull\b").expect("static regex"));
static CARD_MASK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"x{10,}\d{4}").expect("static regex"));
static ACCOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[x0-9]{7,12}").expect("static regex"));
static NON_ALNUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]").expect("static regex"));

/// A single imported financial transaction
///
/// Records are value objects: an edit produces a new `Transaction` carrying
/// the same `id`, it never mutates a stored one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Opaque identifier, assigned once at import time
    pub id: String,
    pub date: NaiveDate,
    /// Never empty
    pub description: String,
    /// Negative = expense, non-negative = income/credit
    pub amount: Decimal,
    /// Never empty; explicit, user-assigned or inferred
    pub category: String,
}

impl Transaction {
    /// Create a new transaction with all required fields
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        description: impl Into<String>,
        amount: Decimal,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            description: description.into(),
            amount,
            category: category.into(),
        }
    }

    pub fn with_date(&self, date: NaiveDate) -> Self {
        Self { date, ..self.clone() }
    }

    pub fn with_description(&self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self.clone()
        }
    }

    pub fn with_amount(&self, amount: Decimal) -> Self {
        Self { amount, ..self.clone() }
    }

    pub fn with_category(&self, category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..self.clone()
        }
    }

    /// True for outgoing money
    pub fn is_expense(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// Calculate the content fingerprint of this record
    pub fn calculate_fingerprint(&self) -> String {
        Self::fingerprint_of(self.date, &self.description, self.amount)
    }

    /// Content fingerprint from the identifying fields
    ///
    /// Uses: date, amount (with sign, 2dp) and normalized description.
    /// SHA256 hash truncated to 16 hex chars.
    pub fn fingerprint_of(date: NaiveDate, description: &str, amount: Decimal) -> String {
        let tx_date = date.format("%Y-%m-%d").to_string();

        // Normalize amount: treat -0 as 0
        let amount = if amount.is_zero() { Decimal::ZERO } else { amount };
        let amount_normalized = format!("{:.2}", amount);

        let desc_normalized = Self::normalize_description(description);

        let fingerprint_str = format!("{}|{}|{}", tx_date, amount_normalized, desc_normalized);

        let mut hasher = Sha256::new();
        hasher.update(fingerprint_str.as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..8])
    }

    /// Normalize a description for fingerprint comparison
    ///
    /// - Lowercase
    /// - Remove literal "null" strings (common in bank exports)
    /// - Remove card number masks (10+ X's followed by 4 digits)
    /// - Reduce account/phone numbers to their last 4 digits
    /// - Keep only ASCII alphanumerics
    fn normalize_description(desc: &str) -> String {
        let desc = desc.to_lowercase();

        let normalized = NULL_RE.replace_all(&desc, "");
        let normalized = CARD_MASK_RE.replace_all(&normalized, "");
        let normalized = ACCOUNT_RE.replace_all(&normalized, |caps: &regex::Captures| {
            let text = &caps[0];
            let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
            if digits.len() >= 4 {
                digits[digits.len() - 4..].to_string()
            } else {
                text.to_string()
            }
        });

        NON_ALNUM_RE.replace_all(&normalized, "").into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        Transaction::new(
            "abc123",
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            "Starbucks Coffee",
            Decimal::new(-450, 2),
            "Food & Drink",
        )
    }

    #[test]
    fn test_fingerprint_generation() {
        let fp = sample().calculate_fingerprint();
        assert_eq!(fp.len(), 16);
        assert_eq!(fp, sample().with_category("Other").calculate_fingerprint());
    }

    #[test]
    fn test_fingerprint_ignores_formatting_noise() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let a = Transaction::fingerprint_of(date, "STARBUCKS  coffee!", Decimal::new(-450, 2));
        let b = Transaction::fingerprint_of(date, "starbucks coffee", Decimal::new(-4500, 3));
        assert_eq!(a, b);

        let c = Transaction::fingerprint_of(date, "starbucks coffee", Decimal::new(-451, 2));
        assert_ne!(a, c);
    }

    #[test]
    fn test_description_normalization() {
        assert!(!Transaction::normalize_description("PURCHASE XXXXXXXXXXXX1234 STORE").contains("xxxx"));
        assert!(!Transaction::normalize_description("null PAYMENT null").contains("null"));
        assert!(Transaction::normalize_description("PAYMENT 7208987070").contains("7070"));
    }

    #[test]
    fn test_with_replaces_single_field() {
        let tx = sample();
        let edited = tx.with_amount(Decimal::new(-500, 2));
        assert_eq!(edited.id, tx.id);
        assert_eq!(edited.description, tx.description);
        assert_eq!(edited.amount, Decimal::new(-500, 2));
        assert_eq!(tx.amount, Decimal::new(-450, 2));
        assert!(edited.is_expense());
    }
}
