//! Query view inputs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive date bounds; either side may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    Id,
    Date,
    Description,
    Amount,
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortDescriptor {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortDescriptor {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Canonical presentation order: newest first
    pub fn date_desc() -> Self {
        Self::new(SortColumn::Date, SortDirection::Desc)
    }

    /// Descriptor after the user clicks `column`'s header
    ///
    /// Clicking the column currently sorted ascending flips it to descending;
    /// anything else starts ascending.
    pub fn toggled(current: Option<SortDescriptor>, column: SortColumn) -> Self {
        match current {
            Some(SortDescriptor {
                column: c,
                direction: SortDirection::Asc,
            }) if c == column => Self::new(column, SortDirection::Desc),
            _ => Self::new(column, SortDirection::Asc),
        }
    }
}

impl Default for SortDescriptor {
    fn default() -> Self {
        Self::date_desc()
    }
}

/// Category dropdown selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    /// Case-insensitive exact label
    Only(String),
}

impl CategoryFilter {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(label) => category.to_lowercase() == label.to_lowercase(),
        }
    }
}

/// Every input the derived view depends on besides the collection itself
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewQuery {
    /// Case-insensitive substring over description or category; empty = no filter
    pub search: String,
    pub date_range: DateRange,
    /// `None` keeps the collection order
    pub sort: Option<SortDescriptor>,
    pub category: CategoryFilter,
}

impl Default for ViewQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            date_range: DateRange::default(),
            sort: Some(SortDescriptor::date_desc()),
            category: CategoryFilter::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let range = DateRange::new(Some(d(2024, 1, 1)), Some(d(2024, 1, 31)));
        assert!(range.contains(d(2024, 1, 1)));
        assert!(range.contains(d(2024, 1, 31)));
        assert!(!range.contains(d(2024, 2, 1)));
        assert!(DateRange::default().contains(d(1999, 12, 31)));
    }

    #[test]
    fn test_sort_toggle() {
        let asc = SortDescriptor::toggled(None, SortColumn::Amount);
        assert_eq!(asc.direction, SortDirection::Asc);

        let desc = SortDescriptor::toggled(Some(asc), SortColumn::Amount);
        assert_eq!(desc.direction, SortDirection::Desc);

        let again = SortDescriptor::toggled(Some(desc), SortColumn::Amount);
        assert_eq!(again.direction, SortDirection::Asc);

        let other = SortDescriptor::toggled(Some(asc), SortColumn::Date);
        assert_eq!(other, SortDescriptor::new(SortColumn::Date, SortDirection::Asc));
    }

    #[test]
    fn test_category_filter() {
        assert!(CategoryFilter::All.matches("anything"));
        assert!(CategoryFilter::Only("groceries".into()).matches("Groceries"));
        assert!(!CategoryFilter::Only("Groceries".into()).matches("Groceries & More"));
    }
}
