//! Category rule domain entity

use serde::{Deserialize, Serialize};

/// Category assigned when a row carries no usable category at all
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Category assigned when no keyword rule matches a description
pub const MISCELLANEOUS: &str = "Miscellaneous";

/// Labels offered for reassignment even when no record uses them yet
pub const KNOWN_CATEGORIES: &[&str] = &[
    "Food & Drink",
    "Groceries",
    "Transport",
    "Housing",
    "Income",
    "Entertainment",
    "Shopping",
    "Utilities",
    "Healthcare",
    "Miscellaneous",
    "Uncategorized",
    "Transfer/Income",
    "Bills",
    "Subscriptions",
    "Travel",
    "Gifts",
    "Personal Care",
    "Education",
    "Business",
];

/// A keyword that matches when `term` occurs in a description and none of
/// the `unless` terms do. Matching is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub term: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unless: Vec<String>,
}

impl Keyword {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into().to_lowercase(),
            unless: Vec::new(),
        }
    }

    pub fn unless(mut self, term: impl Into<String>) -> Self {
        self.unless.push(term.into().to_lowercase());
        self
    }

    /// `lowered` must already be lowercase
    pub(crate) fn matches(&self, lowered: &str) -> bool {
        lowered.contains(&self.term.to_lowercase())
            && !self.unless.iter().any(|u| lowered.contains(&u.to_lowercase()))
    }
}

/// A keyword group mapping descriptions to a category label
///
/// Rules are evaluated in table order; the first rule with any matching
/// keyword wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: String,
    pub keywords: Vec<Keyword>,
}

impl CategoryRule {
    pub fn new(category: impl Into<String>, terms: &[&str]) -> Self {
        Self {
            category: category.into(),
            keywords: terms.iter().map(|t| Keyword::new(*t)).collect(),
        }
    }

    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        self.keywords.push(keyword);
        self
    }

    pub(crate) fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| k.matches(lowered))
    }

    /// Built-in keyword table
    pub fn defaults() -> Vec<CategoryRule> {
        vec![
            CategoryRule::new("Food & Drink", &["coffee", "starbucks", "cafe"]),
            CategoryRule::new("Groceries", &["grocery", "market"]),
            CategoryRule::new("Transport", &["transport", "uber", "lyft", "taxi"]),
            CategoryRule::new("Housing", &["rent", "mortgage"]),
            CategoryRule::new("Income", &["salary"])
                .with_keyword(Keyword::new("invoice").unless("payment")),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_exclusion() {
        let keyword = Keyword::new("invoice").unless("payment");
        assert!(keyword.matches("invoice #42"));
        assert!(!keyword.matches("invoice payment received"));
    }

    #[test]
    fn test_rule_deserializes_without_unless() {
        let json = r#"{"category":"Pets","keywords":[{"term":"petco"}]}"#;
        let rule: CategoryRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.category, "Pets");
        assert!(rule.matches("petco store 12"));
    }
}
