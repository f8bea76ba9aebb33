//! Category inference from free-text descriptions

use crate::config::ImportSettings;
use crate::domain::CategoryRule;

/// Maps descriptions to category labels with an ordered keyword table
///
/// Advisory only: callers never apply it over an explicit category.
#[derive(Debug, Clone)]
pub struct CategoryInferencer {
    rules: Vec<CategoryRule>,
    fallback: String,
}

impl CategoryInferencer {
    pub fn new(rules: Vec<CategoryRule>, fallback: impl Into<String>) -> Self {
        Self {
            rules,
            fallback: fallback.into(),
        }
    }

    pub fn from_settings(settings: &ImportSettings) -> Self {
        Self::new(settings.rules(), settings.fallback_category.clone())
    }

    /// First matching rule's category, else the fallback
    pub fn infer(&self, description: &str) -> &str {
        let lowered = description.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.category.as_str())
            .unwrap_or(self.fallback.as_str())
    }
}

impl Default for CategoryInferencer {
    fn default() -> Self {
        Self::from_settings(&ImportSettings::default())
    }
}
