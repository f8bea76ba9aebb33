//! Line parser - one physical line to one typed transaction

use std::sync::Arc;

use tracing::debug;

use super::classifier::{Classification, FieldClassifier, Rejection};
use super::values::{clean_amount, is_numeric, parse_amount, parse_date};
use crate::config::ImportSettings;
use crate::domain::Transaction;
use crate::ports::IdGenerator;
use crate::services::categorize::CategoryInferencer;

/// Split on `delimiter`, trim each field and strip surrounding quotes
///
/// At most one leading and one trailing `"` are removed per field; no
/// other CSV quoting rules apply, so a quoted delimiter still splits.
pub fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    line.split(delimiter)
        .map(|field| {
            let field = field.trim();
            let field = field.strip_prefix('"').unwrap_or(field);
            let field = field.strip_suffix('"').unwrap_or(field);
            field.to_string()
        })
        .collect()
}

pub struct LineParser {
    classifier: FieldClassifier,
    inferencer: CategoryInferencer,
    date_formats: Vec<String>,
    default_category: String,
    ids: Arc<dyn IdGenerator>,
}

impl LineParser {
    pub fn new(settings: &ImportSettings, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            classifier: FieldClassifier::new(settings),
            inferencer: CategoryInferencer::from_settings(settings),
            date_formats: settings.date_formats.clone(),
            default_category: settings.default_category.clone(),
            ids,
        }
    }

    pub fn from_settings(settings: &ImportSettings) -> Self {
        Self::new(settings, settings.id_strategy.generator())
    }

    /// Parse one line; malformed input yields `None`
    pub fn parse_line(&self, line: &str, delimiter: char) -> Option<Transaction> {
        self.try_parse_line(line, delimiter).ok()
    }

    /// Parse one line, keeping the reason a line was dropped
    pub fn try_parse_line(
        &self,
        line: &str,
        delimiter: char,
    ) -> std::result::Result<Transaction, Rejection> {
        if line.trim().is_empty() {
            return Err(Rejection::Blank);
        }

        let fields = split_fields(line, delimiter);
        let candidate = match self.classifier.classify(&fields) {
            Classification::Accepted(candidate) => candidate,
            Classification::Rejected(reason) => return Err(reason),
        };

        let date = parse_date(&candidate.date, &self.date_formats)
            .ok_or_else(|| Rejection::InvalidDate(candidate.date.clone()))?;
        let amount = parse_amount(&candidate.amount).ok_or_else(|| {
            if is_numeric(&clean_amount(&candidate.amount)) {
                Rejection::AmountOutOfRange(candidate.amount.clone())
            } else {
                Rejection::InvalidAmount(candidate.amount.clone())
            }
        })?;

        let category = if candidate.category.is_empty() {
            self.inferencer.infer(&candidate.description).to_string()
        } else {
            candidate.category
        };
        let category = if category.is_empty() {
            self.default_category.clone()
        } else {
            category
        };

        let id = self.ids.generate(date, &candidate.description, amount);
        Ok(Transaction::new(id, date, candidate.description, amount, category))
    }

    /// Like [`parse_line`](Self::parse_line), logging the reason for a drop
    pub(crate) fn parse_line_logged(
        &self,
        line_number: usize,
        line: &str,
        delimiter: char,
    ) -> std::result::Result<Transaction, Rejection> {
        let result = self.try_parse_line(line, delimiter);
        if let Err(reason) = &result {
            if *reason != Rejection::Blank {
                debug!(line = line_number, ?reason, "Dropped malformed line");
            }
        }
        result
    }
}

impl Default for LineParser {
    fn default() -> Self {
        Self::from_settings(&ImportSettings::default())
    }
}
