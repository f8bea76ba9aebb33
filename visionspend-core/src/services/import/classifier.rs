//! Field classifier - decides which field of a split row plays which role
//!
//! No header is trusted. Field 0 is always the date and field 3 (when
//! present) the explicit category. The amount is located by evaluating the
//! configured [`AmountHypothesis`] list top to bottom: the first hypothesis
//! whose amount field is numeric is committed to, even if its description
//! then turns out to be empty.

use serde::Serialize;

use super::values::is_numeric;
use crate::config::{AmountHypothesis, ImportSettings};

/// Field roles resolved for one row, still as raw strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowCandidate {
    pub date: String,
    pub description: String,
    pub amount: String,
    /// Empty when the row has no explicit category
    pub category: String,
}

/// Why a line produced no transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Rejection {
    Blank,
    TooFewFields { found: usize },
    NoNumericField,
    MissingDate,
    MissingDescription,
    InvalidDate(String),
    InvalidAmount(String),
    /// Numeric, but beyond the 96-bit decimal range
    AmountOutOfRange(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Accepted(RowCandidate),
    Rejected(Rejection),
}

impl Classification {
    pub fn accepted(self) -> Option<RowCandidate> {
        match self {
            Self::Accepted(candidate) => Some(candidate),
            Self::Rejected(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldClassifier {
    hypotheses: Vec<AmountHypothesis>,
    min_fields: usize,
    placeholder_description: String,
}

impl FieldClassifier {
    pub fn new(settings: &ImportSettings) -> Self {
        Self {
            hypotheses: settings.amount_hypotheses.clone(),
            min_fields: settings.min_fields,
            placeholder_description: settings.placeholder_description.clone(),
        }
    }

    /// Classify a trimmed, quote-stripped row
    pub fn classify<S: AsRef<str>>(&self, fields: &[S]) -> Classification {
        if fields.len() < self.min_fields {
            return Classification::Rejected(Rejection::TooFewFields { found: fields.len() });
        }

        let field = |i: usize| fields.get(i).map(|f| f.as_ref()).unwrap_or("");

        let Some((amount_idx, description)) = self
            .hypotheses
            .iter()
            .find_map(|h| self.locate(h, fields))
        else {
            return Classification::Rejected(Rejection::NoNumericField);
        };

        let date = field(0);
        if date.is_empty() {
            return Classification::Rejected(Rejection::MissingDate);
        }
        if description.is_empty() {
            return Classification::Rejected(Rejection::MissingDescription);
        }

        Classification::Accepted(RowCandidate {
            date: date.to_string(),
            description,
            amount: field(amount_idx).to_string(),
            category: field(3).to_string(),
        })
    }

    /// Amount index and resolved description if `hypothesis` holds for this row
    fn locate<S: AsRef<str>>(
        &self,
        hypothesis: &AmountHypothesis,
        fields: &[S],
    ) -> Option<(usize, String)> {
        let non_empty = |i: usize| {
            fields
                .get(i)
                .map(|f| f.as_ref())
                .filter(|f| !f.is_empty())
        };

        match hypothesis {
            AmountHypothesis::Fixed { amount, description } => {
                let candidate = fields.get(*amount)?.as_ref();
                if !is_numeric(candidate) {
                    return None;
                }
                let description = description
                    .iter()
                    .find_map(|i| non_empty(*i))
                    .unwrap_or("");
                Some((*amount, description.to_string()))
            }
            AmountHypothesis::Scan => {
                let idx = (1..fields.len()).find(|i| is_numeric(fields[*i].as_ref()))?;
                let description = non_empty(idx - 1)
                    .or_else(|| non_empty(idx + 1))
                    .unwrap_or(self.placeholder_description.as_str());
                Some((idx, description.to_string()))
            }
        }
    }
}

impl Default for FieldClassifier {
    fn default() -> Self {
        Self::new(&ImportSettings::default())
    }
}
