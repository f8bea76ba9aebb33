//! Record editing
//!
//! Edits never mutate a stored record: the edited record is rebuilt with
//! the same id and the collection is returned as a new value. Invalid input
//! leaves the collection untouched.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::import::values::{parse_date, parse_leading_decimal};
use super::merge::sort_canonical;
use crate::domain::result::{Error, Result};
use crate::domain::Transaction;

/// A raw value typed into one editable column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "lowercase")]
pub enum FieldEdit {
    Date(String),
    Description(String),
    Amount(String),
}

impl FieldEdit {
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Date(_) => "date",
            Self::Description(_) => "description",
            Self::Amount(_) => "amount",
        }
    }
}

/// Apply `edit` to the record with `id`
///
/// A date edit re-sorts the collection into canonical order.
pub fn apply_field_edit(
    collection: &[Transaction],
    id: &str,
    edit: &FieldEdit,
    date_formats: &[String],
) -> Result<Vec<Transaction>> {
    let current = find(collection, id)?;

    let updated = match edit {
        FieldEdit::Date(raw) => {
            let date = parse_date(raw, date_formats)
                .ok_or_else(|| Error::validation(format!("Invalid date: {:?}", raw)))?;
            current.with_date(date)
        }
        FieldEdit::Description(raw) => {
            let description = raw.trim();
            if description.is_empty() {
                return Err(Error::validation("Description cannot be empty"));
            }
            current.with_description(description)
        }
        FieldEdit::Amount(raw) => {
            let amount = parse_leading_decimal(raw)
                .ok_or_else(|| Error::validation(format!("Invalid amount: {:?}", raw)))?;
            current.with_amount(amount)
        }
    };

    debug!(id, field = edit.field_name(), "Edited transaction");

    let mut next = replace(collection, updated);
    if matches!(edit, FieldEdit::Date(_)) {
        sort_canonical(&mut next);
    }
    Ok(next)
}

/// Reassign the category of the record with `id`
pub fn apply_category(collection: &[Transaction], id: &str, category: &str) -> Result<Vec<Transaction>> {
    let current = find(collection, id)?;

    let category = category.trim();
    if category.is_empty() {
        return Err(Error::validation("Category cannot be empty"));
    }

    debug!(id, category, "Recategorized transaction");
    Ok(replace(collection, current.with_category(category)))
}

fn find<'a>(collection: &'a [Transaction], id: &str) -> Result<&'a Transaction> {
    collection
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| Error::not_found(format!("Transaction {}", id)))
}

fn replace(collection: &[Transaction], updated: Transaction) -> Vec<Transaction> {
    collection
        .iter()
        .map(|t| if t.id == updated.id { updated.clone() } else { t.clone() })
        .collect()
}
