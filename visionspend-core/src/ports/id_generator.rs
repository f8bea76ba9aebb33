//! Identifier port - how freshly parsed records obtain their id

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Source of transaction identifiers
///
/// Called exactly once per accepted row, at import time. Implementations
/// decide whether two structurally identical rows share an identifier,
/// which is what the merger de-duplicates on.
pub trait IdGenerator: Send + Sync {
    fn generate(&self, date: NaiveDate, description: &str, amount: Decimal) -> String;
}
