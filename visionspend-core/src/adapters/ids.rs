//! Identifier generators

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::Transaction;
use crate::ports::IdGenerator;

/// Fresh random identifier per row
///
/// Two identical rows imported twice get distinct ids and are both kept.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn generate(&self, _date: NaiveDate, _description: &str, _amount: Decimal) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic identifier from the record content
///
/// Re-importing the same row yields the same id, so the merger drops it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FingerprintIds;

impl IdGenerator for FingerprintIds {
    fn generate(&self, date: NaiveDate, description: &str, amount: Decimal) -> String {
        Transaction::fingerprint_of(date, description, amount)
    }
}
