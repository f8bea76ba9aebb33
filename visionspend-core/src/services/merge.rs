//! Collection merger - identity-based deduplication of imported batches

use std::collections::HashSet;

use serde::Serialize;
use tracing::info;

use crate::domain::Transaction;

/// Merged collection plus how the incoming batch was split
#[derive(Debug, Clone, Serialize)]
pub struct MergeResult {
    /// Canonical order: date descending, ties keep prior relative order
    pub transactions: Vec<Transaction>,
    pub added: usize,
    /// Incoming records whose id was already present
    pub duplicates: usize,
}

/// Merge `incoming` into `existing`, dropping records whose id is already known
///
/// Deduplication compares ids only. Two structurally identical records with
/// different ids are both kept.
pub fn merge_transactions(existing: &[Transaction], incoming: Vec<Transaction>) -> MergeResult {
    let mut seen: HashSet<String> = existing.iter().map(|t| t.id.clone()).collect();

    let incoming_count = incoming.len();
    let mut transactions = existing.to_vec();
    transactions.extend(incoming.into_iter().filter(|t| seen.insert(t.id.clone())));

    let added = transactions.len() - existing.len();
    sort_canonical(&mut transactions);

    info!(
        added,
        duplicates = incoming_count - added,
        total = transactions.len(),
        "Merged transactions"
    );

    MergeResult {
        transactions,
        added,
        duplicates: incoming_count - added,
    }
}

/// Stable sort by date, newest first
pub fn sort_canonical(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;

    fn tx(id: &str, day: u32, description: &str) -> Transaction {
        Transaction::new(
            id.to_string(),
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            description.to_string(),
            Decimal::new(-100, 2),
            "Miscellaneous".to_string(),
        )
    }

    fn ids(txs: &[Transaction]) -> Vec<&str> {
        txs.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_merge_into_empty_sorts_newest_first() {
        let result = merge_transactions(&[], vec![tx("a", 1, "A"), tx("b", 3, "B"), tx("c", 2, "C")]);
        assert_eq!(ids(&result.transactions), vec!["b", "c", "a"]);
        assert_eq!(result.added, 3);
        assert_eq!(result.duplicates, 0);
    }

    #[test]
    fn test_merge_drops_known_ids() {
        let existing = vec![tx("a", 2, "A"), tx("b", 1, "B")];
        let result = merge_transactions(&existing, vec![tx("a", 5, "changed"), tx("c", 3, "C")]);
        assert_eq!(ids(&result.transactions), vec!["c", "a", "b"]);
        assert_eq!(result.transactions[1].description, "A");
        assert_eq!(result.added, 1);
        assert_eq!(result.duplicates, 1);
    }

    #[test]
    fn test_merge_is_idempotent_for_subsets() {
        let existing = merge_transactions(&[], vec![tx("a", 2, "A"), tx("b", 1, "B"), tx("c", 3, "C")])
            .transactions;
        let subset = vec![existing[0].clone(), existing[2].clone()];

        let result = merge_transactions(&existing, subset);
        assert_eq!(result.transactions, existing);
        assert_eq!(result.added, 0);
    }

    #[test]
    fn test_identical_content_with_new_ids_is_kept() {
        let existing = vec![tx("a", 1, "Coffee")];
        let result = merge_transactions(&existing, vec![tx("z", 1, "Coffee")]);
        assert_eq!(result.transactions.len(), 2);
    }

    #[test]
    fn test_repeated_ids_within_batch_collapse() {
        let result = merge_transactions(&[], vec![tx("a", 1, "first"), tx("a", 2, "second")]);
        assert_eq!(result.transactions.len(), 1);
        assert_eq!(result.transactions[0].description, "first");
        assert_eq!(result.duplicates, 1);
    }

    #[test]
    fn test_equal_dates_keep_relative_order() {
        let existing = vec![tx("a", 1, "A"), tx("b", 1, "B")];
        let result = merge_transactions(&existing, vec![tx("c", 1, "C")]);
        assert_eq!(ids(&result.transactions), vec!["a", "b", "c"]);
    }
}
