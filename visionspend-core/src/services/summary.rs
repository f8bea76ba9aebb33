//! Spending summaries - aggregate views consumed by charts

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::domain::Transaction;

/// Number of categories kept by [`spending_by_category`] when no limit is given
pub const DEFAULT_CATEGORY_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySpending {
    pub category: String,
    /// Positive magnitude, rounded to cents
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySpending {
    /// `yyyy-MM`
    pub month: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct DateRange {
    pub earliest: Option<NaiveDate>,
    pub latest: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionSummary {
    pub total_transactions: usize,
    pub total_expenses: Decimal,
    pub total_income: Decimal,
    pub categories: usize,
    pub date_range: DateRange,
}

/// Add `amount` to `total`, saturating at the decimal range instead of overflowing
fn accumulate(total: &mut Decimal, amount: Decimal) {
    *total = total.checked_add(amount).unwrap_or_else(|| {
        warn!("Spending total exceeds the decimal range; saturating");
        if amount.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    });
}

fn expenses(collection: &[Transaction]) -> impl Iterator<Item = &Transaction> {
    collection.iter().filter(|t| t.is_expense())
}

/// Expense totals per category, largest first, at most `limit` entries
///
/// Equal totals keep first-seen category order.
pub fn spending_by_category(collection: &[Transaction], limit: Option<usize>) -> Vec<CategorySpending> {
    let mut totals: Vec<CategorySpending> = Vec::new();
    for tx in expenses(collection) {
        match totals.iter_mut().find(|c| c.category == tx.category) {
            Some(entry) => accumulate(&mut entry.total, tx.amount.abs()),
            None => totals.push(CategorySpending {
                category: tx.category.clone(),
                total: tx.amount.abs(),
            }),
        }
    }

    totals.sort_by(|a, b| b.total.cmp(&a.total));
    totals.truncate(limit.unwrap_or(DEFAULT_CATEGORY_LIMIT));
    for entry in &mut totals {
        entry.total = entry.total.round_dp(2);
    }
    totals
}

/// Expense totals per calendar month, oldest first
pub fn spending_by_month(collection: &[Transaction]) -> Vec<MonthlySpending> {
    let mut months: BTreeMap<String, Decimal> = BTreeMap::new();
    for tx in expenses(collection) {
        accumulate(months.entry(tx.date.format("%Y-%m").to_string()).or_default(), tx.amount.abs());
    }
    months
        .into_iter()
        .map(|(month, total)| MonthlySpending { month, total })
        .collect()
}

/// Expense totals per day
pub fn daily_spending(collection: &[Transaction]) -> BTreeMap<NaiveDate, Decimal> {
    let mut days: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for tx in expenses(collection) {
        accumulate(days.entry(tx.date).or_default(), tx.amount.abs());
    }
    days
}

pub fn summarize(collection: &[Transaction]) -> CollectionSummary {
    let mut total_expenses = Decimal::ZERO;
    let mut total_income = Decimal::ZERO;
    for tx in collection {
        if tx.is_expense() {
            accumulate(&mut total_expenses, tx.amount.abs());
        } else {
            accumulate(&mut total_income, tx.amount);
        }
    }

    let mut categories: Vec<&str> = collection.iter().map(|t| t.category.as_str()).collect();
    categories.sort_unstable();
    categories.dedup();

    CollectionSummary {
        total_transactions: collection.len(),
        total_expenses,
        total_income,
        categories: categories.len(),
        date_range: DateRange {
            earliest: collection.iter().map(|t| t.date).min(),
            latest: collection.iter().map(|t| t.date).max(),
        },
    }
}
