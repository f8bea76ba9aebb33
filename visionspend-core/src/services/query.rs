//! Query view - filtered and sorted slice of the collection for display

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::domain::rule::KNOWN_CATEGORIES;
use crate::domain::{SortColumn, SortDescriptor, SortDirection, Transaction, ViewQuery};

/// Derive the displayed slice from the collection
///
/// Filters apply as a conjunction: search term, then date range, then
/// category. Sorting is stable, so equal keys keep collection order in both
/// directions.
pub fn derive_view(collection: &[Transaction], query: &ViewQuery) -> Vec<Transaction> {
    let needle = query.search.to_lowercase();

    let mut view: Vec<Transaction> = collection
        .iter()
        .filter(|t| matches_search(t, &needle))
        .filter(|t| query.date_range.contains(t.date))
        .filter(|t| query.category.matches(&t.category))
        .cloned()
        .collect();

    if let Some(sort) = query.sort {
        view.sort_by(|a, b| compare(a, b, sort));
    }

    view
}

fn matches_search(tx: &Transaction, needle: &str) -> bool {
    needle.is_empty()
        || tx.description.to_lowercase().contains(needle)
        || tx.category.to_lowercase().contains(needle)
}

/// Compare two records under `sort`
pub fn compare(a: &Transaction, b: &Transaction, sort: SortDescriptor) -> Ordering {
    let ordering = match sort.column {
        SortColumn::Id => locale_compare(&a.id, &b.id),
        SortColumn::Date => a.date.cmp(&b.date),
        SortColumn::Description => locale_compare(&a.description, &b.description),
        SortColumn::Amount => a.amount.cmp(&b.amount),
        SortColumn::Category => locale_compare(&a.category, &b.category),
    };

    match sort.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Case-insensitive text ordering; on a tie lowercase sorts before uppercase
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let primary = a.to_lowercase().cmp(&b.to_lowercase());
    if primary != Ordering::Equal {
        return primary;
    }

    for (x, y) in a.chars().zip(b.chars()) {
        if x == y {
            continue;
        }
        return match (x.is_lowercase(), y.is_lowercase()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => x.cmp(&y),
        };
    }
    a.len().cmp(&b.len())
}

/// Labels offered by the category picker
///
/// Built-in labels plus every category present in the collection, sorted.
pub fn category_options(collection: &[Transaction]) -> Vec<String> {
    let mut labels: BTreeSet<&str> = KNOWN_CATEGORIES.iter().copied().collect();
    labels.extend(collection.iter().map(|t| t.category.as_str()));

    let mut options: Vec<String> = labels.into_iter().map(String::from).collect();
    options.sort_by(|a, b| locale_compare(a, b));
    options
}

/// Memoized view keyed on the collection revision and the query inputs
#[derive(Debug, Default)]
pub struct ViewCache {
    key: Option<(u64, ViewQuery)>,
    view: Vec<Transaction>,
}

impl ViewCache {
    /// Cached view for `(revision, query)`, deriving it when either changed
    pub fn get_or_derive(
        &mut self,
        revision: u64,
        collection: &[Transaction],
        query: &ViewQuery,
    ) -> &[Transaction] {
        let fresh = matches!(&self.key, Some((r, q)) if *r == revision && q == query);
        if !fresh {
            self.view = derive_view(collection, query);
            self.key = Some((revision, query.clone()));
        }
        &self.view
    }

    pub fn invalidate(&mut self) {
        self.key = None;
        self.view.clear();
    }
}
