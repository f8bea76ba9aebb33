//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod file_kind;
pub mod query;
pub mod result;
pub mod rule;
mod transaction;

pub use file_kind::FileKind;
pub use query::{CategoryFilter, DateRange, SortColumn, SortDescriptor, SortDirection, ViewQuery};
pub use rule::{CategoryRule, Keyword};
pub use transaction::Transaction;
