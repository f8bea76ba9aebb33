//! Service layer - business logic orchestration
//!
//! Services are pure functions or small stateful helpers over the domain
//! types. Each focuses on one stage of the pipeline: import, merge, view,
//! edit, export, summaries.

pub mod categorize;
pub mod edit;
pub mod export;
pub mod import;
pub mod logging;
pub mod merge;
pub mod query;
pub mod summary;

pub use categorize::CategoryInferencer;
pub use edit::{apply_category, apply_field_edit, FieldEdit};
pub use export::{render_csv, ExportFile, EXPORT_FILE_NAME};
pub use import::{
    FieldClassifier, ImportOutcome, ImportService, LineParser, ParsedFile, Rejection, RowCandidate,
};
pub use logging::{EntryPoint, EventLog, LogEntry, LogEvent};
pub use merge::{merge_transactions, MergeResult};
pub use query::{category_options, derive_view, ViewCache};
pub use summary::{
    daily_spending, spending_by_category, spending_by_month, summarize, CategorySpending,
    CollectionSummary, MonthlySpending,
};
