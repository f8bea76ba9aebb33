//! VisionSpend Core - schema-less transaction ingestion
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (Transaction, CategoryRule, view query types)
//! - **ports**: Trait definitions for external dependencies (IdGenerator)
//! - **services**: The pipeline (import, merge, view, edit, export, summaries)
//! - **adapters**: Concrete implementations (random and fingerprint ids)

pub mod domain;
pub mod ports;
pub mod services;
pub mod adapters;
pub mod config;

use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use config::Config;
use services::*;

// Re-export commonly used types at crate root
pub use domain::{
    CategoryFilter, CategoryRule, DateRange, FileKind, SortColumn, SortDescriptor, SortDirection,
    Transaction, ViewQuery,
};
pub use domain::result::{Error, Result};
pub use services::edit::FieldEdit;
pub use services::export::ExportFile;
pub use services::logging::{EntryPoint, EventLog, LogEntry, LogEvent};

/// What one successful import did to the session
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub file_name: String,
    pub kind: FileKind,
    pub degraded: bool,
    pub header_skipped: bool,
    /// Records parsed from the file
    pub parsed: usize,
    /// Lines that produced no record
    pub rejected_lines: usize,
    /// Records added to the collection
    pub added: usize,
    /// Parsed records dropped because their id was already present
    pub duplicates: usize,
    pub total: usize,
}

/// Main context for VisionSpend operations
///
/// Owns the canonical transaction collection and the current view inputs.
/// The collection is only ever replaced wholesale; every replacement bumps
/// the revision the view cache is keyed on. A failed operation leaves the
/// state untouched and records one event in the session log.
pub struct VisionSpendContext {
    pub config: Config,
    import_service: ImportService,
    events: EventLog,
    transactions: Vec<Transaction>,
    query: ViewQuery,
    revision: u64,
    view_cache: ViewCache,
}

impl VisionSpendContext {
    /// Create a new context from the settings in `settings_dir`
    pub fn new(settings_dir: &Path, entry_point: EntryPoint) -> anyhow::Result<Self> {
        let config = Config::load(settings_dir)?;
        Ok(Self::with_config(config, entry_point))
    }

    pub fn with_config(config: Config, entry_point: EntryPoint) -> Self {
        let import_service = ImportService::new(&config.import);
        let events = EventLog::new(entry_point, env!("CARGO_PKG_VERSION"));

        Self {
            config,
            import_service,
            events,
            transactions: Vec::new(),
            query: ViewQuery::default(),
            revision: 0,
            view_cache: ViewCache::default(),
        }
    }

    /// Canonical collection, newest first
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ------------------------------------------------------------------
    // Import
    // ------------------------------------------------------------------

    /// Import uploaded bytes; the kind comes from the name, then the MIME type
    pub fn import_file(
        &mut self,
        file_name: &str,
        mime_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<ImportReport> {
        let outcome = self.import_service.import_bytes(file_name, mime_type, bytes);
        self.absorb(file_name, outcome)
    }

    /// Import already-decoded text
    pub fn import_text(&mut self, file_name: &str, kind: FileKind, text: &str) -> Result<ImportReport> {
        let outcome = self.import_service.import_text(file_name, kind, text);
        self.absorb(file_name, outcome)
    }

    pub fn import_path(&mut self, path: &Path) -> Result<ImportReport> {
        let outcome = self.import_service.import_path(path);
        self.absorb(&services::import::display_name(path), outcome)
    }

    fn absorb(&mut self, file_name: &str, outcome: Result<ImportOutcome>) -> Result<ImportReport> {
        let outcome = outcome.map_err(|e| self.fail("import", Some(file_name), e))?;

        if outcome.degraded {
            self.events.log(
                LogEvent::new("import_degraded")
                    .with_file(&outcome.file_name)
                    .with_operation("import")
                    .with_error("XLSX parsing is experimental; parsed as comma-delimited text"),
            );
        }

        let parsed = outcome.transactions.len();
        let merged = merge_transactions(&self.transactions, outcome.transactions);
        self.replace_collection(merged.transactions);

        let report = ImportReport {
            file_name: outcome.file_name,
            kind: outcome.kind,
            degraded: outcome.degraded,
            header_skipped: outcome.header_skipped,
            parsed,
            rejected_lines: outcome.rejected_lines,
            added: merged.added,
            duplicates: merged.duplicates,
            total: self.transactions.len(),
        };

        info!(
            file = %report.file_name,
            added = report.added,
            total = report.total,
            "Import completed"
        );
        self.events.log(
            LogEvent::new("import_completed")
                .with_file(&report.file_name)
                .with_operation("import"),
        );

        Ok(report)
    }

    // ------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------

    pub fn update_category(&mut self, id: &str, category: &str) -> Result<()> {
        let next = apply_category(&self.transactions, id, category)
            .map_err(|e| self.fail("update_category", None, e))?;
        self.replace_collection(next);
        Ok(())
    }

    pub fn update_field(&mut self, id: &str, edit: FieldEdit) -> Result<()> {
        let next = apply_field_edit(&self.transactions, id, &edit, &self.config.import.date_formats)
            .map_err(|e| self.fail("update_field", None, e))?;
        self.replace_collection(next);
        Ok(())
    }

    // ------------------------------------------------------------------
    // View
    // ------------------------------------------------------------------

    pub fn query(&self) -> &ViewQuery {
        &self.query
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.query.date_range = range;
    }

    pub fn set_sort(&mut self, sort: Option<SortDescriptor>) {
        self.query.sort = sort;
    }

    /// Sort by `column` as a header click would
    pub fn toggle_sort(&mut self, column: SortColumn) -> SortDescriptor {
        let next = SortDescriptor::toggled(self.query.sort, column);
        self.query.sort = Some(next);
        next
    }

    pub fn set_category_filter(&mut self, filter: CategoryFilter) {
        self.query.category = filter;
    }

    /// The displayed slice, recomputed only when the collection or query changed
    pub fn view(&mut self) -> &[Transaction] {
        self.view_cache
            .get_or_derive(self.revision, &self.transactions, &self.query)
    }

    pub fn category_options(&self) -> Vec<String> {
        category_options(&self.transactions)
    }

    pub fn summary(&self) -> CollectionSummary {
        summarize(&self.transactions)
    }

    /// CSV download of the current view
    pub fn export_view(&mut self) -> ExportFile {
        let file = ExportFile::from_view(self.view());
        self.events.log(
            LogEvent::new("export_completed")
                .with_file(&file.file_name)
                .with_operation("export"),
        );
        file
    }

    /// Drop the collection and every view input
    pub fn reset(&mut self) {
        self.query = ViewQuery::default();
        self.view_cache.invalidate();
        self.replace_collection(Vec::new());
        self.events.log_event("session_reset");
    }

    fn replace_collection(&mut self, next: Vec<Transaction>) {
        self.transactions = next;
        self.revision += 1;
    }

    fn fail(&self, operation: &str, file_name: Option<&str>, error: Error) -> Error {
        warn!(operation, file = file_name, "{}", error);

        let mut event = LogEvent::new(format!("{}_{}", operation, error.kind()))
            .with_operation(operation)
            .with_error(error.to_string());
        if let Some(name) = file_name {
            event = event.with_file(name);
        }
        if let Some(details) = error.details() {
            event = event.with_error_details(details);
        }
        self.events.log(event);
        error
    }
}
