//! Logging service - structured session event log
//!
//! Records the caller-visible outcome of imports, edits and exports so the
//! UI can notify the user and support can inspect what happened. Events
//! carry file names and operation names only; transaction contents
//! (descriptions, amounts) are never logged.
//!
//! The log lives in memory for the lifetime of the session and is owned by
//! the single-threaded session context.

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Counter for generating unique IDs within the same millisecond
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a unique ID based on timestamp + counter
fn generate_id() -> u64 {
    // Lower 16 bits carry the counter (65536 unique IDs per millisecond)
    let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed) & 0xFFFF;
    ((now_ms() as u64) << 16) | counter
}

/// Get current unix timestamp in milliseconds
fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

/// Detect the current platform
fn detect_platform() -> &'static str {
    if cfg!(target_os = "macos") {
        "macos"
    } else if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "linux") {
        "linux"
    } else if cfg!(target_arch = "wasm32") {
        "web"
    } else {
        "unknown"
    }
}

/// Surface hosting the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPoint {
    Desktop,
    Web,
    Test,
}

impl EntryPoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryPoint::Desktop => "desktop",
            EntryPoint::Web => "web",
            EntryPoint::Test => "test",
        }
    }
}

/// A log event to be recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

impl LogEvent {
    /// Create a new log event with just an event name
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            file_name: None,
            operation: None,
            error_message: None,
            error_details: None,
        }
    }

    /// Set the file the event concerns
    pub fn with_file(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Set the operation context (import, edit, export, ...)
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Set error information
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Set error details (counts, offending value kind)
    pub fn with_error_details(mut self, details: impl Into<String>) -> Self {
        self.error_details = Some(details.into());
        self
    }
}

/// A recorded log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: i64,
    pub entry_point: String,
    pub app_version: String,
    pub platform: String,
    pub event: String,
    pub file_name: Option<String>,
    pub operation: Option<String>,
    pub error_message: Option<String>,
    pub error_details: Option<String>,
}

impl LogEntry {
    pub fn is_error(&self) -> bool {
        self.error_message.is_some()
    }
}

/// Session event log
pub struct EventLog {
    entries: RefCell<Vec<LogEntry>>,
    entry_point: EntryPoint,
    app_version: String,
    platform: &'static str,
}

impl EventLog {
    pub fn new(entry_point: EntryPoint, app_version: impl Into<String>) -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            entry_point,
            app_version: app_version.into(),
            platform: detect_platform(),
        }
    }

    /// Log an event
    ///
    /// The entry_point, app_version and platform are added from the log
    /// configuration.
    pub fn log(&self, event: LogEvent) {
        self.entries.borrow_mut().push(LogEntry {
            id: generate_id(),
            timestamp: now_ms(),
            entry_point: self.entry_point.as_str().to_string(),
            app_version: self.app_version.clone(),
            platform: self.platform.to_string(),
            event: event.event,
            file_name: event.file_name,
            operation: event.operation,
            error_message: event.error_message,
            error_details: event.error_details,
        });
    }

    /// Log a simple event with just a name
    pub fn log_event(&self, event: &str) {
        self.log(LogEvent::new(event))
    }

    /// Most recent entries first, up to `limit`
    pub fn recent(&self, limit: usize) -> Vec<LogEntry> {
        self.entries.borrow().iter().rev().take(limit).cloned().collect()
    }

    /// Most recent entries carrying an error, up to `limit`
    pub fn errors(&self, limit: usize) -> Vec<LogEntry> {
        self.entries
            .borrow()
            .iter()
            .rev()
            .filter(|e| e.is_error())
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn count(&self) -> u64 {
        self.entries.borrow().len() as u64
    }

    /// Drop every entry, returning how many were removed
    pub fn clear(&self) -> u64 {
        let mut entries = self.entries.borrow_mut();
        let removed = entries.len() as u64;
        entries.clear();
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        let log = EventLog::new(EntryPoint::Test, "1.0.0");

        log.log_event("test_event");

        let entries = log.recent(10);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event, "test_event");
        assert_eq!(entries[0].entry_point, "test");
        assert_eq!(entries[0].app_version, "1.0.0");
        assert!(!entries[0].is_error());
    }

    #[test]
    fn test_log_with_context() {
        let log = EventLog::new(EntryPoint::Web, "2.0.0");

        log.log(
            LogEvent::new("import_completed")
                .with_file("bank.csv")
                .with_operation("import"),
        );

        let entries = log.recent(10);
        assert_eq!(entries[0].file_name, Some("bank.csv".to_string()));
        assert_eq!(entries[0].operation, Some("import".to_string()));
        assert_eq!(entries[0].entry_point, "web");
    }

    #[test]
    fn test_log_error() {
        let log = EventLog::new(EntryPoint::Desktop, "1.0.0");

        log.log_event("import_completed");
        log.log(
            LogEvent::new("import_failed")
                .with_error("No transactions found")
                .with_error_details("data_lines=3"),
        );

        let errors = log.errors(10);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].event, "import_failed");
        assert_eq!(errors[0].error_message, Some("No transactions found".to_string()));
        assert_eq!(errors[0].error_details, Some("data_lines=3".to_string()));
    }

    #[test]
    fn test_recent_is_newest_first_and_limited() {
        let log = EventLog::new(EntryPoint::Test, "1.0.0");
        for name in ["first", "second", "third"] {
            log.log_event(name);
        }

        let recent = log.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].event, "third");
        assert_eq!(recent[1].event, "second");
    }

    #[test]
    fn test_count_and_clear() {
        let log = EventLog::new(EntryPoint::Test, "1.0.0");

        log.log_event("event1");
        log.log_event("event2");
        log.log_event("event3");

        assert_eq!(log.count(), 3);
        assert_eq!(log.clear(), 3);
        assert_eq!(log.count(), 0);
    }

    #[test]
    fn test_ids_are_unique() {
        let log = EventLog::new(EntryPoint::Test, "1.0.0");
        for _ in 0..100 {
            log.log_event("tick");
        }
        let mut ids: Vec<u64> = log.recent(100).iter().map(|e| e.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 100);
    }
}
