//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
///
/// Every variant is recoverable: the session state is left untouched and
/// the caller decides how to surface the message.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported file type: {0}. Please upload CSV, TSV, TXT, or XLSX.")]
    UnsupportedFileKind(String),

    /// The file had no non-blank lines after the header
    #[error("{0} contains no data rows.")]
    NoDataRows(String),

    /// Every data row was rejected
    #[error("No transactions found in {file_name}. Ensure it has Date, Description, Amount.")]
    NoTransactionsFound { file_name: String, data_lines: usize },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Short machine-friendly name, used as the event name suffix in the session log
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedFileKind(_) => "unsupported_file",
            Self::NoDataRows(_) => "no_data_rows",
            Self::NoTransactionsFound { .. } => "no_transactions",
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation",
            Self::Io(_) => "io",
        }
    }

    /// Extra context for the session log, when the variant carries any
    pub fn details(&self) -> Option<String> {
        match self {
            Self::NoTransactionsFound { data_lines, .. } => {
                Some(format!("data_lines={}, all rejected", data_lines))
            }
            Self::NoDataRows(_) => Some("data_lines=0".to_string()),
            _ => None,
        }
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
