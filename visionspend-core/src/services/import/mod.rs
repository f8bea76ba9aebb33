//! Import service - delimited transaction file import
//!
//! Pipeline per file: decode once, pick the delimiter from the file kind,
//! skip a recognisable header line, run every remaining line through the
//! [`LineParser`]. Malformed lines are dropped silently. An empty result is
//! reported by [`ImportService::import_text`]: `NoDataRows` when nothing
//! followed the header, `NoTransactionsFound` when every data row was
//! rejected.

pub mod classifier;
pub mod line;
pub mod values;

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::ImportSettings;
use crate::domain::result::{Error, Result};
use crate::domain::{FileKind, Transaction};
use crate::ports::IdGenerator;

pub use classifier::{Classification, FieldClassifier, Rejection, RowCandidate};
pub use line::{split_fields, LineParser};

/// Transactions extracted from one delimited text, plus line accounting
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParsedFile {
    pub transactions: Vec<Transaction>,
    pub header_skipped: bool,
    /// Non-blank lines after the header
    pub data_lines: usize,
    /// Data lines that produced no transaction
    pub rejected_lines: usize,
}

/// Result of importing one uploaded file
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub file_name: String,
    pub kind: FileKind,
    /// True when the kind is only partially supported (XLSX)
    pub degraded: bool,
    pub header_skipped: bool,
    pub data_lines: usize,
    pub rejected_lines: usize,
    /// In file order
    pub transactions: Vec<Transaction>,
}

/// Import service for delimited text files
pub struct ImportService {
    parser: LineParser,
    header_keywords: Vec<String>,
}

impl ImportService {
    pub fn new(settings: &ImportSettings) -> Self {
        Self::with_id_generator(settings, settings.id_strategy.generator())
    }

    pub fn with_id_generator(settings: &ImportSettings, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            parser: LineParser::new(settings, ids),
            header_keywords: settings
                .header_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
        }
    }

    /// True if `line` mentions every header keyword (case-insensitive)
    pub fn is_header(&self, line: &str) -> bool {
        let lowered = line.to_lowercase();
        !self.header_keywords.is_empty()
            && self.header_keywords.iter().all(|k| lowered.contains(k.as_str()))
    }

    /// Parse delimited text into transactions, preserving file order
    pub fn parse_delimited(&self, content: &str, delimiter: char) -> Vec<Transaction> {
        self.parse_delimited_detailed(content, delimiter).transactions
    }

    /// Comma-delimited text
    pub fn parse_csv(&self, content: &str) -> Vec<Transaction> {
        self.parse_delimited(content, ',')
    }

    /// Tab-delimited text
    pub fn parse_tsv(&self, content: &str) -> Vec<Transaction> {
        self.parse_delimited(content, '\t')
    }

    /// Plain text: tab-delimited if the content contains a tab, else comma
    pub fn parse_txt(&self, content: &str) -> Vec<Transaction> {
        self.parse_delimited(content, FileKind::Txt.delimiter_for(content))
    }

    /// Parse delimited text, keeping header and rejection accounting
    pub fn parse_delimited_detailed(&self, content: &str, delimiter: char) -> ParsedFile {
        let lines: Vec<&str> = content
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .collect();

        let header_skipped = lines.first().is_some_and(|first| self.is_header(first));
        let start = usize::from(header_skipped);

        let mut parsed = ParsedFile {
            header_skipped,
            ..ParsedFile::default()
        };

        for (idx, line) in lines.iter().enumerate().skip(start) {
            if line.trim().is_empty() {
                continue;
            }
            parsed.data_lines += 1;
            match self.parser.parse_line_logged(idx + 1, line, delimiter) {
                Ok(tx) => parsed.transactions.push(tx),
                Err(_) => parsed.rejected_lines += 1,
            }
        }

        parsed
    }

    /// Import already-decoded text of a known kind
    ///
    /// Returns [`Error::NoDataRows`] for a file with no data lines and
    /// [`Error::NoTransactionsFound`] when every data line was rejected.
    pub fn import_text(&self, file_name: &str, kind: FileKind, content: &str) -> Result<ImportOutcome> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        if kind.is_degraded() {
            warn!(
                file = file_name,
                "XLSX parsing is experimental; attempting a comma-delimited fallback"
            );
        }

        let parsed = self.parse_delimited_detailed(content, kind.delimiter_for(content));
        if parsed.data_lines == 0 {
            warn!(file = file_name, "No data rows");
            return Err(Error::NoDataRows(file_name.to_string()));
        }
        if parsed.transactions.is_empty() {
            warn!(
                file = file_name,
                data_lines = parsed.data_lines,
                "No transactions found"
            );
            return Err(Error::NoTransactionsFound {
                file_name: file_name.to_string(),
                data_lines: parsed.data_lines,
            });
        }

        info!(
            file = file_name,
            kind = kind.as_str(),
            imported = parsed.transactions.len(),
            rejected = parsed.rejected_lines,
            "Parsed transaction file"
        );

        Ok(ImportOutcome {
            file_name: file_name.to_string(),
            kind,
            degraded: kind.is_degraded(),
            header_skipped: parsed.header_skipped,
            data_lines: parsed.data_lines,
            rejected_lines: parsed.rejected_lines,
            transactions: parsed.transactions,
        })
    }

    /// Import raw uploaded bytes
    ///
    /// The kind is detected from the file name, then the MIME type; unknown
    /// kinds are refused before any decoding. Bytes are decoded as UTF-8,
    /// replacing invalid sequences.
    pub fn import_bytes(
        &self,
        file_name: &str,
        mime_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<ImportOutcome> {
        let kind = FileKind::detect(file_name, mime_type)
            .ok_or_else(|| Error::UnsupportedFileKind(file_name.to_string()))?;
        let content = String::from_utf8_lossy(bytes);
        self.import_text(file_name, kind, &content)
    }

    /// Import a file from disk
    pub fn import_path(&self, path: &Path) -> Result<ImportOutcome> {
        let file_name = display_name(path);
        let kind = FileKind::detect(&file_name, None)
            .ok_or_else(|| Error::UnsupportedFileKind(file_name.clone()))?;
        let bytes = std::fs::read(path)?;
        let content = String::from_utf8_lossy(&bytes);
        self.import_text(&file_name, kind, &content)
    }
}

/// Name reported for a file on disk: its final component, else the whole path
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl Default for ImportService {
    fn default() -> Self {
        Self::new(&ImportSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_header_is_skipped() {
        let content = "Date,Description,Amount\n2024-01-15,Starbucks Coffee,-4.50\n2024-01-16,Uber,-12.00";
        let parsed = ImportService::default().parse_delimited_detailed(content, ',');
        assert!(parsed.header_skipped);
        assert_eq!(parsed.data_lines, 2);
        assert_eq!(parsed.transactions.len(), 2);
        assert_eq!(parsed.transactions[0].description, "Starbucks Coffee");
        assert_eq!(parsed.transactions[1].category, "Transport");
    }

    #[test]
    fn test_first_line_is_data_without_both_keywords() {
        let content = "2024-01-15,Starbucks Coffee,-4.50\n2024-01-16,Uber,-12.00";
        let parsed = ImportService::default().parse_delimited_detailed(content, ',');
        assert!(!parsed.header_skipped);
        assert_eq!(parsed.transactions.len(), 2);

        let content = "Date,Memo,Amount\n2024-01-15,Coffee,-4.50";
        let parsed = ImportService::default().parse_delimited_detailed(content, ',');
        assert!(!parsed.header_skipped);
        assert_eq!(parsed.rejected_lines, 1);
        assert_eq!(parsed.transactions.len(), 1);
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let content = "Date,Description,Amount\r\n\r\n2024-01-15,Coffee,-4.50\r\n   \r\n2024-01-16,Rent,-1200\r\n";
        let parsed = ImportService::default().parse_delimited_detailed(content, ',');
        assert_eq!(parsed.data_lines, 2);
        assert_eq!(parsed.rejected_lines, 0);
        assert_eq!(parsed.transactions[1].amount, Decimal::new(-1200, 0));
    }

    #[test]
    fn test_file_order_is_preserved() {
        let content = "2024-01-01,A,1\n2024-03-01,B,2\n2024-02-01,C,3";
        let txs = ImportService::default().parse_csv(content);
        let descriptions: Vec<_> = txs.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_tsv_and_txt_entry_points() {
        let service = ImportService::default();
        let tsv = "2024-01-15\tCoffee, large\t-4.50";
        assert_eq!(service.parse_tsv(tsv)[0].description, "Coffee, large");
        assert_eq!(service.parse_txt(tsv)[0].description, "Coffee, large");
        assert_eq!(service.parse_txt("2024-01-15,Coffee,-4.50")[0].description, "Coffee");
    }

    #[test]
    fn test_ids_are_unique_within_import() {
        let content = "2024-01-15,Coffee,-4.50\n2024-01-15,Coffee,-4.50";
        let txs = ImportService::default().parse_csv(content);
        assert_eq!(txs.len(), 2);
        assert_ne!(txs[0].id, txs[1].id);
    }

    #[test]
    fn test_import_text_reports_empty_result() {
        let result = ImportService::default().import_text("junk.csv", FileKind::Csv, "hello\nworld");
        assert!(matches!(
            result,
            Err(Error::NoTransactionsFound { file_name, data_lines: 2 }) if file_name == "junk.csv"
        ));

        let result = ImportService::default().import_text("empty.csv", FileKind::Csv, "");
        assert!(matches!(result, Err(Error::NoDataRows(_))));
    }

    #[test]
    fn test_header_only_differs_from_all_rows_rejected() {
        let service = ImportService::default();

        let header_only = service.import_text("empty.csv", FileKind::Csv, "Date,Description,Amount\n");
        assert!(matches!(header_only, Err(Error::NoDataRows(name)) if name == "empty.csv"));

        let all_bad = service.import_text("bad.csv", FileKind::Csv, "Date,Description,Amount\nfoo,bar,baz\n");
        assert!(matches!(all_bad, Err(Error::NoTransactionsFound { data_lines: 1, .. })));
    }

    #[test]
    fn test_import_bytes_detects_kind_and_strips_bom() {
        let bytes = "\u{feff}Date\tDescription\tAmount\n2024-01-15\tCoffee\t-4.50".as_bytes();
        let outcome = ImportService::default()
            .import_bytes("export.txt", None, bytes)
            .unwrap();
        assert_eq!(outcome.kind, FileKind::Txt);
        assert!(outcome.header_skipped);
        assert!(!outcome.degraded);
        assert_eq!(outcome.transactions.len(), 1);
    }

    #[test]
    fn test_import_bytes_rejects_unknown_kind() {
        let result = ImportService::default().import_bytes("statement.pdf", Some("application/pdf"), b"%PDF");
        assert!(matches!(result, Err(Error::UnsupportedFileKind(_))));
    }

    #[test]
    fn test_xlsx_fallback_is_degraded() {
        let service = ImportService::default();
        let outcome = service
            .import_bytes("book.xlsx", None, b"2024-01-15,Coffee,-4.50")
            .unwrap();
        assert!(outcome.degraded);
        assert_eq!(outcome.transactions.len(), 1);

        let binary = [0x50u8, 0x4b, 0x03, 0x04, 0xff, 0x00, 0x10];
        let result = service.import_bytes("book.xlsx", None, &binary);
        assert!(matches!(result, Err(Error::NoTransactionsFound { .. })));
    }

    #[test]
    fn test_import_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.csv");
        std::fs::write(&path, "Date,Description,Amount\n2024-01-15,Coffee,-4.50\n").unwrap();

        let outcome = ImportService::default().import_path(&path).unwrap();
        assert_eq!(outcome.file_name, "bank.csv");
        assert_eq!(outcome.transactions.len(), 1);

        let missing = ImportService::default().import_path(&dir.path().join("missing.csv"));
        assert!(matches!(missing, Err(Error::Io(_))));
        assert_eq!(display_name(&dir.path().join("missing.csv")), "missing.csv");
    }
}
