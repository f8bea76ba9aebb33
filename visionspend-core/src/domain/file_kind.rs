//! Uploaded file kinds and their delimiters

use serde::{Deserialize, Serialize};

/// Kind of an uploaded transaction file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Csv,
    Tsv,
    /// Plain text; delimiter sniffed from content
    Txt,
    /// Spreadsheet binary; only a best-effort delimited-text fallback is attempted
    Xlsx,
}

impl FileKind {
    /// Detect the kind from a file name and/or MIME type
    ///
    /// The extension is checked first, then the MIME type.
    pub fn detect(file_name: &str, mime_type: Option<&str>) -> Option<Self> {
        Self::from_file_name(file_name).or_else(|| mime_type.and_then(Self::from_mime_type))
    }

    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "tsv" => Some(Self::Tsv),
            "txt" => Some(Self::Txt),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }

    pub fn from_mime_type(mime_type: &str) -> Option<Self> {
        let essence = mime_type.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            "text/csv" | "application/vnd.ms-excel" => Some(Self::Csv),
            "text/tab-separated-values" => Some(Self::Tsv),
            "text/plain" => Some(Self::Txt),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => Some(Self::Xlsx),
            _ => None,
        }
    }

    /// Delimiter for this kind given the decoded content
    ///
    /// TXT uses tab when the content contains one and comma otherwise.
    /// XLSX falls back to comma.
    pub fn delimiter_for(&self, content: &str) -> char {
        match self {
            Self::Csv | Self::Xlsx => ',',
            Self::Tsv => '\t',
            Self::Txt => {
                if content.contains('\t') {
                    '\t'
                } else {
                    ','
                }
            }
        }
    }

    /// True when parsing this kind is experimental
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Xlsx)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Txt => "txt",
            Self::Xlsx => "xlsx",
        }
    }
}
