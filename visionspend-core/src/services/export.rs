//! CSV export of the displayed view

use serde::Serialize;

use crate::domain::Transaction;

pub const EXPORT_FILE_NAME: &str = "transactions.csv";
pub const EXPORT_MIME_TYPE: &str = "text/csv;charset=utf-8;";

const HEADER: &str = "Date,Description,Category,Amount";

/// A rendered download
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    pub fn from_view(view: &[Transaction]) -> Self {
        Self {
            file_name: EXPORT_FILE_NAME.to_string(),
            mime: EXPORT_MIME_TYPE.to_string(),
            bytes: render_csv(view).into_bytes(),
        }
    }
}

/// Render `view` as comma-separated text, one row per record, newline-joined
///
/// Description and category are always quoted with embedded quotes doubled.
/// Amounts are written in their shortest plain decimal form (`-4.5`, `2500`).
pub fn render_csv(view: &[Transaction]) -> String {
    let mut lines = Vec::with_capacity(view.len() + 1);
    lines.push(HEADER.to_string());
    lines.extend(view.iter().map(|t| {
        format!(
            "{},{},{},{}",
            t.date.format("%Y-%m-%d"),
            quote(&t.description),
            quote(&t.category),
            t.amount.normalize()
        )
    }));
    lines.join("\n")
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;

    fn tx(description: &str, cents: i64, category: &str) -> Transaction {
        Transaction::new(
            "id",
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            description,
            Decimal::new(cents, 2),
            category,
        )
    }

    #[test]
    fn test_render_rows() {
        let csv = render_csv(&[tx("Starbucks Coffee", -450, "Food & Drink"), tx("Paycheck", 250000, "Income")]);
        assert_eq!(
            csv,
            "Date,Description,Category,Amount\n\
             2024-01-05,\"Starbucks Coffee\",\"Food & Drink\",-4.5\n\
             2024-01-05,\"Paycheck\",\"Income\",2500"
        );
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        let csv = render_csv(&[tx(r#"He said "hi""#, -100, "Misc")]);
        assert!(csv.contains(r#""He said ""hi""""#));
    }

    #[test]
    fn test_empty_view_is_header_only() {
        assert_eq!(render_csv(&[]), HEADER);
    }

    #[test]
    fn test_output_reads_back_with_csv_reader() {
        let view = vec![tx(r#"He said "hi", twice"#, -1234, "Gifts"), tx("Rent", -120000, "Housing")];
        let file = ExportFile::from_view(&view);
        assert_eq!(file.file_name, "transactions.csv");
        assert_eq!(file.mime, "text/csv;charset=utf-8;");

        let mut reader = csv::Reader::from_reader(file.bytes.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers, vec!["Date", "Description", "Category", "Amount"]);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], r#"He said "hi", twice"#);
        assert_eq!(&rows[0][3], "-12.34");
        assert_eq!(&rows[1][3], "-1200");
    }
}
