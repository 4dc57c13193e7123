//! Delimited file output
//!
//! Writes raw or normalized trade tables as header-first delimited text and
//! the JSON summary of skipped pages.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use tracing::info;

use crate::error::Result;
use crate::types::{NormalizedTradeTable, PageFailure, TradeTable};

/// A table that can be written as delimited text
pub trait Tabular {
    /// Column names, in output order
    fn headers(&self) -> &[String];

    /// Rows rendered as text, in header order
    fn text_rows(&self) -> Box<dyn Iterator<Item = Vec<String>> + '_>;
}

impl Tabular for TradeTable {
    fn headers(&self) -> &[String] {
        &self.headers
    }

    fn text_rows(&self) -> Box<dyn Iterator<Item = Vec<String>> + '_> {
        Box::new(self.rows.iter().cloned())
    }
}

impl Tabular for NormalizedTradeTable {
    fn headers(&self) -> &[String] {
        &self.headers
    }

    fn text_rows(&self) -> Box<dyn Iterator<Item = Vec<String>> + '_> {
        Box::new(
            self.rows
                .iter()
                .map(|row| row.iter().map(ToString::to_string).collect()),
        )
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Write a table to any writer, header row first.
pub fn write_delimited<W: Write, T: Tabular + ?Sized>(
    writer: W,
    table: &T,
    delimiter: u8,
) -> Result<()> {
    let mut csv = WriterBuilder::new().delimiter(delimiter).from_writer(writer);
    csv.write_record(table.headers())?;
    for row in table.text_rows() {
        csv.write_record(&row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write a table to a file, creating missing parent directories.
///
/// # Errors
/// `ScrapeError::Io` or `ScrapeError::Csv` if the file cannot be written
pub fn write_table<T: Tabular + ?Sized>(path: &Path, table: &T, delimiter: u8) -> Result<()> {
    ensure_parent(path)?;
    let file = File::create(path)?;
    write_delimited(file, table, delimiter)?;
    info!(path = %path.display(), columns = table.headers().len(), "wrote table");
    Ok(())
}

/// Location of the error summary written alongside an output file.
///
/// # Examples
/// ```
/// use capitol_core::output::error_summary_path;
/// use std::path::Path;
///
/// assert_eq!(
///     error_summary_path(Path::new("data/trades.csv")),
///     Path::new("data/trades.csv.errors.json")
/// );
/// ```
pub fn error_summary_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_os_string();
    name.push(".errors.json");
    PathBuf::from(name)
}

/// Write skipped pages as a pretty-printed JSON array.
pub fn write_error_summary(path: &Path, failures: &[PageFailure]) -> Result<()> {
    ensure_parent(path)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, failures)?;
    info!(path = %path.display(), failures = failures.len(), "wrote error summary");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use crate::types::Value;
    use chrono::NaiveDate;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_write_raw_table_semicolon() {
        let table = TradeTable::new(
            strings(&["Politician", "Size"]),
            vec![strings(&["Nancy Pelosi", "1M–5M"]), strings(&["A; B", "1K–15K"])],
        );
        let mut out = Vec::new();
        write_delimited(&mut out, &table, b';').unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Politician;Size\nNancy Pelosi;1M–5M\n\"A; B\";1K–15K\n"
        );
    }

    #[test]
    fn test_write_normalized_table() {
        let table = NormalizedTradeTable {
            headers: strings(&["Published", "Filed after", "Size_min"]),
            rows: vec![vec![
                Value::Date(NaiveDate::from_ymd_opt(2023, 3, 15).unwrap()),
                Value::Integer(14),
                Value::Number(1000.0),
            ]],
        };
        let mut out = Vec::new();
        write_delimited(&mut out, &table, b',').unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Published,Filed after,Size_min\n2023-03-15,14,1000\n"
        );
    }

    #[test]
    fn test_write_table_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data/capitol_trader/out.csv");
        let table = TradeTable::new(strings(&["A", "B"]), vec![strings(&["x", "y"])]);

        write_table(&path, &table, b';').unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "A;B\nx;y\n");
    }

    #[test]
    fn test_write_error_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = error_summary_path(&dir.path().join("out.csv"));
        let failures = vec![PageFailure {
            page: 3,
            url: "http://localhost/trades?page=3".to_string(),
            error: ScrapeError::Fetch {
                url: "http://localhost/trades?page=3".to_string(),
                status: 500,
            },
        }];

        write_error_summary(&path, &failures).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json[0]["page"], 3);
        assert_eq!(json[0]["error"], "HTTP 500 fetching http://localhost/trades?page=3");
    }
}
