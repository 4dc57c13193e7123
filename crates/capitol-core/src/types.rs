//! Data types for the Capitol Trades scraper
//!
//! Raw tables hold the cell text exactly as extracted; normalized tables hold
//! typed values. Both share the same "header + ordered rows" shape so the
//! writer can handle either.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;

/// Ordered trade rows sharing one header sequence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeTable {
    /// Column names, captured once per run
    pub headers: Vec<String>,
    /// Cell text of every kept row, in header order
    pub rows: Vec<Vec<String>>,
}

impl TradeTable {
    /// Create a table from a header sequence and rows
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column in the header sequence
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Iterate over rows as column-name keyed records
    pub fn records(&self) -> impl Iterator<Item = TradeRecord<'_>> {
        self.rows.iter().map(move |cells| TradeRecord {
            headers: &self.headers,
            cells,
        })
    }
}

/// One trade row viewed through the table's header sequence
#[derive(Debug, Clone, Copy)]
pub struct TradeRecord<'a> {
    headers: &'a [String],
    cells: &'a [String],
}

impl<'a> TradeRecord<'a> {
    /// Raw text of the named column, if present
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let idx = self.headers.iter().position(|h| h == column)?;
        self.cells.get(idx).map(String::as_str)
    }

    /// Cells in header order
    pub fn cells(&self) -> &'a [String] {
        self.cells
    }

    /// `(column, value)` pairs in header order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let (headers, cells) = (self.headers, self.cells);
        headers
            .iter()
            .zip(cells.iter())
            .map(|(h, c)| (h.as_str(), c.as_str()))
    }
}

/// Typed cell of a normalized table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Date(NaiveDate),
    Integer(i64),
    Number(f64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Trade table after field normalization
///
/// Headers are the raw headers followed by `Size_min` and `Size_max`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTradeTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl NormalizedTradeTable {
    /// Position of a column in the header sequence
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Value of a column in a given row
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }
}

/// Lower and upper bound of a disclosed size range, in absolute units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: f64,
    pub max: f64,
}

/// Progress notification sent after each completed page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScrapeProgress {
    /// Pages processed so far (1-based, monotonically increasing)
    pub pages_done: u32,
    /// Pages the run will process
    pub total_pages: u32,
    /// Rows accumulated so far
    pub rows_so_far: usize,
}

/// A page that failed under the skip-and-continue policy
#[derive(Debug, Serialize)]
pub struct PageFailure {
    /// 1-based page number
    pub page: u32,
    /// Requested URL
    pub url: String,
    /// What went wrong
    pub error: ScrapeError,
}

/// Outcome of a full scrape run
#[derive(Debug, Default, Serialize)]
pub struct ScrapeReport {
    /// Aggregated rows of every successful page
    pub table: TradeTable,
    /// Page count announced by the listing
    pub total_pages: u32,
    /// Pages fetched and extracted successfully
    pub pages_scraped: u32,
    /// Rows dropped because their cell count did not match the header
    pub rejected_rows: usize,
    /// Pages skipped after an error
    pub failures: Vec<PageFailure>,
}

impl ScrapeReport {
    /// Whether every page was scraped successfully
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
