//! Field normalization for scraped trade tables
//!
//! Converts the date, day-count and size columns of a raw [`TradeTable`]
//! into typed values. Normalization is all-or-nothing: the first value that
//! does not match its pattern aborts the whole table.

use chrono::NaiveDate;
use regex_lite::Regex;

use crate::error::{Result, ScrapeError};
use crate::types::{NormalizedTradeTable, SizeRange, TradeTable, Value};

pub const PUBLISHED: &str = "Published";
pub const TRADED: &str = "Traded";
pub const FILED_AFTER: &str = "Filed after";
pub const SIZE: &str = "Size";
pub const SIZE_MIN: &str = "Size_min";
pub const SIZE_MAX: &str = "Size_max";

/// Day, abbreviated month and year with no space before the year ("15 Mar2023")
const DATE_FORMAT: &str = "%d %b%Y";

/// Separator of size ranges (U+2013 EN DASH, not a hyphen)
const SIZE_SEPARATOR: char = '–';

/// A decimal number followed by an optional `K` or `M` scale suffix
const SIZE_BOUND_PATTERN: &str = r"^([0-9]+(?:\.[0-9]+)?)\s*([KM]?)$";

/// Parse a listing date such as `"15 Mar2023"`.
///
/// # Examples
/// ```
/// use capitol_core::normalize::parse_date;
/// use chrono::NaiveDate;
///
/// assert_eq!(
///     parse_date("15 Mar2023").unwrap(),
///     NaiveDate::from_ymd_opt(2023, 3, 15).unwrap()
/// );
/// assert!(parse_date("2023-03-15").is_err());
/// ```
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|e| ScrapeError::Parse(format!("'{}' is not a date like '15 Mar2023': {}", text, e)))
}

/// Parse a "Filed after" value such as `"23 days"` into a day count.
pub fn parse_filed_after(text: &str) -> Result<i64> {
    let trimmed = text.trim();
    let number = trimmed
        .strip_suffix("days")
        .or_else(|| trimmed.strip_suffix("day"))
        .unwrap_or(trimmed)
        .trim();

    number
        .parse::<i64>()
        .map_err(|_| ScrapeError::Parse(format!("'{}' is not a day count", text)))
}

/// Parse one bound of a size range: a decimal with optional `K`/`M` scale.
fn parse_size_bound(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let re = Regex::new(SIZE_BOUND_PATTERN)
        .map_err(|e| ScrapeError::Parse(format!("Invalid pattern: {}", e)))?;
    let caps = re
        .captures(trimmed)
        .ok_or_else(|| ScrapeError::Parse(format!("'{}' is not a size bound", text)))?;

    let number: f64 = caps[1]
        .parse()
        .map_err(|_| ScrapeError::Parse(format!("'{}' is not a size bound", text)))?;
    let scale = match &caps[2] {
        "K" => 1_000.0,
        "M" => 1_000_000.0,
        _ => 1.0,
    };
    Ok(number * scale)
}

/// Parse a size range such as `"1K–15K"` into absolute bounds.
///
/// # Examples
/// ```
/// use capitol_core::normalize::parse_size_range;
///
/// let range = parse_size_range("1K–15M").unwrap();
/// assert_eq!(range.min, 1_000.0);
/// assert_eq!(range.max, 15_000_000.0);
/// ```
pub fn parse_size_range(text: &str) -> Result<SizeRange> {
    let mut parts = text.split(SIZE_SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(min), Some(max), None) => Ok(SizeRange {
            min: parse_size_bound(min)?,
            max: parse_size_bound(max)?,
        }),
        _ => Err(ScrapeError::Parse(format!(
            "'{}' is not a size range like '1K–15K'",
            text
        ))),
    }
}

fn required_column(table: &TradeTable, name: &str) -> Result<usize> {
    table
        .column_index(name)
        .ok_or_else(|| ScrapeError::Parse(format!("missing column '{}'", name)))
}

/// Normalize a raw trade table.
///
/// `Published` and `Traded` become dates, `Filed after` an integer day
/// count, and `Size_min`/`Size_max` are appended after the existing
/// columns. Other columns pass through as text.
///
/// # Errors
/// `ScrapeError::Parse` naming the row and column of the first bad value,
/// a row whose cell count differs from the header, or a required column
/// that is missing.
pub fn normalize_table(table: &TradeTable) -> Result<NormalizedTradeTable> {
    let published = required_column(table, PUBLISHED)?;
    let traded = required_column(table, TRADED)?;
    let filed_after = required_column(table, FILED_AFTER)?;
    let size = required_column(table, SIZE)?;

    let mut headers = table.headers.clone();
    headers.push(SIZE_MIN.to_string());
    headers.push(SIZE_MAX.to_string());

    let mut rows = Vec::with_capacity(table.rows.len());
    for (row_idx, row) in table.rows.iter().enumerate() {
        if row.len() != table.headers.len() {
            return Err(ScrapeError::Parse(format!(
                "row {} has {} cells, header has {}",
                row_idx + 1,
                row.len(),
                table.headers.len()
            )));
        }

        let at = |column: &str, err: ScrapeError| {
            ScrapeError::Parse(format!("row {}, column '{}': {}", row_idx + 1, column, err))
        };

        let mut values = Vec::with_capacity(headers.len());
        let mut range = None;
        for (col_idx, cell) in row.iter().enumerate() {
            let value = if col_idx == published || col_idx == traded {
                let column = table.headers[col_idx].as_str();
                Value::Date(parse_date(cell).map_err(|e| at(column, e))?)
            } else if col_idx == filed_after {
                Value::Integer(parse_filed_after(cell).map_err(|e| at(FILED_AFTER, e))?)
            } else {
                if col_idx == size {
                    range = Some(parse_size_range(cell).map_err(|e| at(SIZE, e))?);
                }
                Value::Text(cell.clone())
            };
            values.push(value);
        }

        let range = range.ok_or_else(|| at(SIZE, ScrapeError::Parse("value missing".to_string())))?;
        values.push(Value::Number(range.min));
        values.push(Value::Number(range.max));
        rows.push(values);
    }

    Ok(NormalizedTradeTable { headers, rows })
}
