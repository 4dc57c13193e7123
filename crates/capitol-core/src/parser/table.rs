//! Trades table parser for capitoltrades.com
//!
//! Extracts the header row and body rows of the `q-table trades-table`
//! element. The site renders a trailing "actions" column with no data; it is
//! dropped from the header and from every row.

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::error::{Result, ScrapeError};

/// Structural marker of the trades table
const TABLE_SELECTOR: &str = "table.q-table.trades-table";

/// Rows extracted from one listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    /// Kept rows, each with exactly one cell per header
    pub rows: Vec<Vec<String>>,
    /// Header sequence in effect; `None` if none was supplied and the page
    /// had no table to read one from
    pub headers: Option<Vec<String>>,
    /// Rows dropped because their cell count did not match the header
    pub rejected: usize,
    /// Whether the trades table was present at all
    pub table_found: bool,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::Extraction(format!("Invalid selector: {:?}", e)))
}

/// Collapse an element's text nodes into one trimmed string.
fn cell_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Drop the trailing column.
fn without_last(mut cells: Vec<String>) -> Vec<String> {
    cells.pop();
    cells
}

/// Read the header labels of a table, trailing column excluded.
///
/// # Examples
/// ```
/// use capitol_core::parser::extract_headers;
/// use scraper::{Html, Selector};
///
/// let html = Html::parse_fragment(
///     "<table><tr><th>Politician</th><th>Size</th><th></th></tr></table>",
/// );
/// let table = html.select(&Selector::parse("table").unwrap()).next().unwrap();
/// assert_eq!(extract_headers(&table).unwrap(), vec!["Politician", "Size"]);
/// ```
pub fn extract_headers(table: &ElementRef) -> Result<Vec<String>> {
    let th = selector("th")?;
    let headers = table.select(&th).map(|cell| cell_text(&cell)).collect();
    Ok(without_last(headers))
}

/// Extract trade rows from a parsed listing page.
///
/// When `headers` is `None` the header sequence is read from the table
/// itself; otherwise the supplied sequence is reused unchanged. A missing
/// table yields no rows rather than an error.
///
/// # Arguments
/// * `document` - Parsed listing page
/// * `headers` - Header sequence established by an earlier page, if any
///
/// # Returns
/// * `Ok(ExtractedPage)` with the kept rows and the header in effect
pub fn extract_table(document: &Html, headers: Option<&[String]>) -> Result<ExtractedPage> {
    let table_selector = selector(TABLE_SELECTOR)?;

    let Some(table) = document.select(&table_selector).next() else {
        return Ok(ExtractedPage {
            headers: headers.map(<[String]>::to_vec),
            ..ExtractedPage::default()
        });
    };

    let headers = match headers {
        Some(h) => h.to_vec(),
        None => extract_headers(&table)?,
    };

    let tr = selector("tr")?;
    let td = selector("td")?;

    let mut rows = Vec::new();
    let mut rejected = 0;
    for row in table.select(&tr) {
        let cells: Vec<String> = row.select(&td).map(|cell| cell_text(&cell)).collect();
        if cells.is_empty() {
            continue;
        }

        let cells = without_last(cells);
        if cells.len() != headers.len() {
            warn!(
                expected = headers.len(),
                found = cells.len(),
                "dropping row with mismatched cell count"
            );
            rejected += 1;
            continue;
        }
        rows.push(cells);
    }

    Ok(ExtractedPage {
        rows,
        headers: Some(headers),
        rejected,
        table_found: true,
    })
}

/// Parse a listing page from raw HTML and extract its trade rows.
///
/// Convenience wrapper around [`extract_table`].
pub fn parse_trades_page(html: &str, headers: Option<&[String]>) -> Result<ExtractedPage> {
    let document = Html::parse_document(html);
    extract_table(&document, headers)
}
