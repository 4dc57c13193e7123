//! Page count parser for the trades listing
//!
//! The listing shows "Page <b>1</b> of <b>N</b>" in a paragraph that is
//! hidden on small screens. The second bold run is the total.

use scraper::{Html, Selector};

use crate::error::{Result, ScrapeError};

/// Classes identifying the pagination summary paragraph
const SUMMARY_CLASSES: [&str; 3] = ["hidden", "leading-7", "sm:block"];

/// Read the total page count from the first listing page.
///
/// # Errors
/// `ScrapeError::Extraction` if the summary paragraph is missing, has fewer
/// than two bold runs, or the second run is not an unsigned integer. The
/// count is never defaulted.
///
/// # Examples
/// ```
/// use capitol_core::parser::parse_page_count;
/// use scraper::Html;
///
/// let doc = Html::parse_document(
///     r#"<p class="hidden leading-7 sm:block">Page <b>1</b> of <b>3,412</b></p>"#,
/// );
/// assert_eq!(parse_page_count(&doc).unwrap(), 3412);
/// ```
pub fn parse_page_count(document: &Html) -> Result<u32> {
    let p = Selector::parse("p")
        .map_err(|e| ScrapeError::Extraction(format!("Invalid selector: {:?}", e)))?;
    let b = Selector::parse("b")
        .map_err(|e| ScrapeError::Extraction(format!("Invalid selector: {:?}", e)))?;

    let summary = document
        .select(&p)
        .find(|el| {
            let classes: Vec<&str> = el.value().classes().collect();
            SUMMARY_CLASSES.iter().all(|c| classes.contains(c))
        })
        .ok_or_else(|| ScrapeError::Extraction("pagination summary paragraph not found".to_string()))?;

    let total = summary
        .select(&b)
        .nth(1)
        .ok_or_else(|| {
            ScrapeError::Extraction("pagination summary has no total page count".to_string())
        })?
        .text()
        .collect::<String>();

    parse_count(total.trim())
}

/// Parse a displayed count, tolerating thousands separators.
fn parse_count(text: &str) -> Result<u32> {
    let digits: String = text.chars().filter(|c| *c != ',').collect();
    digits
        .parse::<u32>()
        .map_err(|_| ScrapeError::Extraction(format!("invalid page count: '{}'", text)))
}

/// Parse the page count from raw HTML.
pub fn parse_page_count_html(html: &str) -> Result<u32> {
    parse_page_count(&Html::parse_document(html))
}
