//! HTML parsers for capitoltrades.com pages
//!
//! - `table`: Extract header and rows of the trades table
//! - `pagination`: Read the total page count of the listing

pub mod pagination;
pub mod table;

// Re-export main parsing functions
pub use pagination::{parse_page_count, parse_page_count_html};
pub use table::{extract_headers, extract_table, parse_trades_page, ExtractedPage};
