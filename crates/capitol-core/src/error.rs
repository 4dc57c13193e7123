//! Error types for the Capitol Trades scraper
//!
//! This module defines all error types used throughout the library.
//! ScrapeError implements Serialize so page failures can be written
//! into the JSON error summary.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for Capitol Trades scraping operations
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Transport-level HTTP failure (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a client or server error status
    #[error("HTTP {status} fetching {url}")]
    Fetch { url: String, status: u16 },

    /// Required markup was absent or unreadable
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// A field value did not match its expected textual pattern
    #[error("Failed to parse value: {0}")]
    Parse(String),

    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration rejected before any request was made
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Filesystem error while writing output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited output could not be written
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error summary could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScrapeError {
    /// Whether a fresh attempt at the same request could succeed.
    ///
    /// Transport errors and 5xx responses are retryable; 4xx are not.
    pub fn is_transient(&self) -> bool {
        match self {
            ScrapeError::Http(_) => true,
            ScrapeError::Fetch { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Serialize ScrapeError as its display string
impl Serialize for ScrapeError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for scraping operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_error_display_fetch() {
        let error = ScrapeError::Fetch {
            url: "https://example.com/trades?page=2".to_string(),
            status: 503,
        };
        assert_eq!(
            error.to_string(),
            "HTTP 503 fetching https://example.com/trades?page=2"
        );
    }

    #[test]
    fn test_scrape_error_display_extraction() {
        let error = ScrapeError::Extraction("page count paragraph not found".to_string());
        assert_eq!(
            error.to_string(),
            "Extraction failed: page count paragraph not found"
        );
    }

    #[test]
    fn test_scrape_error_display_parse() {
        let error = ScrapeError::Parse("'2023-03-15' is not a date".to_string());
        assert!(error.to_string().contains("2023-03-15"));
    }

    #[test]
    fn test_scrape_error_display_invalid_url() {
        let error = ScrapeError::InvalidUrl("not-a-url".to_string());
        assert_eq!(error.to_string(), "Invalid URL: not-a-url");
    }

    #[test]
    fn test_transient_classification() {
        let server = ScrapeError::Fetch {
            url: String::new(),
            status: 502,
        };
        let client = ScrapeError::Fetch {
            url: String::new(),
            status: 404,
        };
        assert!(server.is_transient());
        assert!(!client.is_transient());
        assert!(!ScrapeError::Parse("x".to_string()).is_transient());
    }

    #[test]
    fn test_scrape_error_serialize() {
        let error = ScrapeError::Extraction("test error".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(json, "\"Extraction failed: test error\"");
    }

    #[test]
    fn test_scrape_error_serialize_fetch() {
        let error = ScrapeError::Fetch {
            url: "u".to_string(),
            status: 404,
        };
        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(json, "\"HTTP 404 fetching u\"");
    }
}
