//! Scrape run configuration
//!
//! Everything a run needs (listing URL, output location, policies) lives in
//! [`ScraperConfig`] so tests can point the scraper at fixture servers and
//! temporary paths.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::client::ClientConfig;
use crate::error::{Result, ScrapeError};

/// Listing page on capitoltrades.com
pub const DEFAULT_BASE_URL: &str = "https://www.capitoltrades.com/trades";

/// Where the reference run writes its output
pub const DEFAULT_OUTPUT_PATH: &str = "data/capitol_trader/capitol_trader_scraped_data.csv";

/// Query parameter selecting a listing page
pub const DEFAULT_PAGE_PARAM: &str = "page";

/// Field separator of the output file
pub const DEFAULT_DELIMITER: u8 = b';';

/// What the scrape loop does when a single page fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Abort the run on the first failing page.
    #[default]
    FailFast,
    /// Record the failure and continue with the next page.
    SkipFailedPages,
}

/// Configuration for one scrape run
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Unpaginated listing URL; page URLs are derived from it
    pub base_url: String,
    /// Query parameter carrying the page number (default: "page")
    pub page_param: String,
    /// Output file path
    pub output_path: PathBuf,
    /// Output field separator (default: ';')
    pub delimiter: u8,
    /// Per-page failure handling (default: fail fast)
    pub failure_policy: FailurePolicy,
    /// Optional cap on the number of pages scraped
    pub max_pages: Option<u32>,
    /// HTTP client settings
    pub client: ClientConfig,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_param: DEFAULT_PAGE_PARAM.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            delimiter: DEFAULT_DELIMITER,
            failure_policy: FailurePolicy::default(),
            max_pages: None,
            client: ClientConfig::default(),
        }
    }
}

impl ScraperConfig {
    /// Create a configuration for a different listing URL, other fields default.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Check the configuration before any request is made.
    ///
    /// # Errors
    /// - `ScrapeError::InvalidUrl` if `base_url` is not an absolute http(s) URL
    /// - `ScrapeError::InvalidConfig` for an empty page parameter, a
    ///   non-ASCII or newline delimiter, or a zero page cap
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ScrapeError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ScrapeError::InvalidUrl(format!(
                "{}: unsupported scheme",
                self.base_url
            )));
        }

        if self.page_param.trim().is_empty() {
            return Err(ScrapeError::InvalidConfig(
                "page parameter cannot be empty".to_string(),
            ));
        }

        if !self.delimiter.is_ascii() || matches!(self.delimiter, b'\n' | b'\r' | b'"') {
            return Err(ScrapeError::InvalidConfig(format!(
                "unusable delimiter byte {:#04x}",
                self.delimiter
            )));
        }

        if self.max_pages == Some(0) {
            return Err(ScrapeError::InvalidConfig(
                "max_pages must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Build the URL of a single listing page.
    ///
    /// The page parameter is appended to any query the base URL already has.
    ///
    /// # Examples
    /// ```
    /// use capitol_core::ScraperConfig;
    ///
    /// let config = ScraperConfig::default();
    /// assert_eq!(
    ///     config.page_url(3).unwrap(),
    ///     "https://www.capitoltrades.com/trades?page=3"
    /// );
    /// ```
    pub fn page_url(&self, page: u32) -> Result<String> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ScrapeError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.query_pairs_mut()
            .append_pair(&self.page_param, &page.to_string());
        Ok(url.into())
    }
}
