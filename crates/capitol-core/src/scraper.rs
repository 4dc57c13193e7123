//! Main Capitol Trades scraper API
//!
//! Combines the HTTP client with the parsers: read the page count from the
//! listing, then walk every page in order and aggregate the table rows.
//! Pages are processed strictly one after another.

use tracing::{info, warn};

use crate::client::TradesClient;
use crate::config::{FailurePolicy, ScraperConfig};
use crate::error::Result;
use crate::parser::{extract_table, parse_page_count, ExtractedPage};
use crate::types::{PageFailure, ScrapeProgress, ScrapeReport};

/// Main scraper API for the capitoltrades.com trades listing
///
/// # Example
/// ```no_run
/// use capitol_core::TradesScraper;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let scraper = TradesScraper::new()?;
///     let report = scraper.scrape_trades().await?;
///     println!("Scraped {} trades", report.table.len());
///     Ok(())
/// }
/// ```
pub struct TradesScraper {
    client: TradesClient,
    config: ScraperConfig,
}

impl TradesScraper {
    /// Create a new scraper with default configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        Self::with_config(ScraperConfig::default())
    }

    /// Create a new scraper from a validated configuration.
    ///
    /// # Errors
    /// - `ScrapeError::InvalidUrl` / `ScrapeError::InvalidConfig` if the
    ///   configuration is rejected
    /// - `ScrapeError::Http` if the HTTP client cannot be created
    pub fn with_config(config: ScraperConfig) -> Result<Self> {
        config.validate()?;
        let client = TradesClient::with_config(config.client.clone())?;
        Ok(Self { client, config })
    }

    /// Configuration of this scraper
    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Fetch the unpaginated listing and read its total page count.
    ///
    /// # Errors
    /// - `ScrapeError::Fetch` / `ScrapeError::Http` if the listing cannot be fetched
    /// - `ScrapeError::Extraction` if the page count is not on the page
    pub async fn page_count(&self) -> Result<u32> {
        let document = self.client.fetch_document(&self.config.base_url).await?;
        let total = parse_page_count(&document)?;
        info!(total_pages = total, "found page count");
        Ok(total)
    }

    /// Fetch and extract a single listing page.
    ///
    /// # Arguments
    /// * `page` - Page number (1-based)
    /// * `headers` - Header sequence from an earlier page, if known
    pub async fn scrape_page(&self, page: u32, headers: Option<&[String]>) -> Result<ExtractedPage> {
        let url = self.config.page_url(page)?;
        let document = self.client.fetch_document(&url).await?;
        extract_table(&document, headers)
    }

    /// Scrape every listing page.
    ///
    /// # Errors
    /// Under `FailurePolicy::FailFast` the first page error aborts the run.
    /// A page-count failure is always fatal.
    pub async fn scrape_trades(&self) -> Result<ScrapeReport> {
        self.scrape_trades_with_progress(|_| {}).await
    }

    /// Scrape every listing page, reporting progress after each one.
    ///
    /// `on_progress` is called once with `pages_done == 0` after the page
    /// count is known, then once per processed page (successful or skipped)
    /// with a monotonically increasing page counter.
    pub async fn scrape_trades_with_progress<F>(&self, mut on_progress: F) -> Result<ScrapeReport>
    where
        F: FnMut(ScrapeProgress),
    {
        let announced = self.page_count().await?;
        let total_pages = match self.config.max_pages {
            Some(cap) if cap < announced => {
                info!(cap, announced, "limiting scrape to page cap");
                cap
            }
            _ => announced,
        };

        let mut report = ScrapeReport {
            total_pages: announced,
            ..ScrapeReport::default()
        };
        let mut headers: Option<Vec<String>> = None;

        on_progress(ScrapeProgress {
            pages_done: 0,
            total_pages,
            rows_so_far: 0,
        });

        for page in 1..=total_pages {
            let result = self.scrape_page(page, headers.as_deref()).await;
            match result {
                Ok(extracted) => {
                    if !extracted.table_found {
                        warn!(page, "trades table not found on page");
                    } else if headers.is_none() {
                        headers = extracted.headers;
                    }
                    report.rejected_rows += extracted.rejected;
                    report.table.rows.extend(extracted.rows);
                    report.pages_scraped += 1;
                }
                Err(err) if self.config.failure_policy == FailurePolicy::SkipFailedPages => {
                    let url = self.config.page_url(page)?;
                    warn!(page, %url, error = %err, "skipping failed page");
                    report.failures.push(PageFailure { page, url, error: err });
                }
                Err(err) => return Err(err),
            }

            on_progress(ScrapeProgress {
                pages_done: page,
                total_pages,
                rows_so_far: report.table.rows.len(),
            });
        }

        report.table.headers = headers.unwrap_or_default();
        info!(
            rows = report.table.len(),
            pages = report.pages_scraped,
            rejected = report.rejected_rows,
            failed = report.failures.len(),
            "scrape finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;

    #[test]
    fn test_scraper_creation() {
        let scraper = TradesScraper::new();
        assert!(scraper.is_ok());
    }

    #[test]
    fn test_scraper_rejects_invalid_config() {
        let result = TradesScraper::with_config(ScraperConfig::with_base_url("nope"));
        assert!(matches!(result, Err(ScrapeError::InvalidUrl(_))));
    }

    #[test]
    fn test_scraper_keeps_config() {
        let config = ScraperConfig {
            max_pages: Some(2),
            ..ScraperConfig::with_base_url("http://localhost:1/trades")
        };
        let scraper = TradesScraper::with_config(config).unwrap();
        assert_eq!(scraper.config().max_pages, Some(2));
        assert_eq!(scraper.config().base_url, "http://localhost:1/trades");
    }
}
