//! HTTP page fetcher for capitoltrades.com
//!
//! One GET per page, failing on any 4xx/5xx status. Transient failures can
//! be re-attempted a bounded number of times; there is no backoff or
//! throttling between attempts.

use std::time::Duration;

use scraper::Html;
use tracing::{debug, warn};

use crate::error::{Result, ScrapeError};

/// Default User-Agent identifying this crate
const DEFAULT_USER_AGENT: &str = concat!("capitol-trades-scraper/", env!("CARGO_PKG_VERSION"));

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// User-Agent header value
    pub user_agent: String,
    /// Extra attempts after a transient failure (default: 0, fail fast)
    pub max_retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_retries: 0,
        }
    }
}

/// HTTP client returning parsed HTML documents
pub struct TradesClient {
    /// Underlying HTTP client
    client: reqwest::Client,
    /// Extra attempts after a transient failure
    max_retries: u32,
}

impl TradesClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
        })
    }

    /// Fetch a page and return its body text
    ///
    /// # Errors
    /// - `ScrapeError::Http` - transport failure after all attempts
    /// - `ScrapeError::Fetch` - the server answered 4xx, or 5xx after all attempts
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url).await {
                Ok(body) => return Ok(body),
                Err(err) if err.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(%url, attempt, error = %err, "retrying page fetch");
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Fetch a page and parse it as an HTML document
    ///
    /// # Errors
    /// Same as [`TradesClient::fetch`]
    pub async fn fetch_document(&self, url: &str) -> Result<Html> {
        let body = self.fetch(url).await?;
        Ok(Html::parse_document(&body))
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status.is_client_error() || status.is_server_error() {
            return Err(ScrapeError::Fetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    /// Configured number of extra attempts (for testing)
    #[cfg(test)]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_retries, 0);
        assert!(config.user_agent.starts_with("capitol-trades-scraper/"));
    }

    #[test]
    fn test_client_creation() {
        let client = TradesClient::new();
        assert!(client.is_ok());
        assert_eq!(client.unwrap().max_retries(), 0);
    }

    #[test]
    fn test_client_with_custom_config() {
        let config = ClientConfig {
            timeout_secs: 5,
            user_agent: "test-agent".to_string(),
            max_retries: 2,
        };
        let client = TradesClient::with_config(config).unwrap();
        assert_eq!(client.max_retries(), 2);
    }

    #[tokio::test]
    async fn test_fetch_invalid_url_is_http_error() {
        let client = TradesClient::new().unwrap();
        let result = client.fetch("not a url").await;
        assert!(matches!(result, Err(ScrapeError::Http(_))));
    }
}
