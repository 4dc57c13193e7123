//! Capitol Trades Scraper command-line front end
//!
//! Turns command-line flags into a [`ScraperConfig`] and drives the core
//! pipeline: page count, page loop, optional normalization, output.
//!
//! # Usage
//!
//! ```text
//! capitol-trades                          # scrape everything to the default path
//! capitol-trades --count-only             # print the page count and exit
//! capitol-trades --normalize -o out.csv   # typed columns plus Size_min/Size_max
//! ```

pub mod commands;

use std::path::PathBuf;

use capitol_core::config::{DEFAULT_BASE_URL, DEFAULT_OUTPUT_PATH, DEFAULT_PAGE_PARAM};
use capitol_core::{ClientConfig, FailurePolicy, ScraperConfig};
use clap::Parser;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(
    name = "capitol-trades",
    version,
    about = "Scrape the capitoltrades.com trades table into a delimited file"
)]
pub struct Cli {
    /// Unpaginated listing URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Query parameter selecting a page
    #[arg(long, default_value = DEFAULT_PAGE_PARAM)]
    pub page_param: String,

    /// Output file
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Output field separator (single ASCII character, or "tab")
    #[arg(short, long, default_value = ";", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// Convert dates, filing delay and size ranges before writing
    #[arg(long)]
    pub normalize: bool,

    /// Keep going when a page fails and write an error summary
    #[arg(long)]
    pub skip_failed_pages: bool,

    /// Extra attempts for a page after a transport error or 5xx response
    #[arg(long, default_value_t = 0)]
    pub retries: u32,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Scrape at most this many pages
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_pages: Option<u32>,

    /// Print the total page count and exit
    #[arg(long)]
    pub count_only: bool,
}

impl Cli {
    /// Build the scraper configuration these flags describe.
    pub fn scraper_config(&self) -> ScraperConfig {
        let defaults = ClientConfig::default();
        ScraperConfig {
            base_url: self.base_url.clone(),
            page_param: self.page_param.clone(),
            output_path: self.output.clone(),
            delimiter: self.delimiter,
            failure_policy: if self.skip_failed_pages {
                FailurePolicy::SkipFailedPages
            } else {
                FailurePolicy::FailFast
            },
            max_pages: self.max_pages,
            client: ClientConfig {
                timeout_secs: self.timeout,
                max_retries: self.retries,
                ..defaults
            },
        }
    }
}

/// Parse a delimiter flag: one ASCII character, or the word "tab".
pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    if value.eq_ignore_ascii_case("tab") || value == "\\t" {
        return Ok(b'\t');
    }

    match value.as_bytes() {
        &[byte] if byte.is_ascii() && !matches!(byte, b'\n' | b'\r' | b'"') => Ok(byte),
        _ => Err(format!("delimiter must be a single ASCII character, got '{}'", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_defaults_match_reference_run() {
        let cli = Cli::parse_from(["capitol-trades"]);
        let config = cli.scraper_config();

        assert_eq!(config.base_url, "https://www.capitoltrades.com/trades");
        assert_eq!(
            config.output_path,
            PathBuf::from("data/capitol_trader/capitol_trader_scraped_data.csv")
        );
        assert_eq!(config.delimiter, b';');
        assert_eq!(config.failure_policy, FailurePolicy::FailFast);
        assert_eq!(config.client.max_retries, 0);
        assert!(!cli.normalize);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags_flow_into_config() {
        let cli = Cli::parse_from([
            "capitol-trades",
            "--base-url",
            "http://localhost:8080/trades",
            "-o",
            "out.tsv",
            "-d",
            "tab",
            "--skip-failed-pages",
            "--retries",
            "2",
            "--timeout",
            "5",
            "--max-pages",
            "3",
            "--normalize",
        ]);
        let config = cli.scraper_config();

        assert_eq!(config.base_url, "http://localhost:8080/trades");
        assert_eq!(config.output_path, PathBuf::from("out.tsv"));
        assert_eq!(config.delimiter, b'\t');
        assert_eq!(config.failure_policy, FailurePolicy::SkipFailedPages);
        assert_eq!(config.client.max_retries, 2);
        assert_eq!(config.client.timeout_secs, 5);
        assert_eq!(config.max_pages, Some(3));
        assert!(cli.normalize);
    }

    #[test]
    fn test_zero_max_pages_rejected() {
        let result = Cli::try_parse_from(["capitol-trades", "--max-pages", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(";"), Ok(b';'));
        assert_eq!(parse_delimiter("TAB"), Ok(b'\t'));
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("\"").is_err());
        assert!(parse_delimiter("–").is_err());
    }

    proptest! {
        #[test]
        fn prop_printable_ascii_is_accepted(c in proptest::char::range('!', '~')) {
            prop_assume!(c != '"');
            let s = c.to_string();
            prop_assert_eq!(parse_delimiter(&s), Ok(c as u8));
        }
    }
}
