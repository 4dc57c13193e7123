//! Capitol Trades Scraper Core Library
//!
//! This crate scrapes the public trades table of capitoltrades.com into
//! structured rows and writes them as delimited text.
//!
//! # Features
//! - Read the listing's total page count
//! - Walk every page sequentially and aggregate table rows
//! - Normalize dates, filing delays and size ranges
//! - Write raw or normalized tables as `;`-delimited files

pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod output;
pub mod parser;
pub mod scraper;
pub mod types;

// Re-export main types for convenience
pub use client::{ClientConfig, TradesClient};
pub use config::{FailurePolicy, ScraperConfig};
pub use error::{Result, ScrapeError};
pub use normalize::normalize_table;
pub use output::{write_table, Tabular};
pub use crate::scraper::TradesScraper;
pub use types::{
    NormalizedTradeTable, PageFailure, ScrapeProgress, ScrapeReport, SizeRange, TradeRecord,
    TradeTable, Value,
};
