//! Pipeline commands run by the binary

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use capitol_core::output::{error_summary_path, write_error_summary};
use capitol_core::{normalize_table, write_table, ScrapeReport, TradesScraper};

use crate::Cli;

/// Run the command described by the parsed flags.
pub async fn run(cli: &Cli) -> Result<()> {
    let config = cli.scraper_config();
    let scraper = TradesScraper::with_config(config).context("invalid scraper configuration")?;

    if cli.count_only {
        let total = scraper
            .page_count()
            .await
            .context("failed to read the listing page count")?;
        println!("{}", total);
        return Ok(());
    }

    let report = scrape_with_progress(&scraper).await?;
    write_outputs(&scraper, cli.normalize, &report)?;

    println!(
        "Wrote {} trades from {} of {} pages to {}",
        report.table.len(),
        report.pages_scraped,
        report.total_pages,
        scraper.config().output_path.display()
    );
    if report.rejected_rows > 0 {
        println!("Dropped {} malformed rows", report.rejected_rows);
    }
    Ok(())
}

/// Scrape every page behind a progress bar.
pub async fn scrape_with_progress(scraper: &TradesScraper) -> Result<ScrapeReport> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} pages ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let result = scraper
        .scrape_trades_with_progress(|progress| {
            if progress.pages_done == 0 {
                pb.println(format!("Total pages: {}", progress.total_pages));
                pb.set_length(u64::from(progress.total_pages));
            }
            pb.set_position(u64::from(progress.pages_done));
        })
        .await;
    pb.finish_and_clear();

    result.context("scrape failed")
}

/// Write the table (raw or normalized) and, if pages were skipped, the
/// error summary next to it.
pub fn write_outputs(scraper: &TradesScraper, normalize: bool, report: &ScrapeReport) -> Result<()> {
    let config = scraper.config();
    let path = config.output_path.as_path();

    let written = if normalize {
        let normalized = normalize_table(&report.table).context("failed to normalize trades")?;
        write_table(path, &normalized, config.delimiter)
    } else {
        write_table(path, &report.table, config.delimiter)
    };
    written.with_context(|| format!("failed to write {}", path.display()))?;

    if !report.is_complete() {
        let summary = error_summary_path(path);
        write_error_summary(&summary, &report.failures)
            .with_context(|| format!("failed to write {}", summary.display()))?;
        warn!(
            failed = report.failures.len(),
            summary = %summary.display(),
            "some pages were skipped"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use capitol_core::{PageFailure, ScrapeError, ScraperConfig, TradeTable};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn scraper_writing_to(path: &Path) -> TradesScraper {
        let config = ScraperConfig {
            output_path: path.to_path_buf(),
            ..ScraperConfig::default()
        };
        TradesScraper::with_config(config).unwrap()
    }

    fn report(failures: Vec<PageFailure>) -> ScrapeReport {
        ScrapeReport {
            table: TradeTable::new(
                strings(&["Politician", "Published", "Traded", "Filed after", "Size"]),
                vec![strings(&["Nancy Pelosi", "15 Mar2023", "1 Mar2023", "14 days", "1M–5M"])],
            ),
            total_pages: 2,
            pages_scraped: 2 - failures.len() as u32,
            rejected_rows: 0,
            failures,
        }
    }

    fn failed_page() -> PageFailure {
        let url = "https://www.capitoltrades.com/trades?page=2".to_string();
        PageFailure {
            page: 2,
            url: url.clone(),
            error: ScrapeError::Fetch { url, status: 500 },
        }
    }

    #[test]
    fn test_write_raw_without_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data/capitol_trader/trades.csv");

        write_outputs(&scraper_writing_to(&path), false, &report(Vec::new())).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "Politician;Published;Traded;Filed after;Size\n\
             Nancy Pelosi;15 Mar2023;1 Mar2023;14 days;1M–5M\n"
        );
        assert!(!error_summary_path(&path).exists());
    }

    #[test]
    fn test_write_normalized_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trades.csv");

        write_outputs(&scraper_writing_to(&path), true, &report(Vec::new())).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let header = text.lines().next().unwrap();
        assert!(header.ends_with("Size_min;Size_max"));
        assert_eq!(
            text.lines().nth(1),
            Some("Nancy Pelosi;2023-03-15;2023-03-01;14;1M–5M;1000000;5000000")
        );
    }

    #[test]
    fn test_error_summary_written_when_pages_failed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trades.csv");

        write_outputs(&scraper_writing_to(&path), false, &report(vec![failed_page()])).unwrap();

        assert!(path.exists());
        let summary = std::fs::read_to_string(error_summary_path(&path)).unwrap();
        assert!(summary.contains("HTTP 500 fetching https://www.capitoltrades.com/trades?page=2"));
    }

    #[test]
    fn test_normalize_failure_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trades.csv");
        let mut bad = report(Vec::new());
        bad.table.rows[0][1] = "2023-03-15".to_string();

        let err = write_outputs(&scraper_writing_to(&path), true, &bad).unwrap_err();
        assert!(err.to_string().contains("normalize"));
        assert!(!path.exists());
    }
}
