use capitol_core::TradesScraper;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let scraper = TradesScraper::new()?;

    println!("Reading page count from {} ...", scraper.config().base_url);
    let total = scraper.page_count().await?;
    println!("Total pages: {}", total);

    let first = scraper.scrape_page(1, None).await?;
    if let Some(headers) = &first.headers {
        println!("Columns: {}", headers.join(" | "));
    }
    for row in first.rows.iter().take(5) {
        println!("  {}", row.join(" | "));
    }
    println!("{} trades on page 1 ({} rejected)", first.rows.len(), first.rejected);

    Ok(())
}
