//! Storefront sync commands: `scrape` and `prices`.

use std::path::Path;

use merch_core::AppConfig;
use merch_scraper::{prices::write_prices, write_catalog, StoreClient};

/// Scrape `MERCH_STORE_URL` and write the catalog to `out`.
///
/// # Errors
///
/// Returns an error if the page cannot be fetched or parsed, or the file
/// cannot be written.
pub(crate) async fn run_scrape(config: &AppConfig, out: &Path) -> anyhow::Result<()> {
    let client = StoreClient::from_config(config)?;
    let products = client.scrape_catalog(&config.store_url).await?;
    if products.is_empty() {
        tracing::warn!(store_url = %config.store_url, "no products found on storefront");
    }

    write_catalog(out, &products).await?;
    println!("saved {} products to {}", products.len(), out.display());
    Ok(())
}

/// Extract prices from `MERCH_STORE_URL` and write the standard price table
/// to `out`.
///
/// # Errors
///
/// Returns an error if the page cannot be fetched or the file cannot be
/// written.
pub(crate) async fn run_prices(config: &AppConfig, out: &Path) -> anyhow::Result<()> {
    let client = StoreClient::from_config(config)?;
    let (found, table) = client.discover_prices(&config.store_url).await?;

    if found.is_empty() {
        tracing::warn!(store_url = %config.store_url, "no prices found, keeping defaults");
    } else {
        let listed: Vec<String> = found.iter().map(u32::to_string).collect();
        println!("found prices: {}", listed.join(", "));
    }

    write_prices(out, &table).await?;
    println!(
        "jersey {} / hoodie {} / tee {} / shorts {} saved to {}",
        table.jersey,
        table.hoodie,
        table.tee,
        table.shorts,
        out.display()
    );
    Ok(())
}
