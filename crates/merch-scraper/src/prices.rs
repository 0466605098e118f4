//! Price discovery from storefront page text.
//!
//! The storefront does not expose prices per category, so the command scans
//! visible text for rouble amounts and maps the distinct values onto a
//! standard category price table.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;
use serde::{Deserialize, Serialize};

use crate::client::StoreClient;
use crate::dom::compile_selector;
use crate::error::ScraperError;

/// Amounts outside this range are not treated as product prices.
pub const PLAUSIBLE_PRICE_RANGE: RangeInclusive<u32> = 1000..=10_000;

static PRICE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)(\d{1,2}\s?\d{3})\s*[₽руб]",
        r"(?i)(\d{3,5})\s*[₽руб]",
        r"(?i)[₽руб]\s*(\d{1,2}\s?\d{3})",
        r"(?i)цена[:\s]+(\d{1,2}\s?\d{3})",
    ]
    .into_iter()
    .filter_map(|pattern| match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::error!(pattern, error = %e, "price pattern failed to compile");
            None
        }
    })
    .collect()
});

/// Category price table written to `prices.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardPrices {
    pub jersey: u32,
    pub hoodie: u32,
    pub tee: u32,
    pub shorts: u32,
}

impl Default for StandardPrices {
    fn default() -> Self {
        Self {
            jersey: 2690,
            hoodie: 2990,
            tee: 2190,
            shorts: 2490,
        }
    }
}

impl StandardPrices {
    /// Maps distinct ascending prices onto the table.
    ///
    /// With two or more prices the cheapest becomes `tee` and the most
    /// expensive `jersey`; the second goes to `shorts` (three or more) and the
    /// third to `hoodie` (four or more). Unset entries keep their defaults.
    #[must_use]
    pub fn from_prices(prices: &BTreeSet<u32>) -> Self {
        let mut table = Self::default();
        let sorted: Vec<u32> = prices.iter().copied().collect();
        if let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) {
            if sorted.len() >= 2 {
                table.tee = min;
                table.jersey = max;
            }
        }
        if let Some(&second) = sorted.get(1).filter(|_| sorted.len() >= 3) {
            table.shorts = second;
        }
        if let Some(&third) = sorted.get(2).filter(|_| sorted.len() >= 4) {
            table.hoodie = third;
        }
        table
    }
}

/// Extracts plausible prices from one text fragment.
#[must_use]
pub fn extract_prices(text: &str) -> BTreeSet<u32> {
    let mut found = BTreeSet::new();
    for pattern in PRICE_PATTERNS.iter() {
        for captures in pattern.captures_iter(text) {
            let Some(raw) = captures.get(1) else {
                continue;
            };
            let digits: String = raw
                .as_str()
                .chars()
                .filter(|c| !c.is_whitespace() && *c != ',')
                .collect();
            if let Ok(price) = digits.parse::<u32>() {
                if PLAUSIBLE_PRICE_RANGE.contains(&price) {
                    found.insert(price);
                }
            }
        }
    }
    found
}

/// Text nodes of the page body that may hold a price: those mentioning
/// roubles or containing a three to five digit run.
///
/// # Errors
///
/// Returns [`ScraperError::Selector`] if the body selector fails to compile.
pub fn price_texts(html: &str) -> Result<Vec<String>, ScraperError> {
    let body = compile_selector("body")?;
    let document = Html::parse_document(html);
    let texts = document
        .select(&body)
        .flat_map(|el| el.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .filter(|t| t.contains('₽') || t.contains("руб") || has_digit_run(t, 3))
        .map(str::to_owned)
        .collect();
    Ok(texts)
}

fn has_digit_run(text: &str, min_len: usize) -> bool {
    let mut run = 0;
    for c in text.chars() {
        if c.is_ascii_digit() {
            run += 1;
            if run >= min_len {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// All distinct plausible prices on a storefront page, ascending.
///
/// # Errors
///
/// See [`price_texts`].
pub fn prices_on_page(html: &str) -> Result<BTreeSet<u32>, ScraperError> {
    Ok(price_texts(html)?
        .iter()
        .flat_map(|text| extract_prices(text))
        .collect())
}

impl StoreClient {
    /// Fetches the storefront and derives the category price table.
    ///
    /// # Errors
    ///
    /// Propagates fetch errors from [`StoreClient::fetch_text`].
    pub async fn discover_prices(
        &self,
        store_url: &str,
    ) -> Result<(BTreeSet<u32>, StandardPrices), ScraperError> {
        let html = self.fetch_text(store_url).await?;
        let prices = prices_on_page(&html)?;
        tracing::info!(store_url, found = ?prices, "prices found on storefront");
        let table = StandardPrices::from_prices(&prices);
        Ok((prices, table))
    }
}

/// Writes the price table as pretty JSON.
///
/// # Errors
///
/// Returns [`ScraperError::Json`] or [`ScraperError::Io`].
pub async fn write_prices(path: &Path, prices: &StandardPrices) -> Result<(), ScraperError> {
    let json = serde_json::to_string_pretty(prices).map_err(|source| ScraperError::Json {
        context: "price table".to_owned(),
        source,
    })?;
    tokio::fs::write(path, json)
        .await
        .map_err(|e| ScraperError::io(path, e))
}
