//! Storefront page scraping into catalog products.
//!
//! The store renders one `.js-product` block per product; everything the
//! catalog needs is read from that block's attributes and child elements.

use std::collections::HashSet;
use std::path::Path;

use merch_core::{Product, ProductId, ProductImages};
use scraper::{ElementRef, Html, Selector};

use crate::client::StoreClient;
use crate::dom::{compile_selector, first_text};
use crate::error::ScraperError;

const DEFAULT_CATEGORY: &str = "tshirt";

struct ProductSelectors {
    product: Selector,
    name: Selector,
    sku: Selector,
    badge: Selector,
    price: Selector,
    price_old: Selector,
    /// Front image candidates, in order of preference.
    front: [Selector; 4],
    back: Selector,
    any_image: Selector,
}

impl ProductSelectors {
    fn compile() -> Result<Self, ScraperError> {
        Ok(Self {
            product: compile_selector(".js-product")?,
            name: compile_selector(".js-product-name")?,
            sku: compile_selector(".js-product-sku")?,
            badge: compile_selector(".t754__mark")?,
            price: compile_selector(".js-product-price")?,
            price_old: compile_selector(".t754__price_old .t754__price-value")?,
            front: [
                compile_selector("img.js-product-img")?,
                compile_selector(r#"img[imgfield*="li_gallery"][data-original]"#)?,
                compile_selector("img[data-original]")?,
                compile_selector("img")?,
            ],
            back: compile_selector("img.t754__img_second")?,
            any_image: compile_selector("img[data-original], img[src]")?,
        })
    }
}

/// Classifies a product from its title and SKU.
///
/// Defaults to `tshirt`. A `gift` SKU or a title mentioning "сертификат"
/// marks a certificate, but garment keywords in the title win over that.
#[must_use]
pub fn classify_category(title: Option<&str>, sku: Option<&str>) -> &'static str {
    let title = title.unwrap_or_default().to_lowercase();
    let sku = sku.unwrap_or_default().to_lowercase();

    let mut category = DEFAULT_CATEGORY;
    if sku == "gift" || title.contains("сертификат") {
        category = merch_core::product::CERTIFICATE_CATEGORY;
    }
    if title.contains("hoodie") || title.contains("zip-hoodie") || title.contains("zip hoodie") {
        category = "hoodie";
    } else if title.contains("shorts") {
        category = "shorts";
    } else if title.contains("long sleeve") || title.contains("longsleeve") {
        category = "longsleeve";
    }
    category
}

/// Parses every `.js-product` block of a storefront page.
///
/// Blocks without a `data-product-lid` are dropped and repeated ids keep
/// their first occurrence.
///
/// # Errors
///
/// Returns [`ScraperError::Selector`] if a built-in selector fails to
/// compile.
pub fn parse_storefront(html: &str) -> Result<Vec<Product>, ScraperError> {
    let selectors = ProductSelectors::compile()?;
    let document = Html::parse_document(html);

    let mut seen: HashSet<String> = HashSet::new();
    let mut products = Vec::new();
    let mut dropped = 0usize;

    for block in document.select(&selectors.product) {
        let product = parse_product(block, &selectors);
        let Some(id) = product.id.as_ref().map(ProductId::as_str) else {
            dropped += 1;
            continue;
        };
        if !seen.insert(id.to_owned()) {
            dropped += 1;
            continue;
        }
        products.push(product);
    }

    tracing::debug!(
        products = products.len(),
        dropped,
        "parsed storefront product blocks"
    );
    Ok(products)
}

fn parse_product(block: ElementRef<'_>, selectors: &ProductSelectors) -> Product {
    let id = block
        .value()
        .attr("data-product-lid")
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ProductId::from);
    let title = first_text(block, &selectors.name);
    let sku = first_text(block, &selectors.sku);
    let badge = first_text(block, &selectors.badge);
    let price_current = first_text(block, &selectors.price).and_then(|t| digits_to_number(&t));
    let price_old = first_text(block, &selectors.price_old).and_then(|t| digits_to_number(&t));

    let front = selectors
        .front
        .iter()
        .find_map(|selector| block.select(selector).next())
        .and_then(image_source);
    let back = block
        .select(&selectors.back)
        .next()
        .or_else(|| block.select(&selectors.any_image).nth(1))
        .and_then(image_source)
        .filter(|back| front.as_deref() != Some(back.as_str()));

    let category = classify_category(title.as_deref(), sku.as_deref());

    Product {
        id,
        title,
        sku,
        badge,
        category: Some(category.to_owned()),
        price_current,
        price_old,
        images: ProductImages { front, back },
    }
}

/// Lazy-loaded images keep the real URL in `data-original`.
fn image_source(img: ElementRef<'_>) -> Option<String> {
    let value = img.value();
    value
        .attr("data-original")
        .filter(|v| !v.is_empty())
        .or_else(|| value.attr("src").filter(|v| !v.is_empty()))
        .map(str::to_owned)
}

/// Keeps only the digits of `text` (`"2 990 р."` → `2990`).
fn digits_to_number(text: &str) -> Option<f64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

impl StoreClient {
    /// Fetches the storefront page at `store_url` and parses its products.
    ///
    /// # Errors
    ///
    /// Propagates fetch errors from [`StoreClient::fetch_text`].
    pub async fn scrape_catalog(&self, store_url: &str) -> Result<Vec<Product>, ScraperError> {
        let html = self.fetch_text(store_url).await?;
        let products = parse_storefront(&html)?;
        tracing::info!(store_url, products = products.len(), "storefront scraped");
        Ok(products)
    }
}

/// Writes `products` as a pretty-printed JSON array, keeping non-ASCII text
/// as-is.
///
/// # Errors
///
/// Returns [`ScraperError::Json`] if serialization fails and
/// [`ScraperError::Io`] if the file cannot be written.
pub async fn write_catalog(path: &Path, products: &[Product]) -> Result<(), ScraperError> {
    let json = serde_json::to_string_pretty(products).map_err(|source| ScraperError::Json {
        context: "catalog".to_owned(),
        source,
    })?;
    tokio::fs::write(path, json)
        .await
        .map_err(|e| ScraperError::io(path, e))?;
    tracing::info!(path = %path.display(), products = products.len(), "catalog written");
    Ok(())
}

#[cfg(test)]
#[path = "storefront_test.rs"]
mod tests;
