pub mod client;
pub mod error;
pub mod images;
pub mod loader;
pub mod prices;
pub mod storefront;

mod dom;
mod rate_limit;

pub use client::StoreClient;
pub use error::{LoadError, ScraperError};
pub use images::{DownloadReport, DownloadTarget, ImageDownloader};
pub use loader::{parse_catalog, CatalogLoader, CatalogSource, Location};
pub use prices::{extract_prices, StandardPrices};
pub use storefront::{classify_category, parse_storefront, write_catalog};
