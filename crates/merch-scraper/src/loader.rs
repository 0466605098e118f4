//! Catalog loading with sequential candidate fallback.
//!
//! Each candidate path is resolved against a [`CatalogSource`] and tried in
//! order. The first location that yields a JSON array wins; failures are
//! logged and the next candidate is tried. Requests always bypass caches, so
//! every call reflects the current document.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use merch_core::{AppConfig, Product};
use reqwest::Client;
use url::Url;

use crate::error::LoadError;

/// Where candidate catalog paths are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Remote site; candidates are joined the way a browser resolves links.
    Remote(Url),
    /// Local site root; leading `/` and `./` are stripped from candidates.
    Directory(PathBuf),
}

impl CatalogSource {
    /// Interprets `base` as an `http(s)` URL when it has that scheme,
    /// otherwise as a directory.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidLocation`] for an `http(s)` base that does
    /// not parse.
    pub fn parse(base: &str) -> Result<Self, LoadError> {
        if base.starts_with("http://") || base.starts_with("https://") {
            let url = Url::parse(base).map_err(|e| LoadError::InvalidLocation {
                candidate: base.to_owned(),
                reason: e.to_string(),
            })?;
            Ok(Self::Remote(url))
        } else {
            Ok(Self::Directory(PathBuf::from(base)))
        }
    }

    /// Resolves one candidate path against this source.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidLocation`] when the candidate cannot be
    /// joined to the base URL or is empty.
    pub fn resolve(&self, candidate: &str) -> Result<Location, LoadError> {
        match self {
            Self::Remote(base) => base
                .join(candidate)
                .map(Location::Url)
                .map_err(|e| LoadError::InvalidLocation {
                    candidate: candidate.to_owned(),
                    reason: e.to_string(),
                }),
            Self::Directory(root) => {
                let relative = candidate.trim_start_matches('/');
                let relative = relative.strip_prefix("./").unwrap_or(relative);
                if relative.is_empty() {
                    return Err(LoadError::InvalidLocation {
                        candidate: candidate.to_owned(),
                        reason: "empty path".to_owned(),
                    });
                }
                Ok(Location::File(root.join(relative)))
            }
        }
    }
}

/// A resolved candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Url(Url),
    File(PathBuf),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url.as_str()),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Loads the catalog document from the first working candidate.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    source: CatalogSource,
    candidates: Vec<String>,
    client: Client,
}

impl CatalogLoader {
    #[must_use]
    pub fn new(source: CatalogSource, candidates: Vec<String>, client: Client) -> Self {
        Self {
            source,
            candidates,
            client,
        }
    }

    /// Builds a loader from `MERCH_CATALOG_BASE`, `MERCH_CATALOG_PATHS` and
    /// the scraper timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::InvalidLocation`] for an unparseable base URL and
    /// [`LoadError::Client`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, LoadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.scraper_request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.scraper_user_agent.as_str())
            .build()
            .map_err(LoadError::Client)?;
        Ok(Self::new(
            CatalogSource::parse(&config.catalog_base)?,
            config.catalog_paths.clone(),
            client,
        ))
    }

    #[must_use]
    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Tries every candidate in order and returns the first catalog found.
    ///
    /// There are no retries within a candidate and nothing is cached between
    /// calls.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::AllCandidatesFailed`] carrying the last
    /// per-candidate error, or [`LoadError::NoCandidates`] when no candidate
    /// is configured.
    pub async fn load(&self) -> Result<Vec<Product>, LoadError> {
        let mut last_error = None;

        for candidate in &self.candidates {
            let attempt = match self.source.resolve(candidate) {
                Ok(location) => self.load_location(&location).await.map(|products| (location, products)),
                Err(e) => Err(e),
            };

            match attempt {
                Ok((location, products)) => {
                    tracing::info!(
                        location = %location,
                        products = products.len(),
                        "catalog loaded"
                    );
                    return Ok(products);
                }
                Err(e) => {
                    tracing::warn!(candidate = %candidate, error = %e, "catalog candidate failed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(last) => Err(LoadError::AllCandidatesFailed {
                attempts: self.candidates.len(),
                last: Box::new(last),
            }),
            None => Err(LoadError::NoCandidates),
        }
    }

    /// Like [`CatalogLoader::load`], but a failure is logged and yields an
    /// empty catalog so the page still renders.
    pub async fn load_or_empty(&self) -> Vec<Product> {
        match self.load().await {
            Ok(products) => products,
            Err(e) => {
                tracing::error!(error = %e, "catalog unavailable, rendering empty catalog");
                Vec::new()
            }
        }
    }

    async fn load_location(&self, location: &Location) -> Result<Vec<Product>, LoadError> {
        match location {
            Location::Url(url) => self.fetch_url(url).await,
            Location::File(path) => read_file(path).await,
        }
    }

    async fn fetch_url(&self, url: &Url) -> Result<Vec<Product>, LoadError> {
        let http_error = |source| LoadError::Http {
            location: url.to_string(),
            source,
        };
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .header(reqwest::header::PRAGMA, "no-cache")
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                status: status.as_u16(),
                location: url.to_string(),
            });
        }

        let body = response.bytes().await.map_err(http_error)?;
        parse_catalog(&body, url.as_str())
    }
}

async fn read_file(path: &Path) -> Result<Vec<Product>, LoadError> {
    let location = path.display().to_string();
    let body = tokio::fs::read(path)
        .await
        .map_err(|source| LoadError::Io {
            location: location.clone(),
            source,
        })?;
    parse_catalog(&body, &location)
}

/// Parses a catalog document. The top level must be a JSON array; elements
/// that are not objects are skipped.
///
/// # Errors
///
/// Returns [`LoadError::Deserialize`] for invalid JSON and
/// [`LoadError::NotAnArray`] when the top level is not an array.
pub fn parse_catalog(body: &[u8], location: &str) -> Result<Vec<Product>, LoadError> {
    let document: serde_json::Value =
        serde_json::from_slice(body).map_err(|source| LoadError::Deserialize {
            location: location.to_owned(),
            source,
        })?;

    let serde_json::Value::Array(items) = document else {
        return Err(LoadError::NotAnArray {
            location: location.to_owned(),
        });
    };

    let total = items.len();
    let products: Vec<Product> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            if !item.is_object() {
                tracing::debug!(location, index, "skipping non-object catalog entry");
                return None;
            }
            match serde_json::from_value::<Product>(item) {
                Ok(product) => Some(product),
                Err(e) => {
                    tracing::warn!(location, index, error = %e, "skipping malformed catalog entry");
                    None
                }
            }
        })
        .collect();

    if products.len() < total {
        tracing::debug!(location, kept = products.len(), total, "catalog entries skipped");
    }
    Ok(products)
}
