//! Image harvesting into the local assets directory.
//!
//! Two sources: the storefront page itself (`<img>` tags plus `url(...)`
//! references in stylesheets) and the catalog, whose remote images are saved
//! under exactly the file names local-first rendering looks for.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use futures::stream::{self, StreamExt};
use merch_core::image::local_file_name;
use merch_core::Product;
use regex::Regex;
use scraper::Html;
use url::Url;

use crate::client::{absolutize, StoreClient};
use crate::dom::compile_selector;
use crate::error::ScraperError;

static CSS_URL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"url\(["']?([^"')]+)["']?\)"#).ok());

/// One file to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub url: String,
    pub file_name: String,
}

/// Outcome counts of a download run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub downloaded: usize,
    /// Already present locally, or no usable file name.
    pub skipped: usize,
    pub failed: usize,
}

enum Outcome {
    Downloaded,
    Skipped,
    Failed,
}

/// `<img>` sources on a page, absolute and deduplicated in page order.
/// `src` is preferred over `data-src`.
///
/// # Errors
///
/// Returns [`ScraperError::Selector`] if the built-in selector fails to
/// compile.
pub fn page_image_urls(html: &str, page_url: &Url) -> Result<Vec<String>, ScraperError> {
    let img = compile_selector("img")?;
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    Ok(document
        .select(&img)
        .filter_map(|el| {
            let value = el.value();
            value
                .attr("src")
                .filter(|s| !s.is_empty())
                .or_else(|| value.attr("data-src"))
        })
        .filter_map(|src| absolutize(src, page_url))
        .filter(|url| seen.insert(url.clone()))
        .collect())
}

/// Absolute `href`s of `<link rel="stylesheet">` elements.
///
/// # Errors
///
/// Returns [`ScraperError::Selector`] if the built-in selector fails to
/// compile.
pub fn stylesheet_urls(html: &str, page_url: &Url) -> Result<Vec<String>, ScraperError> {
    let link = compile_selector(r#"link[rel="stylesheet"][href]"#)?;
    let document = Html::parse_document(html);
    Ok(document
        .select(&link)
        .filter_map(|el| el.value().attr("href"))
        .filter_map(|href| absolutize(href, page_url))
        .collect())
}

/// Contents of inline `<style>` blocks.
///
/// # Errors
///
/// Returns [`ScraperError::Selector`] if the built-in selector fails to
/// compile.
pub fn inline_styles(html: &str) -> Result<Vec<String>, ScraperError> {
    let style = compile_selector("style")?;
    let document = Html::parse_document(html);
    Ok(document
        .select(&style)
        .map(|el| el.text().collect::<String>())
        .collect())
}

/// `url(...)` references in a stylesheet, joined against `base`.
/// `data:` URIs are skipped.
#[must_use]
pub fn css_image_urls(css: &str, base: &Url) -> Vec<String> {
    let Some(pattern) = CSS_URL.as_ref() else {
        return Vec::new();
    };
    pattern
        .captures_iter(css)
        .filter_map(|c| c.get(1))
        .filter_map(|m| absolutize(m.as_str(), base))
        .collect()
}

/// File name for a page image: the final path segment, or
/// `{fallback_prefix}_{index}.{fallback_ext}` when it is missing or has no
/// extension.
#[must_use]
pub fn page_file_name(url: &str, index: usize, fallback_prefix: &str, fallback_ext: &str) -> String {
    match local_file_name(url) {
        Some(name) if name.contains('.') => name,
        _ => format!("{fallback_prefix}_{index}.{fallback_ext}"),
    }
}

/// Download targets for every front and back image in `catalog`, named the
/// way local-first rendering expects. URLs without a file name are skipped.
#[must_use]
pub fn catalog_targets(catalog: &[Product]) -> Vec<DownloadTarget> {
    let mut seen = HashSet::new();
    catalog
        .iter()
        .flat_map(|p| [p.front_image(), p.back_image()])
        .flatten()
        .filter(|url| seen.insert(*url))
        .filter_map(|url| {
            let Some(file_name) = local_file_name(url) else {
                tracing::debug!(url, "image URL has no file name, skipping");
                return None;
            };
            Some(DownloadTarget {
                url: url.to_owned(),
                file_name,
            })
        })
        .collect()
}

/// Downloads images into a local directory with bounded concurrency.
#[derive(Debug, Clone)]
pub struct ImageDownloader {
    client: StoreClient,
    images_dir: PathBuf,
    max_concurrent: usize,
    force: bool,
}

impl ImageDownloader {
    #[must_use]
    pub fn new(client: StoreClient, images_dir: impl Into<PathBuf>, max_concurrent: usize) -> Self {
        Self {
            client,
            images_dir: images_dir.into(),
            max_concurrent: max_concurrent.max(1),
            force: false,
        }
    }

    /// Re-download files that already exist locally.
    #[must_use]
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    #[must_use]
    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Downloads all targets. Per-file failures are logged and counted, never
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Io`] if the images directory cannot be
    /// created.
    pub async fn download_all(
        &self,
        targets: Vec<DownloadTarget>,
    ) -> Result<DownloadReport, ScraperError> {
        tokio::fs::create_dir_all(&self.images_dir)
            .await
            .map_err(|e| ScraperError::io(&self.images_dir, e))?;

        let outcomes = stream::iter(targets.into_iter().map(|target| self.download_one(target)))
            .buffer_unordered(self.max_concurrent)
            .collect::<Vec<_>>()
            .await;

        let mut report = DownloadReport::default();
        for outcome in outcomes {
            match outcome {
                Outcome::Downloaded => report.downloaded += 1,
                Outcome::Skipped => report.skipped += 1,
                Outcome::Failed => report.failed += 1,
            }
        }
        tracing::info!(
            dir = %self.images_dir.display(),
            downloaded = report.downloaded,
            skipped = report.skipped,
            failed = report.failed,
            "image download finished"
        );
        Ok(report)
    }

    /// Saves every front and back image referenced by `catalog`.
    ///
    /// # Errors
    ///
    /// See [`ImageDownloader::download_all`].
    pub async fn download_catalog(&self, catalog: &[Product]) -> Result<DownloadReport, ScraperError> {
        self.download_all(catalog_targets(catalog)).await
    }

    /// Saves the images of a storefront page: `<img>` tags first, then
    /// `url(...)` references from linked and inline stylesheets.
    ///
    /// # Errors
    ///
    /// Returns an error if the page itself cannot be fetched or parsed, or if
    /// the images directory cannot be created. Stylesheet failures are logged
    /// and skipped.
    pub async fn download_page(&self, page_url: &str) -> Result<DownloadReport, ScraperError> {
        let base = Url::parse(page_url).map_err(|e| ScraperError::InvalidUrl {
            url: page_url.to_owned(),
            reason: e.to_string(),
        })?;
        let html = self.client.fetch_text(page_url).await?;

        let mut seen = HashSet::new();
        let mut targets = Vec::new();
        for (index, url) in page_image_urls(&html, &base)?.into_iter().enumerate() {
            seen.insert(url.clone());
            let file_name = page_file_name(&url, index, "image", "jpg");
            targets.push(DownloadTarget { url, file_name });
        }
        tracing::info!(page_url, images = targets.len(), "page images found");

        let mut css_urls = Vec::new();
        for sheet in stylesheet_urls(&html, &base)? {
            let Ok(sheet_base) = Url::parse(&sheet) else {
                continue;
            };
            match self.client.fetch_text(&sheet).await {
                Ok(css) => css_urls.extend(css_image_urls(&css, &sheet_base)),
                Err(e) => tracing::warn!(stylesheet = %sheet, error = %e, "stylesheet fetch failed"),
            }
        }
        for css in inline_styles(&html)? {
            css_urls.extend(css_image_urls(&css, &base));
        }

        let page_count = targets.len();
        for url in css_urls {
            if !seen.insert(url.clone()) {
                continue;
            }
            let file_name = page_file_name(&url, targets.len(), "css_image", "png");
            targets.push(DownloadTarget { url, file_name });
        }
        tracing::info!(
            page_url,
            css_images = targets.len() - page_count,
            "stylesheet images found"
        );

        self.download_all(targets).await
    }

    async fn download_one(&self, target: DownloadTarget) -> Outcome {
        let path = self.images_dir.join(&target.file_name);
        if !self.force && tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!(path = %path.display(), "image already present");
            return Outcome::Skipped;
        }

        let bytes = match self.client.fetch_bytes(&target.url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(url = %target.url, error = %e, "image download failed");
                return Outcome::Failed;
            }
        };

        match tokio::fs::write(&path, &bytes).await {
            Ok(()) => {
                tracing::debug!(url = %target.url, path = %path.display(), bytes = bytes.len(), "image saved");
                Outcome::Downloaded
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not write image");
                Outcome::Failed
            }
        }
    }
}
