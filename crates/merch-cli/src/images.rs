//! Image commands: `images` downloads, `verify-images` checks.

use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};
use merch_core::AppConfig;
use merch_scraper::{
    images::catalog_targets, CatalogLoader, DownloadTarget, ImageDownloader, StoreClient,
};
use reqwest::StatusCode;

/// Where `images` takes its URL list from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ImageSource {
    /// Every `<img>` and stylesheet image on `MERCH_STORE_URL`.
    Page,
    /// Front and back images of every product in the loaded catalog.
    Catalog,
}

/// Download images into `MERCH_IMAGES_DIR`.
///
/// # Errors
///
/// Returns an error if the page or catalog cannot be loaded or the images
/// directory cannot be created. Individual file failures are only counted.
pub(crate) async fn run_images(
    config: &AppConfig,
    source: ImageSource,
    force: bool,
) -> anyhow::Result<()> {
    let downloader = ImageDownloader::new(
        StoreClient::from_config(config)?,
        &config.images_dir,
        config.scraper_max_concurrent_downloads,
    )
    .force(force);

    let report = match source {
        ImageSource::Page => downloader.download_page(&config.store_url).await?,
        ImageSource::Catalog => {
            let catalog = CatalogLoader::from_config(config)?.load().await?;
            downloader.download_catalog(&catalog).await?
        }
    };

    println!(
        "images in {}: {} downloaded, {} skipped, {} failed",
        downloader.images_dir().display(),
        report.downloaded,
        report.skipped,
        report.failed
    );
    Ok(())
}

/// Totals of a `verify-images` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct VerifyReport {
    pub ok: usize,
    pub bad: usize,
    pub local_missing: usize,
}

/// Verify every catalog image URL with a HEAD request and check its local
/// copy.
///
/// Logs non-200 URLs and missing local files, then prints totals.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or the client cannot be
/// built.
pub(crate) async fn run_verify_images(config: &AppConfig) -> anyhow::Result<()> {
    let catalog = CatalogLoader::from_config(config)?.load().await?;
    let targets = catalog_targets(&catalog);
    if targets.is_empty() {
        println!("no image URLs found to verify");
        return Ok(());
    }

    let client = StoreClient::from_config(config)?;
    let report = verify_targets(
        &client,
        Path::new(&config.images_dir),
        targets,
        config.scraper_max_concurrent_downloads,
    )
    .await;

    println!(
        "verified image URLs: {} OK, {} bad; {} missing locally",
        report.ok, report.bad, report.local_missing
    );
    Ok(())
}

pub(crate) async fn verify_targets(
    client: &StoreClient,
    images_dir: &Path,
    targets: Vec<DownloadTarget>,
    concurrency: usize,
) -> VerifyReport {
    let checks = stream::iter(targets.into_iter().map(|target| {
        let local: PathBuf = images_dir.join(&target.file_name);
        async move {
            let status = client.head_status(&target.url).await;
            let has_local = tokio::fs::try_exists(&local).await.unwrap_or(false);
            (target, status, has_local)
        }
    }))
    .buffer_unordered(concurrency.max(1))
    .collect::<Vec<_>>()
    .await;

    let mut report = VerifyReport::default();
    for (target, status, has_local) in checks {
        match status {
            Ok(StatusCode::OK) => report.ok += 1,
            Ok(status) => {
                report.bad += 1;
                tracing::warn!(
                    status = status.as_u16(),
                    url = %target.url,
                    "image URL verification failed"
                );
            }
            Err(e) => {
                report.bad += 1;
                tracing::warn!(error = %e, url = %target.url, "image URL verification failed");
            }
        }
        if !has_local {
            report.local_missing += 1;
            tracing::warn!(file = %target.file_name, "local image copy missing");
        }
    }
    report
}
