//! HTTP client for the upstream storefront and its CDN.

mod origin;

use std::time::Duration;

use merch_core::AppConfig;
use reqwest::{Client, Response, StatusCode};

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;

pub use origin::{absolutize, extract_store_origin};
#[cfg(test)]
use origin::extract_domain;

/// Fetches storefront pages, stylesheets and images.
///
/// Non-2xx responses become typed errors. Transient failures (429, 5xx,
/// network errors) are retried with exponential backoff up to `max_retries`
/// additional attempts.
#[derive(Debug, Clone)]
pub struct StoreClient {
    pub(crate) client: Client,
    pub(crate) max_retries: u32,
    pub(crate) backoff_base_secs: u64,
}

impl StoreClient {
    /// Creates a client with the given timeout, `User-Agent` and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Creates a client from the `MERCH_SCRAPER_*` settings.
    ///
    /// # Errors
    ///
    /// See [`StoreClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            config.scraper_request_timeout_secs,
            &config.scraper_user_agent,
            config.scraper_max_retries,
            config.scraper_retry_backoff_base_secs,
        )
    }

    /// Fetches `url` as text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`] on HTTP 429 after all retries.
    /// - [`ScraperError::NotFound`] on HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`] for other non-2xx statuses.
    /// - [`ScraperError::Http`] on network failure after all retries.
    pub async fn fetch_text(&self, url: &str) -> Result<String, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async move {
            let response = self.get_checked(url).await?;
            Ok(response.text().await?)
        })
        .await
    }

    /// Fetches `url` as raw bytes. Errors as for [`StoreClient::fetch_text`].
    ///
    /// # Errors
    ///
    /// See [`StoreClient::fetch_text`].
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async move {
            let response = self.get_checked(url).await?;
            Ok(response.bytes().await?.to_vec())
        })
        .await
    }

    /// Sends a single `HEAD` request and returns the status. No retries.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] on network failure.
    pub async fn head_status(&self, url: &str) -> Result<StatusCode, ScraperError> {
        Ok(self.client.head(url).send().await?.status())
    }

    async fn get_checked(&self, url: &str) -> Result<Response, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT_LANGUAGE, "ru-RU,ru;q=0.9,en;q=0.8")
            .header(reqwest::header::REFERER, extract_store_origin(url))
            .send()
            .await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(ScraperError::RateLimited {
                domain: origin::extract_domain(url),
                retry_after_secs,
            });
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response)
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
