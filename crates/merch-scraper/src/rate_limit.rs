//! Retry with exponential backoff for storefront and CDN requests.
//!
//! Only transient failures are retried: 429, 5xx and network errors.
//! Everything else (404, other 4xx, bad JSON, filesystem errors) is returned
//! on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::RateLimited { .. } | ScraperError::Http(_) => true,
        ScraperError::UnexpectedStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Executes `operation`, retrying transient errors up to `max_retries` times.
///
/// The wait before retry `n` (1-based) is `backoff_base_secs * 2^(n-1)`
/// seconds, so `max_retries = 3` means at most four attempts.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient fetch error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn rate_limited() -> ScraperError {
        ScraperError::RateLimited {
            domain: "static.tildacdn.com".to_owned(),
            retry_after_secs: 0,
        }
    }

    async fn run_counting(
        max_retries: u32,
        fail_times: u32,
        make_err: fn() -> ScraperError,
    ) -> (Result<u32, ScraperError>, u32) {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(max_retries, 0, || {
            let c = Arc::clone(&c);
            async move {
                let n = c.fetch_add(1, Ordering::SeqCst);
                if n < fail_times {
                    Err(make_err())
                } else {
                    Ok(7)
                }
            }
        })
        .await;
        (result, calls.load(Ordering::SeqCst))
    }

    #[tokio::test]
    async fn first_success_is_returned_without_retry() {
        let (result, calls) = run_counting(3, 0, rate_limited).await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn rate_limit_is_retried_until_success() {
        let (result, calls) = run_counting(3, 2, rate_limited).await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let (result, calls) = run_counting(2, u32::MAX, rate_limited).await;
        assert_eq!(calls, 3);
        assert!(matches!(result, Err(ScraperError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn server_errors_are_retried() {
        let (result, calls) = run_counting(1, 1, || ScraperError::UnexpectedStatus {
            status: 503,
            url: "https://ballinmerch.ru/".to_owned(),
        })
        .await;
        assert!(result.is_ok());
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn not_found_is_not_retried() {
        let (result, calls) = run_counting(3, u32::MAX, || ScraperError::NotFound {
            url: "https://static.tildacdn.com/x.jpg".to_owned(),
        })
        .await;
        assert_eq!(calls, 1);
        assert!(matches!(result, Err(ScraperError::NotFound { .. })));
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let (_, calls) = run_counting(3, u32::MAX, || ScraperError::UnexpectedStatus {
            status: 403,
            url: "https://ballinmerch.ru/".to_owned(),
        })
        .await;
        assert_eq!(calls, 1);
    }
}
