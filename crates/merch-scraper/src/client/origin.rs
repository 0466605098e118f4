//! URL helpers shared by the storefront client and the page walkers.

use url::Url;

/// Scheme+host origin of `page_url`, used as the `Referer` for asset fetches.
///
/// Given `"https://ballinmerch.ru/catalog?x=1"`, returns `"https://ballinmerch.ru"`.
#[must_use]
pub fn extract_store_origin(page_url: &str) -> String {
    Url::parse(page_url).map_or_else(
        |e| {
            tracing::warn!(
                page_url,
                error = %e,
                "could not parse store URL, falling back to string split for origin; check MERCH_STORE_URL"
            );
            page_url
                .trim_end_matches('/')
                .splitn(4, '/')
                .take(3)
                .collect::<Vec<_>>()
                .join("/")
        },
        |u| u.origin().ascii_serialization(),
    )
}

/// Hostname of `url` for error messages. Falls back to the input.
pub(crate) fn extract_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}

/// Makes an asset reference found on a page absolute.
///
/// Protocol-relative references (`//cdn/...`) get `https:`; everything else
/// is joined against `base`. `data:` URIs and unjoinable references yield
/// `None`.
#[must_use]
pub fn absolutize(reference: &str, base: &Url) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() || reference.starts_with("data:") {
        return None;
    }
    if let Some(rest) = reference.strip_prefix("//") {
        return Some(format!("https://{rest}"));
    }
    base.join(reference).ok().map(String::from)
}
