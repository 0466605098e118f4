//! Local-first image resolution.
//!
//! Product images are bundled under a local assets directory, named after the
//! last path segment of the remote URL. Rendering prefers the local copy and
//! falls back once to the remote original.

use url::Url;

pub const DEFAULT_IMAGES_DIR: &str = "images";

/// Guesses the local asset path for `remote_url` under the default `images/`
/// directory.
///
/// Returns `None` if the URL does not parse or has no non-empty path segment.
#[must_use]
pub fn guess_local_from_remote(remote_url: &str) -> Option<String> {
    guess_local_in(remote_url, DEFAULT_IMAGES_DIR)
}

/// Like [`guess_local_from_remote`] with an explicit assets directory.
#[must_use]
pub fn guess_local_in(remote_url: &str, images_dir: &str) -> Option<String> {
    let file_name = local_file_name(remote_url)?;
    Some(format!("{}/{file_name}", images_dir.trim_end_matches('/')))
}

/// Final non-empty path segment of `remote_url`, still percent-encoded.
#[must_use]
pub fn local_file_name(remote_url: &str) -> Option<String> {
    let url = Url::parse(remote_url).ok()?;
    url.path()
        .split('/')
        .rfind(|segment| !segment.is_empty())
        .map(str::to_owned)
}

/// Image sources for one rendered `<img>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    /// Primary `src`.
    pub src: String,
    /// One-shot fallback target used when `src` fails to load.
    pub fallback: Option<String>,
}

/// Resolves `remote_url` to a local primary source with the remote URL as
/// fallback. Unparseable URLs are used directly without a fallback.
#[must_use]
pub fn resolve_image(remote_url: &str, images_dir: &str) -> ResolvedImage {
    match guess_local_in(remote_url, images_dir) {
        Some(local) => ResolvedImage {
            src: local,
            fallback: Some(remote_url.to_owned()),
        },
        None => {
            tracing::debug!(remote_url, "image URL has no local counterpart");
            ResolvedImage {
                src: remote_url.to_owned(),
                fallback: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_local_path_from_last_segment() {
        assert_eq!(
            guess_local_from_remote("https://cdn.example.com/shop/img/front-1.jpg").as_deref(),
            Some("images/front-1.jpg")
        );
    }

    #[test]
    fn not_a_url_has_no_local_path() {
        assert_eq!(guess_local_from_remote("not a url"), None);
        assert_eq!(guess_local_from_remote("/relative/path.jpg"), None);
    }

    #[test]
    fn trailing_slash_uses_last_non_empty_segment() {
        assert_eq!(
            guess_local_from_remote("https://cdn.example.com/shop/img/").as_deref(),
            Some("images/img")
        );
    }

    #[test]
    fn bare_origin_has_no_local_path() {
        assert_eq!(guess_local_from_remote("https://cdn.example.com/"), None);
        assert_eq!(guess_local_from_remote("https://cdn.example.com"), None);
    }

    #[test]
    fn query_and_fragment_are_ignored() {
        assert_eq!(
            guess_local_from_remote("https://cdn.example.com/a/b.png?w=400#top").as_deref(),
            Some("images/b.png")
        );
    }

    #[test]
    fn custom_dir_trailing_slash_is_trimmed() {
        assert_eq!(
            guess_local_in("https://cdn.example.com/a/b.png", "static/img/").as_deref(),
            Some("static/img/b.png")
        );
    }

    #[test]
    fn resolve_prefers_local_with_remote_fallback() {
        let resolved = resolve_image("https://cdn.example.com/x/front.jpg", "images");
        assert_eq!(resolved.src, "images/front.jpg");
        assert_eq!(
            resolved.fallback.as_deref(),
            Some("https://cdn.example.com/x/front.jpg")
        );
    }

    #[test]
    fn resolve_unparseable_url_is_remote_only() {
        let resolved = resolve_image("front.jpg", "images");
        assert_eq!(resolved.src, "front.jpg");
        assert!(resolved.fallback.is_none());
    }
}
