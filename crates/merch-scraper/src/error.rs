use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error for {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid CSS selector \"{selector}\": {reason}")]
    Selector { selector: String, reason: String },
}

impl ScraperError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure to load the catalog document from a candidate location.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("HTTP request for {location} failed: {source}")]
    Http {
        location: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{location} responded with HTTP {status}")]
    Status { status: u16, location: String },

    #[error("{location} is not a JSON array")]
    NotAnArray { location: String },

    #[error("{location} is not valid JSON: {source}")]
    Deserialize {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot resolve catalog location \"{candidate}\": {reason}")]
    InvalidLocation { candidate: String, reason: String },

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("no catalog locations configured")]
    NoCandidates,

    #[error("all {attempts} catalog locations failed; last error: {last}")]
    AllCandidatesFailed {
        attempts: usize,
        #[source]
        last: Box<LoadError>,
    },
}
