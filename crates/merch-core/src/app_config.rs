use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Where candidate catalog paths are resolved: an `http(s)` URL or a
    /// local site-root directory.
    pub catalog_base: String,
    /// Candidate catalog locations, tried in order.
    pub catalog_paths: Vec<String>,
    /// Local asset directory; doubles as the URL prefix for local images.
    pub images_dir: String,
    /// Upstream storefront page used by the scrape, images and prices commands.
    pub store_url: String,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub scraper_max_concurrent_downloads: usize,
    pub scraper_max_retries: u32,
    pub scraper_retry_backoff_base_secs: u64,
}
