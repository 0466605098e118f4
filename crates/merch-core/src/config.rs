use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_CATALOG_PATHS: &str = "/catalog.json,./catalog.json,catalog.json";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields a usable
/// development config.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("MERCH_ENV", "development"));

    let bind_addr = parse_addr("MERCH_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("MERCH_LOG_LEVEL", "info");

    let catalog_base = or_default("MERCH_CATALOG_BASE", ".");
    let catalog_paths = split_list(&or_default("MERCH_CATALOG_PATHS", DEFAULT_CATALOG_PATHS));
    if catalog_paths.is_empty() {
        return Err(ConfigError::Validation(
            "MERCH_CATALOG_PATHS must name at least one candidate location".to_string(),
        ));
    }

    let images_dir = or_default("MERCH_IMAGES_DIR", "images")
        .trim_end_matches('/')
        .to_string();
    if images_dir.is_empty() {
        return Err(ConfigError::Validation(
            "MERCH_IMAGES_DIR must not be empty".to_string(),
        ));
    }

    let store_url = or_default("MERCH_STORE_URL", "https://ballinmerch.ru/");
    url::Url::parse(&store_url).map_err(|e| ConfigError::InvalidEnvVar {
        var: "MERCH_STORE_URL".to_string(),
        reason: e.to_string(),
    })?;

    let scraper_request_timeout_secs = parse_u64("MERCH_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default(
        "MERCH_SCRAPER_USER_AGENT",
        "merch-catalog/0.1 (catalog-sync)",
    );
    let scraper_max_concurrent_downloads =
        parse_usize("MERCH_SCRAPER_MAX_CONCURRENT_DOWNLOADS", "4")?;
    let scraper_max_retries = parse_u32("MERCH_SCRAPER_MAX_RETRIES", "3")?;
    let scraper_retry_backoff_base_secs = parse_u64("MERCH_SCRAPER_RETRY_BACKOFF_BASE_SECS", "5")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        catalog_base,
        catalog_paths,
        images_dir,
        store_url,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_max_concurrent_downloads,
        scraper_max_retries,
        scraper_retry_backoff_base_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
