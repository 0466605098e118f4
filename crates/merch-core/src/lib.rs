pub mod app_config;
pub mod config;
pub mod filter;
pub mod format;
pub mod image;
pub mod product;
pub mod render;
pub mod view;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use filter::{
    build_filters, filtered_view, ActiveFilter, FilterButton, HeroStats, CATEGORY_PRIORITY,
};
pub use format::{format_rub, price_label};
pub use image::{guess_local_from_remote, guess_local_in, resolve_image, ResolvedImage};
pub use product::{category_label, Product, ProductId, ProductImages};
pub use render::{render_page, LinkStyle, RenderOptions};
pub use view::{CloseTrigger, ViewEvent, ViewState};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("config validation failed: {0}")]
    Validation(String),
}
