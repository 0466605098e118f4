mod images;
mod render;
mod sync;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "merch-cli")]
#[command(about = "Merch catalog maintenance tools")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape the storefront and write the catalog as JSON
    Scrape {
        /// Output file
        #[arg(long, default_value = "catalog.json")]
        out: PathBuf,
    },
    /// Download product images into the local images directory
    Images {
        /// Download every image and stylesheet image referenced by the storefront page (default)
        #[arg(long, conflicts_with = "from_catalog")]
        from_page: bool,
        /// Download the front and back images of every catalog product
        #[arg(long)]
        from_catalog: bool,
        /// Re-download files that already exist locally
        #[arg(long)]
        force: bool,
    },
    /// Extract prices from the storefront and write the standard price table
    Prices {
        /// Output file
        #[arg(long, default_value = "prices.json")]
        out: PathBuf,
    },
    /// Export the catalog as static HTML, one page per filter
    Render {
        /// Write only this filter's view (e.g. hoodie, certificate) to --out
        #[arg(long)]
        filter: Option<String>,
        /// Page for the "all" view; other filters are written next to it
        #[arg(long, default_value = "index.html")]
        out: PathBuf,
    },
    /// Check that every catalog image URL answers 200 and has a local copy
    VerifyImages,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = merch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Scrape { out }) => sync::run_scrape(&config, &out).await?,
        Some(Commands::Images {
            from_page,
            from_catalog,
            force,
        }) => {
            tracing::debug!(from_page, from_catalog, force, "images command");
            let source = if from_catalog {
                images::ImageSource::Catalog
            } else {
                images::ImageSource::Page
            };
            images::run_images(&config, source, force).await?;
        }
        Some(Commands::Prices { out }) => sync::run_prices(&config, &out).await?,
        Some(Commands::Render { filter, out }) => {
            render::run_render(&config, filter.as_deref(), &out).await?;
        }
        Some(Commands::VerifyImages) => images::run_verify_images(&config).await?,
        None => println!("merch-cli: no command given, see --help"),
    }

    Ok(())
}
