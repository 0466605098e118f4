mod api;
mod middleware;

use merch_core::RenderOptions;
use merch_scraper::CatalogLoader;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState, StaticAssets};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = merch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let loader = CatalogLoader::from_config(&config)?;
    let assets = StaticAssets::from_config(&config, loader.source());
    let render = RenderOptions {
        images_dir: assets.images_prefix.clone(),
        ..RenderOptions::default()
    };
    let app = build_app(AppState::new(loader, render), &assets);

    tracing::info!(
        env = %config.env,
        bind_addr = %config.bind_addr,
        catalog_base = %config.catalog_base,
        images = %assets.images_path.display(),
        "starting merch-server"
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
