//! # pandora-api — Binary Entry Point
//!
//! Loads configuration, starts the cache janitor and serves the decoy
//! application on `0.0.0.0:<PANDORA_PORT>`.

use pandora_api::{AppState, PandoraConfig};
use pandora_store::Janitor;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = PandoraConfig::from_env()?;

    // Initialize structured tracing.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let state = AppState::from_config(&config).map_err(|e| {
        tracing::error!("Bootstrap failed: {e}");
        e
    })?;

    let _janitor = Janitor::new(config.janitor.clone()).spawn();

    let app = pandora_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(
        cache_enabled = config.store.enabled,
        cache_dir = %config.store.cache_dir.display(),
        "Pandora listening on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
