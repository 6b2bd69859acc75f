//! Anime portal HTTP server.
//!
//! Serves the catalog (backed by Jikan), synthetic episode lists, and dub
//! provider resolution with timeouts, fallbacks and response caching.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod episodes;
pub mod error;
pub mod metadata;
pub mod resolution;
pub mod state;

use anyhow::{Context, Result};
use dub_providers::{ProviderEndpoints, ProviderRegistry, RegistryMode};
use reqwest::Client;
use shared::Config;
use tracing::info;

pub use api::create_router;
pub use error::{AppError, AppResult};
pub use state::AppState;

/// Build the provider registry for the configured environment
pub fn build_registry(config: &Config) -> Result<ProviderRegistry> {
    let client = Client::builder()
        .timeout(config.providers.timeout())
        .build()
        .context("Failed to create provider HTTP client")?;

    let mode = RegistryMode::for_environment(config.environment);
    let endpoints = ProviderEndpoints::from_config(&config.providers);
    Ok(ProviderRegistry::build(mode, client, &endpoints))
}

/// Bind the configured address and serve until the process exits
pub async fn run_server(config: Config) -> Result<()> {
    let registry = build_registry(&config)?;
    let jikan = metadata::JikanClient::new(&config.metadata)?;
    let bind_addr = config.server.bind_addr.clone();

    let state = AppState::new(config, registry, jikan);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!(addr = %bind_addr, "Portal server listening");

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
