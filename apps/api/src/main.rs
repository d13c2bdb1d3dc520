mod catalog;
mod config;
mod document;
mod errors;
mod generation;
mod layout;
mod llm;
mod pipeline;
mod routes;
mod settings;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::document::fonts::FontCache;
use crate::pipeline::ActiveRun;
use crate::routes::build_router;
use crate::settings::SettingsStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Slidesmith API v{}", env!("CARGO_PKG_VERSION"));

    // Persisted UI settings and provider credential
    let settings = Arc::new(SettingsStore::load(
        config.settings_path.clone(),
        config.provider_api_key.clone(),
    ));
    info!(
        "Settings loaded from {} (key present: {})",
        config.settings_path.display(),
        settings.has_key()
    );

    // One HTTP client shared by every provider call
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(120))
        .build()?;

    let state = AppState {
        config: config.clone(),
        http,
        settings,
        fonts: Arc::new(FontCache::new()),
        active: Arc::new(ActiveRun::new()),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
