mod config;
mod documents;
mod errors;
mod generation;
mod llm_client;
mod models;
mod render;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::OpenAiClient;
use crate::render::RenderTracker;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::ProductStore;

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

    info!("Starting Seedstock API v{}", env!("CARGO_PKG_VERSION"));

    std::fs::create_dir_all(&config.documents_dir)?;
    info!("Document directory: {}", config.documents_dir.display());

    let store = ProductStore::new(config.products_file.clone());
    info!(
        "Product store: {} ({} products)",
        store.path().display(),
        store.list_all()?.len()
    );

    // Generation client (model: gpt-4; requests carry their own API key)
    let llm = Arc::new(OpenAiClient::new());
    info!("Generation client initialized (model: {})", llm_client::MODEL);

    let state = AppState {
        config: config.clone(),
        store,
        llm,
        render_tracker: RenderTracker::default(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
