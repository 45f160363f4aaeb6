mod config;
mod errors;
mod models;
mod pipeline;
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
use crate::pipeline::claims::ClaimExtractor;
use crate::pipeline::verification::VerificationEngine;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::ResumeStore;

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

    info!("Starting SkillCred API v{}", env!("CARGO_PKG_VERSION"));

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    let store = Arc::new(ResumeStore::open(&config.data_file).await?);
    info!("Resume store ready at {}", config.data_file.display());

    let extractor = Arc::new(ClaimExtractor::new());
    let engine = Arc::new(VerificationEngine::new());
    info!("Claim extractor and verification engine initialized");

    let state = AppState {
        store,
        extractor,
        engine,
        config: config.clone(),
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
