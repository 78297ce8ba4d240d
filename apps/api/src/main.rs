mod config;
mod docx;
mod errors;
mod pipeline;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("reflow_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Reflow API v{}", env!("CARGO_PKG_VERSION"));

    // The upload root holds per-request scratch directories only.
    std::fs::create_dir_all(&config.upload_dir)?;
    info!("Upload root: {}", config.upload_dir.display());

    // The template is re-read on every request; missing it only warns here
    // so the service can start before the template is mounted.
    if config.template_path.exists() {
        info!("Output template: {}", config.template_path.display());
    } else {
        warn!(
            "Output template {} does not exist; format requests will fail until it does",
            config.template_path.display()
        );
    }

    let state = AppState {
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
