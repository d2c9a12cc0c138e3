mod config;
mod errors;
mod feed;
mod models;
mod pipeline;
mod routes;
mod sessions;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::feed::adzuna::AdzunaFeed;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing feed credentials)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Jobboard API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the job feed client
    let feed = AdzunaFeed::new(&config)?;
    info!(
        "Job feed client initialized (country: {}, {} results per page)",
        config.adzuna_country, config.feed_results_per_page
    );

    let session_idle_ttl = Duration::from_secs(config.session_idle_ttl_secs);
    let state = AppState::new(Arc::new(feed), session_idle_ttl);

    // Evict sessions abandoned without a DELETE
    let _sweeper = state.sessions.spawn_sweeper(session_idle_ttl / 4);
    info!(
        "Session sweeper started (idle TTL: {}s)",
        config.session_idle_ttl_secs
    );

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
