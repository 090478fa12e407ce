//! DAO Subgraph API - Governance data for a single DAO
//!
//! Queries a DAO governance subgraph for proposals and delegates, joins the
//! results with ENS names, and serves application-friendly records:
//! - Latest proposals with vote tallies and approval status
//! - Proposals joined with their proposer's delegate record
//! - Top delegates with voting history and submitted proposals
//!
//! Nothing is persisted or cached; every request is answered from the subgraph.

mod config;
mod ens;
mod error;
mod governance;
mod graphql;
mod models;
mod routes;
mod state;

use crate::config::Settings;
use crate::routes::create_router;
use crate::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing();

    info!("🚀 Starting DAO Subgraph API...");

    // Load configuration
    let settings = Settings::load()?;
    info!(
        "📋 Configuration loaded: dao={} subgraph={} max_concurrency={}",
        settings.subgraph.dao.name, settings.subgraph.url, settings.subgraph.max_concurrency
    );

    let state = Arc::new(AppState::from_settings(&settings)?);

    // Build the router
    let app = create_router(state, &settings);

    // Create socket address
    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📚 API Endpoints:");
    info!("   GET  /health                      - Liveness probe");
    info!("   GET  /api/proposals?limit=N       - Latest proposals with tallies");
    info!("   GET  /api/proposals/enriched      - Latest proposals joined with proposers");
    info!("   GET  /api/delegates/top           - Top 10 delegates with voting history");
    info!("   GET  /api/delegates/{{id}}          - Single delegate by address");
    info!("   GET  /api/overview?limit=N        - Proposals and delegates dashboard");
    info!("");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,dao_subgraph_api=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
