//! webprom exporter
//!
//! - `POST /send-metrics`: web request records in, one JSON object each
//! - `GET /metrics`: Prometheus text exposition
//! - Graceful shutdown on Ctrl-C (readiness flips to draining first)

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use webprom_core::error::{Result, WebPromError};
use webprom_exporter::{app_state::AppState, config, router};

const DEFAULT_CONFIG: &str = "webprom.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("WEBPROM_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let cfg = config::load_from_file(&path)?;
    let listen: SocketAddr = cfg
        .server
        .listen
        .parse()
        .map_err(|e| WebPromError::BadRequest(format!("server.listen: {e}")))?;

    let state = AppState::new(cfg)?;
    let app = router::build_router(state.clone());

    tracing::info!(%listen, config = %path, "webprom-exporter starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| WebPromError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .map_err(|e| WebPromError::Internal(format!("server failed: {e}")))?;

    tracing::info!("webprom-exporter stopped");
    Ok(())
}

async fn shutdown_signal(state: AppState) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "ctrl-c handler failed");
    }
    state.set_draining();
    tracing::info!("draining");
}
