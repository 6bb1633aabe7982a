//! metrix gateway
//!
//! - POST /api/metrics/{counter,gauge,histogram}: record updates
//! - GET  /metrics: text exposition for pull-based scrapers
//! - Config: optional YAML path as the first argument (default `metrix.yaml`)

use tracing_subscriber::{fmt, EnvFilter};

use metrix_core::error::Result;
use metrix_gateway::{app_state, config, router};

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1);
    let cfg = config::load(path.as_deref())?;
    let listen = cfg.gateway.listen_addr()?;

    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(state);

    tracing::info!(%listen, "metrix-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| metrix_core::MetrixError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| metrix_core::MetrixError::Internal(format!("server failed: {e}")))?;

    tracing::info!("metrix-gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
