//! Overlay HTTP server lifecycle management.
//!
//! [`start_server`] binds the configured address and serves the router
//! until Ctrl-C. Bind failures are the only fatal startup error in the
//! system; everything downstream degrades instead of crashing.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use winoverlay_core::OverlayConfig;

use crate::router::build_router;
use crate::state::AppState;

/// Errors that can occur when starting or running the overlay server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}

/// Start the overlay server and run it until shutdown.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] when the address is invalid or the
/// listener cannot bind, [`ServerError::Serve`] on a fatal I/O error.
pub async fn start_server(config: &OverlayConfig, state: Arc<AppState>) -> Result<(), ServerError> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| ServerError::Bind(format!("invalid address: {e}")))?;

    let router = build_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;

    info!(%addr, "overlay server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Serve(format!("serve error: {e}")))?;

    Ok(())
}

/// Resolve when the process receives Ctrl-C.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => warn!("could not install Ctrl-C handler: {e}"),
    }
}
