//! WIN overlay server entry point.
//!
//! Wires the pieces together: structured logging, environment
//! configuration, the state store with its persisted `config.json`, the
//! external-edit watcher, and the HTTP + `WebSocket` listener.

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use winoverlay_core::{OverlayConfig, StateStore, watch};
use winoverlay_server::{AppState, start_server};

/// Application entry point.
///
/// # Errors
///
/// Returns an error on invalid configuration or when the listener cannot
/// bind; storage and watcher failures degrade with a log line instead.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("winoverlay starting");

    let config = OverlayConfig::from_env()?;
    if config.uses_default_token() {
        warn!("WIN_TOKEN is not set, webhook endpoints use the default token");
    }
    info!(
        host = config.host,
        port = config.port,
        config_path = %config.config_path.display(),
        "configuration loaded"
    );

    let store = Arc::new(StateStore::open(&config.config_path));
    let snapshot = store.snapshot().await;
    info!(
        current = snapshot.current,
        max_win = snapshot.max_win,
        theme = snapshot.theme,
        "overlay state loaded"
    );

    // Best-effort: a failed watch only loses external-edit detection.
    let _watcher = watch::spawn(Arc::clone(&store));

    let state = Arc::new(AppState::new(store, config.token.clone()));
    start_server(&config, state).await?;

    Ok(())
}
