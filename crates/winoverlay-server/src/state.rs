//! Shared application state for the overlay server.
//!
//! [`AppState`] is wrapped in [`Arc`] and injected into handlers via Axum's
//! `State` extractor. It carries the core store handle and the webhook
//! secret; all actual state lives in the store.

use std::sync::Arc;

use winoverlay_core::StateStore;

/// Shared state for the Axum application.
#[derive(Clone)]
pub struct AppState {
    /// Handle to the canonical overlay state.
    pub store: Arc<StateStore>,
    /// Shared secret webhook payloads authenticate against.
    pub token: String,
}

impl AppState {
    /// Create the application state from a store handle and webhook token.
    pub fn new(store: Arc<StateStore>, token: impl Into<String>) -> Self {
        Self {
            store,
            token: token.into(),
        }
    }
}
