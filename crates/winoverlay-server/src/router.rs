//! Axum router construction for the overlay server.
//!
//! Assembles the control API, webhook routes, and the live-session
//! `WebSocket` into a single [`Router`] with CORS enabled so the
//! configuration front-end and overlay page can be served from anywhere.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the overlay server.
///
/// The bare `/{payload}` routes sit below every static route, so only
/// single-segment colon-delimited paths reach the webhook fallback.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // Live-session WebSocket
        .route("/ws", get(ws::ws_state))
        // Control API
        .route(
            "/api/config",
            get(handlers::get_config).post(handlers::post_config),
        )
        .route("/save-config", post(handlers::save_config))
        .route("/api/win/plus", post(handlers::win_plus))
        .route("/api/win/minus", post(handlers::win_minus))
        // Webhooks
        .route("/hook/{payload}", get(handlers::hook).post(handlers::hook))
        .route(
            "/{payload}",
            get(handlers::bare_hook).post(handlers::bare_hook),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
