//! REST and webhook endpoint handlers for the overlay server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/config` | Current state snapshot |
//! | `POST` | `/api/config` | Partial update, returns `{ok, config}` |
//! | `POST` | `/save-config` | Legacy partial update, bare 200 |
//! | `POST` | `/api/win/plus` | Counter +1, returns `{count, maxWin}` |
//! | `POST` | `/api/win/minus` | Counter -1, returns `{count, maxWin}` |
//! | `GET`/`POST` | `/hook/{payload}` | Webhook command |
//! | `GET`/`POST` | `/{payload}` | Bare-path webhook compatibility |
//!
//! Partial-update bodies are read tolerantly: anything that is not a JSON
//! object merges as the empty patch, matching the original server's
//! `body || {}` behavior.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use serde_json::Value;

use winoverlay_core::{Action, OverlayPatch, OverlayState};

use crate::error::ApiError;
use crate::state::AppState;
use crate::webhook;

/// Serve a minimal HTML page showing the live counter and endpoint map.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.store.snapshot().await;
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>WIN Overlay</title>
    <style>
        body {{ background: #0d1117; color: #c9d1d9; font-family: monospace; padding: 2rem; }}
        h1 {{ color: #58a6ff; }}
        .count {{ font-size: 3rem; color: #7ee787; }}
        a {{ color: #58a6ff; }}
        li {{ padding: 0.2rem 0; }}
    </style>
</head>
<body>
    <h1>WIN Overlay</h1>
    <p class="count">{current} / {max_win}</p>
    <p>theme: {theme}</p>
    <ul>
        <li><a href="/api/config">GET /api/config</a> -- current snapshot</li>
        <li>POST /api/config -- partial update</li>
        <li>POST /api/win/plus | /api/win/minus -- counter controls</li>
        <li>GET/POST /hook/token:winoverlay:action[:arg] -- webhook</li>
        <li><code>ws://host:port/ws</code> -- live state stream</li>
    </ul>
</body>
</html>"#,
        current = snapshot.current,
        max_win = snapshot.max_win,
        theme = snapshot.theme,
    ))
}

/// Return the current state snapshot.
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<OverlayState> {
    Json(state.store.snapshot().await)
}

/// Apply a partial update and return the merged configuration.
pub async fn post_config(State(state): State<Arc<AppState>>, body: Bytes) -> Json<Value> {
    let saved = state.store.apply_and_persist(patch_from_body(&body)).await;
    Json(serde_json::json!({ "ok": true, "config": saved }))
}

/// Legacy update endpoint: same merge semantics, no structured body.
///
/// Kept for backward compatibility with older configuration front-ends.
pub async fn save_config(State(state): State<Arc<AppState>>, body: Bytes) -> StatusCode {
    state.store.apply_and_persist(patch_from_body(&body)).await;
    StatusCode::OK
}

/// Increment the counter by one.
pub async fn win_plus(State(state): State<Arc<AppState>>) -> Json<Value> {
    let saved = state.store.increment().await;
    Json(win_body(&saved))
}

/// Decrement the counter by one.
pub async fn win_minus(State(state): State<Arc<AppState>>) -> Json<Value> {
    let saved = state.store.decrement().await;
    Json(win_body(&saved))
}

/// Execute a webhook command under the dedicated `/hook/` prefix.
pub async fn hook(
    State(state): State<Arc<AppState>>,
    Path(payload): Path<String>,
) -> Result<Json<Value>, ApiError> {
    run_hook(&state, &payload).await
}

/// Bare-path webhook compatibility: a top-level path segment with the
/// colon-delimited shape runs as a webhook, anything else is a plain 404.
pub async fn bare_hook(
    State(state): State<Arc<AppState>>,
    Path(payload): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !webhook::looks_like_payload(&payload) {
        return Err(ApiError::NotFound);
    }
    run_hook(&state, &payload).await
}

/// Parse, authenticate, dispatch, and shape the webhook response.
async fn run_hook(state: &AppState, payload: &str) -> Result<Json<Value>, ApiError> {
    let command = webhook::parse_payload(payload, &state.token)?;
    let action = Action::parse(&command.action, command.argument.as_deref())?;
    let saved = state.store.dispatch(action).await;
    Ok(Json(serde_json::json!({
        "ok": true,
        "action": command.action,
        "state": saved,
    })))
}

/// Tolerant patch extraction: non-JSON or non-object bodies are empty
/// patches, never errors.
fn patch_from_body(body: &Bytes) -> OverlayPatch {
    let value: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
    OverlayPatch::from_value(&value)
}

/// The `{count, maxWin}` body of the counter convenience endpoints.
fn win_body(state: &OverlayState) -> Value {
    serde_json::json!({ "count": state.current, "maxWin": state.max_win })
}
