//! `WebSocket` handler for live overlay displays.
//!
//! Displays connect to `GET /ws` and receive a `{"type":"state","data":..}`
//! envelope immediately on connect, then again after every mutation. The
//! handler subscribes to the store's broadcast channel, so all displays see
//! the same ordered stream.
//!
//! A display that falls behind has its lagged snapshots silently skipped;
//! since every message is a full snapshot, resuming from the newest one is
//! always correct.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use winoverlay_core::OverlayState;

use crate::state::AppState;

/// The wire envelope every live-session message uses.
#[derive(Debug, Serialize)]
struct StateEnvelope<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    data: &'a OverlayState,
}

/// Upgrade an HTTP request to a `WebSocket` connection and stream state
/// snapshots.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_state(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Handle the session lifecycle: snapshot on connect, then forward every
/// broadcast until the display disconnects.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("display client connected");

    // Subscribe before reading the snapshot so a mutation landing between
    // the two shows up as a (harmless) duplicate rather than a gap.
    let mut rx = state.store.subscribe();

    let snapshot = state.store.snapshot().await;
    let Some(json) = envelope_json(&snapshot) else {
        return;
    };
    if socket.send(Message::Text(json.into())).await.is_err() {
        debug!("display client disconnected before the initial snapshot");
        return;
    }

    loop {
        tokio::select! {
            // A mutation was broadcast by the store.
            result = rx.recv() => {
                match result {
                    Ok(new_state) => {
                        let Some(json) = envelope_json(&new_state) else {
                            continue;
                        };
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            debug!("display client disconnected (send failed)");
                            return;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "display client lagged, resuming at newest state");
                    }
                    Err(RecvError::Closed) => {
                        debug!("broadcast channel closed, ending session");
                        return;
                    }
                }
            }
            // Check if the display sent a close frame or disconnected.
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("display client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("display client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("websocket error: {e}");
                        return;
                    }
                    _ => {
                        // Displays are not expected to send anything else.
                    }
                }
            }
        }
    }
}

/// Serialize a snapshot in its wire envelope.
fn envelope_json(state: &OverlayState) -> Option<String> {
    match serde_json::to_string(&StateEnvelope {
        kind: "state",
        data: state,
    }) {
        Ok(json) => Some(json),
        Err(e) => {
            warn!("failed to serialize state envelope: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_uses_the_wire_shape() {
        let state = OverlayState::default();
        let json = envelope_json(&state).unwrap_or_default();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap_or_default();
        assert_eq!(
            value.get("type").and_then(serde_json::Value::as_str),
            Some("state")
        );
        assert_eq!(
            value
                .get("data")
                .and_then(|d| d.get("maxWin"))
                .and_then(serde_json::Value::as_i64),
            Some(10)
        );
    }
}
