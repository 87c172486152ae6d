//! Integration tests for the overlay control API and webhook endpoints.
//!
//! Tests drive the Axum `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. Each test gets its own temp-dir-backed store, so
//! persistence is exercised for real.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use winoverlay_core::StateStore;
use winoverlay_server::{AppState, build_router};

const TOKEN: &str = "testtoken";

struct TestServer {
    dir: tempfile::TempDir,
    state: Arc<AppState>,
}

impl TestServer {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(StateStore::open(dir.path().join("config.json")));
        let state = Arc::new(AppState::new(store, TOKEN));
        Self { dir, state }
    }

    fn router(&self) -> axum::Router {
        build_router(Arc::clone(&self.state))
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let response = self
            .router()
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        (status, body_to_json(response.into_body()).await)
    }

    async fn post(&self, path: &str, body: &str) -> (StatusCode, Value) {
        let response = self
            .router()
            .oneshot(Request::post(path).body(Body::from(body.to_owned())).unwrap())
            .await
            .unwrap();
        let status = response.status();
        (status, body_to_json(response.into_body()).await)
    }
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}

// =========================================================================
// Control API
// =========================================================================

#[tokio::test]
async fn test_index_returns_html() {
    let server = TestServer::new();
    let response = server
        .router()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("text/html"));
}

#[tokio::test]
async fn test_get_config_returns_defaults() {
    let server = TestServer::new();
    let (status, json) = server.get("/api/config").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["maxWin"], 10);
    assert_eq!(json["current"], 0);
    assert_eq!(json["theme"], "theme-default");
    assert_eq!(json["fontUrl"], "");
    assert_eq!(json["showBg"], true);
    assert_eq!(json["strokeWidth"], 2.0);
    assert_eq!(json["strokeColor"], "#000000");
}

#[tokio::test]
async fn test_post_config_merges_partial_update() {
    let server = TestServer::new();
    let (status, json) = server
        .post("/api/config", r#"{"current": 5, "theme": "theme-neon"}"#)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert_eq!(json["config"]["current"], 5);
    assert_eq!(json["config"]["theme"], "theme-neon");
    // Unmentioned fields keep their values.
    assert_eq!(json["config"]["maxWin"], 10);
    assert_eq!(json["config"]["showBg"], true);
}

#[tokio::test]
async fn test_post_config_ignores_wrong_typed_fields() {
    let server = TestServer::new();
    let (_, json) = server
        .post("/api/config", r#"{"maxWin": "lots", "current": 3}"#)
        .await;

    assert_eq!(json["config"]["maxWin"], 10);
    assert_eq!(json["config"]["current"], 3);
}

#[tokio::test]
async fn test_post_config_clamps_invariants() {
    let server = TestServer::new();
    let (_, json) = server
        .post("/api/config", r#"{"maxWin": 0, "strokeWidth": 99}"#)
        .await;

    assert_eq!(json["config"]["maxWin"], 1);
    assert_eq!(json["config"]["strokeWidth"], 12.0);
}

#[tokio::test]
async fn test_post_config_with_garbage_body_is_a_noop_merge() {
    let server = TestServer::new();
    let (status, json) = server.post("/api/config", "not json at all").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["config"]["current"], 0);
}

#[tokio::test]
async fn test_legacy_save_config() {
    let server = TestServer::new();
    let response = server
        .router()
        .oneshot(
            Request::post("/save-config")
                .body(Body::from(r#"{"theme": "theme-retro"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (_, json) = server.get("/api/config").await;
    assert_eq!(json["theme"], "theme-retro");
}

#[tokio::test]
async fn test_win_endpoints() {
    let server = TestServer::new();

    let (status, json) = server.post("/api/win/plus", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 1);
    assert_eq!(json["maxWin"], 10);

    let (_, json) = server.post("/api/win/minus", "").await;
    assert_eq!(json["count"], 0);

    // The counter may go negative; only maxWin is floored.
    let (_, json) = server.post("/api/win/minus", "").await;
    assert_eq!(json["count"], -1);
}

#[tokio::test]
async fn test_concurrent_win_plus_requests_are_not_lost() {
    let server = TestServer::new();

    let first = server
        .router()
        .oneshot(Request::post("/api/win/plus").body(Body::empty()).unwrap());
    let second = server
        .router()
        .oneshot(Request::post("/api/win/plus").body(Body::empty()).unwrap());
    let (a, b) = tokio::join!(first, second);
    assert_eq!(a.unwrap().status(), StatusCode::OK);
    assert_eq!(b.unwrap().status(), StatusCode::OK);

    let (_, json) = server.get("/api/config").await;
    assert_eq!(json["current"], 2);
}

// =========================================================================
// Webhooks
// =========================================================================

#[tokio::test]
async fn test_webhook_win_plus_with_step() {
    let server = TestServer::new();
    server.post("/api/config", r#"{"current": 5}"#).await;

    let (status, json) = server
        .get("/hook/testtoken:winoverlay:win_plus:3")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert_eq!(json["action"], "win_plus");
    assert_eq!(json["state"]["current"], 8);
}

#[tokio::test]
async fn test_webhook_post_works_like_get() {
    let server = TestServer::new();
    let (status, json) = server.post("/hook/testtoken:winoverlay:win_plus", "").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"]["current"], 1);
}

#[tokio::test]
async fn test_webhook_bad_token_is_rejected_without_mutation() {
    let server = TestServer::new();
    let (status, json) = server.get("/hook/badtoken:winoverlay:win_plus").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "invalid token");

    let (_, config) = server.get("/api/config").await;
    assert_eq!(config["current"], 0);
}

#[tokio::test]
async fn test_webhook_wrong_app_name_is_rejected() {
    let server = TestServer::new();
    let (status, json) = server.get("/hook/testtoken:otherapp:win_plus").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid app name");
}

#[tokio::test]
async fn test_webhook_too_few_segments_is_a_format_error() {
    let server = TestServer::new();
    let (status, json) = server.get("/hook/testtoken:winoverlay").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "payload format: token:app:action[:arg]");
}

#[tokio::test]
async fn test_webhook_unknown_action_is_rejected() {
    let server = TestServer::new();
    let (status, json) = server.get("/hook/testtoken:winoverlay:explode").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "unknown action: explode");
}

#[tokio::test]
async fn test_webhook_set_current_requires_a_number() {
    let server = TestServer::new();
    let (status, json) = server.get("/hook/testtoken:winoverlay:set_current").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "set_current needs a number");
}

#[tokio::test]
async fn test_webhook_set_max_floors_to_one() {
    let server = TestServer::new();
    let (status, json) = server.get("/hook/testtoken:winoverlay:set_max:0").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"]["maxWin"], 1);
}

#[tokio::test]
async fn test_webhook_stroke_sets_width_and_color() {
    let server = TestServer::new();
    // '#' must travel percent-encoded; the path extractor decodes it.
    let (status, json) = server
        .get("/hook/testtoken:winoverlay:stroke:5,%23ff0000")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"]["strokeWidth"], 5.0);
    assert_eq!(json["state"]["strokeColor"], "#ff0000");
}

#[tokio::test]
async fn test_webhook_stroke_with_non_finite_width_keeps_previous_width() {
    let server = TestServer::new();
    let (status, json) = server
        .get("/hook/testtoken:winoverlay:stroke:NaN,%23ff0000")
        .await;

    assert_eq!(status, StatusCode::OK);
    // The width stays at its default; only the color changes.
    assert_eq!(json["state"]["strokeWidth"], 2.0);
    assert_eq!(json["state"]["strokeColor"], "#ff0000");

    let (_, config) = server.get("/api/config").await;
    assert_eq!(config["strokeWidth"], 2.0);
}

#[tokio::test]
async fn test_bare_path_webhook_compatibility() {
    let server = TestServer::new();
    let (status, json) = server.get("/testtoken:winoverlay:win_plus").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert_eq!(json["state"]["current"], 1);
}

#[tokio::test]
async fn test_bare_path_without_colons_is_not_found() {
    let server = TestServer::new();
    let (status, _) = server.get("/favicon.ico").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =========================================================================
// Persistence and broadcast
// =========================================================================

#[tokio::test]
async fn test_mutations_survive_a_restart() {
    let server = TestServer::new();
    server
        .post("/api/config", r#"{"current": 7, "maxWin": 20}"#)
        .await;

    // Reopen a store against the same file, as a restarted process would.
    let reopened = StateStore::open(server.dir.path().join("config.json"));
    let snapshot = reopened.snapshot().await;
    assert_eq!(snapshot.current, 7);
    assert_eq!(snapshot.max_win, 20);
}

#[tokio::test]
async fn test_new_session_receives_latest_snapshot_on_connect() {
    use futures::StreamExt;
    use tokio_tungstenite::tungstenite::Message;

    let server = TestServer::new();
    server
        .post("/api/config", r#"{"current": 9, "theme": "theme-neon"}"#)
        .await;

    // Serve on an ephemeral port so a real WebSocket handshake runs.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = server.router();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let (mut socket, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws"))
        .await
        .unwrap();

    // The first frame is the full latest snapshot, before any mutation.
    let frame = socket.next().await.unwrap().unwrap();
    let Message::Text(text) = frame else {
        panic!("expected a text frame, got {frame:?}");
    };
    let envelope: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(envelope["type"], "state");
    assert_eq!(envelope["data"]["current"], 9);
    assert_eq!(envelope["data"]["theme"], "theme-neon");

    let (_, config) = server.get("/api/config").await;
    assert_eq!(envelope["data"], config);

    // Subsequent mutations stream through the same session.
    server.post("/api/win/plus", "").await;
    let frame = socket.next().await.unwrap().unwrap();
    let Message::Text(text) = frame else {
        panic!("expected a text frame, got {frame:?}");
    };
    let envelope: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(envelope["data"]["current"], 10);
}

#[tokio::test]
async fn test_every_mutation_reaches_subscribers_in_order() {
    let server = TestServer::new();
    let mut rx = server.state.store.subscribe();

    server.post("/api/win/plus", "").await;
    server
        .post("/api/config", r#"{"theme": "theme-neon"}"#)
        .await;

    let first = rx.recv().await.unwrap();
    assert_eq!(first.current, 1);
    assert_eq!(first.theme, "theme-default");

    let second = rx.recv().await.unwrap();
    assert_eq!(second.theme, "theme-neon");
}
