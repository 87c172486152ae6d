//! Error types for the overlay request boundary.
//!
//! [`ApiError`] unifies webhook and dispatch failures into one enum with an
//! [`IntoResponse`] implementation producing the `{ok:false, error}` body
//! the original webhook contract promises. Validation, authorization, and
//! argument failures are all client errors (400); only the bare-path
//! fallback produces 404, for paths that are not webhook payloads at all.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use winoverlay_core::ActionError;

/// Errors a request handler can surface to the client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The webhook payload did not have at least three colon-delimited
    /// parts.
    #[error("payload format: token:app:action[:arg]")]
    Format,

    /// The payload's token did not match the configured secret.
    #[error("invalid token")]
    InvalidToken,

    /// The payload named an application other than this overlay.
    #[error("invalid app name")]
    InvalidApp,

    /// The action was recognized but its argument was missing or invalid,
    /// or the action identifier is not in the vocabulary.
    #[error(transparent)]
    Action(#[from] ActionError),

    /// The path is not a webhook payload (bare-path fallback only).
    #[error("not found")]
    NotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if matches!(self, Self::NotFound) {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::BAD_REQUEST
        };

        let body = serde_json::json!({
            "ok": false,
            "error": self.to_string(),
        });

        (status, axum::Json(body)).into_response()
    }
}
