//! HTTP and WebSocket boundary for the WIN overlay server.
//!
//! This crate wires the core state engine to the outside world:
//!
//! - **Control API** (`/api/config`, `/api/win/*`, legacy `/save-config`)
//!   for the configuration front-end
//! - **Webhook endpoints** (`/hook/{payload}` and bare colon-delimited
//!   top-level paths) for stream-interaction services
//! - **Live-session `WebSocket`** (`/ws`) pushing every state change to all
//!   connected overlay displays
//! - **Minimal HTML status page** (`GET /`) showing the live counter and
//!   the endpoint map
//!
//! Every request handler converges on the core store's single
//! apply-and-persist-and-broadcast path; this crate only parses, validates,
//! and shapes responses.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod webhook;
pub mod ws;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerError, start_server};
pub use state::AppState;
