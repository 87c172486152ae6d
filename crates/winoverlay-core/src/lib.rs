//! Core state-synchronization engine for the WIN overlay server.
//!
//! This crate owns the authoritative overlay state and every path that can
//! mutate it:
//!
//! - [`state`] -- the canonical [`OverlayState`] record, its defaults, and
//!   tolerant partial updates ([`OverlayPatch`])
//! - [`action`] -- the closed vocabulary of webhook/API commands
//! - [`store`] -- the [`StateStore`]: the single
//!   apply-and-persist-and-broadcast mutation path
//! - [`watch`] -- best-effort detection of hand edits to the persisted file
//! - [`config`] -- server settings loaded from environment variables
//!
//! # Architecture
//!
//! ```text
//! HTTP / webhook / host shell --> Action / OverlayPatch --> StateStore
//!                                                             |  |  |
//!                                                 merge+clamp | persist
//!                                                             v
//!                                        broadcast --> every live display
//! ```
//!
//! All mutation paths converge on the store's locked apply sequence, so
//! HTTP callers, live displays, and the persisted file can never disagree.

pub mod action;
pub mod config;
pub mod state;
pub mod store;
pub mod watch;

// Re-export primary types for convenience.
pub use action::{Action, ActionError};
pub use config::{ConfigError, OverlayConfig};
pub use state::{OverlayPatch, OverlayState};
pub use store::StateStore;
