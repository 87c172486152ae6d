//! Server configuration loaded from environment variables.
//!
//! The overlay server is configured entirely through its environment, the
//! same surface the original deployment used:
//!
//! - `WIN_HOST` -- bind address (default `127.0.0.1`)
//! - `WIN_PORT` -- listen port (default `3000`)
//! - `WIN_TOKEN` -- shared webhook secret (default [`DEFAULT_TOKEN`])
//! - `WIN_CONFIG_PATH` -- durable state location (default `config.json`)

use std::path::PathBuf;

use thiserror::Error;

/// Placeholder webhook token used when `WIN_TOKEN` is unset.
///
/// The binary warns at startup when this default is in effect; anyone
/// exposing the webhook endpoint should set a real secret.
pub const DEFAULT_TOKEN: &str = "changeme";

/// Errors that can occur while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed.
    #[error("invalid {name}: {message}")]
    Invalid {
        /// The offending environment variable.
        name: &'static str,
        /// Why its value was rejected.
        message: String,
    },
}

/// Complete overlay server configuration.
#[derive(Debug, Clone)]
pub struct OverlayConfig {
    /// Bind address for the HTTP + WebSocket listener.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Shared secret the webhook grammar authenticates against.
    pub token: String,
    /// Location of the persisted overlay state.
    pub config_path: PathBuf,
}

impl OverlayConfig {
    /// Load configuration from the environment, defaulting anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env_or("WIN_HOST", "127.0.0.1");
        let port = env_or("WIN_PORT", "3000")
            .parse()
            .map_err(|e| ConfigError::Invalid {
                name: "WIN_PORT",
                message: format!("{e}"),
            })?;
        let token = env_or("WIN_TOKEN", DEFAULT_TOKEN);
        let config_path = PathBuf::from(env_or("WIN_CONFIG_PATH", "config.json"));

        Ok(Self {
            host,
            port,
            token,
            config_path,
        })
    }

    /// Whether the webhook token is still the unset-default placeholder.
    pub fn uses_default_token(&self) -> bool {
        self.token == DEFAULT_TOKEN
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_owned())
}
