//! Top-level error type for process startup.
//!
//! Every failure before or while serving funnels into `StartupError`, which
//! `main` returns so the process exits non-zero instead of idling silently.

use crate::config::ConfigError;
use crate::http::ServerError;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("Failed to serialize health payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}
