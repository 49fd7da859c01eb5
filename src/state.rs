//! Shared application state for request handlers.

use std::sync::Arc;

use axum::body::Bytes;

use crate::config::AppConfig;
use crate::routes::health::HealthStatus;

/// Shared application state, cheap to clone per request.
///
/// The health body is serialized once at startup; `Bytes` clones share the
/// same allocation, so concurrent requests never contend on anything.
#[derive(Clone)]
pub struct AppState {
    pub health_body: Bytes,
    /// Service tag, recorded on every request span
    pub service: Arc<str>,
}

impl AppState {
    /// Creates the application state from the given configuration.
    pub fn new(config: &AppConfig) -> Result<Self, serde_json::Error> {
        Ok(Self {
            health_body: HealthStatus::new(&config.service.tag).to_body()?,
            service: Arc::from(config.service.tag.as_str()),
        })
    }
}
