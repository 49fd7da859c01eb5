//! Health check endpoint for container orchestration.
//!
//! Provides a liveness probe that returns `{"status":"ok","service":"<tag>"}`
//! whenever the process can answer HTTP. Any method is accepted and the
//! request body is ignored.

use axum::{
    body::Bytes,
    extract::State,
    http::header::CONTENT_TYPE,
    response::IntoResponse,
};
use serde::Serialize;

use crate::config::HEALTH_STATUS_OK;
use crate::state::AppState;

/// The health payload. Exactly two fields, nothing else is ever added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: String,
}

impl HealthStatus {
    pub fn new(service: &str) -> Self {
        Self {
            status: HEALTH_STATUS_OK,
            service: service.to_string(),
        }
    }

    /// Serialize to the compact JSON body served on every request.
    pub fn to_body(&self) -> Result<Bytes, serde_json::Error> {
        serde_json::to_vec(self).map(Bytes::from)
    }
}

/// Health check handler.
///
/// Returns the pre-serialized payload with an `application/json` content type.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    ([(CONTENT_TYPE, "application/json")], state.health_body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_is_compact_json_with_two_fields() {
        let body = HealthStatus::new("rust").to_body().unwrap();
        assert_eq!(&body[..], br#"{"status":"ok","service":"rust"}"#);
    }

    #[test]
    fn tag_flows_into_service_field() {
        let body = HealthStatus::new("rust-canary").to_body().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["service"], "rust-canary");
        assert_eq!(value.as_object().unwrap().len(), 2);
    }
}
