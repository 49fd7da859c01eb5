//! HTTP route handlers.
//!
//! Only `/health` is registered. It answers every method, and anything else
//! falls through to axum's default 404 since no fallback is installed.
//!
//! Every response, including 404s, passes through the request span middleware
//! and carries an `x-request-id` header.

pub mod health;

use axum::{middleware, routing::any, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{CACHE_CONTROL_HEALTH, HEALTH_PATH};
use crate::middleware::request_span_layer;
use crate::state::AppState;

/// Creates the Axum router with the health route.
pub fn create_router(state: AppState) -> Router {
    // Health check - no caching, always fresh for liveness probes
    let health_routes = Router::new()
        .route(HEALTH_PATH, any(health::health))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_HEALTH),
        ));

    Router::new()
        .merge(health_routes)
        .with_state(state.clone())
        // Request span middleware - tags logs with service and request_id
        .layer(middleware::from_fn_with_state(state, request_span_layer))
}
