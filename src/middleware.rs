//! Request span middleware.
//!
//! Every request runs inside a `request` span carrying the service tag and a
//! request id. An inbound `x-request-id` that parses as a UUID is kept, so an
//! id assigned by a load balancer follows the request into our logs; anything
//! else gets a fresh v4 id. The id is echoed in the `x-request-id` response
//! header either way.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::{header::HeaderName, HeaderMap, HeaderValue, StatusCode};
use tracing::Instrument;
use uuid::Uuid;

use crate::state::AppState;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Reuse a well-formed inbound id, otherwise mint one.
fn request_id(headers: &HeaderMap) -> Uuid {
    headers
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value.trim()).ok())
        .unwrap_or_else(Uuid::new_v4)
}

/// Outermost layer: wraps handling in the request span and stamps the id on
/// the response.
pub async fn request_span_layer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let request_id = request_id(request.headers());

    let span = tracing::info_span!(
        "request",
        service = %state.service,
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty,
    );

    let start = Instant::now();
    let mut response = next.run(request).instrument(span.clone()).await;
    let status = response.status();

    span.record("status", status.as_u16());
    span.record("duration_ms", start.elapsed().as_millis() as u64);
    span.in_scope(|| {
        // Only /health is routed; anything else is scanner noise
        if status == StatusCode::NOT_FOUND {
            tracing::debug!("Unrouted request");
        } else {
            tracing::info!("Request completed");
        }
    });

    if let Ok(value) = HeaderValue::from_str(&request_id.hyphenated().to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
