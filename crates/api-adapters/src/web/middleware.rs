//! Cross-cutting HTTP layers: CORS and per-request tracing spans.

use axum::{
    body::Body,
    http::{HeaderValue, Method, Request},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::Span;

/// Builds the CORS policy. `"*"` in the list allows any origin.
pub fn cors_policy(allowed_origins: &[String]) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

    if allowed_origins.iter().any(|o| o == "*") {
        return CorsLayer::new().allow_origin(Any).allow_methods(methods).allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring malformed CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(methods)
        .allow_headers(Any)
}

/// Span for one request, tagged with the `x-request-id` set upstream.
pub fn request_span(req: &Request<Body>) -> Span {
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "http_request",
        method = %req.method(),
        uri = %req.uri(),
        request_id,
    )
}
