//! Inbound request helpers.
//!
//! # Responsibilities
//! - Generate unique request IDs (UUID v4)
//! - Extract the browser's `Cookie` header for forwarding
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Cookie bytes are forwarded untouched, never parsed

use axum::http::{header::COOKIE, HeaderMap, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request IDs for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// The request ID stamped on `headers`, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// The inbound `Cookie` header to forward upstream.
///
/// Absent → empty value. Several `Cookie` lines (as HTTP/2 clients send them)
/// are joined with `"; "` in arrival order.
pub fn inbound_cookie(headers: &HeaderMap) -> HeaderValue {
    let mut values = headers.get_all(COOKIE).iter();
    let Some(first) = values.next() else {
        return HeaderValue::from_static("");
    };

    let mut joined = first.as_bytes().to_vec();
    let mut merged = false;
    for value in values {
        joined.extend_from_slice(b"; ");
        joined.extend_from_slice(value.as_bytes());
        merged = true;
    }
    if !merged {
        return first.clone();
    }

    // Joining legal header values with "; " yields a legal header value
    HeaderValue::from_bytes(&joined).unwrap_or_else(|_| first.clone())
}
