//! Relay handler shared by the session route and configured relay routes.
//!
//! ```text
//! browser ──Cookie──▶ relay ──Cookie──▶ upstream
//! browser ◀─status, JSON body, Set-Cookie×n── relay ◀── upstream
//! ```

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    http::{header::CONTENT_TYPE, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::cookies::relay_set_cookies;
use crate::http::request::{inbound_cookie, request_id};
use crate::http::response::ProxyError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::RelayRoute;
use crate::upstream::UpstreamRequest;

/// Forward one inbound request to upstream and relay the outcome.
pub async fn relay(
    state: AppState,
    route: Arc<RelayRoute>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers).to_string();

    let mut request = UpstreamRequest::get(route.upstream_path.clone(), inbound_cookie(&headers));
    request.method = route.http_method();
    if route.method.has_body() && !body.is_empty() {
        request.content_type = headers.get(CONTENT_TYPE).cloned();
        request.body = Some(body);
    }

    tracing::debug!(
        request_id = %request_id,
        route = %route.name,
        method = %request.method,
        upstream_path = %route.upstream_path,
        "Relaying request"
    );

    match state.upstream.send(request).await {
        Ok(upstream) => {
            let mut response =
                (upstream.status, Json(upstream.body.unwrap_or(Value::Null))).into_response();
            let relayed = relay_set_cookies(Some(&upstream.headers), response.headers_mut());

            tracing::info!(
                request_id = %request_id,
                route = %route.name,
                status = upstream.status.as_u16(),
                cookies_relayed = relayed,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Relayed upstream response"
            );
            metrics::record_cookies_relayed(&route.name, relayed);
            metrics::record_request(&route.name, upstream.status.as_u16(), start);
            response
        }
        Err(err) => {
            let err = ProxyError::from(err);
            tracing::warn!(
                request_id = %request_id,
                route = %route.name,
                kind = err.kind(),
                error = %err,
                "Upstream call failed"
            );
            metrics::record_upstream_failure(&route.name, err.kind());
            metrics::record_request(&route.name, err.status().as_u16(), start);
            err.into_response()
        }
    }
}
