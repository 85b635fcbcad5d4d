//! Metrics collection and exposition.
//!
//! # Metrics
//! - `session_proxy_requests_total` (counter): relayed requests by route, status
//! - `session_proxy_request_duration_seconds` (histogram): latency by route
//! - `session_proxy_upstream_failures_total` (counter): failures by route, kind
//! - `session_proxy_cookies_relayed_total` (counter): Set-Cookie lines relayed
//!
//! Recording is a no-op until `init_metrics` installs the Prometheus exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with an HTTP scrape listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one completed request.
pub fn record_request(route: &str, status: u16, start: Instant) {
    metrics::counter!(
        "session_proxy_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "session_proxy_request_duration_seconds",
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record an upstream call that did not produce a relayable response.
pub fn record_upstream_failure(route: &str, kind: &'static str) {
    metrics::counter!(
        "session_proxy_upstream_failures_total",
        "route" => route.to_string(),
        "kind" => kind
    )
    .increment(1);
}

/// Record how many `Set-Cookie` lines were relayed to the browser.
pub fn record_cookies_relayed(route: &str, count: usize) {
    if count == 0 {
        return;
    }
    metrics::counter!(
        "session_proxy_cookies_relayed_total",
        "route" => route.to_string()
    )
    .increment(count as u64);
}
