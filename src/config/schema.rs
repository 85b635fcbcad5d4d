//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the session proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Path of the session endpoint served to browsers.
pub const SESSION_PATH: &str = "/api/me";

/// Upstream path the session endpoint forwards to.
pub const SESSION_UPSTREAM_PATH: &str = "/api/auth/me";

/// Liveness endpoint; reserved, relay routes cannot use it.
pub const HEALTH_PATH: &str = "/healthz";

/// Root configuration for the session proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream backend the proxy relays to.
    pub upstream: UpstreamConfig,

    /// Additional relay routes. The session route is always present.
    pub routes: Vec<RelayRouteConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Inbound request limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Upstream backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the backend, e.g. "http://localhost:8000".
    pub base_url: String,

    /// Route upstream calls through the proxies named in `HTTP_PROXY` and friends.
    pub use_system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            use_system_proxy: false,
        }
    }
}

/// HTTP method accepted by a relay route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RouteMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl RouteMethod {
    /// Whether requests on this method carry a body worth forwarding.
    pub fn has_body(self) -> bool {
        !matches!(self, RouteMethod::Get | RouteMethod::Delete)
    }
}

impl std::fmt::Display for RouteMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RouteMethod::Get => "GET",
            RouteMethod::Post => "POST",
            RouteMethod::Put => "PUT",
            RouteMethod::Patch => "PATCH",
            RouteMethod::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// A relay route: inbound method + path forwarded to an upstream path.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelayRouteConfig {
    /// Route identifier for logging/metrics.
    pub name: String,

    /// Inbound method.
    #[serde(default = "default_method")]
    pub method: RouteMethod,

    /// Inbound path (exact match).
    pub path: String,

    /// Path appended to the upstream base URL.
    pub upstream_path: String,
}

fn default_method() -> RouteMethod {
    RouteMethod::Get
}

impl RelayRouteConfig {
    /// The built-in `GET /api/me` session route.
    pub fn session() -> Self {
        Self {
            name: "session".to_string(),
            method: RouteMethod::Get,
            path: SESSION_PATH.to_string(),
            upstream_path: SESSION_UPSTREAM_PATH.to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total upstream call timeout in seconds.
    pub upstream_secs: u64,

    /// Inbound request deadline in seconds. Must exceed `upstream_secs`
    /// so upstream timeouts surface as 502 rather than 408.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 10,
            request_secs: 30,
        }
    }
}

/// Inbound request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
