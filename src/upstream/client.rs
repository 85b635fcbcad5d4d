//! Upstream HTTP client.
//!
//! # Responsibilities
//! - Issue exactly one call per relayed request (no retries)
//! - Attach the browser's cookie header verbatim
//! - Enforce connect and total timeouts
//! - Decode the body into an opaque JSON value
//!
//! # Design Decisions
//! - Status handling is an explicit `StatusPolicy`, not a client default
//! - Redirects are not followed; a `3xx` and its cookies reach the browser as-is
//! - Builder errors are local faults, every other client error is transport

use std::error::Error as StdError;
use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::schema::{TimeoutConfig, UpstreamConfig};

/// How non-2xx upstream statuses are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Every status is a completed exchange handed back to the caller.
    AcceptAll,
    /// Non-2xx statuses become `UpstreamError::Status`.
    ErrorForStatus,
}

/// Errors produced while talking to the upstream backend.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid upstream URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build upstream request: {0}")]
    Build(#[source] reqwest::Error),

    #[error("{}", error_chain(.0))]
    Transport(#[source] reqwest::Error),

    #[error("upstream returned {0}")]
    Status(StatusCode),
}

impl UpstreamError {
    /// Whether the exchange with upstream failed to complete.
    pub fn is_transport(&self) -> bool {
        matches!(self, UpstreamError::Transport(_))
    }

    fn classify(err: reqwest::Error) -> Self {
        if err.is_builder() {
            UpstreamError::Build(err)
        } else {
            UpstreamError::Transport(err)
        }
    }
}

/// Render an error and its sources as `outer: inner: root`.
pub fn error_chain(err: &dyn StdError) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

/// One outbound call.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    /// Path appended to the base URL, starting with `/`.
    pub path: String,
    /// Inbound `Cookie` header, possibly empty.
    pub cookie: HeaderValue,
    pub body: Option<Bytes>,
    pub content_type: Option<HeaderValue>,
}

impl UpstreamRequest {
    /// A bodiless `GET` carrying `cookie`.
    pub fn get(path: impl Into<String>, cookie: HeaderValue) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            cookie,
            body: None,
            content_type: None,
        }
    }
}

/// What came back from upstream.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// `None` when the body was empty.
    pub body: Option<Value>,
}

/// Client for the upstream backend. Cheap to clone; clones share one pool.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
    policy: StatusPolicy,
}

impl UpstreamClient {
    /// Create a client from configuration.
    pub fn new(
        upstream: &UpstreamConfig,
        timeouts: &TimeoutConfig,
        policy: StatusPolicy,
    ) -> Result<Self, UpstreamError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.upstream_secs))
            .redirect(reqwest::redirect::Policy::none());
        if !upstream.use_system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build().map_err(UpstreamError::Build)?;

        Ok(Self {
            http,
            base_url: upstream.base_url.trim_end_matches('/').to_string(),
            policy,
        })
    }

    pub fn policy(&self) -> StatusPolicy {
        self.policy
    }

    /// Full URL for an upstream path.
    pub fn url_for(&self, path: &str) -> Result<Url, UpstreamError> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|source| UpstreamError::InvalidUrl { url: raw, source })
    }

    /// Perform one call. Never retries.
    pub async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.url_for(&request.path)?;
        let start = Instant::now();

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .header(header::COOKIE, request.cookie);
        if let Some(content_type) = request.content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(UpstreamError::classify)?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await.map_err(UpstreamError::classify)?;

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status = status.as_u16(),
            body_len = bytes.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Upstream responded"
        );

        if self.policy == StatusPolicy::ErrorForStatus && !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        Ok(UpstreamResponse {
            status,
            headers,
            body: decode_body(&bytes),
        })
    }
}

/// Empty → `None`; JSON → the value; anything else → the raw text as a JSON string.
pub fn decode_body(bytes: &[u8]) -> Option<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(String::from_utf8_lossy(bytes).into_owned())),
    }
}
