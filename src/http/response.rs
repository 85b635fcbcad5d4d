//! Response envelopes and error mapping.
//!
//! # Responsibilities
//! - Define the `{ success, message, data }` failure envelope
//! - Map proxy failures to 502 / 500 responses
//! - Convert handler panics to the 500 envelope
//!
//! # Design Decisions
//! - Non-2xx upstream responses are not errors and never pass through here
//! - Internal failures carry no diagnostic detail to the client

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::upstream::UpstreamError;

/// Message sent when the upstream could not be reached.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Upstream service unavailable";

/// Message sent for any unexpected local failure.
pub const INTERNAL_FAILURE_MESSAGE: &str = "Internal server error";

/// Failure envelope returned by the proxy itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope {
    pub success: bool,
    pub message: String,
    pub data: Value,
}

impl ApiEnvelope {
    pub fn failure(message: impl Into<String>, data: Value) -> Self {
        Self {
            success: false,
            message: message.into(),
            data,
        }
    }
}

/// The two ways a relay can fail.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The exchange with upstream did not complete.
    #[error("upstream transport failure: {detail}")]
    Transport { detail: String },

    /// Anything else.
    #[error("internal failure: {0}")]
    Internal(String),
}

impl ProxyError {
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::Transport { .. } => "transport",
            ProxyError::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Transport { .. } => StatusCode::BAD_GATEWAY,
            ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UpstreamError> for ProxyError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Transport(_) | UpstreamError::Status(_) => ProxyError::Transport {
                detail: err.to_string(),
            },
            UpstreamError::InvalidUrl { .. } | UpstreamError::Build(_) => {
                ProxyError::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let envelope = match self {
            ProxyError::Transport { detail } => {
                ApiEnvelope::failure(TRANSPORT_FAILURE_MESSAGE, json!({ "detail": detail }))
            }
            ProxyError::Internal(reason) => {
                tracing::error!(reason = %reason, "Internal failure");
                ApiEnvelope::failure(INTERNAL_FAILURE_MESSAGE, Value::Null)
            }
        };
        (status, Json(envelope)).into_response()
    }
}

/// `CatchPanicLayer` hook: a panicking handler answers with the 500 envelope.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let reason = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "handler panicked".to_string()
    };
    ProxyError::Internal(reason).into_response()
}
