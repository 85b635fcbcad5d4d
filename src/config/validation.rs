//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect conflicting relay routes
//! - Reject inbound paths the router would refuse (reserved or templated)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{ProxyConfig, HEALTH_PATH};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("invalid upstream base URL '{url}': {reason}")]
    UpstreamUrl { url: String, reason: String },

    #[error("timeout '{0}' must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("request timeout ({request}s) must exceed upstream timeout ({upstream}s)")]
    RequestTimeoutTooShort { request: u64, upstream: u64 },

    #[error("max_body_size must be greater than zero")]
    ZeroBodyLimit,

    #[error("route '{name}': {field} '{value}' must start with '/'")]
    RelativePath {
        name: String,
        field: &'static str,
        value: String,
    },

    #[error("route '{name}': path '{path}' is reserved")]
    ReservedPath { name: String, path: String },

    #[error("route '{name}': path '{path}' contains '{found}'; routes match exact paths only")]
    PathSyntax {
        name: String,
        path: String,
        found: char,
    },

    #[error("route name must not be empty (path '{0}')")]
    EmptyRouteName(String),

    #[error("duplicate route {method} {path}")]
    DuplicateRoute { method: String, path: String },

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if let Err(reason) = check_upstream_url(&config.upstream.base_url) {
        errors.push(ValidationError::UpstreamUrl {
            url: config.upstream.base_url.clone(),
            reason,
        });
    }

    let timeouts = &config.timeouts;
    for (name, value) in [
        ("connect_secs", timeouts.connect_secs),
        ("upstream_secs", timeouts.upstream_secs),
        ("request_secs", timeouts.request_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }
    if timeouts.upstream_secs > 0 && timeouts.request_secs <= timeouts.upstream_secs {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request: timeouts.request_secs,
            upstream: timeouts.upstream_secs,
        });
    }

    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    let mut seen = HashSet::new();
    for route in &config.routes {
        if route.name.trim().is_empty() {
            errors.push(ValidationError::EmptyRouteName(route.path.clone()));
        }
        for (field, value) in [("path", &route.path), ("upstream_path", &route.upstream_path)] {
            if !value.starts_with('/') {
                errors.push(ValidationError::RelativePath {
                    name: route.name.clone(),
                    field,
                    value: value.clone(),
                });
            }
        }
        if route.path == HEALTH_PATH {
            errors.push(ValidationError::ReservedPath {
                name: route.name.clone(),
                path: route.path.clone(),
            });
        }
        if let Some(found) = route.path.chars().find(|c| matches!(c, ':' | '*' | '{' | '}')) {
            errors.push(ValidationError::PathSyntax {
                name: route.name.clone(),
                path: route.path.clone(),
                found,
            });
        }
        if !seen.insert((route.method, route.path.as_str())) {
            errors.push(ValidationError::DuplicateRoute {
                method: route.method.to_string(),
                path: route.path.clone(),
            });
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_upstream_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{}'", other)),
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("must not carry a query or fragment".to_string());
    }
    Ok(())
}
