//! Relay route table.
//!
//! # Responsibilities
//! - Compile configured routes into immutable `RelayRoute`s
//! - Guarantee the `GET /api/me` session route is present
//! - Group routes by path for router construction
//!
//! # Design Decisions
//! - Immutable after construction, shared via `Arc`
//! - Exact path matching only
//! - A configured `GET /api/me` replaces the built-in session route

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::http::Method;
use axum::routing::MethodFilter;

use crate::config::schema::{RelayRouteConfig, RouteMethod, SESSION_PATH};

/// A compiled relay route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRoute {
    pub name: String,
    pub method: RouteMethod,
    pub path: String,
    pub upstream_path: String,
}

impl From<&RelayRouteConfig> for RelayRoute {
    fn from(config: &RelayRouteConfig) -> Self {
        Self {
            name: config.name.clone(),
            method: config.method,
            path: config.path.clone(),
            upstream_path: config.upstream_path.clone(),
        }
    }
}

impl RelayRoute {
    pub fn http_method(&self) -> Method {
        match self.method {
            RouteMethod::Get => Method::GET,
            RouteMethod::Post => Method::POST,
            RouteMethod::Put => Method::PUT,
            RouteMethod::Patch => Method::PATCH,
            RouteMethod::Delete => Method::DELETE,
        }
    }

    pub fn method_filter(&self) -> MethodFilter {
        match self.method {
            RouteMethod::Get => MethodFilter::GET,
            RouteMethod::Post => MethodFilter::POST,
            RouteMethod::Put => MethodFilter::PUT,
            RouteMethod::Patch => MethodFilter::PATCH,
            RouteMethod::Delete => MethodFilter::DELETE,
        }
    }
}

/// Immutable set of relay routes.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Arc<RelayRoute>>,
}

impl RouteTable {
    /// Compile routes from configuration, adding the session route unless
    /// the configuration already defines `GET /api/me`.
    pub fn from_config(configs: &[RelayRouteConfig]) -> Self {
        let overrides_session = configs
            .iter()
            .any(|r| r.method == RouteMethod::Get && r.path == SESSION_PATH);

        let mut routes = Vec::with_capacity(configs.len() + 1);
        if !overrides_session {
            routes.push(Arc::new(RelayRoute::from(&RelayRouteConfig::session())));
        }
        routes.extend(configs.iter().map(|c| Arc::new(RelayRoute::from(c))));

        Self { routes }
    }

    pub fn routes(&self) -> &[Arc<RelayRoute>] {
        &self.routes
    }

    /// Routes grouped by inbound path, in path order.
    pub fn by_path(&self) -> BTreeMap<&str, Vec<Arc<RelayRoute>>> {
        let mut grouped: BTreeMap<&str, Vec<Arc<RelayRoute>>> = BTreeMap::new();
        for route in &self.routes {
            grouped.entry(route.path.as_str()).or_default().push(route.clone());
        }
        grouped
    }
}
