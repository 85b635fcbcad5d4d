//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the session route and relay routes
//! - Wire up middleware (request ID, tracing, panics, timeout, limits)
//! - Bind server to listener
//! - Stop gracefully on signal or `Shutdown` trigger

use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CACHE_CONTROL, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, MethodRouter},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::schema::HEALTH_PATH;
use crate::config::ProxyConfig;
use crate::http::relay::relay;
use crate::http::request::UuidRequestId;
use crate::http::response::{panic_response, ApiEnvelope};
use crate::routing::RouteTable;
use crate::upstream::{StatusPolicy, UpstreamClient, UpstreamError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
}

/// HTTP server for the session proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
    routes: RouteTable,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, UpstreamError> {
        // Every status is relayed, so the client must not fail on non-2xx
        let upstream = UpstreamClient::new(&config.upstream, &config.timeouts, StatusPolicy::AcceptAll)?;
        let routes = RouteTable::from_config(&config.routes);

        let state = AppState { upstream };
        let router = Self::build_router(&config, &routes, state);
        Ok(Self {
            router,
            config,
            routes,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, routes: &RouteTable, state: AppState) -> Router {
        let mut router = Router::new().route(HEALTH_PATH, get(health_handler));

        for (path, group) in routes.by_path() {
            let mut method_router: MethodRouter<AppState> = MethodRouter::new();
            for route in group {
                let filter = route.method_filter();
                let handler = move |State(state): State<AppState>, headers: HeaderMap, body: Bytes| {
                    let route = route.clone();
                    async move { relay(state, route, headers, body).await }
                };
                method_router = method_router.on(filter, handler);
            }
            router = router.route(path, method_router);
        }

        router
            .fallback(not_found_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(CatchPanicLayer::custom(panic_response))
                    .layer(RequestBodyLimitLayer::new(config.limits.max_body_size))
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
                    .layer(SetResponseHeaderLayer::if_not_present(
                        CACHE_CONTROL,
                        HeaderValue::from_static("no-store"),
                    )),
            )
    }

    /// Run the server until `shutdown` fires or the process is signalled.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            routes = self.routes.routes().len(),
            "HTTP server starting"
        );
        for route in self.routes.routes() {
            tracing::debug!(
                route = %route.name,
                method = %route.method,
                path = %route.path,
                upstream_path = %route.upstream_path,
                "Relay route registered"
            );
        }

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiEnvelope::failure("Not found", Value::Null)),
    )
}
