//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, Response, Uri},
    Router,
};
use session_proxy::config::ProxyConfig;
use session_proxy::http::HttpServer;
use session_proxy::lifecycle::Shutdown;
use tokio::net::TcpListener;

/// What the mock upstream answers.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub body: Option<String>,
    pub set_cookies: Vec<HeaderValue>,
    pub delay: Option<Duration>,
}

impl MockReply {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            body: Some(body.to_string()),
            set_cookies: Vec::new(),
            delay: None,
        }
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            body: Some(body.to_string()),
            set_cookies: Vec::new(),
            delay: None,
        }
    }

    pub fn empty(status: u16) -> Self {
        Self {
            status,
            body: None,
            set_cookies: Vec::new(),
            delay: None,
        }
    }

    pub fn with_cookie(mut self, cookie: &str) -> Self {
        self.set_cookies.push(HeaderValue::from_str(cookie).unwrap());
        self
    }

    /// A cookie line with arbitrary bytes, e.g. Latin-1 obs-text.
    pub fn with_cookie_bytes(mut self, cookie: &[u8]) -> Self {
        self.set_cookies.push(HeaderValue::from_bytes(cookie).unwrap());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// A request as seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub cookies: Vec<String>,
    pub content_type: Option<String>,
    pub body: String,
}

type ReplyFn = dyn Fn() -> MockReply + Send + Sync;

struct MockState {
    reply: Box<ReplyFn>,
    seen: Mutex<Vec<Recorded>>,
}

/// Handle to a running mock upstream.
#[derive(Clone)]
pub struct MockUpstream {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.seen.lock().unwrap().clone()
    }
}

/// Start a programmable upstream on an ephemeral port.
pub async fn start_upstream<F>(reply: F) -> MockUpstream
where
    F: Fn() -> MockReply + Send + Sync + 'static,
{
    let state = Arc::new(MockState {
        reply: Box::new(reply),
        seen: Mutex::new(Vec::new()),
    });

    let app = Router::new().fallback(upstream_handler).with_state(state.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, state }
}

async fn upstream_handler(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response<Body> {
    state.seen.lock().unwrap().push(Recorded {
        method,
        path: uri.path().to_string(),
        cookies: headers
            .get_all(header::COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect(),
        content_type: headers
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string()),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let reply = (state.reply)();
    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }

    let mut builder = Response::builder().status(reply.status);
    for cookie in &reply.set_cookies {
        builder = builder.header(header::SET_COOKIE, cookie.clone());
    }
    match reply.body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// An address nothing listens on.
pub async fn dead_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Default config pointed at `upstream_base_url`.
pub fn config_for(upstream_base_url: &str) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.upstream.base_url = upstream_base_url.to_string();
    config
}

/// Handle to a running proxy.
pub struct RunningProxy {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl RunningProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RunningProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the proxy on an ephemeral port.
pub async fn start_proxy(mut config: ProxyConfig) -> RunningProxy {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config).unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    RunningProxy { addr, shutdown }
}

/// Test client: no system proxy, no redirects.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// Every `Set-Cookie` line on a response, in order.
pub fn set_cookies(res: &reqwest::Response) -> Vec<String> {
    res.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

/// Every `Set-Cookie` line on a response as raw bytes, in order.
pub fn set_cookie_bytes(res: &reqwest::Response) -> Vec<Vec<u8>> {
    res.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.as_bytes().to_vec())
        .collect()
}
