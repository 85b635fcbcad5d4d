//! Session proxy library.
//!
//! Relays a browser's session cookies to an upstream authentication backend
//! and relays the backend's status, JSON body and `Set-Cookie` headers back.

pub mod config;
pub mod cookies;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
