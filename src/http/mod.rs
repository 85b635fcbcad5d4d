//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, route table)
//!     → request.rs (request ID, inbound Cookie extraction)
//!     → relay.rs (one upstream call, status/body/Set-Cookie relay)
//!     → response.rs (failure envelopes for 502 / 500)
//!     → Send to client
//! ```

pub mod relay;
pub mod request;
pub mod response;
pub mod server;

pub use request::{inbound_cookie, UuidRequestId, X_REQUEST_ID};
pub use response::{ApiEnvelope, ProxyError};
pub use server::{AppState, HttpServer};
