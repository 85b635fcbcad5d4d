//! Upstream backend subsystem.
//!
//! # Data Flow
//! ```text
//! Relay handler
//!     → client.rs (one call, cookie attached, explicit status policy)
//!     → UpstreamResponse { status, headers, body } or UpstreamError
//! ```

pub mod client;

pub use client::{StatusPolicy, UpstreamClient, UpstreamError, UpstreamRequest, UpstreamResponse};
