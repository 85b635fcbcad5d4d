//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     RelayRouteConfig[] + built-in session route
//!     → table.rs (RouteTable)
//!     → grouped by path into the axum Router
//!
//! Incoming Request (method, path)
//!     → axum exact-path dispatch
//!     → relay handler for the matched RelayRoute
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same input always matches same route

pub mod table;

pub use table::{RelayRoute, RouteTable};
