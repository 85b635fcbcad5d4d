//! Cookie relay subsystem.
//!
//! # Data Flow
//! ```text
//! Upstream response headers (any shape)
//!     → bag.rs (HeaderBag: multi-value accessor / case-insensitive field)
//!     → relay.rs (ordered extraction strategies)
//!     → appended to the outgoing response, one Set-Cookie line per cookie
//! ```
//!
//! # Design Decisions
//! - Count, order and bytes of every cookie are preserved
//! - Append, never insert: multiple cookies are never merged into one line
//! - Cookie values are never logged

pub mod bag;
pub mod relay;

pub use bag::{FieldValue, HeaderBag, LegacyHeaders};
pub use relay::{extract_set_cookies, relay_set_cookies};
