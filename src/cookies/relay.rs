//! `Set-Cookie` extraction and relay.
//!
//! Strategies are tried in order and the first non-empty one wins:
//! 1. the container's multi-value accessor
//! 2. a `set-cookie` field holding a list
//! 3. a `set-cookie` field holding a single string
//!
//! Values are appended one header line per cookie. Merging them into one
//! comma-joined line would corrupt `Expires=` attributes on the client.
//! Accessor values are raw header values and pass through byte-for-byte;
//! only legacy string fields are checked for header legality.

use axum::http::{header::SET_COOKIE, HeaderMap, HeaderValue};

use crate::cookies::bag::{FieldValue, HeaderBag};

/// Extract every `Set-Cookie` value from `bag`, preserving order and content.
///
/// An absent container yields no cookies. Legacy string values that are not
/// legal header values are skipped with a warning.
pub fn extract_set_cookies<B>(bag: Option<&B>) -> Vec<HeaderValue>
where
    B: HeaderBag + ?Sized,
{
    let Some(bag) = bag else {
        return Vec::new();
    };

    if let Some(cookies) = bag.set_cookies().filter(|c| !c.is_empty()) {
        return cookies;
    }

    let values = match bag.field(SET_COOKIE.as_str()) {
        Some(FieldValue::Multi(values)) => values,
        Some(FieldValue::Single(value)) => vec![value],
        None => return Vec::new(),
    };
    values.iter().map(String::as_str).filter_map(legacy_value).collect()
}

fn legacy_value(cookie: &str) -> Option<HeaderValue> {
    match HeaderValue::from_str(cookie) {
        Ok(value) => Some(value),
        Err(_) => {
            // Never log the value itself, it carries session secrets.
            tracing::warn!(len = cookie.len(), "Skipping Set-Cookie value that is not a legal header value");
            None
        }
    }
}

/// Append every cookie found on `upstream` to `target` and return how many
/// were relayed.
///
/// Existing `Set-Cookie` lines on `target` are left in place.
pub fn relay_set_cookies<B>(upstream: Option<&B>, target: &mut HeaderMap) -> usize
where
    B: HeaderBag + ?Sized,
{
    let cookies = extract_set_cookies(upstream);
    let relayed = cookies.len();
    for cookie in cookies {
        target.append(SET_COOKIE, cookie);
    }
    relayed
}
