//! Header container abstraction.
//!
//! Upstream responses reach the relay in different shapes: the HTTP stack's
//! `HeaderMap` keeps every `Set-Cookie` line separate, while legacy
//! name→value maps store either one string or a list per field name.
//! `HeaderBag` hides the difference behind two optional accessors.

use std::collections::BTreeMap;

use axum::http::{header::SET_COOKIE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

/// Value stored under one field name of a legacy header map.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Multi(Vec<String>),
}

/// A collection of response headers the cookie relay can read from.
pub trait HeaderBag {
    /// Multi-value `Set-Cookie` accessor, in arrival order.
    ///
    /// Values are raw header values, so bytes outside UTF-8 (obs-text) survive.
    /// `None` means the container has no such accessor.
    fn set_cookies(&self) -> Option<Vec<HeaderValue>> {
        None
    }

    /// Case-insensitive lookup of a header field.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

impl HeaderBag for HeaderMap {
    fn set_cookies(&self) -> Option<Vec<HeaderValue>> {
        Some(self.get_all(SET_COOKIE).iter().cloned().collect())
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        let mut values: Vec<String> = self
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_owned))
            .collect();
        match values.len() {
            0 => None,
            1 => values.pop().map(FieldValue::Single),
            _ => Some(FieldValue::Multi(values)),
        }
    }
}

/// Name→value header map as produced by clients that do not keep repeated
/// headers apart. Field names keep their original case; lookups ignore it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct LegacyHeaders {
    fields: BTreeMap<String, FieldValue>,
}

impl LegacyHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any field whose name differs only in case.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        self.fields.retain(|k, _| !k.eq_ignore_ascii_case(&name));
        self.fields.insert(name, value);
    }

    pub fn with(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.insert(name, value);
        self
    }
}

impl HeaderBag for LegacyHeaders {
    fn field(&self, name: &str) -> Option<FieldValue> {
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    }
}
