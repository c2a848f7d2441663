//! Storage key generation.

use std::fmt;

use uuid::Uuid;

/// Suffix of every stored object key.
pub const KEY_SUFFIX: &str = ".json";

/// Source of the unique part of an object key.
pub trait IdGenerator: Send + Sync + fmt::Debug {
    /// Return a new identifier, unique across calls.
    fn new_id(&self) -> String;
}

/// Time-ordered identifiers (UUIDv7).
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeOrderedIds;

impl IdGenerator for TimeOrderedIds {
    fn new_id(&self) -> String {
        Uuid::now_v7().to_string()
    }
}

/// Build the object key `[sid/]<id>.json`.
///
/// An empty or whitespace-only `sid` is treated as absent.
///
/// ```
/// use xmlintake_core::key::object_key;
///
/// assert_eq!(object_key(Some("s-1"), "abc"), "s-1/abc.json");
/// assert_eq!(object_key(None, "abc"), "abc.json");
/// ```
#[must_use]
pub fn object_key(sid: Option<&str>, id: &str) -> String {
    match sid.filter(|s| !s.trim().is_empty()) {
        Some(sid) => format!("{sid}/{id}{KEY_SUFFIX}"),
        None => format!("{id}{KEY_SUFFIX}"),
    }
}
