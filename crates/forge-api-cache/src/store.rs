//! Cache store contract
//!
//! Defines the `ResourceCacheStore` trait every backend implements and the
//! types it hands back to callers.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A cached response: the validator and the body it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The `ETag` value exactly as the server sent it (quotes included)
    pub etag: String,
    /// The serialized response body
    pub body: String,
}

/// Outcome of looking up a URI in a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// Nothing is known about this URI
    Miss,
    /// Validator and body are both available
    Hit(CacheEntry),
    /// A validator is on record but its body is gone
    ///
    /// Backends that keep bodies apart from the index can end up here, e.g.
    /// when a body file was removed behind the store's back.
    EtagOnly { etag: String },
}

impl CacheLookup {
    /// The validator on record, if any
    pub fn etag(&self) -> Option<&str> {
        match self {
            CacheLookup::Miss => None,
            CacheLookup::Hit(entry) => Some(&entry.etag),
            CacheLookup::EtagOnly { etag } => Some(etag),
        }
    }

    /// The cached body, if any
    pub fn body(&self) -> Option<&str> {
        match self {
            CacheLookup::Hit(entry) => Some(&entry.body),
            _ => None,
        }
    }

    pub fn is_miss(&self) -> bool {
        matches!(self, CacheLookup::Miss)
    }
}

/// Key-value store of `(etag, body)` pairs keyed by request URI
///
/// # Thread Safety
///
/// Implementations must tolerate concurrent calls for the same or different
/// URIs without any external locking. Writes replace the whole entry, so
/// concurrent writers for one URI resolve as last-writer-wins.
///
/// # Errors
///
/// A backend that fails to read or write (I/O, corrupt data) returns an
/// error. It must never report such a failure as a miss.
pub trait ResourceCacheStore: Send + Sync {
    /// Look up everything known about `uri`
    fn lookup(&self, uri: &str) -> Result<CacheLookup>;

    /// Record `etag` and `body` for `uri`, replacing any previous entry
    fn store(&self, uri: &str, etag: &str, body: &str) -> Result<()>;

    /// The last known `ETag` for `uri`
    fn etag(&self, uri: &str) -> Result<Option<String>> {
        Ok(self.lookup(uri)?.etag().map(str::to_string))
    }

    /// The last known body for `uri`
    fn body(&self, uri: &str) -> Result<Option<String>> {
        Ok(self.lookup(uri)?.body().map(str::to_string))
    }
}

impl<S: ResourceCacheStore + ?Sized> ResourceCacheStore for Arc<S> {
    fn lookup(&self, uri: &str) -> Result<CacheLookup> {
        (**self).lookup(uri)
    }

    fn store(&self, uri: &str, etag: &str, body: &str) -> Result<()> {
        (**self).store(uri, etag, body)
    }
}

impl<S: ResourceCacheStore + ?Sized> ResourceCacheStore for Box<S> {
    fn lookup(&self, uri: &str) -> Result<CacheLookup> {
        (**self).lookup(uri)
    }

    fn store(&self, uri: &str, etag: &str, body: &str) -> Result<()> {
        (**self).store(uri, etag, body)
    }
}
