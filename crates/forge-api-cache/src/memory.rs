//! In-memory cache store

use crate::{CacheEntry, CacheLookup, ResourceCacheStore, Result};
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Cache store backed by a concurrent in-memory map
///
/// Entries live for the lifetime of the store: there is no eviction, no TTL
/// and no size bound.
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of URIs with a cached entry
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl ResourceCacheStore for InMemoryCacheStore {
    fn lookup(&self, uri: &str) -> Result<CacheLookup> {
        Ok(match self.entries.read().get(uri) {
            Some(entry) => CacheLookup::Hit(entry.clone()),
            None => CacheLookup::Miss,
        })
    }

    fn store(&self, uri: &str, etag: &str, body: &str) -> Result<()> {
        let entry = CacheEntry {
            etag: etag.to_string(),
            body: body.to_string(),
        };
        self.entries.write().insert(uri.to_string(), entry);
        debug!("Cached {} (etag {})", uri, etag);
        Ok(())
    }
}
