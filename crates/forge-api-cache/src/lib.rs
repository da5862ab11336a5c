//! Response cache stores for conditional GET requests
//!
//! A store remembers, per request URI, the last `ETag` a server handed out
//! together with the response body that came with it. The client crate uses
//! it to send `If-None-Match` and to answer `304 Not Modified` from cache.
//!
//! # Backends
//!
//! - [`InMemoryCacheStore`] - concurrent map, lives as long as the process
//! - [`FileCacheStore`] - index plus one body file per URI on disk
//!
//! Both implement [`ResourceCacheStore`], so callers never depend on the
//! concrete backend.
//!
//! # Example
//!
//! ```rust
//! use forge_api_cache::{CacheLookup, InMemoryCacheStore, ResourceCacheStore};
//!
//! let store = InMemoryCacheStore::new();
//! store.store("https://api.example/x", "\"v1\"", "{\"a\":1}").unwrap();
//!
//! match store.lookup("https://api.example/x").unwrap() {
//!     CacheLookup::Hit(entry) => assert_eq!(entry.etag, "\"v1\""),
//!     other => panic!("unexpected lookup result: {:?}", other),
//! }
//! ```

mod error;
mod file;
mod memory;
mod store;

pub use error::{CacheError, Result};
pub use file::FileCacheStore;
pub use memory::InMemoryCacheStore;
pub use store::{CacheEntry, CacheLookup, ResourceCacheStore};
