//! Cached JSON resources client (decorator pattern)
//!
//! Wraps any `JsonResources` implementation and turns its GET requests into
//! conditional GETs against a [`ResourceCacheStore`]. Callers keep using the
//! plain `JsonResources` interface and never see a `304`.

use crate::client::{Credential, JsonResources};
use crate::resource::Resource;
use crate::Result;
use forge_api_cache::ResourceCacheStore;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, IF_NONE_MATCH};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

const OK: u16 = 200;
const NOT_MODIFIED: u16 = 304;

/// Cached JSON resources client using the decorator pattern
///
/// # GET protocol
///
/// Per request URI:
///
/// - **no entry** - the request goes out unchanged; a `200` carrying an
///   `ETag` is stored.
/// - **entry with validator `E`** - the request carries `If-None-Match: E`.
///   - `304` with a cached body: a `200` with the cached body and the
///     headers of the `304` is returned.
///   - `304` without a cached body: one unconditional GET is sent and its
///     response returned (and stored if it is a `200` with an `ETag`).
///   - anything else is returned as is; a `200` with an `ETag` replaces
///     the entry.
///
/// ETags are never compared locally, the server decides whether content
/// changed.
///
/// # Mutations
///
/// POST, PATCH, PUT and DELETE pass straight through. They do not touch the
/// cache, so a GET after a mutation may still revalidate against the
/// pre-mutation validator until the server hands out a new one.
///
/// # Concurrency
///
/// The decorator holds no mutable state. Concurrent GETs for the same URI
/// are not coalesced: each may revalidate and store, last writer wins.
///
/// # Example
///
/// ```rust,no_run
/// use forge_api_cache::InMemoryCacheStore;
/// use forge_client::{CachedJsonResources, HttpClientConfig, HttpJsonResources, JsonResources};
/// use std::sync::Arc;
///
/// # fn example() -> forge_client::Result<()> {
/// let http = HttpJsonResources::new(HttpClientConfig::default())?;
/// let client = CachedJsonResources::new(http, Arc::new(InMemoryCacheStore::new()));
///
/// let uri = url::Url::parse("https://api.github.com/repos/rust-lang/rust").unwrap();
/// let first = client.get(&uri)?; // stored with its ETag
/// let second = client.get(&uri)?; // revalidated, 200 even on 304
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CachedJsonResources<C, S: ?Sized> {
    inner: C,
    store: Arc<S>,
}

impl<C: Clone, S: ?Sized> Clone for CachedJsonResources<C, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            store: Arc::clone(&self.store),
        }
    }
}

impl<C, S> CachedJsonResources<C, S>
where
    C: JsonResources,
    S: ResourceCacheStore + ?Sized,
{
    /// Create a new cached client
    ///
    /// # Arguments
    ///
    /// * `inner` - The client to delegate requests to
    /// * `store` - Cache store, may be shared with other decorators
    pub fn new(inner: C, store: Arc<S>) -> Self {
        Self { inner, store }
    }

    /// Get a reference to the inner client
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Get the shared cache store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// GET without a validator, storing a fresh `200` + `ETag`
    fn fetch_unconditional(&self, uri: &Url, mut headers: HeaderMap) -> Result<Resource> {
        headers.remove(IF_NONE_MATCH);
        let response = self.inner.get_with_headers(uri, headers)?;
        self.remember(uri, &response)?;
        Ok(response)
    }

    /// Store the response if it is a `200` carrying an `ETag`
    fn remember(&self, uri: &Url, response: &Resource) -> Result<()> {
        if response.status() != OK {
            return Ok(());
        }
        match response.etag() {
            Some(etag) => {
                self.store.store(uri.as_str(), etag, response.body())?;
                debug!("Cache STORE for {} (etag {})", uri, etag);
            }
            None => debug!("No ETag on {}, not caching", uri),
        }
        Ok(())
    }
}

impl<C, S> JsonResources for CachedJsonResources<C, S>
where
    C: JsonResources,
    S: ResourceCacheStore + ?Sized,
{
    fn get_with_headers(&self, uri: &Url, headers: HeaderMap) -> Result<Resource> {
        let lookup = self.store.lookup(uri.as_str())?;

        let Some(etag) = lookup.etag() else {
            debug!("Cache MISS for {}", uri);
            let response = self.inner.get_with_headers(uri, headers)?;
            self.remember(uri, &response)?;
            return Ok(response);
        };

        let mut conditional = headers.clone();
        match HeaderValue::from_str(etag) {
            Ok(value) => {
                conditional.insert(IF_NONE_MATCH, value);
            }
            Err(_) => {
                // A validator we cannot echo back is as good as none
                warn!("Cached ETag for {} is not a valid header value", uri);
                return self.fetch_unconditional(uri, headers);
            }
        }

        debug!("Revalidating {} with If-None-Match: {}", uri, etag);
        let response = self.inner.get_with_headers(uri, conditional)?;

        if response.status() != NOT_MODIFIED {
            self.remember(uri, &response)?;
            return Ok(response);
        }

        match lookup.body() {
            Some(body) => {
                debug!("Cache HIT for {} (304)", uri);
                Ok(response.derive(OK, body))
            }
            None => {
                warn!(
                    "304 for {} but no cached body, refetching unconditionally",
                    uri
                );
                self.fetch_unconditional(uri, headers)
            }
        }
    }

    // Mutations pass through to the inner client without caching

    fn post_with_headers(&self, uri: &Url, headers: HeaderMap, body: &Value) -> Result<Resource> {
        self.inner.post_with_headers(uri, headers, body)
    }

    fn patch(&self, uri: &Url, body: &Value) -> Result<Resource> {
        self.inner.patch(uri, body)
    }

    fn put(&self, uri: &Url, body: &Value) -> Result<Resource> {
        self.inner.put(uri, body)
    }

    fn delete(&self, uri: &Url, body: &Value) -> Result<Resource> {
        self.inner.delete(uri, body)
    }

    /// Authenticate the inner client; the cache store stays shared
    fn authenticated(&self, credential: Credential) -> Self {
        Self {
            inner: self.inner.authenticated(credential),
            store: Arc::clone(&self.store),
        }
    }
}
