//! JSON resources trait and credentials
//!
//! This module defines the core `JsonResources` trait that every client
//! implementation satisfies, as well as the `Credential` type used to bind
//! a client to an identity.

use crate::{ClientError, Resource, Result};
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::fmt;
use url::Url;

/// JSON-over-HTTP client trait
///
/// All requests of the forge integrations flow through this interface.
/// Implementations can be direct (hitting the network) or decorated with
/// caching, see [`crate::CachedJsonResources`].
///
/// # Status codes
///
/// No method fails because of the response status. A `404` or `500` is
/// returned as a [`Resource`] like any other response; callers interpret
/// the status. Errors are reserved for transport failures (connection
/// refused, timeout, interrupted transfer) and are never retried here.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; a client is built once and shared.
///
/// # Example
///
/// ```rust,ignore
/// use forge_client::JsonResources;
///
/// fn repo_name(client: &dyn JsonResources, uri: &url::Url) -> forge_client::Result<String> {
///     let repo = client.get(uri)?;
///     Ok(repo.json_object()?["full_name"].to_string())
/// }
/// ```
pub trait JsonResources: Send + Sync {
    /// GET `uri` with extra request headers
    fn get_with_headers(&self, uri: &Url, headers: HeaderMap) -> Result<Resource>;

    /// POST a JSON body to `uri` with extra request headers
    fn post_with_headers(&self, uri: &Url, headers: HeaderMap, body: &Value) -> Result<Resource>;

    /// PATCH a JSON body to `uri`
    fn patch(&self, uri: &Url, body: &Value) -> Result<Resource>;

    /// PUT a JSON body to `uri`
    fn put(&self, uri: &Url, body: &Value) -> Result<Resource>;

    /// DELETE `uri`, sending a JSON body
    fn delete(&self, uri: &Url, body: &Value) -> Result<Resource>;

    /// An equivalent client whose every request carries `credential`
    ///
    /// The returned client shares no mutable state with `self`; the
    /// original keeps sending its own credential (or none).
    fn authenticated(&self, credential: Credential) -> Self
    where
        Self: Sized;

    /// GET `uri`
    fn get(&self, uri: &Url) -> Result<Resource> {
        self.get_with_headers(uri, HeaderMap::new())
    }

    /// POST a JSON body to `uri`
    fn post(&self, uri: &Url, body: &Value) -> Result<Resource> {
        self.post_with_headers(uri, HeaderMap::new(), body)
    }
}

/// A header that authenticates requests
///
/// Opaque to the caching layer. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    header_name: String,
    header_value: String,
}

impl Credential {
    pub fn new(header_name: impl Into<String>, header_value: impl Into<String>) -> Self {
        Self {
            header_name: header_name.into(),
            header_value: header_value.into(),
        }
    }

    /// `Authorization: Bearer <token>`
    pub fn bearer(token: &str) -> Self {
        Self::new("Authorization", format!("Bearer {}", token))
    }

    /// `Authorization: token <token>` (classic GitHub personal tokens)
    pub fn token(token: &str) -> Self {
        Self::new("Authorization", format!("token {}", token))
    }

    /// `Authorization: Basic <base64(user:password)>`
    pub fn basic(user: &str, password: &str) -> Self {
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(format!("{}:{}", user, password));
        Self::new("Authorization", format!("Basic {}", encoded))
    }

    /// `PRIVATE-TOKEN: <token>` (GitLab personal access tokens)
    pub fn private_token(token: &str) -> Self {
        Self::new("PRIVATE-TOKEN", token)
    }

    pub fn header_name(&self) -> &str {
        &self.header_name
    }

    pub fn header_value(&self) -> &str {
        &self.header_value
    }

    /// Encode as a request header, marking the value sensitive
    pub fn to_header(&self) -> Result<(HeaderName, HeaderValue)> {
        let name = HeaderName::from_bytes(self.header_name.as_bytes()).map_err(|e| {
            ClientError::InvalidHeader {
                name: self.header_name.clone(),
                reason: e.to_string(),
            }
        })?;
        let mut value =
            HeaderValue::from_str(&self.header_value).map_err(|e| ClientError::InvalidHeader {
                name: self.header_name.clone(),
                reason: e.to_string(),
            })?;
        value.set_sensitive(true);
        Ok((name, value))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("header_name", &self.header_name)
            .field("header_value", &"<redacted>")
            .finish()
    }
}
