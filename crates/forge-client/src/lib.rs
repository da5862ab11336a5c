//! JSON-over-HTTP client for forge REST APIs with caching support
//!
//! This crate provides the request layer that GitHub-, GitLab- and
//! Bitbucket-style integrations build on: a trait-based client returning
//! plain response values, an optional conditional-GET cache, and lazy paging
//! over `Link` headers. The design follows the decorator pattern, allowing
//! caching to be composed with the base client.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              JsonResources trait                 │
//! │  - get() / get_with_headers()                    │
//! │  - post() / patch() / put() / delete()           │
//! │  - authenticated()                               │
//! └─────────────────────────────────────────────────┘
//!                        │
//!        ┌───────────────┴───────────────┐
//!        ▼                               ▼
//! ┌─────────────────┐         ┌─────────────────────┐
//! │HttpJsonResources│         │ CachedJsonResources │──► ResourceCacheStore
//! │ (reqwest)       │◄────────│ (decorator)         │
//! └─────────────────┘         └─────────────────────┘
//!
//!         ResourcePaging ──► any JsonResources, one GET per page
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use forge_api_cache::InMemoryCacheStore;
//! use forge_client::{
//!     CachedJsonResources, Credential, HttpClientConfig, HttpJsonResources, JsonResources,
//!     ResourcePaging,
//! };
//! use std::sync::Arc;
//!
//! # fn example() -> forge_client::Result<()> {
//! // One transport for the whole process
//! let http = HttpJsonResources::new(HttpClientConfig::default())?;
//!
//! // Cached and authenticated, layered independently
//! let client = CachedJsonResources::new(http, Arc::new(InMemoryCacheStore::new()))
//!     .authenticated(Credential::bearer("token"));
//!
//! let uri = url::Url::parse("https://api.github.com/repos/rust-lang/rust/labels").unwrap();
//! for page in ResourcePaging::new(&client, uri) {
//!     for label in page?.json_array()? {
//!         println!("{}", label["name"]);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod cached_client;
pub mod client;
pub mod credentials;
pub mod error;
pub mod http_client;
pub mod link;
pub mod paging;
pub mod resource;

#[cfg(test)]
mod testing;

pub use cached_client::CachedJsonResources;
pub use client::{Credential, JsonResources};
pub use credentials::CredentialResolver;
pub use error::{ClientError, Result};
pub use http_client::{HttpClientConfig, HttpJsonResources, HttpVersion, DEFAULT_USER_AGENT};
pub use paging::ResourcePaging;
pub use resource::{Headers, Resource};

// Re-export so consumers can build request headers without depending on reqwest
pub use reqwest::header;
pub use url::Url;
