use forge_api_cache::CacheError;
use thiserror::Error;

/// Errors surfaced by forge clients
///
/// Non-2xx responses are not errors: they come back as a [`crate::Resource`]
/// with the status set. Only paging treats a non-200 page as fatal.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} fetching page {uri}")]
    UnexpectedStatus { uri: String, status: u16 },

    #[error("Invalid next-page link '{link}' on {uri}: {source}")]
    InvalidLink {
        uri: String,
        link: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Cache store failed: {0}")]
    Cache(#[from] CacheError),

    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("Failed to parse response body as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
