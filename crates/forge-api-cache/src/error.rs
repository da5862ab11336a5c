use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a cache store
///
/// A store that cannot answer must say so: callers treat these as fatal
/// instead of silently falling back to a cache miss.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize cache index: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt cache index at {path}: {reason}")]
    CorruptIndex { path: PathBuf, reason: String },
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CacheError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
