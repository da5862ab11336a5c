//! Client configuration
//!
//! Configuration loaded from .forge-client.toml file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// HTTP protocol version the transport is built for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolVersion {
    #[default]
    Http1,
    Http2,
}

/// Where cached responses are kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// No conditional GETs
    None,
    /// In-process map, gone on exit
    #[default]
    Memory,
    /// Directory on disk, survives restarts
    File,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,

    /// Directory for the file backend (defaults to the platform cache dir)
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl CacheConfig {
    /// Directory for the file backend
    pub fn resolve_dir(&self) -> Result<PathBuf> {
        match &self.dir {
            Some(dir) => Ok(dir.clone()),
            None => crate::paths::http_cache_dir(),
        }
    }
}

/// Client configuration loaded from .forge-client.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Total request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default)]
    pub http_version: ProtocolVersion,

    #[serde(default)]
    pub cache: CacheConfig,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("forge-client/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
            http_version: ProtocolVersion::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        if let Some(loaded) = crate::load_config_file() {
            match Self::from_toml_str(&loaded.content) {
                Ok(config) => {
                    log::info!("Loaded client config from {}", loaded.path.display());
                    return config;
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config file {}: {:#}",
                        loaded.path.display(),
                        e
                    );
                }
            }
        }

        log::debug!("Using default client config");
        Self::default()
    }

    /// Parse config from TOML content
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid client configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.connect_timeout_secs, 10);
        assert!(config.user_agent.starts_with("forge-client/"));
        assert_eq!(config.http_version, ProtocolVersion::Http1);
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert!(config.cache.dir.is_none());
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            timeout_secs = 5
            user_agent = "my-bot/1.0"
            http_version = "http2"

            [cache]
            backend = "file"
            dir = "/tmp/forge-cache"
        "#;
        let config = ClientConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.user_agent, "my-bot/1.0");
        assert_eq!(config.http_version, ProtocolVersion::Http2);
        assert_eq!(config.cache.backend, CacheBackend::File);
        assert_eq!(
            config.cache.resolve_dir().unwrap(),
            PathBuf::from("/tmp/forge-cache")
        );
        // connect_timeout_secs should use default
        assert_eq!(config.connect_timeout_secs, 10);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml = r#"
            [cache]
            backend = "none"
        "#;
        let config = ClientConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.cache.backend, CacheBackend::None);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.http_version, ProtocolVersion::Http1);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        assert!(ClientConfig::from_toml_str("timeout_secs = \"soon\"").is_err());
        assert!(ClientConfig::from_toml_str("[cache]\nbackend = \"redis\"").is_err());
    }
}
