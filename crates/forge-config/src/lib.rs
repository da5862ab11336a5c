//! Configuration and directory paths for forge API clients
//!
//! This crate provides:
//! - Cache directory paths
//! - Configuration file loading (TOML)
//! - Client configuration (ClientConfig)

pub mod client_config;
pub mod config_file;
pub mod paths;

pub use client_config::{CacheBackend, CacheConfig, ClientConfig, ProtocolVersion};
pub use config_file::{load_config_file, LoadedConfig};
pub use paths::{cache_dir, http_cache_dir};
