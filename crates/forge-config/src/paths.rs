//! Cache directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.cache/forge-client/`
//! - macOS: `~/Library/Caches/forge-client/`
//! - Windows: `%LOCALAPPDATA%\forge-client\`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "forge-client";

/// Get the application cache directory, creating it if needed
pub fn cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine cache directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create cache directory {}", dir.display()))?;
    Ok(dir)
}

/// Default directory of the file-backed HTTP response cache
pub fn http_cache_dir() -> Result<PathBuf> {
    Ok(cache_dir()?.join("http"))
}
