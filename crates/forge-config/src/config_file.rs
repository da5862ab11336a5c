//! Locating and reading `.forge-client.toml`

use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = ".forge-client.toml";

/// Content of a config file together with where it was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub content: String,
}

/// Places searched for the config file, in priority order
///
/// The working directory wins over `$HOME`, so a project can pin its own
/// timeouts and cache backend.
pub fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(home) = std::env::var_os("HOME") {
        candidates.push(Path::new(&home).join(CONFIG_FILE));
    }
    candidates
}

/// Load the first config file found in [`config_candidates`]
pub fn load_config_file() -> Option<LoadedConfig> {
    read_first(&config_candidates())
}

/// Read the first readable file of `candidates`
pub fn read_first(candidates: &[PathBuf]) -> Option<LoadedConfig> {
    candidates.iter().find_map(|path| match std::fs::read_to_string(path) {
        Ok(content) => Some(LoadedConfig {
            path: path.clone(),
            content,
        }),
        Err(e) => {
            log::trace!("No config at {}: {}", path.display(), e);
            None
        }
    })
}
