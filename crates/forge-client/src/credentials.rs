//! Credential lookup for forge hosts
//!
//! Resolves a token from the environment. Interactive login flows are not
//! handled here.

use crate::Credential;
use log::debug;

/// Generic token variable, used when no host-specific one is set
pub const DEFAULT_TOKEN_VAR: &str = "FORGE_TOKEN";

/// Resolves credentials for forge hosts
///
/// Tries, in order:
/// 1. Host-specific env var (e.g., `FORGE_TOKEN_GITLAB_EXAMPLE_COM`)
/// 2. Generic `FORGE_TOKEN`
///
/// Tokens are sent as `Authorization: Bearer <token>`, which GitHub, GitLab
/// and Bitbucket all accept for personal access tokens.
#[derive(Debug, Clone, Default)]
pub struct CredentialResolver;

impl CredentialResolver {
    pub fn new() -> Self {
        Self
    }

    /// Credential for `host` from the process environment
    pub fn resolve(&self, host: &str) -> Option<Credential> {
        self.resolve_with(host, |key| std::env::var(key).ok())
    }

    /// Credential for `host` using `lookup` instead of the environment
    pub fn resolve_with(
        &self,
        host: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Option<Credential> {
        let host_key = env_key(host);
        if let Some(token) = lookup(&host_key).filter(|t| !t.trim().is_empty()) {
            debug!("Using token from {} for host {}", host_key, host);
            return Some(Credential::bearer(token.trim()));
        }

        if let Some(token) = lookup(DEFAULT_TOKEN_VAR).filter(|t| !t.trim().is_empty()) {
            debug!("Using token from {} for host {}", DEFAULT_TOKEN_VAR, host);
            return Some(Credential::bearer(token.trim()));
        }

        debug!("No token found for host {}", host);
        None
    }
}

/// Host-specific env var name: `FORGE_TOKEN_` + host upper-cased, `.`/`-` as `_`
pub fn env_key(host: &str) -> String {
    format!(
        "{}_{}",
        DEFAULT_TOKEN_VAR,
        host.replace(['.', '-'], "_").to_uppercase()
    )
}
