mod logger;

use anyhow::{bail, Context, Result};
use clap::Parser;
use forge_api_cache::{FileCacheStore, InMemoryCacheStore, ResourceCacheStore};
use forge_client::{
    CachedJsonResources, Credential, CredentialResolver, HttpClientConfig, HttpJsonResources,
    HttpVersion, JsonResources, Resource, ResourcePaging, Url,
};
use forge_config::{CacheBackend, ClientConfig, ProtocolVersion};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "forge-fetch")]
#[command(about = "Fetch JSON resources from a forge REST API, revalidating with ETags")]
#[command(version)]
struct Args {
    /// Resource URL to fetch
    url: Url,

    /// Follow `Link: rel="next"` headers and print every page
    #[arg(long)]
    all_pages: bool,

    /// Stop after this many pages (implies --all-pages)
    #[arg(long)]
    max_pages: Option<usize>,

    /// Bearer token (falls back to FORGE_TOKEN_<HOST>)
    #[arg(long, env = "FORGE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Send plain GETs without the response cache
    #[arg(long)]
    no_cache: bool,
}

fn http_config(config: &ClientConfig) -> HttpClientConfig {
    HttpClientConfig {
        timeout: Duration::from_secs(config.timeout_secs),
        connect_timeout: Duration::from_secs(config.connect_timeout_secs),
        user_agent: config.user_agent.clone(),
        http_version: match config.http_version {
            ProtocolVersion::Http1 => HttpVersion::Http1,
            ProtocolVersion::Http2 => HttpVersion::Http2,
        },
    }
}

/// Cache store for the configured backend, `None` when caching is off
fn open_store(
    config: &ClientConfig,
    no_cache: bool,
) -> Result<Option<Arc<dyn ResourceCacheStore>>> {
    if no_cache {
        return Ok(None);
    }
    let store: Arc<dyn ResourceCacheStore> = match config.cache.backend {
        CacheBackend::None => return Ok(None),
        CacheBackend::Memory => Arc::new(InMemoryCacheStore::new()),
        CacheBackend::File => {
            let dir = config.cache.resolve_dir()?;
            log::debug!("Using file cache at {}", dir.display());
            Arc::new(
                FileCacheStore::open(&dir)
                    .with_context(|| format!("Failed to open cache at {}", dir.display()))?,
            )
        }
    };
    Ok(Some(store))
}

fn credential(args: &Args) -> Option<Credential> {
    if let Some(token) = args.token.as_deref().filter(|t| !t.trim().is_empty()) {
        return Some(Credential::bearer(token.trim()));
    }
    args.url
        .host_str()
        .and_then(|host| CredentialResolver::new().resolve(host))
}

fn print_page(page: &Resource) -> Result<()> {
    println!("HTTP {}", page.status());
    match page.json() {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        // Error pages are not always JSON
        Err(_) => println!("{}", page.body()),
    }
    Ok(())
}

fn fetch(client: &dyn JsonResources, args: &Args) -> Result<()> {
    if !args.all_pages && args.max_pages.is_none() {
        let resource = client.get(&args.url)?;
        print_page(&resource)?;
        if !resource.is_success() {
            bail!("{} answered with status {}", args.url, resource.status());
        }
        return Ok(());
    }

    let limit = args.max_pages.unwrap_or(usize::MAX);
    for page in ResourcePaging::new(client, args.url.clone()).take(limit) {
        print_page(&page?)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    logger::init();

    let args = Args::parse();
    let config = ClientConfig::load();

    let http =
        HttpJsonResources::new(http_config(&config)).context("Failed to build HTTP client")?;
    let credential = credential(&args);
    if credential.is_none() {
        log::info!("No token configured, sending anonymous requests");
    }

    match open_store(&config, args.no_cache)? {
        Some(store) => {
            let mut client = CachedJsonResources::new(http, store);
            if let Some(credential) = credential {
                client = client.authenticated(credential);
            }
            fetch(&client, &args)
        }
        None => {
            let mut client = http;
            if let Some(credential) = credential {
                client = client.authenticated(credential);
            }
            fetch(&client, &args)
        }
    }
}
