//! Conditional GET against a local HTTP server

use forge_api_cache::{FileCacheStore, InMemoryCacheStore, ResourceCacheStore};
use forge_client::{
    CachedJsonResources, Credential, HttpClientConfig, HttpJsonResources, JsonResources, Url,
};
use mockito::Matcher;
use std::sync::Arc;

fn http() -> HttpJsonResources {
    HttpJsonResources::new(HttpClientConfig::default()).unwrap()
}

fn url(server: &mockito::ServerGuard, path: &str) -> Url {
    Url::parse(&format!("{}{}", server.url(), path)).unwrap()
}

#[test]
fn revalidates_and_answers_not_modified_from_cache() {
    let mut server = mockito::Server::new();
    let fresh = server
        .mock("GET", "/x")
        .match_header("if-none-match", Matcher::Missing)
        .with_status(200)
        .with_header("ETag", "\"v1\"")
        .with_body(r#"{"a":1}"#)
        .expect(1)
        .create();
    let not_modified = server
        .mock("GET", "/x")
        .match_header("if-none-match", "\"v1\"")
        .with_status(304)
        .with_header("ETag", "\"v1\"")
        .expect(1)
        .create();

    let store = Arc::new(InMemoryCacheStore::new());
    let client = CachedJsonResources::new(http(), Arc::clone(&store));
    let uri = url(&server, "/x");

    let first = client.get(&uri).unwrap();
    assert_eq!(first.status(), 200);
    assert_eq!(store.etag(uri.as_str()).unwrap().as_deref(), Some("\"v1\""));

    let second = client.get(&uri).unwrap();
    assert_eq!(second.status(), 200);
    assert_eq!(second.json_object().unwrap()["a"], 1);

    fresh.assert();
    not_modified.assert();
}

#[test]
fn changed_content_replaces_cache_entry() {
    let mut server = mockito::Server::new();
    let _fresh = server
        .mock("GET", "/x")
        .match_header("if-none-match", Matcher::Missing)
        .with_status(200)
        .with_header("ETag", "\"v1\"")
        .with_body(r#"{"a":1}"#)
        .create();

    let store = Arc::new(InMemoryCacheStore::new());
    let client = CachedJsonResources::new(http(), Arc::clone(&store));
    let uri = url(&server, "/x");

    // 200, cached
    client.get(&uri).unwrap();

    // 304, answered from cache
    let not_modified = server
        .mock("GET", "/x")
        .match_header("if-none-match", "\"v1\"")
        .with_status(304)
        .create();
    assert_eq!(client.get(&uri).unwrap().body(), r#"{"a":1}"#);
    not_modified.assert();
    not_modified.remove();

    // content changed on the server
    let changed = server
        .mock("GET", "/x")
        .match_header("if-none-match", "\"v1\"")
        .with_status(200)
        .with_header("ETag", "\"v2\"")
        .with_body(r#"{"a":2}"#)
        .create();
    let third = client.get(&uri).unwrap();

    assert_eq!(third.status(), 200);
    assert_eq!(third.body(), r#"{"a":2}"#);
    assert_eq!(store.etag(uri.as_str()).unwrap().as_deref(), Some("\"v2\""));
    assert_eq!(
        store.body(uri.as_str()).unwrap().as_deref(),
        Some(r#"{"a":2}"#)
    );
    changed.assert();
}

#[test]
fn repairs_cache_when_body_is_missing() {
    let mut server = mockito::Server::new();
    let conditional = server
        .mock("GET", "/x")
        .match_header("if-none-match", "\"v1\"")
        .with_status(304)
        .expect(1)
        .create();
    let unconditional = server
        .mock("GET", "/x")
        .match_header("if-none-match", Matcher::Missing)
        .with_status(200)
        .with_header("ETag", "\"v2\"")
        .with_body(r#"{"a":2}"#)
        .expect(1)
        .create();

    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileCacheStore::open(dir.path()).unwrap());
    let uri = url(&server, "/x");
    store.store(uri.as_str(), "\"v1\"", r#"{"a":1}"#).unwrap();
    for entry in std::fs::read_dir(dir.path().join("bodies")).unwrap() {
        std::fs::remove_file(entry.unwrap().path()).unwrap();
    }

    let client = CachedJsonResources::new(http(), Arc::clone(&store));
    let resource = client.get(&uri).unwrap();

    assert_eq!(resource.status(), 200);
    assert_eq!(resource.body(), r#"{"a":2}"#);
    assert_eq!(store.etag(uri.as_str()).unwrap().as_deref(), Some("\"v2\""));
    conditional.assert();
    unconditional.assert();
}

#[test]
fn authenticated_cached_client_sends_credential_and_validator() {
    let mut server = mockito::Server::new();
    let _fresh = server
        .mock("GET", "/me")
        .match_header("authorization", "token secret")
        .match_header("if-none-match", Matcher::Missing)
        .with_status(200)
        .with_header("etag", "W/\"abc\"")
        .with_body(r#"{"login":"octocat"}"#)
        .create();
    let revalidated = server
        .mock("GET", "/me")
        .match_header("authorization", "token secret")
        .match_header("if-none-match", "W/\"abc\"")
        .with_status(304)
        .expect(1)
        .create();

    let client = CachedJsonResources::new(http(), Arc::new(InMemoryCacheStore::new()))
        .authenticated(Credential::token("secret"));
    let uri = url(&server, "/me");

    client.get(&uri).unwrap();
    let me = client.get(&uri).unwrap();

    assert_eq!(me.status(), 200);
    assert_eq!(me.json_object().unwrap()["login"], "octocat");
    revalidated.assert();
}
