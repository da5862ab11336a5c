//! reqwest-based JSON resources client
//!
//! Direct implementation of the `JsonResources` trait on top of a blocking
//! reqwest client. This client makes real HTTP calls without any caching.

use crate::client::{Credential, JsonResources};
use crate::resource::{Headers, Resource};
use crate::Result;
use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Default user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("forge-client/", env!("CARGO_PKG_VERSION"));

/// HTTP protocol the transport is built for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HttpVersion {
    /// HTTP/1.1 only
    #[default]
    Http1,
    /// HTTP/2 with prior knowledge
    Http2,
}

/// Transport settings for [`HttpJsonResources`]
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
    pub http_version: HttpVersion,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http_version: HttpVersion::default(),
        }
    }
}

/// Direct JSON resources client using reqwest
///
/// This is the base implementation that talks to the network. It can be
/// wrapped by [`crate::CachedJsonResources`] to add conditional GETs.
///
/// The underlying reqwest client is built once in [`HttpJsonResources::new`]
/// and shared (connection pool included) by clones and by
/// [`JsonResources::authenticated`] derivatives. It is torn down when the
/// last handle is dropped.
#[derive(Debug, Clone)]
pub struct HttpJsonResources {
    client: Arc<Client>,
    credential: Option<Credential>,
}

impl HttpJsonResources {
    /// Build the transport from `config`
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.as_str());

        builder = match config.http_version {
            HttpVersion::Http1 => builder.http1_only(),
            HttpVersion::Http2 => builder.http2_prior_knowledge(),
        };

        let client = builder.build()?;
        info!(
            "Created HTTP client ({:?}, timeout {:?})",
            config.http_version, config.timeout
        );

        Ok(Self::from_client(client))
    }

    /// Wrap an already configured reqwest client
    pub fn from_client(client: Client) -> Self {
        Self {
            client: Arc::new(client),
            credential: None,
        }
    }

    /// The credential this client sends, if any
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    fn request(
        &self,
        method: Method,
        uri: &Url,
        headers: HeaderMap,
        body: Option<&Value>,
    ) -> Result<Resource> {
        debug!("{} {}", method, uri);

        let mut request_headers = HeaderMap::new();
        request_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        request_headers.extend(headers);
        if let Some(credential) = &self.credential {
            let (name, value) = credential.to_header()?;
            request_headers.insert(name, value);
        }

        let mut request = self
            .client
            .request(method.clone(), uri.clone())
            .headers(request_headers);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send()?;
        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response.text()?;

        debug!("{} {} -> {}", method, uri, status);
        Ok(Resource::new(status, body, headers))
    }
}

impl JsonResources for HttpJsonResources {
    fn get_with_headers(&self, uri: &Url, headers: HeaderMap) -> Result<Resource> {
        self.request(Method::GET, uri, headers, None)
    }

    fn post_with_headers(&self, uri: &Url, headers: HeaderMap, body: &Value) -> Result<Resource> {
        self.request(Method::POST, uri, headers, Some(body))
    }

    fn patch(&self, uri: &Url, body: &Value) -> Result<Resource> {
        self.request(Method::PATCH, uri, HeaderMap::new(), Some(body))
    }

    fn put(&self, uri: &Url, body: &Value) -> Result<Resource> {
        self.request(Method::PUT, uri, HeaderMap::new(), Some(body))
    }

    fn delete(&self, uri: &Url, body: &Value) -> Result<Resource> {
        self.request(Method::DELETE, uri, HeaderMap::new(), Some(body))
    }

    fn authenticated(&self, credential: Credential) -> Self {
        Self {
            client: Arc::clone(&self.client),
            credential: Some(credential),
        }
    }
}

/// Convert reqwest headers into the resource header map
///
/// Values that are not valid UTF-8 are converted lossily.
fn collect_headers(headers: &HeaderMap) -> Headers {
    let mut collected = Headers::new();
    for (name, value) in headers {
        collected
            .entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client() -> HttpJsonResources {
        HttpJsonResources::new(HttpClientConfig::default()).unwrap()
    }

    fn url(server: &mockito::ServerGuard, path: &str) -> Url {
        Url::parse(&format!("{}{}", server.url(), path)).unwrap()
    }

    #[test]
    fn test_collect_headers_keeps_every_value() {
        let mut headers = HeaderMap::new();
        headers.append("link", HeaderValue::from_static("<a>; rel=\"next\""));
        headers.append("link", HeaderValue::from_static("<b>; rel=\"last\""));
        headers.insert("etag", HeaderValue::from_static("\"v1\""));

        let collected = collect_headers(&headers);
        assert_eq!(collected["link"].len(), 2);
        assert_eq!(collected["etag"], vec!["\"v1\"".to_string()]);
    }

    #[test]
    fn test_get_returns_status_body_and_headers() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/x")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("ETag", "\"v1\"")
            .with_body(r#"{"a":1}"#)
            .create();

        let resource = client().get(&url(&server, "/x")).unwrap();

        mock.assert();
        assert_eq!(resource.status(), 200);
        assert_eq!(resource.etag(), Some("\"v1\""));
        assert_eq!(resource.json_object().unwrap()["a"], 1);
    }

    #[test]
    fn test_error_status_is_not_an_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body(r#"{"message":"Not Found"}"#)
            .create();

        let resource = client().get(&url(&server, "/missing")).unwrap();
        assert_eq!(resource.status(), 404);
        assert!(!resource.is_success());
    }

    #[test]
    fn test_get_with_headers_sends_them() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/x")
            .match_header("cache-control", "no-cache")
            .with_status(200)
            .with_body("[]")
            .create();

        let mut headers = HeaderMap::new();
        headers.insert("Cache-Control", HeaderValue::from_static("no-cache"));
        client()
            .get_with_headers(&url(&server, "/x"), headers)
            .unwrap();

        mock.assert();
    }

    #[test]
    fn test_mutating_verbs_send_json_body() {
        let mut server = mockito::Server::new();
        let body = json!({"title": "hello"});
        let mut mocks = Vec::new();
        for method in ["POST", "PATCH", "PUT", "DELETE"] {
            mocks.push(
                server
                    .mock(method, "/items")
                    .match_header("content-type", "application/json")
                    .match_body(Matcher::Json(body.clone()))
                    .with_status(201)
                    .with_body(r#"{"id":1}"#)
                    .create(),
            );
        }

        let client = client();
        let uri = url(&server, "/items");
        assert_eq!(client.post(&uri, &body).unwrap().status(), 201);
        assert_eq!(client.patch(&uri, &body).unwrap().status(), 201);
        assert_eq!(client.put(&uri, &body).unwrap().status(), 201);
        assert_eq!(client.delete(&uri, &body).unwrap().status(), 201);

        for mock in mocks {
            mock.assert();
        }
    }

    #[test]
    fn test_authenticated_sends_credential_and_leaves_original_alone() {
        let mut server = mockito::Server::new();
        let with_auth = server
            .mock("GET", "/me")
            .match_header("authorization", "Bearer abc")
            .with_status(200)
            .with_body("{}")
            .expect(1)
            .create();
        let without_auth = server
            .mock("GET", "/me")
            .match_header("authorization", Matcher::Missing)
            .with_status(401)
            .expect(1)
            .create();

        let anonymous = client();
        let authenticated = anonymous.authenticated(Credential::bearer("abc"));
        let uri = url(&server, "/me");

        assert_eq!(authenticated.get(&uri).unwrap().status(), 200);
        assert_eq!(anonymous.get(&uri).unwrap().status(), 401);
        assert!(anonymous.credential().is_none());

        with_auth.assert();
        without_auth.assert();
    }

    #[test]
    fn test_connection_refused_is_a_transport_error() {
        // nothing listens on port 1
        let uri = Url::parse("http://127.0.0.1:1/x").unwrap();
        let err = client().get(&uri).unwrap_err();
        assert!(matches!(err, crate::ClientError::Transport(_)));
    }
}
