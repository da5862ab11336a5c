//! Scripted `JsonResources` used by unit tests

use crate::client::{Credential, JsonResources};
use crate::resource::{Headers, Resource};
use crate::{ClientError, Result};
use parking_lot::Mutex;
use reqwest::header::HeaderMap;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use url::Url;

/// A request as seen by the scripted client
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub uri: String,
    pub headers: HeaderMap,
    pub credential: Option<Credential>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Debug, Default)]
struct Script {
    responses: HashMap<String, VecDeque<Resource>>,
    requests: Vec<RecordedRequest>,
}

/// Answers each request with the next scripted response for its URI
///
/// Clones share the script and the request log. A request without a
/// scripted response fails with `UnexpectedStatus` so that tests notice.
#[derive(Debug, Clone, Default)]
pub struct ScriptedResources {
    script: Arc<Mutex<Script>>,
    credential: Option<Credential>,
}

impl ScriptedResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `uri`
    pub fn respond(&self, uri: &str, status: u16, body: &str, headers: &[(&str, &str)]) {
        let mut map = Headers::new();
        for (name, value) in headers {
            map.entry(name.to_string())
                .or_default()
                .push(value.to_string());
        }
        self.script
            .lock()
            .responses
            .entry(uri.to_string())
            .or_default()
            .push_back(Resource::new(status, body, map));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.script.lock().requests.clone()
    }

    pub fn call_count(&self) -> usize {
        self.script.lock().requests.len()
    }

    fn answer(&self, method: &'static str, uri: &Url, headers: HeaderMap) -> Result<Resource> {
        let mut script = self.script.lock();
        script.requests.push(RecordedRequest {
            method,
            uri: uri.to_string(),
            headers,
            credential: self.credential.clone(),
        });
        script
            .responses
            .get_mut(uri.as_str())
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| ClientError::UnexpectedStatus {
                uri: uri.to_string(),
                status: 0,
            })
    }
}

impl JsonResources for ScriptedResources {
    fn get_with_headers(&self, uri: &Url, headers: HeaderMap) -> Result<Resource> {
        self.answer("GET", uri, headers)
    }

    fn post_with_headers(&self, uri: &Url, headers: HeaderMap, _body: &Value) -> Result<Resource> {
        self.answer("POST", uri, headers)
    }

    fn patch(&self, uri: &Url, _body: &Value) -> Result<Resource> {
        self.answer("PATCH", uri, HeaderMap::new())
    }

    fn put(&self, uri: &Url, _body: &Value) -> Result<Resource> {
        self.answer("PUT", uri, HeaderMap::new())
    }

    fn delete(&self, uri: &Url, _body: &Value) -> Result<Resource> {
        self.answer("DELETE", uri, HeaderMap::new())
    }

    fn authenticated(&self, credential: Credential) -> Self {
        Self {
            script: Arc::clone(&self.script),
            credential: Some(credential),
        }
    }
}
