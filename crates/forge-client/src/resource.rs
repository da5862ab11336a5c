//! HTTP response value type
//!
//! A `Resource` is one response: status, body text and headers. It is
//! immutable; [`Resource::derive`] produces a new value instead of mutating.

use crate::Result;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Response headers: case-sensitive names mapped to every value received
pub type Headers = HashMap<String, Vec<String>>;

/// One HTTP response returned by a [`crate::JsonResources`] client
///
/// The body is kept as received. Parsing is on demand through
/// [`Resource::json`], [`Resource::json_object`] and
/// [`Resource::json_array`]; check the status before parsing, error
/// responses rarely carry the shape a success would.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    status: u16,
    body: String,
    headers: Headers,
}

impl Resource {
    pub fn new(status: u16, body: impl Into<String>, headers: Headers) -> Self {
        Self {
            status,
            body: body.into(),
            headers,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Raw body text (empty for bodiless responses such as 204 or 304)
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// All values of header `name`, matching the name case-insensitively
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .flat_map(|(_, values)| values.iter().map(String::as_str))
            .collect()
    }

    /// First value of header `name`, matching the name case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .find_map(|(_, values)| values.first())
            .map(String::as_str)
    }

    /// The `ETag` validator, whatever the casing of the header name
    pub fn etag(&self) -> Option<&str> {
        self.header("etag")
    }

    /// Parse the body as any JSON value
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Parse the body as a JSON object
    pub fn json_object(&self) -> Result<Map<String, Value>> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Parse the body as a JSON array
    pub fn json_array(&self) -> Result<Vec<Value>> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// A new resource with `status` and `body` replaced and the same headers
    ///
    /// Used to answer a `304 Not Modified` with a `200` built from cache
    /// while keeping the headers of the revalidation response.
    pub fn derive(&self, status: u16, body: impl Into<String>) -> Resource {
        Resource {
            status,
            body: body.into(),
            headers: self.headers.clone(),
        }
    }

    /// The same resource with its headers replaced
    pub fn with_headers(self, headers: Headers) -> Resource {
        Resource { headers, ..self }
    }
}
