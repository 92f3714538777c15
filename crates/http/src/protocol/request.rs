//! HTTP request values.
//!
//! A [`Request`] is produced fresh by the decoder for every message on a
//! connection; nothing here is shared between connections. Route parameters
//! start out empty and are bound by the route table after a successful match.

use std::collections::HashMap;

use bytes::Bytes;
use http::header::AsHeaderName;
use http::{header, HeaderMap, Method, Version};

/// A single parsed HTTP request.
///
/// Every field carries a well-defined default (`GET`, `/`, `HTTP/1.1`, empty
/// headers, empty body) so that a degenerate byte stream still yields a usable
/// value.
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    version: Version,
    headers: HeaderMap,
    params: HashMap<String, String>,
    body: Bytes,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            method: Method::GET,
            path: "/".to_owned(),
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
            params: HashMap::new(),
            body: Bytes::new(),
        }
    }
}

impl Request {
    /// Creates a request with the given method and path and defaults for
    /// everything else.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), ..Default::default() }
    }

    pub(crate) fn from_wire(method: Method, path: String, version: Version, headers: HeaderMap, body: Bytes) -> Self {
        Self { method, path, version, headers, params: HashMap::new(), body }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value as a string slice, if present and valid UTF-8.
    pub fn header_str<K: AsHeaderName>(&self, name: K) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Route parameters bound at match time; empty for unmatched requests.
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Returns the path segment bound to a route-declared parameter name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Binds route parameters onto this request. Called by the route table
    /// after a successful match.
    pub fn bind_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// True when the client explicitly asked for the connection to be closed.
    pub fn connection_close(&self) -> bool {
        self.header_str(header::CONNECTION) == Some("close")
    }

    /// Builder-style header attachment, mainly useful for tests and for
    /// constructing synthetic requests.
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Builder-style body attachment.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}
