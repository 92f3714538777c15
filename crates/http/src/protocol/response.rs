//! HTTP response values.
//!
//! A [`Response`] is produced fresh by each handler invocation. Headers
//! accumulate: the handler, the content negotiator and the connection layer
//! each insert into the same map, later inserts replacing earlier values only
//! on a key collision.

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};

/// A single HTTP response: status, headers in insertion order, and an opaque
/// byte payload.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self { status, headers: HeaderMap::new(), body: Bytes::new() }
    }

    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    /// Builder-style header insertion.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Builder-style payload attachment. Setting a body does not set a
    /// `Content-Length`; that is the caller's responsibility.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn payload(&self) -> &Bytes {
        &self.body
    }

    /// Replaces the payload, used by the content negotiator after
    /// compressing a body.
    pub fn set_payload(&mut self, body: Bytes) {
        self.body = body;
    }
}
