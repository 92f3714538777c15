//! HTTP request decoder.
//!
//! The decoder consumes whatever has arrived on the stream and parses it as
//! one message. This keeps the engine's one-read-one-message model: a request
//! split across TCP segments is not reassembled.
//!
//! Parsing is permissive by construction. Missing request-line tokens fall
//! back to `GET`, `/` and `HTTP/1.1`; a header line without a `": "`
//! separator becomes a name with an empty value; an unparsable header name is
//! skipped. The decoder therefore never fails on malformed input, only on an
//! underlying I/O error.

use bytes::{Bytes, BytesMut};
use http::{HeaderMap, HeaderName, HeaderValue, Method, Version};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::protocol::{ParseError, Request};

/// Decoder for HTTP requests implementing the [`Decoder`] trait.
#[derive(Debug)]
pub struct RequestDecoder;

impl RequestDecoder {
    pub fn new() -> Self {
        Default::default()
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    /// Consumes the buffered bytes and parses them as a single request.
    ///
    /// Returns `Ok(None)` only while the buffer is empty.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        let raw = src.split_to(src.len()).freeze();
        Ok(Some(parse_message(&raw)))
    }
}

/// Byte offset of the first `\r\n\r\n`, if any.
fn find_blank_line(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|window| window == b"\r\n\r\n")
}

fn parse_message(raw: &Bytes) -> Request {
    let boundary = find_blank_line(raw);
    let head_end = boundary.unwrap_or(raw.len());

    let head = String::from_utf8_lossy(&raw[..head_end]);
    let mut lines = head.split("\r\n");

    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().map_or(Method::GET, parse_method);
    let path = request_line.next().unwrap_or("/").to_owned();
    let version = parse_version(request_line.next());

    let mut headers = HeaderMap::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }

        let (name, value) = match line.split_once(": ") {
            Some((name, value)) => (name, value),
            // no separator: keep the name, map it to an empty value
            None => (line, ""),
        };

        let Ok(name) = HeaderName::from_bytes(name.as_bytes()) else {
            trace!(line, "skipping unparsable header line");
            continue;
        };
        let value = HeaderValue::from_str(value).unwrap_or_else(|_| HeaderValue::from_static(""));

        // last occurrence wins
        headers.insert(name, value);
    }

    let body = match boundary {
        Some(index) if need_body(&method) => raw.slice(index + 4..),
        _ => Bytes::new(),
    };

    trace!(%method, path = %path, "parsed request");
    Request::from_wire(method, path, version, headers, body)
}

/// Parses a method token against the closed set the engine understands.
/// Anything else degrades to `GET`.
fn parse_method(token: &str) -> Method {
    match token {
        "GET" => Method::GET,
        "POST" => Method::POST,
        "PUT" => Method::PUT,
        "PATCH" => Method::PATCH,
        "DELETE" => Method::DELETE,
        "OPTIONS" => Method::OPTIONS,
        _ => Method::GET,
    }
}

fn parse_version(token: Option<&str>) -> Version {
    match token {
        Some("HTTP/1.0") => Version::HTTP_10,
        _ => Version::HTTP_11,
    }
}

/// Only body-bearing methods keep the bytes after the blank line.
fn need_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

#[cfg(test)]
mod tests {
    use http::header;

    use super::*;

    fn decode(raw: &[u8]) -> Option<Request> {
        let mut buf = BytesMut::from(raw);
        RequestDecoder::new().decode(&mut buf).unwrap()
    }

    #[test]
    fn empty_buffer_needs_more_data() {
        let mut buf = BytesMut::new();
        assert!(RequestDecoder::new().decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn from_curl() {
        let request = decode(
            b"GET /index.html HTTP/1.1\r\n\
              Host: 127.0.0.1:4221\r\n\
              User-Agent: curl/7.79.1\r\n\
              Accept: */*\r\n\
              \r\n",
        )
        .unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.path(), "/index.html");
        assert_eq!(request.version(), Version::HTTP_11);

        assert_eq!(request.headers().len(), 3);
        assert_eq!(request.header_str(header::HOST), Some("127.0.0.1:4221"));
        assert_eq!(request.header_str(header::USER_AGENT), Some("curl/7.79.1"));
        assert_eq!(request.header_str(header::ACCEPT), Some("*/*"));

        assert!(request.body().is_empty());
        assert!(request.params().is_empty());
    }

    #[test]
    fn post_keeps_body() {
        let request = decode(
            b"POST /files/report.txt HTTP/1.1\r\n\
              Content-Length: 5\r\n\
              \r\n\
              hello",
        )
        .unwrap();

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.body().as_ref(), b"hello");
    }

    #[test]
    fn get_discards_trailing_bytes() {
        let request = decode(b"GET / HTTP/1.1\r\n\r\nstray").unwrap();
        assert!(request.body().is_empty());
    }

    #[test]
    fn missing_tokens_fall_back_to_defaults() {
        let request = decode(b"\r\n\r\n").unwrap();
        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.path(), "/");
        assert_eq!(request.version(), Version::HTTP_11);
    }

    #[test]
    fn unknown_method_degrades_to_get() {
        let request = decode(b"BREW /coffee HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.path(), "/coffee");
    }

    #[test]
    fn http_10_version_token() {
        let request = decode(b"GET / HTTP/1.0\r\n\r\n").unwrap();
        assert_eq!(request.version(), Version::HTTP_10);
    }

    #[test]
    fn header_line_without_separator_maps_to_empty_value() {
        let request = decode(b"GET / HTTP/1.1\r\nX-Flag\r\n\r\n").unwrap();
        assert_eq!(request.header_str("x-flag"), Some(""));
    }

    #[test]
    fn duplicate_header_last_occurrence_wins() {
        let request = decode(
            b"GET / HTTP/1.1\r\n\
              X-Token: first\r\n\
              X-Token: second\r\n\
              \r\n",
        )
        .unwrap();

        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.header_str("x-token"), Some("second"));
    }

    #[test]
    fn message_without_blank_line_still_parses() {
        let request = decode(b"GET /echo/abc HTTP/1.1\r\nHost: localhost").unwrap();
        assert_eq!(request.path(), "/echo/abc");
        assert_eq!(request.header_str(header::HOST), Some("localhost"));
        assert!(request.body().is_empty());
    }

    #[test]
    fn decoder_drains_the_buffer() {
        let mut buf = BytesMut::from(&b"GET / HTTP/1.1\r\n\r\n"[..]);
        RequestDecoder::new().decode(&mut buf).unwrap().unwrap();
        assert!(buf.is_empty());
    }
}
