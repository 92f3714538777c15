//! HTTP response encoder.
//!
//! Serializes a [`Response`] as `HTTP/1.1 <status>\r\n`, each header as
//! `<name>: <value>\r\n` in insertion order, a blank line, then the payload
//! verbatim. A response with no headers still emits the blank separator
//! line. The encoder never adds a `Content-Length` on its own; a payload
//! without a declared size is still transmitted.

use std::io;
use std::io::Write;

use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;

use crate::protocol::{Response, SendError};

/// Initial buffer size reserved for the head of a response.
const INIT_HEAD_SIZE: usize = 4 * 1024;

/// Encoder for HTTP responses implementing the [`Encoder`] trait.
#[derive(Debug)]
pub struct ResponseEncoder;

impl ResponseEncoder {
    pub fn new() -> Self {
        Default::default()
    }
}

impl Default for ResponseEncoder {
    fn default() -> Self {
        Self
    }
}

impl Encoder<Response> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, response: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_HEAD_SIZE + response.payload().len());

        let status = response.status();
        write!(FastWrite(dst), "HTTP/1.1 {} {}\r\n", status.as_str(), status.canonical_reason().unwrap_or("Unknown"))?;

        for (name, value) in response.headers().iter() {
            dst.put_slice(name.as_ref());
            dst.put_slice(b": ");
            dst.put_slice(value.as_ref());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");

        dst.put_slice(response.payload());
        Ok(())
    }
}

/// Writer over `BytesMut` that skips the error paths `io::Write` forces on
/// us; space has already been reserved.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use http::{header, HeaderValue, StatusCode};

    use super::*;

    fn encode(response: Response) -> BytesMut {
        let mut dst = BytesMut::new();
        ResponseEncoder::new().encode(response, &mut dst).unwrap();
        dst
    }

    #[test]
    fn bare_response_still_emits_separator_line() {
        let wire = encode(Response::new(StatusCode::NOT_FOUND));
        assert_eq!(&wire[..], b"HTTP/1.1 404 Not Found\r\n\r\n");
    }

    #[test]
    fn headers_serialize_in_insertion_order() {
        let response = Response::ok()
            .header(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .header(header::CONTENT_LENGTH, HeaderValue::from(3usize))
            .body("abc");

        let wire = encode(response);
        assert_eq!(&wire[..], b"HTTP/1.1 200 OK\r\ncontent-type: text/plain\r\ncontent-length: 3\r\n\r\nabc");
    }

    #[test]
    fn payload_without_length_header_is_still_written() {
        let wire = encode(Response::ok().body("unsized"));
        assert_eq!(&wire[..], b"HTTP/1.1 200 OK\r\n\r\nunsized");
    }

    #[test]
    fn binary_payload_is_written_verbatim() {
        let body: &[u8] = &[0x00, 0xff, 0x1f, 0x8b];
        let wire = encode(Response::ok().body(body.to_vec()));
        assert!(wire.ends_with(body));
    }
}
