//! Content negotiation.
//!
//! Picks a response encoding from the client's ranked `Accept-Encoding` list
//! intersected with the supported set {gzip, deflate, zstd, br}, preserving
//! client order: the first supported name wins. With no overlap (or no
//! header) the body goes out identity-encoded. Either way the negotiator
//! labels the body with its final `Content-Length`.

use std::io;
use std::io::Write;

use bytes::Bytes;
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use http::{header, HeaderValue};
use tracing::error;

use wren_http::protocol::{Request, Response};

/// One of the supported content encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Encoder {
    Gzip,
    Deflate,
    Zstd,
    Br,
}

impl Encoder {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "gzip" => Some(Self::Gzip),
            "deflate" => Some(Self::Deflate),
            "zstd" => Some(Self::Zstd),
            "br" => Some(Self::Br),
            _ => None,
        }
    }

    /// Selects the first entry of the client's preference list that the
    /// server supports.
    fn select(accept_encoding: &str) -> Option<Self> {
        accept_encoding.split(',').map(str::trim).find_map(Self::from_name)
    }

    fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Deflate => "deflate",
            Self::Zstd => "zstd",
            Self::Br => "br",
        }
    }

    fn encode(self, data: &[u8]) -> io::Result<Bytes> {
        match self {
            Self::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
                encoder.write_all(data)?;
                Ok(encoder.finish()?.into())
            }

            Self::Deflate => {
                let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
                encoder.write_all(data)?;
                Ok(encoder.finish()?.into())
            }

            Self::Zstd => Ok(zstd::stream::encode_all(data, 6)?.into()),

            Self::Br => {
                let mut buf = Vec::new();
                {
                    let mut encoder = brotli::CompressorWriter::new(
                        &mut buf, 32 * 1024, // buffer
                        3,  // BROTLI_PARAM_QUALITY
                        22, // BROTLI_PARAM_LGWIN
                    );
                    encoder.write_all(data)?;
                    // stream terminates when the writer drops
                }
                Ok(buf.into())
            }
        }
    }
}

/// Negotiates and applies an encoding for the response body.
///
/// Responses with an empty body are left untouched, as are responses that
/// already carry a `Content-Encoding`. A compression failure degrades to the
/// identity transform.
pub(crate) fn apply(request: &Request, response: &mut Response) {
    if response.payload().is_empty() {
        return;
    }

    // response has already been encoded
    if response.headers().contains_key(header::CONTENT_ENCODING) {
        return;
    }

    let encoder = request.header_str(header::ACCEPT_ENCODING).and_then(Encoder::select);

    if let Some(encoder) = encoder {
        match encoder.encode(response.payload()) {
            Ok(compressed) => {
                response.headers_mut().insert(header::CONTENT_ENCODING, HeaderValue::from_static(encoder.name()));
                response.headers_mut().insert(header::CONTENT_LENGTH, HeaderValue::from(compressed.len()));
                response.set_payload(compressed);
                return;
            }
            Err(e) => error!("{} encoding failed, sending identity: {}", encoder.name(), e),
        }
    }

    let raw_length = response.payload().len();
    response.headers_mut().insert(header::CONTENT_LENGTH, HeaderValue::from(raw_length));
}
