//! The fixed endpoint surface.
//!
//! Handlers read from the routed request and build a fresh response; the
//! dispatch layer takes care of `Content-Length` and content negotiation.

use http::{header, HeaderValue, StatusCode};
use tracing::error;

use wren_http::protocol::{Request, Response};

use crate::store::FileStore;

const TEXT_PLAIN: HeaderValue = HeaderValue::from_static("text/plain");
const OCTET_STREAM: HeaderValue = HeaderValue::from_static("application/octet-stream");

/// GET `/`
pub fn root(_request: &Request) -> Response {
    Response::ok()
}

/// GET `/echo/:message` — reflects the bound path segment.
pub fn echo(request: &Request) -> Response {
    let message = request.param("message").unwrap_or_default().to_owned();
    Response::ok().header(header::CONTENT_TYPE, TEXT_PLAIN).body(message)
}

/// GET `/user-agent` — reflects the client's `User-Agent` header.
pub fn user_agent(request: &Request) -> Response {
    let agent = request.header_str(header::USER_AGENT).unwrap_or_default().to_owned();
    Response::ok().header(header::CONTENT_TYPE, TEXT_PLAIN).body(agent)
}

/// GET `/files/:filename`
pub fn read_file(store: &dyn FileStore, request: &Request) -> Response {
    let Some(name) = request.param("filename") else {
        return Response::new(StatusCode::NOT_FOUND);
    };

    if !store.exists(name) {
        return Response::new(StatusCode::NOT_FOUND);
    }

    match store.read(name) {
        Ok(contents) => Response::ok().header(header::CONTENT_TYPE, OCTET_STREAM).body(contents),
        Err(e) => {
            error!(file = name, "failed to read stored file: {}", e);
            Response::new(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST `/files/:filename`
pub fn write_file(store: &dyn FileStore, request: &Request) -> Response {
    let Some(name) = request.param("filename") else {
        return Response::new(StatusCode::NOT_FOUND);
    };

    match store.write(name, request.body()) {
        Ok(()) => Response::new(StatusCode::CREATED),
        Err(e) => {
            error!(file = name, "failed to write stored file: {}", e);
            Response::new(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
