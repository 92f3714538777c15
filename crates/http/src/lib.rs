//! A hand-rolled HTTP/1.1 message engine built directly on a raw byte stream.
//!
//! This crate reads bytes off an async stream, parses them into a structured
//! [`protocol::Request`], hands that request to a [`handler::Handler`], and
//! serializes the resulting [`protocol::Response`] back onto the wire. It is
//! deliberately small: one request per connection, no pipelining, no chunked
//! transfer-encoding, no TLS.
//!
//! # Design
//!
//! - Parsing is *permissive*: a malformed request line or header never fails
//!   the parse, it degrades to defaults so the engine can always produce a
//!   well-formed response. The only decoder error is an underlying I/O fault.
//! - Serialization is *explicit*: the encoder writes exactly the status line,
//!   the headers it is given (in insertion order) and the payload verbatim.
//!   It never invents a `Content-Length`; callers set one when they attach a
//!   body.
//! - The connection always closes after the single response, echoing a
//!   `Connection: close` header back when the client asked for it.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use http::StatusCode;
//! use tokio::net::TcpListener;
//!
//! use wren_http::connection::HttpConnection;
//! use wren_http::handler::make_handler;
//! use wren_http::protocol::{Request, Response};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:4221").await.unwrap();
//!     let handler = Arc::new(make_handler(hello));
//!
//!     loop {
//!         let (stream, _remote_addr) = match listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(_) => continue,
//!         };
//!
//!         let handler = handler.clone();
//!         tokio::spawn(async move {
//!             let (reader, writer) = stream.into_split();
//!             let connection = HttpConnection::new(reader, writer);
//!             if let Err(e) = connection.process(handler).await {
//!                 eprintln!("connection error: {e}");
//!             }
//!         });
//!     }
//! }
//!
//! async fn hello(_request: Request) -> Response {
//!     Response::new(StatusCode::OK)
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: request/response values and error types
//! - [`codec`]: the wire-level decoder and encoder
//! - [`connection`]: per-connection lifecycle
//! - [`handler`]: the seam between the engine and application code

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;
