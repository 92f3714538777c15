use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use http::{header, HeaderValue, StatusCode};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, error};

use crate::codec::{RequestDecoder, ResponseEncoder};
use crate::handler::Handler;
use crate::protocol::{HttpError, Response};

/// Payload of the generic error response written when the connection itself
/// fails mid-cycle.
const ERROR_BODY: &str = "Something went wrong";

/// An HTTP connection that drives exactly one request/response cycle.
///
/// `HttpConnection` owns one accepted connection: it reads and decodes a
/// single request, hands it to the handler, writes the serialized response
/// and then closes. Keep-alive is not implemented; when the client sent
/// `Connection: close`, that header is echoed on the response before the
/// socket goes down.
///
/// # Type Parameters
///
/// * `R`: the async readable half
/// * `W`: the async writable half
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    framed_write: FramedWrite<W, ResponseEncoder>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            framed_read: FramedRead::with_capacity(reader, RequestDecoder::new(), 8 * 1024),
            framed_write: FramedWrite::new(writer, ResponseEncoder::new()),
        }
    }

    /// Processes the connection to completion.
    ///
    /// One request is read and one response is written, in strict sequence;
    /// the connection is closed when this returns, whatever the outcome. A
    /// read-side failure is answered with a generic error response before
    /// the error is propagated.
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler,
    {
        match self.framed_read.next().await {
            Some(Ok(request)) => {
                let close_requested = request.connection_close();
                debug!(path = %request.path(), close_requested, "dispatching request");

                let mut response = handler.call(request).await;
                if close_requested {
                    response.headers_mut().insert(header::CONNECTION, HeaderValue::from_static("close"));
                }

                self.framed_write.send(response).await?;
                Ok(())
            }

            Some(Err(e)) => {
                error!("can't read request, cause {}", e);
                self.send_error_response().await?;
                Err(e.into())
            }

            None => {
                debug!("peer closed before sending a request");
                Ok(())
            }
        }
    }

    async fn send_error_response(&mut self) -> Result<(), HttpError> {
        let response = Response::new(StatusCode::INTERNAL_SERVER_ERROR)
            .header(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .header(header::CONTENT_LENGTH, HeaderValue::from(ERROR_BODY.len()))
            .body(ERROR_BODY);

        self.framed_write.send(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::AsyncWriteExt;
    use tokio::io::{duplex, split};

    use crate::handler::make_handler;
    use crate::protocol::Request;

    use super::*;

    async fn reflect_path(request: Request) -> Response {
        let body = request.path().to_owned();
        Response::ok()
            .header(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .header(header::CONTENT_LENGTH, HeaderValue::from(body.len()))
            .body(body)
    }

    /// Writes `raw` to an in-memory connection and returns everything the
    /// engine wrote back before closing.
    async fn exchange(raw: &[u8]) -> Vec<u8> {
        let (client, server) = duplex(4 * 1024);
        let (reader, writer) = split(server);

        let handler = Arc::new(make_handler(reflect_path));
        let connection = HttpConnection::new(reader, writer);
        let task = tokio::spawn(connection.process(handler));

        let (mut client_read, mut client_write) = split(client);
        client_write.write_all(raw).await.unwrap();
        client_write.shutdown().await.unwrap();

        let mut wire = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut client_read, &mut wire).await.unwrap();

        task.await.unwrap().unwrap();
        wire
    }

    #[tokio::test]
    async fn one_request_one_response_then_close() {
        let wire = exchange(b"GET /ping HTTP/1.1\r\n\r\n").await;
        let text = String::from_utf8(wire).unwrap();

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"), "unexpected wire output: {text}");
        assert!(text.ends_with("\r\n\r\n/ping"));
        // read_to_end returning proves the engine closed the socket
    }

    #[tokio::test]
    async fn connection_close_header_is_echoed() {
        let wire = exchange(b"GET / HTTP/1.1\r\nConnection: close\r\n\r\n").await;
        let text = String::from_utf8(wire).unwrap();

        assert!(text.contains("\r\nconnection: close\r\n"), "missing echo in: {text}");
    }

    #[tokio::test]
    async fn keep_alive_request_is_not_echoed() {
        let wire = exchange(b"GET / HTTP/1.1\r\nConnection: keep-alive\r\n\r\n").await;
        let text = String::from_utf8(wire).unwrap();

        assert!(!text.contains("connection:"), "unexpected header in: {text}");
    }

    #[tokio::test]
    async fn handler_sees_fresh_request_per_connection() {
        let first = exchange(b"GET /one HTTP/1.1\r\n\r\n").await;
        let second = exchange(b"GET /two HTTP/1.1\r\n\r\n").await;

        assert!(first.ends_with(b"/one"));
        assert!(second.ends_with(b"/two"));
    }

    #[tokio::test]
    async fn eof_before_any_request_is_clean() {
        let (client, server) = duplex(64);
        let (reader, writer) = split(server);

        let handler = Arc::new(make_handler(reflect_path));
        drop(client);

        let result = HttpConnection::new(reader, writer).process(handler).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn degenerate_bytes_still_get_a_response() {
        // a lone token parses to the default GET / request
        let wire = exchange(b"garbage").await;
        let text = String::from_utf8(wire).unwrap();

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
    }
}
