use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use async_trait::async_trait;
use http::StatusCode;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use wren_http::connection::HttpConnection;
use wren_http::handler::Handler;
use wren_http::protocol::{Request, Response};

use crate::encoding;
use crate::router::{RouteOutcome, Router};

/// Builder for [`Server`].
#[derive(Debug)]
pub struct ServerBuilder {
    router: Option<Router>,
    address: Option<Vec<SocketAddr>>,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { router: None, address: None }
    }

    pub fn address<A: ToSocketAddrs>(mut self, address: A) -> Self {
        self.address = address.to_socket_addrs().ok().map(|addrs| addrs.collect::<Vec<_>>());
        self
    }

    pub fn router(mut self, router: Router) -> Self {
        self.router = Some(router);
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let router = self.router.ok_or(ServerBuildError::MissingRouter)?;
        let address = self.address.ok_or(ServerBuildError::MissingAddress)?;
        Ok(Server { router, address })
    }
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("router must be set")]
    MissingRouter,
    #[error("a resolvable address must be set")]
    MissingAddress,
}

/// Accepts connections and dispatches each request through the route table.
#[derive(Debug)]
pub struct Server {
    router: Router,
    address: Vec<SocketAddr>,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Runs the accept loop forever, one spawned task per connection.
    pub async fn start(self) {
        info!("start listening at {:?}", self.address);
        let tcp_listener = match TcpListener::bind(self.address.as_slice()).await {
            Ok(tcp_listener) => tcp_listener,
            Err(e) => {
                error!(cause = %e, "bind server error");
                return;
            }
        };

        let handler = Arc::new(self);
        loop {
            let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            let handler = handler.clone();

            tokio::spawn(async move {
                let (reader, writer) = tcp_stream.into_split();
                let connection = HttpConnection::new(reader, writer);
                match connection.process(handler).await {
                    Ok(()) => {
                        debug!("finished process, connection shutdown");
                    }
                    Err(e) => {
                        error!("connection has error, cause {}, connection shutdown", e);
                    }
                }
            });
        }
    }
}

#[async_trait]
impl Handler for Server {
    async fn call(&self, mut request: Request) -> Response {
        let mut response = match self.router.route(&mut request) {
            RouteOutcome::Matched(route) => route.invoke(&request),
            RouteOutcome::MethodNotAllowed => {
                debug!(path = %request.path(), method = %request.method(), "method not allowed on known path");
                Response::new(StatusCode::FORBIDDEN)
            }
            RouteOutcome::NotFound => {
                debug!(path = %request.path(), "no route matched");
                Response::new(StatusCode::NOT_FOUND)
            }
        };

        encoding::apply(&request, &mut response);
        response
    }
}

#[cfg(test)]
mod tests {
    use http::{header, HeaderValue, Method};

    use crate::router::{get, Router};

    use super::*;

    fn echo_message(request: &Request) -> Response {
        let message = request.param("message").unwrap_or_default().to_owned();
        Response::ok().header(header::CONTENT_TYPE, HeaderValue::from_static("text/plain")).body(message)
    }

    fn server() -> Server {
        let router = Router::builder().route("/echo/:message", get(echo_message)).build();
        Server::builder().address("127.0.0.1:0").router(router).build().unwrap()
    }

    #[test]
    fn build_requires_router_and_address() {
        assert!(matches!(
            Server::builder().address("127.0.0.1:0").build(),
            Err(ServerBuildError::MissingRouter)
        ));

        let router = Router::builder().build();
        assert!(matches!(Server::builder().router(router).build(), Err(ServerBuildError::MissingAddress)));
    }

    #[tokio::test]
    async fn dispatch_invokes_matched_handler_and_labels_length() {
        let server = server();
        let response = server.call(Request::new(Method::GET, "/echo/hey")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.payload().as_ref(), b"hey");
        assert_eq!(response.headers().get(header::CONTENT_LENGTH), Some(&HeaderValue::from(3usize)));
    }

    #[tokio::test]
    async fn dispatch_miss_is_not_found_with_empty_body() {
        let server = server();
        let response = server.call(Request::new(Method::GET, "/missing")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.payload().is_empty());
        assert!(response.headers().is_empty());
    }

    #[tokio::test]
    async fn dispatch_known_path_wrong_method_is_forbidden() {
        let server = server();
        let response = server.call(Request::new(Method::POST, "/echo/hey")).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn dispatch_negotiates_encoding() {
        let server = server();
        let request = Request::new(Method::GET, "/echo/abcabcabc")
            .with_header(header::ACCEPT_ENCODING, HeaderValue::from_static("gzip, br"));

        let response = server.call(request).await;
        assert_eq!(response.headers().get(header::CONTENT_ENCODING), Some(&HeaderValue::from_static("gzip")));
    }
}
