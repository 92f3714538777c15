//! The seam between the protocol engine and application code.

use std::future::Future;

use async_trait::async_trait;

use crate::protocol::{Request, Response};

/// Turns one parsed request into one response.
///
/// Implementations must always produce a response; failure modes that should
/// reach the client are expressed as error-status responses, not as `Err`.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, request: Request) -> Response;
}

/// A [`Handler`] backed by a plain async function.
#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Response> + Send,
{
    async fn call(&self, request: Request) -> Response {
        (self.f)(request).await
    }
}

pub fn make_handler<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Response> + Send,
{
    HandlerFn { f }
}
