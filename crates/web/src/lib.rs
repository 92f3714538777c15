//! Routing, content negotiation and dispatch on top of [`wren_http`].
//!
//! The [`Router`] maps `(method, path pattern)` pairs onto handlers and binds
//! `:name` path parameters by their declared names. The [`Server`] owns the
//! accept loop and implements the engine's `Handler` trait: route the
//! request, invoke the handler (404/403 on a miss), then negotiate a response
//! encoding from the client's `Accept-Encoding` preferences.

mod encoding;
mod server;

pub mod router;

pub use router::{Route, RouteOutcome, Router, RouterBuilder};
pub use server::{Server, ServerBuildError, ServerBuilder};
