//! Endpoint handlers, file store and router assembly for the wren server
//! binary.

use std::sync::Arc;

use wren_web::router::{get, post};
use wren_web::Router;

use wren_http::protocol::Request;

use crate::store::FileStore;

pub mod handlers;
pub mod store;

/// Builds the fixed endpoint surface on top of a file store.
pub fn router(store: Arc<dyn FileStore>) -> Router {
    let read_store = Arc::clone(&store);
    let write_store = store;

    Router::builder()
        .route("/", get(handlers::root))
        .route("/echo/:message", get(handlers::echo))
        .route("/user-agent", get(handlers::user_agent))
        .route("/files/:filename", get(move |request: &Request| handlers::read_file(read_store.as_ref(), request)))
        .route("/files/:filename", post(move |request: &Request| handlers::write_file(write_store.as_ref(), request)))
        .build()
}
