use std::sync::Arc;

use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use wren_server::router;
use wren_server::store::DiskStore;
use wren_web::Server;

/// Fixed listen address; the server has no CLI surface.
const LISTEN_ADDR: &str = "127.0.0.1:4221";

/// Fixed root directory backing the `/files` endpoints.
const STORAGE_ROOT: &str = "/tmp/wren-files";

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    if let Err(e) = std::fs::create_dir_all(STORAGE_ROOT) {
        error!(cause = %e, root = STORAGE_ROOT, "can't prepare storage root");
        return;
    }

    let store = Arc::new(DiskStore::new(STORAGE_ROOT));

    let server = match Server::builder().address(LISTEN_ADDR).router(router(store)).build() {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, "can't build server");
            return;
        }
    };

    info!(address = LISTEN_ADDR, storage = STORAGE_ROOT, "starting server");
    server.start().await;
}
