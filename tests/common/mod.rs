//! Shared utilities for integration testing.

use std::io::Write;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tempfile::NamedTempFile;
use tokio::net::TcpListener;

use vanity_server::config::ServerConfig;
use vanity_server::http::HttpServer;
use vanity_server::lifecycle::Shutdown;
use vanity_server::store::{ImportStore, StoreChain};

/// Start a server on an ephemeral port with the given stores and
/// fallback. The returned `Shutdown` must be kept alive for the lifetime
/// of the test; dropping it stops the server.
pub async fn spawn_server(
    config: ServerConfig,
    stores: Vec<Box<dyn ImportStore>>,
    fallback: Option<Router>,
) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    let server = HttpServer::new(config, StoreChain::new(stores), fallback);
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Give the accept loop a moment to come up.
    tokio::time::sleep(Duration::from_millis(50)).await;

    (addr, shutdown)
}

/// Write a JSON import db to a temp file. The file is deleted when the
/// returned handle is dropped.
pub fn json_db(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Config with rate limiting off, suitable for most tests.
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.rate_limit.enabled = false;
    config
}
