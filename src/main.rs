//! Vanity import web server.
//!
//! Answers the HTTP requests a package-management tool issues to
//! discover where a module's source lives, by returning an HTML document
//! carrying a `go-import` meta tag.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │              VANITY IMPORT SERVER            │
//!                    │                                              │
//!  Client Request    │  ┌─────────┐    ┌──────────────┐            │
//!  ──────────────────┼─▶│  http   │───▶│ store chain  │            │
//!                    │  │ server  │    │ (first match │            │
//!                    │  └─────────┘    │    wins)     │            │
//!                    │       │         └──────┬───────┘            │
//!                    │       │           ┌────┴────┐               │
//!                    │       │           ▼         ▼               │
//!                    │       │     ┌─────────┐ ┌─────────┐         │
//!                    │       │     │  JSON   │ │   DNS   │         │
//!                    │       │     │   db    │ │   TXT   │         │
//!                    │       │     └─────────┘ └─────────┘         │
//!                    │       ▼                                     │
//!  Client Response   │  ┌──────────┐   miss   ┌──────────────┐     │
//!  ◀─────────────────┼──│ renderer │◀─────────│   fallback   │     │
//!                    │  └──────────┘          │ static files │     │
//!                    │                        └──────────────┘     │
//!                    │  ┌────────────────────────────────────────┐ │
//!                    │  │          Cross-Cutting Concerns        │ │
//!                    │  │  config · rate limit · tracing ·       │ │
//!                    │  │  lifecycle (startup/shutdown)          │ │
//!                    │  └────────────────────────────────────────┘ │
//!                    └──────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod store;

// Cross-cutting concerns
pub mod lifecycle;
pub mod security;

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{loader::load_config, ServerConfig};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::store::{DnsStore, ImportStore, JsonStore, StoreChain};

#[derive(Parser)]
#[command(name = "vanity-server")]
#[command(about = "Vanity import path web server", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface and port to listen on.
    #[arg(short, long)]
    bind: Option<String>,

    /// Path to the JSON import db.
    #[arg(short, long)]
    json_db: Option<PathBuf>,

    /// Fallback static files directory.
    #[arg(short, long)]
    static_dir: Option<PathBuf>,
}

impl Cli {
    /// Resolve the effective configuration: file (or defaults), then
    /// flag overrides.
    fn into_config(self) -> Result<ServerConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ServerConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(json_db) = self.json_db {
            config.stores.json_db = json_db;
        }
        if let Some(static_dir) = self.static_dir {
            config.fallback.static_dir = Some(static_dir);
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vanity_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("vanity-server v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Cli::parse().into_config()?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        json_db = %config.stores.json_db.display(),
        dns = config.stores.dns,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    // Compose the store chain; order decides ties.
    let mut stores: Vec<Box<dyn ImportStore>> = Vec::new();

    match fs::metadata(&config.stores.json_db) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => {
            stores.push(Box::new(JsonStore::from_path(&config.stores.json_db)));
        }
        _ => {
            tracing::debug!(
                path = %config.stores.json_db.display(),
                "JSON db missing or empty, skipping JSON store"
            );
        }
    }

    if config.stores.dns {
        stores.push(Box::new(DnsStore::system()));
    }

    let chain = StoreChain::new(stores);
    tracing::info!(stores = chain.len(), "store chain composed");

    let fallback = config.fallback.static_dir.clone().map(|dir| {
        tracing::info!(directory = %dir.display(), "fallback serving static files");
        axum::Router::new().fallback_service(ServeDir::new(dir))
    });

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_shutdown().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config, chain, fallback);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
