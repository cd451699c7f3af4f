//! Vanity Import Server Library

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod security;
pub mod store;

pub use config::schema::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use store::{DnsStore, ImportRecord, ImportStore, JsonStore, StoreChain};
