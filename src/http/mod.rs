//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, resolution handler)
//!     → store chain (first match wins)
//!     → render.rs (meta-tag document) on a hit
//!     → fallback handler / 404 on a miss
//! ```

pub mod render;
pub mod server;

pub use server::HttpServer;
