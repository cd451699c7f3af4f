//! Import record stores.
//!
//! # Data Flow
//! ```text
//! Resolution handler
//!     → chain.rs (ordered store list, first hit wins)
//!     → json.rs (JSON db on disk / in memory)
//!     → dns.rs  (TXT records for the request host)
//! ```
//!
//! # Design Decisions
//! - Stores are read-only at request time; backing data is re-read on
//!   every lookup (no retained handles, no caching)
//! - A backing-source failure is a miss, never an error to the caller;
//!   the reason goes to the log stream instead
//! - The store set is fixed and composed at startup

pub mod chain;
pub mod dns;
pub mod json;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

pub use chain::StoreChain;
pub use dns::{DnsStore, TxtResolver};
pub use json::JsonStore;

/// A resolved import location.
///
/// Maps a canonical import path to the version control location (or a
/// module proxy) that serves its source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportRecord {
    /// Import path corresponding to the repository root; the match key.
    pub prefix: String,

    /// Version control system: one of bzr, fossil, git, hg, svn.
    /// Unused when `proxy` is set.
    pub vcs: String,

    /// Version control system root, e.g. `https://example.org/foo/proj`.
    pub root: String,

    /// Optional module proxy URL. When non-empty the module is fetched
    /// through the proxy instead of directly via `vcs`/`root`.
    pub proxy: String,
}

/// Capability to resolve a request URL to an import record.
///
/// Implementations must be safe to call concurrently and must collapse
/// every internal failure into a miss (`None`).
#[async_trait]
pub trait ImportStore: Send + Sync {
    /// Find the import record for `url`, if any.
    async fn lookup(&self, url: &Url) -> Option<ImportRecord>;
}

/// Derive the match key from a request URL: `host + path`, scheme and
/// query stripped.
pub fn lookup_key(url: &Url) -> String {
    format!("{}{}", url.host_str().unwrap_or(""), url.path())
}
