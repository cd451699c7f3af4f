//! JSON-backed import record store.
//!
//! # Responsibilities
//! - Re-read the backing source on every lookup (the db file may be
//!   replaced between requests)
//! - Parse a JSON array of records; decode errors degrade to a miss
//! - Match by exact, case-sensitive `host + path` equality
//!
//! # Design Decisions
//! - The byte source is a factory closure rather than a path so tests
//!   and embedders can supply in-memory readers
//! - Release of the acquired reader is guaranteed by `Drop` on every
//!   exit path, including decode errors

use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

use async_trait::async_trait;
use url::Url;

use crate::store::{lookup_key, ImportRecord, ImportStore};

/// Factory producing a fresh reader over the JSON record array.
///
/// Called once per lookup. The returned reader is dropped before the
/// lookup returns, releasing whatever resource backs it.
pub type RecordSource = Box<dyn Fn() -> io::Result<Box<dyn Read + Send>> + Send + Sync>;

/// Import store reading records from a JSON array.
pub struct JsonStore {
    source: RecordSource,
}

impl JsonStore {
    /// Create a store over an arbitrary byte source.
    pub fn new(source: RecordSource) -> Self {
        Self { source }
    }

    /// Create a store that opens the file at `path` on every lookup.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::new(Box::new(move || {
            let fd = File::open(&path)?;
            Ok(Box::new(fd) as Box<dyn Read + Send>)
        }))
    }
}

#[async_trait]
impl ImportStore for JsonStore {
    async fn lookup(&self, url: &Url) -> Option<ImportRecord> {
        let reader = match (self.source)() {
            Ok(reader) => reader,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "JSON store: open failed");
                return None;
            }
        };

        let records: Vec<ImportRecord> = match serde_json::from_reader(reader) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "JSON store: decode failed");
                return None;
            }
        };

        let key = lookup_key(url);

        // Malformed input may contain all-empty records; those are
        // never a valid match target.
        records
            .into_iter()
            .find(|rec| !rec.prefix.is_empty() && rec.prefix == key)
    }
}
