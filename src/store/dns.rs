//! DNS-backed import record store.
//!
//! Looks for TXT records of the form
//! `go-import=<prefix> <vcs> <root>[ <proxy>]` on the request host.
//!
//! # Design Decisions
//! - The resolver is a capability trait so tests can substitute a fake;
//!   the default is the system resolver via hickory-dns
//! - Every lookup runs under a 15 second deadline; a timeout is a miss
//! - Malformed TXT entries are skipped, not fatal for the whole lookup
//! - Resolver-returned order decides ties between valid entries and is
//!   not assumed stable across calls

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::{
    config::ResolverConfig, name_server::TokioConnectionProvider, TokioResolver,
};
use thiserror::Error;
use url::Url;

use crate::store::{lookup_key, ImportRecord, ImportStore};

/// `go-import` records carry at least `(prefix, vcs, root)`.
const MIN_RECORD_FIELDS: usize = 3;

/// Deadline for a single TXT resolution.
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(15);

/// Error from a TXT resolution attempt.
#[derive(Debug, Error)]
#[error("TXT lookup for {host} failed: {reason}")]
pub struct TxtLookupError {
    pub host: String,
    pub reason: String,
}

/// Capability to resolve TXT records for a host name.
#[async_trait]
pub trait TxtResolver: Send + Sync {
    /// Return every TXT string published for `host`.
    async fn txt_records(&self, host: &str) -> Result<Vec<String>, TxtLookupError>;
}

/// System DNS resolver backed by hickory-dns.
///
/// The underlying resolver is lazily initialized on first use and shared
/// across all instances. It reads the system DNS configuration and falls
/// back to defaults when that fails.
#[derive(Debug, Clone, Default)]
pub struct SystemResolver;

fn shared_resolver() -> &'static TokioResolver {
    static RESOLVER: LazyLock<TokioResolver> = LazyLock::new(|| {
        let builder = match TokioResolver::builder_tokio() {
            Ok(builder) => {
                tracing::debug!("using system DNS configuration");
                builder
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read system DNS config, using defaults");
                TokioResolver::builder_with_config(
                    ResolverConfig::default(),
                    TokioConnectionProvider::default(),
                )
            }
        };
        builder.build()
    });
    &RESOLVER
}

#[async_trait]
impl TxtResolver for SystemResolver {
    async fn txt_records(&self, host: &str) -> Result<Vec<String>, TxtLookupError> {
        let lookup = shared_resolver()
            .txt_lookup(host)
            .await
            .map_err(|e| TxtLookupError {
                host: host.to_string(),
                reason: e.to_string(),
            })?;

        // A TXT record may be split into several character-strings;
        // they concatenate into one logical value.
        Ok(lookup
            .iter()
            .map(|txt| {
                txt.iter()
                    .map(|part| String::from_utf8_lossy(part).into_owned())
                    .collect::<String>()
            })
            .collect())
    }
}

/// Import store answering from `go-import` TXT records.
pub struct DnsStore {
    resolver: Box<dyn TxtResolver>,
}

impl DnsStore {
    /// Create a store over the given resolver capability.
    pub fn new(resolver: impl TxtResolver + 'static) -> Self {
        Self {
            resolver: Box::new(resolver),
        }
    }

    /// Create a store over the platform DNS resolver.
    pub fn system() -> Self {
        Self::new(SystemResolver)
    }

    fn parse_entry(value: &str, key: &str) -> Option<ImportRecord> {
        // Guard against a TXT record for a broader or narrower subpath
        // answering the wrong request.
        if !value.starts_with(key) {
            return None;
        }

        let fields: Vec<&str> = value.splitn(4, ' ').collect();
        if fields.len() < MIN_RECORD_FIELDS {
            return None;
        }

        // The declared prefix must equal the key exactly, not merely
        // lead it.
        if !fields[0].eq_ignore_ascii_case(key) {
            return None;
        }

        Some(ImportRecord {
            prefix: fields[0].to_string(),
            vcs: fields[1].to_string(),
            root: fields[2].to_string(),
            proxy: fields.get(3).unwrap_or(&"").to_string(),
        })
    }
}

#[async_trait]
impl ImportStore for DnsStore {
    async fn lookup(&self, url: &Url) -> Option<ImportRecord> {
        let host = url.host_str()?;

        let records =
            match tokio::time::timeout(LOOKUP_TIMEOUT, self.resolver.txt_records(host)).await {
                Ok(Ok(records)) => records,
                Ok(Err(e)) => {
                    tracing::warn!(url = %url, error = %e, "DNS store: resolver error");
                    return None;
                }
                Err(_) => {
                    tracing::warn!(url = %url, host = %host, "DNS store: lookup timed out");
                    return None;
                }
            };

        let key = lookup_key(url);

        records.iter().find_map(|record| {
            let (label, value) = record.split_once('=')?;
            if label != "go-import" {
                return None;
            }
            Self::parse_entry(value, &key)
        })
    }
}
