//! Ordered composition of import stores.

use async_trait::async_trait;
use url::Url;

use crate::store::{ImportRecord, ImportStore};

/// Ordered list of stores; the first hit wins.
///
/// The member list is fixed at construction time. Construction order is
/// the tie-break when several stores could answer the same key.
pub struct StoreChain {
    stores: Vec<Box<dyn ImportStore>>,
}

impl StoreChain {
    /// Compose the given stores, consulted in order.
    pub fn new(stores: Vec<Box<dyn ImportStore>>) -> Self {
        Self { stores }
    }

    /// Number of member stores.
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    /// True when no stores are configured.
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

#[async_trait]
impl ImportStore for StoreChain {
    async fn lookup(&self, url: &Url) -> Option<ImportRecord> {
        for store in &self.stores {
            if let Some(record) = store.lookup(url).await {
                return Some(record);
            }
        }

        None
    }
}
