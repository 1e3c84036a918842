//! In-memory store implementation.

use async_trait::async_trait;
use findata_core::{CacheKey, CacheStore, Result};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Simple in-memory store for testing and development.
///
/// Entries are held in a `RwLock`-protected `HashMap` and are lost when the
/// store is dropped. The map is unbounded: entries are never evicted except
/// by [`clear`](CacheStore::clear). Values are cloned on read and write.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of cached entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    #[instrument(skip(self), fields(key = %key))]
    async fn read(&self, key: &CacheKey) -> Result<Option<Value>> {
        let entries = self.entries.read().await;
        match entries.get(key.as_str()) {
            Some(value) => {
                debug!("Cache hit");
                Ok(Some(value.clone()))
            }
            None => {
                debug!("Cache miss");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, value), fields(key = %key))]
    async fn write(&self, key: &CacheKey, value: &Value) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.as_str().to_string(), value.clone());
        debug!("Cached entry");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        self.entries.write().await.clear();
        debug!("Cleared all cache entries");
        Ok(())
    }
}
