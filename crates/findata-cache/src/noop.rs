//! No-op store implementation.

use async_trait::async_trait;
use findata_core::{CacheKey, CacheStore, Result};
use serde_json::Value;
use tracing::trace;

/// A no-op store that doesn't store anything.
///
/// `read` always misses and `write`/`clear` succeed without effect. Useful
/// for disabling caching or exercising fetch paths without cache hits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

impl NoopStore {
    /// Create a new no-op store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CacheStore for NoopStore {
    async fn read(&self, _key: &CacheKey) -> Result<Option<Value>> {
        trace!("NoopStore: read called, returning None");
        Ok(None)
    }

    async fn write(&self, _key: &CacheKey, _value: &Value) -> Result<()> {
        trace!("NoopStore: write called, doing nothing");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        trace!("NoopStore: clear called, doing nothing");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_noop_store_never_hits() {
        let store = NoopStore::new();
        let key = CacheKey::build("test", ["AAPL"]);

        store.write(&key, &json!(42)).await.unwrap();

        assert!(store.read(&key).await.unwrap().is_none());
        assert!(store.clear().await.is_ok());
    }

    #[test]
    fn test_noop_store_is_copy() {
        let store1 = NoopStore::new();
        let store2 = store1; // Copy
        let _store3 = store2; // Still works because Copy
    }
}
