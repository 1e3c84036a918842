//! Read-through fetch cache.
//!
//! [`FetchCache`] orchestrates one logical query: consult the
//! [`CacheStore`], on a miss run the fetch operation under the
//! [`RetryPolicy`], gate the result on an acceptability check, and cache it
//! for the next caller.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use findata_core::{CacheKey, CacheStore, DataError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::retry::RetryPolicy;

/// Read-through cache over a fallible fetch operation.
///
/// Guarantees: a cache hit short-circuits all retry and network logic, and
/// only acceptable fetch results are ever written to the store (failures and
/// empty results are never cached). There is no single-flight
/// de-duplication: concurrent callers missing on the same key both fetch,
/// and the last writer wins, which is harmless because responses for the
/// same key are assumed idempotent.
pub struct FetchCache {
    store: Arc<dyn CacheStore>,
    retry: RetryPolicy,
}

impl fmt::Debug for FetchCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchCache")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl FetchCache {
    /// Create a fetch cache over `store` with the default retry policy.
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self::with_retry(store, RetryPolicy::default())
    }

    /// Create a fetch cache over `store` with a custom retry policy.
    #[must_use]
    pub fn with_retry(store: Arc<dyn CacheStore>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    /// Returns the cached value for `key`, fetching and caching it on a miss.
    ///
    /// 1. A cache hit is returned immediately; there is no freshness check.
    ///    A cache read error or an undeserializable cached value degrades to
    ///    a miss.
    /// 2. On a miss, `fetch` runs under the retry policy; its errors
    ///    propagate unchanged.
    /// 3. A result failing `is_acceptable` (e.g. an empty series) becomes
    ///    [`DataError::NoData`] and is not written to the store.
    /// 4. An acceptable result is cached and returned. A cache write error
    ///    is logged and the value still returned.
    pub async fn get_or_fetch<T, F, Fut, A>(
        &self,
        key: &CacheKey,
        fetch: F,
        is_acceptable: A,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
        A: FnOnce(&T) -> bool,
    {
        match self.store.read(key).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(cached) => {
                    debug!(key = %key, "Cache hit, skipping fetch");
                    return Ok(cached);
                }
                Err(e) => warn!(key = %key, error = %e, "Corrupt cache entry, refetching"),
            },
            Ok(None) => debug!(key = %key, "Cache miss, fetching"),
            Err(e) => warn!(key = %key, error = %e, "Cache read failed, fetching"),
        }

        let result = self.retry.run(fetch).await?;

        if !is_acceptable(&result) {
            return Err(DataError::NoData(key.to_string()));
        }

        let value = serde_json::to_value(&result).map_err(|e| DataError::Parse(e.to_string()))?;
        if let Err(e) = self.store.write(key, &value).await {
            warn!(key = %key, error = %e, "Failed to cache fetch result");
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use findata_cache::MemoryStore;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn fetcher(store: Arc<MemoryStore>) -> FetchCache {
        FetchCache::with_retry(store, RetryPolicy::new(5, Duration::from_millis(1)))
    }

    /// Fetch closure yielding `data`, counting invocations.
    fn counted_fetch(
        calls: Arc<AtomicU32>,
        data: Vec<u32>,
    ) -> impl FnMut() -> std::pin::Pin<Box<dyn Future<Output = Result<Vec<u32>>> + Send>> {
        move || {
            let calls = Arc::clone(&calls);
            let data = data.clone();
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(data)
            })
        }
    }

    #[tokio::test]
    async fn test_second_call_is_a_cache_hit() {
        let store = Arc::new(MemoryStore::new());
        let cache = fetcher(Arc::clone(&store));
        let key = CacheKey::build("test", ["AAPL", "closing-prices"]);
        let calls = Arc::new(AtomicU32::new(0));

        let first: Vec<u32> = cache
            .get_or_fetch(&key, counted_fetch(Arc::clone(&calls), vec![1, 2]), |v| {
                !v.is_empty()
            })
            .await
            .unwrap();
        let second: Vec<u32> = cache
            .get_or_fetch(&key, counted_fetch(Arc::clone(&calls), vec![1, 2]), |v| {
                !v.is_empty()
            })
            .await
            .unwrap();

        assert_eq!(first, vec![1, 2]);
        assert_eq!(second, vec![1, 2]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_result_is_an_error_and_never_cached() {
        let store = Arc::new(MemoryStore::new());
        let cache = fetcher(Arc::clone(&store));
        let key = CacheKey::build("test", ["AAPL", "closing-prices"]);
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<Vec<u32>> = cache
            .get_or_fetch(&key, counted_fetch(Arc::clone(&calls), vec![]), |v| {
                !v.is_empty()
            })
            .await;

        assert!(matches!(result, Err(DataError::NoData(_))));
        assert!(store.is_empty().await);

        // Nothing was cached, so the next call fetches again.
        let _: Result<Vec<u32>> = cache
            .get_or_fetch(&key, counted_fetch(Arc::clone(&calls), vec![]), |v| {
                !v.is_empty()
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_errors_propagate_unchanged_and_nothing_is_cached() {
        let store = Arc::new(MemoryStore::new());
        let cache = fetcher(Arc::clone(&store));
        let key = CacheKey::build("test", ["AAPL"]);

        let result: Result<Vec<u32>> = cache
            .get_or_fetch(
                &key,
                || async {
                    Err(DataError::Api {
                        provider: "test".to_string(),
                        message: "bad ticker".to_string(),
                        status: Some(404),
                    })
                },
                |_| true,
            )
            .await;

        assert_eq!(result.unwrap_err().status(), Some(404));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_cache_hit_short_circuits_retry_and_fetch() {
        let store = Arc::new(MemoryStore::new());
        let key = CacheKey::build("test", ["AAPL"]);
        store
            .write(&key, &serde_json::json!([7, 8, 9]))
            .await
            .unwrap();

        let cache = fetcher(Arc::clone(&store));
        let calls = Arc::new(AtomicU32::new(0));

        let result: Vec<u32> = cache
            .get_or_fetch(&key, counted_fetch(Arc::clone(&calls), vec![0]), |_| true)
            .await
            .unwrap();

        assert_eq!(result, vec![7, 8, 9]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_is_refetched_and_replaced() {
        let store = Arc::new(MemoryStore::new());
        let key = CacheKey::build("test", ["AAPL"]);
        // Not a Vec<u32>, so deserialization of the hit fails.
        store
            .write(&key, &serde_json::json!({"unexpected": "shape"}))
            .await
            .unwrap();

        let cache = fetcher(Arc::clone(&store));
        let calls = Arc::new(AtomicU32::new(0));

        let result: Vec<u32> = cache
            .get_or_fetch(&key, counted_fetch(Arc::clone(&calls), vec![1, 2]), |v| {
                !v.is_empty()
            })
            .await
            .unwrap();
        assert_eq!(result, vec![1, 2]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // The refetched value overwrote the bad entry.
        let again: Vec<u32> = cache
            .get_or_fetch(&key, counted_fetch(Arc::clone(&calls), vec![1, 2]), |v| {
                !v.is_empty()
            })
            .await
            .unwrap();
        assert_eq!(again, vec![1, 2]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_fault_retried_then_result_cached() {
        let store = Arc::new(MemoryStore::new());
        let cache = fetcher(Arc::clone(&store));
        let key = CacheKey::build("test", ["AAPL"]);
        let calls = Arc::new(AtomicU32::new(0));

        let fetch = {
            let calls = Arc::clone(&calls);
            move || {
                let calls = Arc::clone(&calls);
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(DataError::Api {
                            provider: "test".to_string(),
                            message: "overloaded".to_string(),
                            status: Some(503),
                        })
                    } else {
                        Ok(vec![5u32])
                    }
                }
            }
        };

        let result: Vec<u32> = cache.get_or_fetch(&key, fetch, |v| !v.is_empty()).await.unwrap();
        assert_eq!(result, vec![5]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(store.len().await, 1);
    }
}
