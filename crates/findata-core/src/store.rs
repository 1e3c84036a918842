//! Cache store trait for persisting fetched responses.
//!
//! This module defines the [`CacheStore`] trait, a key-value contract over
//! opaque JSON blobs. The pipeline decides when to read and write; the store
//! owns physical storage. Entries have no expiry: they are created on the
//! first successful fetch, never mutated, and only removed by an explicit
//! [`clear`](CacheStore::clear).

use async_trait::async_trait;
use serde_json::Value;

use crate::{error::Result, key::CacheKey};

/// Trait for caching fetched provider responses.
///
/// Implementations can store data in various backends (SQLite, in-memory,
/// etc.). Values are opaque blobs from the store's perspective; typed values
/// round-trip through serde at the call site.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Retrieves the value cached under `key`.
    ///
    /// Returns `Ok(Some(value))` on a hit, `Ok(None)` on a miss.
    async fn read(&self, key: &CacheKey) -> Result<Option<Value>>;

    /// Stores `value` under `key`, replacing any existing entry.
    async fn write(&self, key: &CacheKey, value: &Value) -> Result<()>;

    /// Removes all cached entries.
    async fn clear(&self) -> Result<()>;
}
