//! SQLite-based store implementation.

use async_trait::async_trait;
use chrono::Utc;
use findata_core::{CacheKey, CacheStore, DataError, Result};
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, instrument};

/// SQLite-based store for fetched responses.
///
/// Entries persist across application restarts. Values are stored as JSON
/// text under their composite key; the `cached_at` column records when an
/// entry was written but is informational only, since the cache has no
/// expiry.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SQLite store at the given path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or schema creation fails.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| DataError::Cache(e.to_string()))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Create an in-memory SQLite store.
    ///
    /// Useful for testing; data is lost when the store is dropped.
    ///
    /// # Errors
    /// Returns an error if schema creation fails.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| DataError::Cache(e.to_string()))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema.
    fn initialize_schema(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DataError::Cache(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS cache_entries (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                cached_at TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| DataError::Cache(e.to_string()))?;

        debug!("SQLite cache schema initialized");
        Ok(())
    }
}

#[async_trait]
impl CacheStore for SqliteStore {
    #[instrument(skip(self), fields(key = %key))]
    async fn read(&self, key: &CacheKey) -> Result<Option<Value>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DataError::Cache(e.to_string()))?;

        let result = conn
            .query_row(
                "SELECT value FROM cache_entries WHERE key = ?1",
                params![key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|e| DataError::Cache(e.to_string()))?;

        match result {
            Some(json) => {
                let value: Value =
                    serde_json::from_str(&json).map_err(|e| DataError::Parse(e.to_string()))?;
                debug!("Cache hit");
                Ok(Some(value))
            }
            None => {
                debug!("Cache miss");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, value), fields(key = %key))]
    async fn write(&self, key: &CacheKey, value: &Value) -> Result<()> {
        let cached_at = Utc::now().to_rfc3339();
        let json = serde_json::to_string(value).map_err(|e| DataError::Parse(e.to_string()))?;

        let conn = self
            .conn
            .lock()
            .map_err(|e| DataError::Cache(e.to_string()))?;

        conn.execute(
            "INSERT OR REPLACE INTO cache_entries (key, value, cached_at)
             VALUES (?1, ?2, ?3)",
            params![key.as_str(), json, cached_at],
        )
        .map_err(|e| DataError::Cache(e.to_string()))?;

        debug!("Cached entry");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DataError::Cache(e.to_string()))?;

        conn.execute("DELETE FROM cache_entries", [])
            .map_err(|e| DataError::Cache(e.to_string()))?;

        debug!("Cleared all cache entries");
        Ok(())
    }
}
