#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/findata-rs/findata/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Resilient fetch-cache-aggregate pipeline for historical financial data.
//!
//! This crate wires the pieces together: re-exports the core types, the
//! cache store implementations, and the provider backends, and provides the
//! pipeline components:
//!
//! - [`RetryPolicy`] - retries transient (5xx) provider faults, surfaces
//!   everything else immediately
//! - [`FetchCache`] - read-through response cache keyed by deterministic
//!   composite keys
//! - [`HistoricalDataService`] - the high-level query surface (close prices,
//!   annual metrics, monthly averages, fiscal-year statements, price
//!   technicals)
//!
//! # Features
//!
//! - `intrinio` - Intrinio REST API provider
//! - `cache-sqlite` - SQLite-based response cache
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use findata::{HistoricalDataService, IntrinioProvider, SqliteStore, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> findata::Result<()> {
//!     let provider = Arc::new(IntrinioProvider::new(std::env::var("INTRINIO_API_KEY").unwrap()));
//!     let store = Arc::new(SqliteStore::new("financial-data/cache.db")?);
//!     let service = HistoricalDataService::new(provider, store);
//!
//!     let symbol = Symbol::new("AAPL");
//!     let revenue = service.annual_revenue(&symbol, 2015, 2019).await?;
//!     println!("{revenue:?}");
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use findata_core::*;

// Cache store implementations
#[cfg(feature = "cache-sqlite")]
pub use findata_cache::SqliteStore;
pub use findata_cache::{MemoryStore, NoopStore};

// Providers
#[cfg(feature = "intrinio")]
pub use findata_intrinio::IntrinioProvider;

mod fetch;
mod retry;
mod service;

pub use fetch::FetchCache;
pub use retry::RetryPolicy;
pub use service::HistoricalDataService;
