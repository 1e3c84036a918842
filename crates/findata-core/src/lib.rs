#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/findata-rs/findata/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for resilient financial data fetching.
//!
//! This crate provides the foundational abstractions for the fetch pipeline:
//!
//! - [`HistoricalDataProvider`](provider::HistoricalDataProvider) - Vendor data source
//! - [`CacheStore`](store::CacheStore) - Key-value response cache
//! - [`DataError`](error::DataError) / [`FaultKind`](error::FaultKind) - Error taxonomy
//!   and transient/permanent classification
//! - [`CacheKey`](key::CacheKey) - Deterministic composite cache keys
//! - [`aggregate`] - Calendar-bucketed reductions over observation series

/// Temporal aggregation of observation series into calendar buckets.
pub mod aggregate;
/// Calendar date range helpers and key-safe date formatting.
pub mod dates;
/// Error types for data operations.
pub mod error;
/// Deterministic cache key construction.
pub mod key;
/// Provider trait for fetching historical data.
pub mod provider;
/// Cache store trait for persisting fetched responses.
pub mod store;
/// Core data types (Symbol, Observation).
pub mod types;

// Re-export commonly used items at crate root
pub use aggregate::{YearBucket, YearMonthBucket, aggregate_by_year, aggregate_by_year_month};
pub use error::{DataError, FaultKind, Result};
pub use key::CacheKey;
pub use provider::{HistoricalDataProvider, SeriesFrequency, StatementKind};
pub use store::CacheStore;
pub use types::{MacdObservation, Observation, Symbol};
