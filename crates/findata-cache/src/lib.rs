#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/findata-rs/findata/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Cache store implementations for the findata fetch pipeline.
//!
//! This crate provides implementations of the [`CacheStore`] trait from
//! `findata-core`:
//!
//! - [`SqliteStore`] - Persistent SQLite-based store (default, requires the `sqlite` feature)
//! - [`MemoryStore`] - Simple in-memory store for testing
//! - [`NoopStore`] - No-op store that doesn't store anything

/// In-memory store implementation.
pub mod memory;
/// No-op store implementation.
pub mod noop;

/// SQLite-based store implementation.
#[cfg(feature = "sqlite")]
pub mod sqlite;

// Re-export the trait for convenience
pub use findata_core::CacheStore;

// Re-export implementations
pub use memory::MemoryStore;
pub use noop::NoopStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
