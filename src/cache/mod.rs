//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, oldest-first eviction
//! and wildcard invalidation.

mod entry;
mod handle;
mod key;
mod order;
mod pattern;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use handle::Cache;
pub use key::{generate_key, prefixes};
pub(crate) use order::InsertionOrder;
pub use pattern::KeyPattern;
pub use stats::CacheStats;
pub use store::CacheStore;
