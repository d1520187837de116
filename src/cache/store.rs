//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with insertion-order tracking and TTL expiration.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheEntry, CacheStats, InsertionOrder, KeyPattern};

// == Cache Store ==
/// Main cache storage with oldest-first eviction and TTL support.
///
/// Not synchronized on its own; share it through [`Cache`](crate::cache::Cache).
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Insertion order, drives eviction
    order: InsertionOrder,
    /// Maximum number of entries allowed
    max_size: usize,
    /// Default TTL in milliseconds for entries without explicit TTL
    default_ttl: u64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default TTL.
    ///
    /// # Arguments
    /// * `max_size` - Maximum number of entries, clamped to at least 1
    /// * `default_ttl` - Default TTL in milliseconds for entries without explicit TTL
    pub fn new(max_size: usize, default_ttl: u64) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            max_size: max_size.max(1),
            default_ttl,
        }
    }

    // == Set ==
    /// Stores a value under `key` with an optional TTL in milliseconds.
    ///
    /// When the store is at capacity the oldest inserted entry is evicted
    /// first, even if `key` is already present. Overwriting a key that
    /// survives that eviction keeps its original insertion slot but always
    /// gets a fresh expiry.
    pub fn set(&mut self, key: String, value: Value, ttl: Option<u64>) {
        if self.entries.len() >= self.max_size {
            if let Some(evicted) = self.order.evict_oldest() {
                self.entries.remove(&evicted);
                debug!("Evicted oldest cache entry '{}'", evicted);
            }
        }

        let entry = CacheEntry::new(value, ttl.unwrap_or(self.default_ttl));
        if self.entries.insert(key.clone(), entry).is_none() {
            self.order.record(&key);
        }
        debug_assert_eq!(self.entries.len(), self.order.len());
    }

    // == Get ==
    /// Retrieves a live value by key.
    ///
    /// Returns None for a missing key. An expired entry also yields None and
    /// is removed as a side effect.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let expired = self.entries.get(key)?.is_expired();
        if expired {
            self.remove_entry(key);
            return None;
        }
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Has ==
    /// True if `key` holds a live entry. Never removes anything.
    pub fn has(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key)
    }

    // == Delete Pattern ==
    /// Removes every key matching the `*` wildcard `pattern`.
    ///
    /// Returns the number of entries removed.
    pub fn delete_pattern(&mut self, pattern: &str) -> usize {
        let pattern = KeyPattern::new(pattern);
        let matched: Vec<String> = self
            .order
            .iter()
            .filter(|key| pattern.matches(key))
            .cloned()
            .collect();

        for key in &matched {
            self.remove_entry(key);
        }

        debug!(
            "Pattern '{}' removed {} cache entries",
            pattern.as_str(),
            matched.len()
        );
        matched.len()
    }

    // == Clear ==
    /// Removes all entries unconditionally.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    // == Keys ==
    /// Returns all keys, expired or not, oldest first.
    pub fn keys(&self) -> Vec<String> {
        self.order.iter().cloned().collect()
    }

    // == Stats ==
    /// Returns current cache statistics without removing expired entries.
    pub fn stats(&self) -> CacheStats {
        let now = current_timestamp_ms();
        let mut expired_entries = 0;
        let mut total_size = 0;

        for entry in self.entries.values() {
            if entry.is_expired_at(now) {
                expired_entries += 1;
            }
            total_size += entry.approximate_size();
        }

        CacheStats {
            total_entries: self.entries.len(),
            expired_entries,
            active_entries: self.entries.len() - expired_entries,
            total_size,
            max_size: self.max_size,
            default_ttl: self.default_ttl,
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }

        expired_keys.len()
    }

    // == Accessors ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.order.remove(key);
            true
        } else {
            false
        }
    }
}
