//! Insertion Order Module
//!
//! Tracks the order in which keys entered the cache for FIFO eviction.

use std::collections::{BTreeMap, HashMap};

// == Insertion Order ==
/// Tracks key insertion order for oldest-first eviction.
///
/// Every newly recorded key gets the next sequence number. `by_seq` keeps keys
/// ordered oldest to newest and `seq_of` maps a key back to its slot, so
/// removal and eviction are O(log n).
///
/// Reads never reorder keys, and overwriting a tracked key keeps its slot.
/// This is deliberately not LRU.
#[derive(Debug, Default)]
pub(crate) struct InsertionOrder {
    by_seq: BTreeMap<u64, String>,
    seq_of: HashMap<String, u64>,
    next_seq: u64,
}

impl InsertionOrder {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    // == Record ==
    /// Appends a newly inserted key as the newest one.
    ///
    /// A key that is already tracked keeps its slot.
    pub(crate) fn record(&mut self, key: &str) {
        if self.seq_of.contains_key(key) {
            return;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.by_seq.insert(seq, key.to_string());
        self.seq_of.insert(key.to_string(), seq);
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub(crate) fn remove(&mut self, key: &str) {
        if let Some(seq) = self.seq_of.remove(key) {
            self.by_seq.remove(&seq);
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the oldest inserted key.
    ///
    /// Returns None if tracker is empty.
    pub(crate) fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.by_seq.pop_first()?;
        self.seq_of.remove(&key);
        Some(key)
    }

    // == Iteration ==
    /// Iterates keys from oldest to newest.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &String> {
        self.by_seq.values()
    }

    /// Drops every tracked key.
    pub(crate) fn clear(&mut self) {
        self.by_seq.clear();
        self.seq_of.clear();
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub(crate) fn len(&self) -> usize {
        self.by_seq.len()
    }
}
