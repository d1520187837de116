//! Cache Statistics Module
//!
//! Point-in-time snapshot of cache occupancy and configuration.

use serde::Serialize;

// == Cache Stats ==
/// Derived cache statistics. Computed on demand, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Number of entries held, expired or not
    pub total_entries: usize,
    /// Entries already past expiry but not yet swept
    pub expired_entries: usize,
    /// `total_entries - expired_entries`
    pub active_entries: usize,
    /// Sum of serialized value lengths
    pub total_size: usize,
    /// Configured capacity
    pub max_size: usize,
    /// Default TTL in milliseconds
    #[serde(rename = "defaultTTL")]
    pub default_ttl: u64,
}

impl CacheStats {
    // == Within Capacity ==
    /// True when the entry count respects `max_size`.
    pub fn within_capacity(&self) -> bool {
        self.total_entries <= self.max_size
    }
}
