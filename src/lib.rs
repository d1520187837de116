//! Movie Cache - in-process TTL cache for the movie catalog API
//!
//! Memoizes read-heavy query results with per-entry expiration, oldest-first
//! eviction and wildcard invalidation, plus a small administrative HTTP surface.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod manager;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{generate_key, Cache, CacheStats, CacheStore};
pub use config::Config;
pub use manager::{CacheManager, CacheWarmer, HealthReport, WarmUpReport};
pub use tasks::spawn_cleanup_task;
