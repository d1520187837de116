//! Shared Cache Handle
//!
//! Thread-safe front for a single [`CacheStore`], plus ownership of its sweep task.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{generate_key, CacheStats, CacheStore};
use crate::config::Config;
use crate::tasks::spawn_cleanup_task;

// == Cache ==
/// Cloneable handle to one cache store.
///
/// Every clone talks to the same store. All access goes through a single
/// `RwLock`, so eviction and sweeps see a consistent view. Construct one per
/// process and hand clones to whoever needs caching.
#[derive(Debug, Clone)]
pub struct Cache {
    store: Arc<RwLock<CacheStore>>,
    sweeper: Arc<Sweeper>,
}

/// Owns the cleanup task; aborts it once the last handle is gone.
#[derive(Debug, Default)]
struct Sweeper {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Sweeper {
    fn slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.handle.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        if let Some(handle) = self.slot().take() {
            handle.abort();
        }
    }
}

impl Cache {
    /// Wraps an existing store. No sweep runs until [`start_cleanup`](Self::start_cleanup).
    pub fn new(store: CacheStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            sweeper: Arc::new(Sweeper::default()),
        }
    }

    /// Creates an empty store sized from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(CacheStore::new(config.max_size, config.default_ttl))
    }

    // == Key Generation ==
    /// See [`generate_key`](crate::cache::generate_key).
    pub fn generate_key<I, K, V>(prefix: &str, params: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: std::fmt::Display,
    {
        generate_key(prefix, params)
    }

    // == Contract Operations ==
    pub async fn get(&self, key: &str) -> Option<Value> {
        self.store.write().await.get(key)
    }

    pub async fn set(&self, key: impl Into<String>, value: Value, ttl_ms: Option<u64>) {
        self.store.write().await.set(key.into(), value, ttl_ms);
    }

    pub async fn has(&self, key: &str) -> bool {
        self.store.read().await.has(key)
    }

    pub async fn delete(&self, key: &str) -> bool {
        self.store.write().await.delete(key)
    }

    pub async fn delete_pattern(&self, pattern: &str) -> usize {
        self.store.write().await.delete_pattern(pattern)
    }

    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    pub async fn keys(&self) -> Vec<String> {
        self.store.read().await.keys()
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    /// Runs one sweep immediately. Returns the number of entries removed.
    pub async fn cleanup(&self) -> usize {
        self.store.write().await.cleanup_expired()
    }

    // == Typed Helpers ==
    /// Reads a value and deserializes it. A shape mismatch counts as a miss.
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key).await?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(e) => {
                debug!("Cached value for '{}' has unexpected shape: {}", key, e);
                None
            }
        }
    }

    /// Serializes `value` and stores it.
    pub async fn set_serialized<T: Serialize>(
        &self,
        key: impl Into<String>,
        value: &T,
        ttl_ms: Option<u64>,
    ) -> serde_json::Result<()> {
        let value = serde_json::to_value(value)?;
        self.set(key, value, ttl_ms).await;
        Ok(())
    }

    /// Read-through lookup.
    ///
    /// Returns the cached value on a hit. On a miss runs `loader`, caches its
    /// result for `ttl_ms` and returns it. Loader errors are passed through and
    /// nothing is cached. The lock is not held while the loader runs.
    pub async fn get_or_load<T, F, Fut>(
        &self,
        key: &str,
        ttl_ms: Option<u64>,
        loader: F,
    ) -> anyhow::Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        if let Some(hit) = self.get_as::<T>(key).await {
            debug!("Cache hit for '{}'", key);
            return Ok(hit);
        }

        debug!("Cache miss for '{}'", key);
        let loaded = loader().await?;
        self.set_serialized(key, &loaded, ttl_ms).await?;
        Ok(loaded)
    }

    // == Background Sweep ==
    /// Starts the periodic sweep, replacing any sweep already running.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start_cleanup(&self, interval: Duration) {
        let interval = interval.max(Duration::from_millis(1));
        let handle = spawn_cleanup_task(self.store.clone(), interval);
        if let Some(previous) = self.sweeper.slot().replace(handle) {
            previous.abort();
        }
    }

    /// Cancels the periodic sweep. Safe to call repeatedly.
    pub fn stop_cleanup(&self) {
        if let Some(handle) = self.sweeper.slot().take() {
            handle.abort();
            info!("Cache cleanup task stopped");
        }
    }

    /// True while a sweep task is scheduled.
    pub fn is_cleanup_running(&self) -> bool {
        self.sweeper
            .slot()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}
