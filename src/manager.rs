//! Cache Manager
//!
//! Maps domain-level invalidation intents onto store operations and reports
//! aggregate diagnostics.

use std::any::Any;
use std::fmt::Display;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{prefixes, Cache, CacheStats};

/// Placeholder substituted with the entity id in invalidation templates.
pub const ENTITY_ID_PLACEHOLDER: &str = "{id}";

pub const CACHE_CLEARED: &str = "Cache cleared successfully";
pub const CACHE_WARMED_UP: &str = "Cache warmed up successfully";
pub const CACHE_WARMUP_FAILED: &str = "Cache warmup failed";

// == Warm-up Sources ==
/// A read path that can pre-populate the cache.
///
/// Implemented by the data-access layer, typically by calling its own cached
/// list function once.
#[async_trait]
pub trait CacheWarmer: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    async fn warm(&self, cache: &Cache) -> anyhow::Result<()>;
}

// == Results ==
/// Confirmation returned by the clear operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheMessage {
    pub message: String,
}

impl CacheMessage {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Outcome of [`CacheManager::warm_up_cache`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WarmUpReport {
    Warmed { message: String },
    Failed { error: String, details: String },
}

impl WarmUpReport {
    pub fn is_success(&self) -> bool {
        matches!(self, WarmUpReport::Warmed { .. })
    }
}

/// Result of [`CacheManager::cache_health_check`].
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub stats: CacheStats,
    /// RFC 3339
    pub timestamp: String,
}

// == Invalidation Templates ==
/// Keys and patterns touched when a movie changes.
pub fn movie_key_templates() -> Vec<String> {
    vec![
        format!("{}:movieId:{}", prefixes::MOVIES_READ, ENTITY_ID_PLACEHOLDER),
        format!("{}:movieId:{}", prefixes::MOVIES_THEATERS, ENTITY_ID_PLACEHOLDER),
        format!("{}:movieId:{}", prefixes::MOVIES_REVIEWS, ENTITY_ID_PLACEHOLDER),
        format!("{}:*", prefixes::MOVIES_LIST),
    ]
}

/// Keys and patterns touched when a review changes.
pub fn review_key_templates() -> Vec<String> {
    vec![
        format!("{}:review_id:{}", prefixes::REVIEWS_READ, ENTITY_ID_PLACEHOLDER),
        format!("{}:reviewId:{}", prefixes::REVIEWS_UPDATE, ENTITY_ID_PLACEHOLDER),
        format!("{}:*", prefixes::MOVIES_REVIEWS),
    ]
}

// == Cache Manager ==
/// Convenience layer over one [`Cache`].
#[derive(Clone)]
pub struct CacheManager {
    cache: Cache,
    warmers: Vec<Arc<dyn CacheWarmer>>,
}

impl CacheManager {
    pub fn new(cache: Cache) -> Self {
        Self {
            cache,
            warmers: Vec::new(),
        }
    }

    /// Registers the read paths run by [`warm_up_cache`](Self::warm_up_cache), in order.
    pub fn with_warmers(mut self, warmers: Vec<Arc<dyn CacheWarmer>>) -> Self {
        self.warmers = warmers;
        self
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub async fn clear_all_cache(&self) -> CacheMessage {
        self.cache.clear().await;
        info!("All cache entries cleared");
        CacheMessage::new(CACHE_CLEARED)
    }

    pub async fn clear_cache_pattern(&self, pattern: &str) -> CacheMessage {
        let removed = self.cache.delete_pattern(pattern).await;
        info!("Cleared {} entries matching '{}'", removed, pattern);
        CacheMessage::new(format!(
            "Cache entries matching pattern '{}' cleared successfully",
            pattern
        ))
    }

    /// Deletes every key or pattern in `templates` after substituting `{id}`.
    ///
    /// Each template is applied independently; one matching nothing does not
    /// stop the rest. Returns the total number of entries removed.
    pub async fn clear_entity_cache<S: AsRef<str>>(
        &self,
        entity_id: impl Display,
        templates: &[S],
    ) -> usize {
        let id = entity_id.to_string();
        let mut removed = 0;

        for template in templates {
            let pattern = template.as_ref().replace(ENTITY_ID_PLACEHOLDER, &id);
            let count = self.cache.delete_pattern(&pattern).await;
            debug!("Invalidated '{}' ({} entries)", pattern, count);
            removed += count;
        }

        removed
    }

    pub async fn clear_movie_cache(&self, movie_id: impl Display) -> CacheMessage {
        let movie_id = movie_id.to_string();
        self.clear_entity_cache(&movie_id, &movie_key_templates()).await;
        CacheMessage::new(format!("Cache cleared for movie {}", movie_id))
    }

    pub async fn clear_review_cache(&self, review_id: impl Display) -> CacheMessage {
        let review_id = review_id.to_string();
        self.clear_entity_cache(&review_id, &review_key_templates()).await;
        CacheMessage::new(format!("Cache cleared for review {}", review_id))
    }

    pub async fn clear_theaters_cache(&self) -> CacheMessage {
        self.cache
            .delete_pattern(&format!("{}*", prefixes::THEATERS_LIST))
            .await;
        CacheMessage::new("Theaters cache cleared successfully")
    }

    pub async fn get_cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    pub async fn get_cache_keys(&self) -> Vec<String> {
        self.cache.keys().await
    }

    /// Sanity check on the store's own bookkeeping. Touches no external resource.
    pub async fn cache_health_check(&self) -> HealthReport {
        let stats = self.cache.stats().await;
        let healthy = stats.within_capacity();

        HealthReport {
            healthy,
            stats,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Runs the registered warmers in order.
    ///
    /// Stops at the first failure and reports it instead of returning an error,
    /// so a failed warm-up never blocks startup. A panicking source counts as
    /// a failure.
    pub async fn warm_up_cache(&self) -> WarmUpReport {
        info!("Warming up cache ({} sources)", self.warmers.len());

        for warmer in &self.warmers {
            let outcome = AssertUnwindSafe(warmer.warm(&self.cache))
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| {
                    Err(anyhow::anyhow!(
                        "warmer '{}' panicked: {}",
                        warmer.name(),
                        panic_message(payload.as_ref())
                    ))
                });

            if let Err(e) = outcome {
                warn!("{} ({}): {:#}", CACHE_WARMUP_FAILED, warmer.name(), e);
                return WarmUpReport::Failed {
                    error: CACHE_WARMUP_FAILED.to_string(),
                    details: e.to_string(),
                };
            }
            debug!("Warmed '{}'", warmer.name());
        }

        info!("{}", CACHE_WARMED_UP);
        WarmUpReport::Warmed {
            message: CACHE_WARMED_UP.to_string(),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;
    use serde_json::json;

    struct ListWarmer {
        key: &'static str,
    }

    #[async_trait]
    impl CacheWarmer for ListWarmer {
        fn name(&self) -> &str {
            self.key
        }

        async fn warm(&self, cache: &Cache) -> anyhow::Result<()> {
            cache.set(self.key, json!(["warm"]), Some(600_000)).await;
            Ok(())
        }
    }

    struct FailingWarmer;

    #[async_trait]
    impl CacheWarmer for FailingWarmer {
        fn name(&self) -> &str {
            "movies"
        }

        async fn warm(&self, _cache: &Cache) -> anyhow::Result<()> {
            anyhow::bail!("connection refused")
        }
    }

    struct PanickingWarmer;

    #[async_trait]
    impl CacheWarmer for PanickingWarmer {
        fn name(&self) -> &str {
            "reviews"
        }

        async fn warm(&self, _cache: &Cache) -> anyhow::Result<()> {
            panic!("review source unavailable")
        }
    }

    fn manager() -> CacheManager {
        CacheManager::new(Cache::new(CacheStore::new(20, 300_000)))
    }

    async fn seed(manager: &CacheManager, keys: &[&str]) {
        for key in keys {
            manager.cache().set(*key, json!({"k": key}), None).await;
        }
    }

    #[tokio::test]
    async fn test_clear_all_cache() {
        let manager = manager();
        seed(&manager, &["test:1", "test:2"]).await;

        let result = manager.clear_all_cache().await;

        assert!(result.message.contains("cleared successfully"));
        assert_eq!(manager.get_cache_stats().await.total_entries, 0);
    }

    #[tokio::test]
    async fn test_clear_cache_pattern() {
        let manager = manager();
        seed(&manager, &["movies:list:page1", "movies:list:page2", "theaters:list"]).await;

        let result = manager.clear_cache_pattern("movies:list:*").await;

        assert!(result.message.contains("movies:list:*"));
        assert_eq!(manager.get_cache_keys().await, vec!["theaters:list".to_string()]);
    }

    #[tokio::test]
    async fn test_clear_movie_cache() {
        let manager = manager();
        seed(
            &manager,
            &[
                "movies:read:movieId:7",
                "movies:theaters:movieId:7",
                "movies:reviews:movieId:7",
                "movies:read:movieId:8",
                "movies:list:page:1",
                "movies:list",
                "theaters:list",
            ],
        )
        .await;

        let result = manager.clear_movie_cache(7).await;

        assert_eq!(result.message, "Cache cleared for movie 7");
        assert_eq!(
            manager.get_cache_keys().await,
            vec![
                "movies:read:movieId:8".to_string(),
                "movies:list".to_string(),
                "theaters:list".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_clear_review_cache() {
        let manager = manager();
        seed(
            &manager,
            &[
                "reviews:read:review_id:3",
                "reviews:update:reviewId:3",
                "movies:reviews:movieId:1",
                "reviews:read:review_id:4",
            ],
        )
        .await;

        manager.clear_review_cache("3").await;

        assert_eq!(
            manager.get_cache_keys().await,
            vec!["reviews:read:review_id:4".to_string()]
        );
    }

    #[tokio::test]
    async fn test_clear_entity_cache_continues_past_empty_templates() {
        let manager = manager();
        seed(&manager, &["a:42", "c:42"]).await;

        let removed = manager
            .clear_entity_cache(42, &["a:{id}", "b:{id}", "c:{id}"])
            .await;

        assert_eq!(removed, 2);
        assert!(manager.get_cache_keys().await.is_empty());
    }

    #[tokio::test]
    async fn test_clear_theaters_cache() {
        let manager = manager();
        seed(&manager, &["theaters:list", "theaters:list:city:nyc", "movies:list"]).await;

        manager.clear_theaters_cache().await;

        assert_eq!(manager.get_cache_keys().await, vec!["movies:list".to_string()]);
    }

    #[tokio::test]
    async fn test_health_check_on_empty_store() {
        let report = manager().cache_health_check().await;

        assert!(report.healthy);
        assert_eq!(report.stats.total_entries, 0);
        assert!(chrono::DateTime::parse_from_rfc3339(&report.timestamp).is_ok());
    }

    #[tokio::test]
    async fn test_warm_up_success() {
        let warmers: Vec<Arc<dyn CacheWarmer>> = vec![
            Arc::new(ListWarmer {
                key: "movies:list:limit:10|page:1",
            }),
            Arc::new(ListWarmer {
                key: "theaters:list",
            }),
        ];
        let manager = manager().with_warmers(warmers);

        let report = manager.warm_up_cache().await;

        assert_eq!(
            report,
            WarmUpReport::Warmed {
                message: CACHE_WARMED_UP.to_string()
            }
        );
        assert!(manager.cache().has("theaters:list").await);
        assert_eq!(manager.get_cache_stats().await.active_entries, 2);
    }

    #[tokio::test]
    async fn test_warm_up_failure_is_reported() {
        let warmers: Vec<Arc<dyn CacheWarmer>> = vec![
            Arc::new(FailingWarmer),
            Arc::new(ListWarmer {
                key: "theaters:list",
            }),
        ];
        let manager = manager().with_warmers(warmers);

        let report = manager.warm_up_cache().await;

        assert!(!report.is_success());
        assert_eq!(
            report,
            WarmUpReport::Failed {
                error: CACHE_WARMUP_FAILED.to_string(),
                details: "connection refused".to_string(),
            }
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["error"], CACHE_WARMUP_FAILED);
    }

    #[tokio::test]
    async fn test_warm_up_panic_is_reported() {
        let warmers: Vec<Arc<dyn CacheWarmer>> = vec![
            Arc::new(ListWarmer {
                key: "movies:list",
            }),
            Arc::new(PanickingWarmer),
            Arc::new(ListWarmer {
                key: "theaters:list",
            }),
        ];
        let manager = manager().with_warmers(warmers);

        let report = manager.warm_up_cache().await;

        assert_eq!(
            report,
            WarmUpReport::Failed {
                error: CACHE_WARMUP_FAILED.to_string(),
                details: "warmer 'reviews' panicked: review source unavailable".to_string(),
            }
        );
        assert!(manager.cache().has("movies:list").await);
        assert!(!manager.cache().has("theaters:list").await);

        // The cache stays usable after the failed source
        manager.cache().set("theaters:list", json!([]), None).await;
        assert!(manager.cache().has("theaters:list").await);
    }

    #[tokio::test]
    async fn test_warm_up_without_sources() {
        assert!(manager().warm_up_cache().await.is_success());
    }
}
