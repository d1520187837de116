//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Cache and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default TTL in milliseconds for entries written without an explicit TTL
    pub default_ttl: u64,
    /// Maximum number of entries the cache can hold
    pub max_size: usize,
    /// Background sweep interval in milliseconds
    pub cleanup_interval: u64,
    /// HTTP port for the administrative surface
    pub server_port: u16,
    /// Run the registered warmers before serving
    pub warm_up_on_start: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL` - Default TTL in milliseconds (default: 300000)
    /// - `CACHE_MAX_SIZE` - Maximum cache entries (default: 20)
    /// - `CACHE_CLEANUP_INTERVAL` - Sweep interval in milliseconds (default: 60000)
    /// - `PORT` - HTTP server port (default: 5000)
    /// - `CACHE_WARMUP_ON_START` - Warm the cache at startup (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_ttl: env_or("CACHE_TTL", defaults.default_ttl),
            max_size: env_or("CACHE_MAX_SIZE", defaults.max_size).max(1),
            cleanup_interval: env_or("CACHE_CLEANUP_INTERVAL", defaults.cleanup_interval),
            server_port: env_or("PORT", defaults.server_port),
            warm_up_on_start: env_or("CACHE_WARMUP_ON_START", defaults.warm_up_on_start),
        }
    }

    /// Sweep interval as a Duration.
    pub fn cleanup_period(&self) -> Duration {
        Duration::from_millis(self.cleanup_interval)
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl: 300_000,
            max_size: 20,
            cleanup_interval: 60_000,
            server_port: 5000,
            warm_up_on_start: true,
        }
    }
}
