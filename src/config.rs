//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::cache::{CacheSettings, DEFAULT_TTL_MS, MAX_EXERCISES_PER_TYPE};

/// Default directory the file-backed store writes into
pub const DEFAULT_CACHE_DIR: &str = ".exercise_cache";

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Directory holding the persisted collections
    pub cache_dir: PathBuf,
    /// Record time-to-live in seconds
    pub ttl_secs: u64,
    /// Maximum cached exercises per exercise type
    pub max_per_type: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_DIR` - Storage directory (default: `.exercise_cache`)
    /// - `CACHE_TTL_SECS` - Record TTL in seconds (default: 86400)
    /// - `MAX_EXERCISES_PER_TYPE` - Per-type capacity (default: 100)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            cache_dir: env::var("CACHE_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            ttl_secs: env::var("CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.ttl_secs),
            max_per_type: env::var("MAX_EXERCISES_PER_TYPE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.max_per_type),
        }
    }

    /// Limits handed to the cache facade.
    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings {
            ttl_ms: self.ttl_secs.saturating_mul(1000),
            max_per_type: self.max_per_type,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            ttl_secs: DEFAULT_TTL_MS / 1000,
            max_per_type: MAX_EXERCISES_PER_TYPE,
        }
    }
}
