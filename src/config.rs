//! Configuration Module
//!
//! Handles loading and validating server configuration from environment variables.
//! Built once in `main` and passed to the components that need it.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{CacheSettings, DEFAULT_MAX_ENTRIES, DEFAULT_TTL_SECS};
use crate::error::ConfigError;
use crate::service::ImportPolicy;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of players the cache can hold
    pub cache_max_entries: usize,
    /// Seconds a cached player stays fresh after it was written
    pub cache_ttl_secs: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// How bulk imports treat invalid players
    pub import_policy: ImportPolicy,
    /// CSV file imported once at startup
    pub seed_csv: Option<PathBuf>,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cached players (default: 5)
    /// - `CACHE_TTL_SECS` - Cache freshness window in seconds (default: 600)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Expired-entry sweep frequency in seconds (default: 60)
    /// - `IMPORT_POLICY` - `fail-fast` or `best-effort` (default: fail-fast)
    /// - `SEED_CSV` - Optional CSV file imported at startup
    ///
    /// Unparseable values fall back to their defaults. An unknown import
    /// policy is an error, since silently changing it would change which
    /// players get committed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let import_policy = match env::var("IMPORT_POLICY") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.import_policy,
        };

        Ok(Self {
            cache_max_entries: env_or("CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            cache_ttl_secs: env_or("CACHE_TTL_SECS", defaults.cache_ttl_secs),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            import_policy,
            seed_csv: env::var_os("SEED_CSV")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        })
    }

    /// Rejects values the cache and background tasks cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_max_entries == 0 {
            return Err(ConfigError::NotPositive("CACHE_MAX_ENTRIES"));
        }
        if self.cache_ttl_secs == 0 {
            return Err(ConfigError::NotPositive("CACHE_TTL_SECS"));
        }
        if self.cleanup_interval == 0 {
            return Err(ConfigError::NotPositive("CLEANUP_INTERVAL"));
        }
        Ok(())
    }

    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings::new(
            Duration::from_secs(self.cache_ttl_secs),
            self.cache_max_entries,
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_max_entries: DEFAULT_MAX_ENTRIES,
            cache_ttl_secs: DEFAULT_TTL_SECS,
            server_port: 3000,
            cleanup_interval: 60,
            import_policy: ImportPolicy::FailFast,
            seed_csv: None,
        }
    }
}
