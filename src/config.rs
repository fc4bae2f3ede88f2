//! Configuration Module
//!
//! Handles loading and validating cache configuration from environment
//! variables.

use std::env;

use crate::error::ConfigError;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults. Read at construction and again on every reconfigure.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of slots the cache holds
    pub cache_size: usize,
    /// Whether the periodic refresh timer runs
    pub enable_refresh: bool,
    /// Timer period in milliseconds, meaningful only while refresh is enabled
    pub refresh_interval_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_SIZE` - Number of cache slots (default: 1000)
    /// - `ENABLE_REFRESH` - Whether the refresh timer runs (default: true)
    /// - `REFRESH_INTERVAL_MS` - Refresh period in milliseconds (default: 30000)
    pub fn from_env() -> Self {
        Self {
            cache_size: env::var("CACHE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            enable_refresh: env::var("ENABLE_REFRESH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            refresh_interval_ms: env::var("REFRESH_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30_000),
        }
    }

    /// Validates the configuration.
    ///
    /// A zero refresh interval with refresh enabled is rejected; the timer
    /// period must be positive. A zero `cache_size` is legal and yields a
    /// store on which every `store` is a no-op.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enable_refresh && self.refresh_interval_ms == 0 {
            return Err(ConfigError::ZeroRefreshInterval);
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_size: 1000,
            enable_refresh: true,
            refresh_interval_ms: 30_000,
        }
    }
}
