//! Error types for the cache
//!
//! The cache core itself has no failure modes: lookups miss with `None`, a
//! zero-capacity store ignores writes, and shutdown is idempotent. The only
//! rejection happens at the configuration boundary.

use thiserror::Error;

// == Config Error Enum ==
/// Configuration rejected at construction or reconfigure time.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Refresh is enabled but the timer period is zero
    #[error("refresh interval must be positive when refresh is enabled")]
    ZeroRefreshInterval,
}
