//! Scored Cache - a fixed-capacity in-memory cache
//!
//! Eviction is driven by a per-entry staleness score computed from access
//! frequency, access recency, and entry age; a periodic refresh task offers
//! every resident entry to a registered revalidator.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{
    AccessTracker, CacheStats, CacheStore, Revalidator, ScoredCache, SharedRevalidator,
    StatsSnapshot,
};
pub use config::Config;
pub use error::ConfigError;
pub use tasks::spawn_refresh_task;
