//! Cache Handle Module
//!
//! Async ownership layer around the cache store: shared locking, the
//! refresh timer lifecycle, and revalidator registration.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheStore, Revalidator, SharedRevalidator, StatsSnapshot};
use crate::config::Config;
use crate::error::ConfigError;
use crate::tasks::spawn_refresh_task;

// == Refresh Timer ==
/// Lifecycle state of the periodic refresh timer.
///
/// Transitions happen only at construction, on reconfigure, and on
/// shutdown; `get` and `store` never touch the timer.
#[derive(Debug)]
enum RefreshTimer {
    Disabled,
    Enabled {
        interval: Duration,
        handle: JoinHandle<()>,
    },
}

// == Scored Cache ==
/// Owning handle over a [`CacheStore`] shared with the refresh task.
///
/// The store itself carries no locking; this handle guards every read and
/// write of the slot array and index behind one `RwLock`, and the refresh
/// task takes the same lock for each full pass. `get` and `store` both take
/// the write half because every lookup mutates access statistics.
///
/// When refresh is enabled the handle must be created inside a Tokio
/// runtime, since construction spawns the timer task.
pub struct ScoredCache<K, V> {
    /// Shared cache store
    cache: Arc<RwLock<CacheStore<K, V>>>,
    /// Registered revalidation observer, if any
    revalidator: SharedRevalidator<K, V>,
    /// Periodic refresh timer state
    timer: RefreshTimer,
}

impl<K, V> ScoredCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a cache from a validated configuration.
    ///
    /// Rejects invalid configurations (an enabled refresh with a zero
    /// interval). When refresh is enabled, the timer task starts
    /// immediately; ticks before a revalidator is registered are no-ops.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let cache = Arc::new(RwLock::new(CacheStore::new(config.cache_size)));
        let revalidator: SharedRevalidator<K, V> = Arc::new(RwLock::new(None));
        let timer = Self::start_timer(&cache, &revalidator, config);

        Ok(Self {
            cache,
            revalidator,
            timer,
        })
    }

    fn start_timer(
        cache: &Arc<RwLock<CacheStore<K, V>>>,
        revalidator: &SharedRevalidator<K, V>,
        config: &Config,
    ) -> RefreshTimer {
        if !config.enable_refresh {
            return RefreshTimer::Disabled;
        }

        let interval = Duration::from_millis(config.refresh_interval_ms);
        let handle = spawn_refresh_task(Arc::clone(cache), Arc::clone(revalidator), interval);
        RefreshTimer::Enabled { interval, handle }
    }

    // == Get ==
    /// Retrieves a value by key; a hit counts as an access on the entry.
    pub async fn get(&self, key: &K) -> Option<V> {
        self.cache.write().await.get(key)
    }

    // == Store ==
    /// Stores a key-value pair through the scored-eviction insert path.
    ///
    /// Silent no-op when the configured capacity is zero.
    pub async fn store(&self, key: K, value: V) {
        let _ = self.cache.write().await.store(key, value);
    }

    // == Revalidator Registration ==
    /// Registers the observer invoked for every resident entry on each
    /// refresh tick. Replaces any previously registered observer.
    pub async fn set_revalidator(&self, revalidator: Arc<dyn Revalidator<K, V>>) {
        *self.revalidator.write().await = Some(revalidator);
    }

    // == Reconfigure ==
    /// Destructively rebuilds the cache with new settings.
    ///
    /// The timer is stopped before the swap so no tick can interleave with
    /// the rebuild, the store is rebuilt under the write lock (discarding
    /// every resident entry), and the timer is then restarted if the new
    /// configuration enables refresh. The registered revalidator survives.
    pub async fn reconfigure(&mut self, config: &Config) -> Result<(), ConfigError> {
        config.validate()?;

        self.stop_timer();
        {
            let mut cache = self.cache.write().await;
            cache.rebuild(config.cache_size);
        }
        self.timer = Self::start_timer(&self.cache, &self.revalidator, config);

        info!(
            "Cache reconfigured: capacity={}, refresh={}",
            config.cache_size,
            if config.enable_refresh {
                format!("every {} ms", config.refresh_interval_ms)
            } else {
                "disabled".to_string()
            }
        );
        Ok(())
    }

    // == Shutdown ==
    /// Stops the refresh timer. Safe to call repeatedly; `get` and `store`
    /// remain usable afterwards, but no further refresh ticks occur.
    pub fn shutdown(&mut self) {
        if matches!(self.timer, RefreshTimer::Enabled { .. }) {
            debug!("Stopping refresh timer");
        }
        self.stop_timer();
    }

    fn stop_timer(&mut self) {
        if let RefreshTimer::Enabled { handle, .. } =
            std::mem::replace(&mut self.timer, RefreshTimer::Disabled)
        {
            handle.abort();
        }
    }

    // == Refresh Interval ==
    /// Returns the active refresh interval, or `None` while the timer is
    /// disabled.
    pub fn refresh_interval(&self) -> Option<Duration> {
        match self.timer {
            RefreshTimer::Enabled { interval, .. } => Some(interval),
            RefreshTimer::Disabled => None,
        }
    }

    // == Stats ==
    /// Captures a point-in-time statistics snapshot.
    pub async fn stats(&self) -> StatsSnapshot {
        let cache = self.cache.read().await;
        cache.stats().snapshot(cache.capacity())
    }
}

impl<K, V> Drop for ScoredCache<K, V> {
    fn drop(&mut self) {
        if let RefreshTimer::Enabled { handle, .. } = &self.timer {
            handle.abort();
        }
    }
}
