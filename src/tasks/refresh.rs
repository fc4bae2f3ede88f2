//! Periodic Refresh Task
//!
//! Background task that periodically offers every resident cache entry to
//! the registered revalidator.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheStore, SharedRevalidator};

/// Spawns a background task that periodically runs a refresh pass.
///
/// The task runs in an infinite loop, sleeping for the configured interval
/// between passes. Each pass snapshots the registered revalidator, then
/// holds the store's write lock for the whole slot iteration, so a pass is
/// never interleaved with `get` or `store`. Ticks that fire while no
/// revalidator is registered do nothing.
///
/// # Arguments
/// * `cache` - Shared reference to the cache store
/// * `revalidator` - Registration slot the owner writes its observer into
/// * `interval` - Time between refresh passes
///
/// # Returns
/// A JoinHandle for the spawned task; aborting it stops future ticks. An
/// in-flight pass holds the write lock and finishes before the abort lands.
pub fn spawn_refresh_task<K, V>(
    cache: Arc<RwLock<CacheStore<K, V>>>,
    revalidator: SharedRevalidator<K, V>,
    interval: Duration,
) -> JoinHandle<()>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(
            "Starting refresh task with interval of {} ms",
            interval.as_millis()
        );

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            // Snapshot the registration so the lock is not held across the pass
            let registered = { revalidator.read().await.clone() };
            let registered = match registered {
                Some(revalidator) => revalidator,
                None => {
                    debug!("Refresh tick: no revalidator registered");
                    continue;
                }
            };

            // Acquire the write lock for the entire pass
            let offered = {
                let mut cache_guard = cache.write().await;
                cache_guard.refresh_entries(registered.as_ref())
            };

            if offered > 0 {
                info!("Refresh tick: offered {} entries for revalidation", offered);
            } else {
                debug!("Refresh tick: no resident entries");
            }
        }
    })
}
