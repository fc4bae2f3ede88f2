//! Revalidation Observer Module
//!
//! The interface the cache owner registers to revalidate resident entries
//! on each refresh tick.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::AccessTracker;

// == Revalidator ==
/// Observer invoked once per occupied slot on every refresh tick.
///
/// The implementation receives the entry (key, value, and access statistics)
/// and may report a replacement value for that key. A reported value is
/// applied through the normal store path, so it counts as an access like any
/// other write. Returning `None` leaves the entry untouched.
pub trait Revalidator<K, V>: Send + Sync {
    /// Revalidates one resident entry, optionally reporting a new value.
    fn revalidate(&self, entry: &AccessTracker<K, V>) -> Option<V>;
}

/// Any `Fn(&AccessTracker<K, V>) -> Option<V>` closure is a revalidator.
impl<K, V, F> Revalidator<K, V> for F
where
    F: Fn(&AccessTracker<K, V>) -> Option<V> + Send + Sync,
{
    fn revalidate(&self, entry: &AccessTracker<K, V>) -> Option<V> {
        self(entry)
    }
}

// == Shared Registration ==
/// Registration slot shared between the cache handle and the refresh task.
///
/// `None` means no revalidator is registered, and a refresh tick is a no-op.
pub type SharedRevalidator<K, V> = Arc<RwLock<Option<Arc<dyn Revalidator<K, V>>>>>;
