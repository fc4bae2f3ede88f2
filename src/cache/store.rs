//! Cache Store Module
//!
//! Main cache engine combining a fixed-length slot array with a key-to-slot
//! index and staleness-scored eviction.

use std::collections::HashMap;
use std::hash::Hash;

use crate::cache::{AccessTracker, CacheStats, Revalidator};

// == Cache Store ==
/// Fixed-capacity cache storage with staleness-scored eviction.
///
/// Entries live in a slot array whose length equals the configured capacity
/// and never changes outside [`CacheStore::rebuild`]. A key-to-slot index
/// gives O(1) lookups; the index is bijective with the set of occupied
/// slots. Inserting a new key scans every slot once and claims the slot
/// whose entry has the largest [`AccessTracker::score`], with empty slots
/// always preferred over evicting a live entry.
///
/// The store is plain synchronous state with no internal locking. Callers
/// must serialize access; [`crate::ScoredCache`] does so behind a single
/// write lock shared with the refresh task.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Slot array, one position per unit of capacity
    slots: Vec<Option<AccessTracker<K, V>>>,
    /// Key-to-slot index, bijective with the occupied slots
    index: HashMap<K, usize>,
    /// Performance statistics
    stats: CacheStats,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore with the given number of slots.
    ///
    /// A zero-capacity store is valid: `store` is a silent no-op and `get`
    /// always misses.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            index: HashMap::new(),
            stats: CacheStats::new(),
        }
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A hit counts as an access on the entry: the access counter, the
    /// last-access stamp, and the running interval mean all advance. There
    /// is no non-counting read of a value through the store.
    pub fn get(&mut self, key: &K) -> Option<V> {
        if let Some(&position) = self.index.get(key) {
            if let Some(tracker) = self.slots[position].as_mut() {
                self.stats.record_hit();
                return Some(tracker.read().clone());
            }
        }

        self.stats.record_miss();
        None
    }

    // == Store ==
    /// Stores a key-value pair, returning the resident entry.
    ///
    /// If the key is already resident, the value is replaced in place; the
    /// write counts as one access and the entry keeps its creation stamp
    /// and access count. Otherwise the best slot is claimed via
    /// [`CacheStore::best_slot_for_insertion`], evicting its occupant if
    /// necessary, and the new entry's initial value write is recorded (so a
    /// freshly inserted entry has an access count of one).
    ///
    /// Returns `None` only when the store has zero capacity, in which case
    /// nothing is stored.
    pub fn store(&mut self, key: K, value: V) -> Option<&AccessTracker<K, V>> {
        if self.slots.is_empty() {
            return None;
        }

        // Overwrite case: replace the value in place
        if let Some(&position) = self.index.get(&key) {
            if let Some(tracker) = self.slots[position].as_mut() {
                tracker.replace(value);
                return self.slots[position].as_ref();
            }
        }

        // New key: claim the stalest (or an empty) slot
        let position = self.best_slot_for_insertion()?;
        if let Some(evicted) = self.slots[position].take() {
            self.index.remove(evicted.key());
            self.stats.record_eviction();
        }

        let mut tracker = AccessTracker::new(key.clone(), value);
        tracker.access();
        self.slots[position] = Some(tracker);
        self.index.insert(key, position);
        self.stats.set_total_entries(self.index.len());

        self.slots[position].as_ref()
    }

    // == Best Slot ==
    /// Selects the slot a new key should claim.
    ///
    /// Scans all slots once. An empty slot has an effective score larger
    /// than any real score, so one is always preferred over evicting a live
    /// entry. Among occupied slots the strictly largest score wins; ties
    /// break to the first slot encountered in scan order, making the choice
    /// deterministic. O(capacity) per new-key insertion; no ordered
    /// auxiliary structure is kept because scores change with the clock.
    ///
    /// Returns `None` only for a zero-capacity store.
    pub fn best_slot_for_insertion(&self) -> Option<usize> {
        let mut best_position = None;
        let mut best_score = f64::NEG_INFINITY;

        for (position, slot) in self.slots.iter().enumerate() {
            let score = match slot {
                Some(tracker) => tracker.score(),
                None => f64::INFINITY,
            };
            if score > best_score {
                best_score = score;
                best_position = Some(position);
            }
        }

        best_position
    }

    // == Refresh ==
    /// Runs one refresh pass, offering every resident entry for
    /// revalidation.
    ///
    /// Slots are visited in physical order, empty ones skipped. Each value
    /// the revalidator reports is applied through the normal store path and
    /// therefore counts as an access on that entry. Returns the number of
    /// entries offered; a pass over an empty store offers zero.
    pub fn refresh_entries(&mut self, revalidator: &dyn Revalidator<K, V>) -> usize {
        let mut offered = 0;

        for position in 0..self.slots.len() {
            let report = match self.slots[position].as_ref() {
                Some(tracker) => {
                    offered += 1;
                    revalidator
                        .revalidate(tracker)
                        .map(|value| (tracker.key().clone(), value))
                }
                None => continue,
            };

            if let Some((key, value)) = report {
                let _ = self.store(key, value);
            }
        }

        self.stats.record_refresh_pass();
        offered
    }

    // == Rebuild ==
    /// Destructively rebuilds the store with a new capacity.
    ///
    /// Every resident entry is discarded unconditionally; this is a cold
    /// reset, not a resize-and-migrate. Cumulative statistics counters
    /// survive, the entry count drops to zero.
    pub fn rebuild(&mut self, new_capacity: usize) {
        self.slots = (0..new_capacity).map(|_| None).collect();
        self.index = HashMap::new();
        self.stats.set_total_entries(0);
    }

    // == Entries ==
    /// Iterates the occupied slots in physical order as
    /// `(slot position, entry)` pairs.
    ///
    /// This is the same non-counting inspection view a revalidator gets;
    /// reading values through it does not advance access statistics.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &AccessTracker<K, V>)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(position, slot)| slot.as_ref().map(|tracker| (position, tracker)))
    }

    // == Contains ==
    /// Checks whether a key is resident without counting an access.
    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    // == Length ==
    /// Returns the current number of resident entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    /// Returns true if no entry is resident.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Capacity ==
    /// Returns the configured slot count.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.index.len());
        stats
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_store_new() {
        let store: CacheStore<String, String> = CacheStore::new(8);
        assert_eq!(store.len(), 0);
        assert_eq!(store.capacity(), 8);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_and_get() {
        let mut store = CacheStore::new(8);

        let _ = store.store("key1".to_string(), "value1".to_string());
        let value = store.get(&"key1".to_string());

        assert_eq!(value, Some("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_nonexistent() {
        let mut store: CacheStore<String, String> = CacheStore::new(8);

        assert_eq!(store.get(&"nonexistent".to_string()), None);
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_overwrite_keeps_entry_history() {
        let mut store = CacheStore::new(1);

        let created_at = store
            .store("k".to_string(), 1)
            .map(|tracker| tracker.created_at())
            .unwrap();
        let entry = store.store("k".to_string(), 2).unwrap();

        assert_eq!(*entry.value(), 2);
        assert_eq!(entry.access_count(), 2);
        assert_eq!(entry.created_at(), created_at);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&"k".to_string()), Some(2));
    }

    #[test]
    fn test_zero_capacity_store_is_noop() {
        let mut store = CacheStore::new(0);

        assert!(store.store("k".to_string(), 1).is_none());
        assert_eq!(store.len(), 0);
        assert_eq!(store.get(&"k".to_string()), None);
        assert_eq!(store.best_slot_for_insertion(), None);
    }

    #[test]
    fn test_empty_slot_preferred_over_eviction() {
        let mut store = CacheStore::new(3);

        let _ = store.store("a".to_string(), 1);
        let _ = store.store("b".to_string(), 2);

        // Slot 2 is the only empty one and must win over both live entries.
        assert_eq!(store.best_slot_for_insertion(), Some(2));

        let _ = store.store("c".to_string(), 3);
        assert_eq!(store.len(), 3);
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_eviction_picks_highest_score() {
        let mut store = CacheStore::new(2);

        let _ = store.store("a".to_string(), 1);
        let _ = store.store("b".to_string(), 2);

        // Give "b" a second access with a real gap so its interval mean is
        // nonzero, then let it idle. "a" keeps a zero mean and scores 0.
        sleep(Duration::from_millis(20));
        let _ = store.get(&"b".to_string());
        sleep(Duration::from_millis(20));

        let _ = store.store("c".to_string(), 3);

        assert!(store.contains_key(&"a".to_string()));
        assert!(!store.contains_key(&"b".to_string()));
        assert!(store.contains_key(&"c".to_string()));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_eviction_tie_breaks_to_first_slot() {
        let mut store = CacheStore::new(2);

        // Both entries hold a zero score (single access, zero mean gap).
        let _ = store.store("a".to_string(), 1);
        let _ = store.store("b".to_string(), 2);

        assert_eq!(store.best_slot_for_insertion(), Some(0));

        let _ = store.store("c".to_string(), 3);
        assert!(!store.contains_key(&"a".to_string()));
        assert!(store.contains_key(&"b".to_string()));
        assert!(store.contains_key(&"c".to_string()));
    }

    #[test]
    fn test_best_slot_score_dominates_occupied_slots() {
        let mut store = CacheStore::new(3);

        let _ = store.store("a".to_string(), 1);
        sleep(Duration::from_millis(10));
        let _ = store.get(&"a".to_string());
        let _ = store.store("b".to_string(), 2);
        sleep(Duration::from_millis(10));
        let _ = store.get(&"b".to_string());
        let _ = store.store("c".to_string(), 3);
        sleep(Duration::from_millis(10));

        // Snapshot scores before selection. Untouched entries only grow
        // staler, so the winner's current score must dominate the snapshot.
        let snapshot: Vec<(usize, f64)> = store
            .entries()
            .map(|(position, tracker)| (position, tracker.score()))
            .collect();
        let best = store.best_slot_for_insertion().unwrap();
        let best_score = store
            .entries()
            .find(|(position, _)| *position == best)
            .map(|(_, tracker)| tracker.score())
            .unwrap();

        for (position, score) in snapshot {
            assert!(
                best_score >= score,
                "slot {} scored {} above selected {}",
                position,
                score,
                best_score
            );
        }
    }

    #[test]
    fn test_capacity_bound_holds() {
        let mut store = CacheStore::new(3);

        for i in 0..20 {
            let _ = store.store(format!("key{}", i), i);
            assert!(store.len() <= 3);
        }
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_eviction_removes_key_from_index() {
        let mut store = CacheStore::new(1);

        let _ = store.store("a".to_string(), 1);
        let _ = store.store("b".to_string(), 2);

        assert!(!store.contains_key(&"a".to_string()));
        assert_eq!(store.get(&"a".to_string()), None);
        assert_eq!(store.get(&"b".to_string()), Some(2));
    }

    #[test]
    fn test_index_matches_occupied_slots() {
        let mut store = CacheStore::new(4);

        for i in 0..10 {
            let _ = store.store(format!("key{}", i % 6), i);
        }

        // Every index entry points at a slot holding that exact key, and no
        // two index entries share a slot.
        let mut seen_positions = HashSet::new();
        for (key, &position) in &store.index {
            let tracker = store.slots[position].as_ref().unwrap();
            assert_eq!(tracker.key(), key);
            assert!(seen_positions.insert(position));
        }
        assert_eq!(store.index.len(), store.entries().count());
    }

    #[test]
    fn test_rebuild_discards_all_entries() {
        let mut store = CacheStore::new(4);

        let _ = store.store("a".to_string(), 1);
        let _ = store.store("b".to_string(), 2);
        store.rebuild(2);

        assert_eq!(store.capacity(), 2);
        assert_eq!(store.len(), 0);
        assert_eq!(store.get(&"a".to_string()), None);
        assert_eq!(store.get(&"b".to_string()), None);
    }

    #[test]
    fn test_stats_track_operations() {
        let mut store = CacheStore::new(2);

        let _ = store.store("a".to_string(), 1);
        let _ = store.get(&"a".to_string());
        let _ = store.get(&"missing".to_string());

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    struct Doubling {
        calls: AtomicUsize,
    }

    impl Revalidator<String, i32> for Doubling {
        fn revalidate(&self, entry: &AccessTracker<String, i32>) -> Option<i32> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Some(entry.value() * 2)
        }
    }

    #[test]
    fn test_refresh_offers_every_resident_entry() {
        let mut store = CacheStore::new(4);
        let revalidator = Doubling {
            calls: AtomicUsize::new(0),
        };

        let _ = store.store("a".to_string(), 10);
        let _ = store.store("b".to_string(), 20);

        let offered = store.refresh_entries(&revalidator);

        assert_eq!(offered, 2);
        assert_eq!(revalidator.calls.load(Ordering::SeqCst), 2);
        assert_eq!(store.get(&"a".to_string()), Some(20));
        assert_eq!(store.get(&"b".to_string()), Some(40));
        assert_eq!(store.stats().refresh_passes, 1);
    }

    #[test]
    fn test_refresh_replacement_counts_as_access() {
        let mut store = CacheStore::new(2);
        let revalidator = Doubling {
            calls: AtomicUsize::new(0),
        };

        let _ = store.store("a".to_string(), 10);
        store.refresh_entries(&revalidator);

        let entry = store.entries().next().map(|(_, tracker)| tracker).unwrap();
        assert_eq!(entry.access_count(), 2);
        assert_eq!(*entry.value(), 20);
    }

    #[test]
    fn test_refresh_on_empty_store_offers_nothing() {
        let mut store: CacheStore<String, i32> = CacheStore::new(4);
        let revalidator = Doubling {
            calls: AtomicUsize::new(0),
        };

        let offered = store.refresh_entries(&revalidator);

        assert_eq!(offered, 0);
        assert_eq!(revalidator.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_refresh_skipping_revalidator_leaves_values() {
        let mut store = CacheStore::new(2);
        let _ = store.store("a".to_string(), 10);

        let keep = |_entry: &AccessTracker<String, i32>| None::<i32>;
        let offered = store.refresh_entries(&keep);

        assert_eq!(offered, 1);
        assert_eq!(store.get(&"a".to_string()), Some(10));
    }
}
