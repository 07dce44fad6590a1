//! Eviction strategies
//!
//! An [`EvictionStrategy`] decides which entries leave a cache. The engine
//! calls it at three points, always while holding the write lock:
//!
//! | Hook | When | Used by |
//! |------|------|---------|
//! | [`prune`](EvictionStrategy::prune) | before inserting into a full cache, and on manual/scheduled prune | all |
//! | [`on_insert`](EvictionStrategy::on_insert) | after every insertion | [`Lru`] |
//! | [`on_access`](EvictionStrategy::on_access) | after a hit, when [`promotes_on_access`](EvictionStrategy::promotes_on_access) is true | [`Lru`] |
//!
//! Strategies never touch the map directly. Every removal goes through the
//! [`EvictionContext`], which notifies the cache's
//! [`Occupancy`](super::Occupancy) and updates the eviction/expiration
//! counters.

use std::hash::Hash;

use indexmap::IndexMap;

use super::entry::CacheEntry;
use super::occupancy::Occupancy;
use super::stats::MetricsCollector;

mod fifo;
mod lfu;
mod lru;
mod timed;

pub use fifo::Fifo;
pub use lfu::Lfu;
pub use lru::Lru;
pub use timed::Timed;

/// Policy deciding which entries a cache removes
pub trait EvictionStrategy: Send + Sync + 'static {
    /// Short lowercase name used in logs
    fn name(&self) -> &'static str;

    /// Whether a hit must reorder the entry (and so needs the write lock).
    fn promotes_on_access(&self) -> bool {
        false
    }

    /// Called after a hit on the entry at `index` when
    /// [`promotes_on_access`](Self::promotes_on_access) is true.
    fn on_access<K: Hash + Eq, V>(&self, _ctx: &mut EvictionContext<'_, K, V>, _index: usize) {}

    /// Called after every insertion; returns the number of entries removed.
    fn on_insert<K: Hash + Eq, V>(&self, _ctx: &mut EvictionContext<'_, K, V>) -> usize {
        0
    }

    /// Removes expired and/or over-capacity entries; returns how many.
    fn prune<K: Hash + Eq, V>(&self, ctx: &mut EvictionContext<'_, K, V>) -> usize;
}

/// Mutable view of a cache's entries handed to a strategy
///
/// Entries are kept in order: insertion order, with the back being the most
/// recently inserted (or, for [`Lru`], most recently used) entry.
pub struct EvictionContext<'a, K, V> {
    entries: &'a mut IndexMap<K, CacheEntry<V>>,
    occupancy: &'a dyn Occupancy<K, V>,
    metrics: &'a MetricsCollector,
    capacity: usize,
    now: u64,
    expiry_active: bool,
}

impl<'a, K, V> EvictionContext<'a, K, V>
where
    K: Hash + Eq,
{
    pub(crate) fn new(
        entries: &'a mut IndexMap<K, CacheEntry<V>>,
        occupancy: &'a dyn Occupancy<K, V>,
        metrics: &'a MetricsCollector,
        capacity: usize,
        now: u64,
        expiry_active: bool,
    ) -> Self {
        Self { entries, occupancy, metrics, capacity, now, expiry_active }
    }

    /// Number of entries currently stored
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured capacity (0 = unbounded)
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the cache's occupancy considers it full
    pub fn is_full(&self) -> bool {
        self.occupancy.is_full(self.entries.len(), self.capacity)
    }

    /// Whether any entry can expire (a default ttl is set, or a ttl was ever
    /// passed to `put_with_ttl`)
    pub const fn expiry_active(&self) -> bool {
        self.expiry_active
    }

    /// Entry at `index` in cache order
    pub fn get_index(&self, index: usize) -> Option<(&K, &CacheEntry<V>)> {
        self.entries.get_index(index)
    }

    /// Removes every expired entry; returns how many.
    pub fn remove_expired(&mut self) -> usize {
        self.remove_expired_visiting(|_, _| {})
    }

    /// Removes every expired entry in one pass and calls `visit` on each
    /// survivor, in order. Returns the number removed.
    pub fn remove_expired_visiting<F>(&mut self, mut visit: F) -> usize
    where
        F: FnMut(&K, &mut CacheEntry<V>),
    {
        let occupancy = self.occupancy;
        let now = self.now;
        let before = self.entries.len();

        self.entries.retain(|key, entry| {
            if entry.is_expired(now) {
                occupancy.on_remove(key, entry.value());
                false
            } else {
                visit(key, entry);
                true
            }
        });

        let removed = before - self.entries.len();
        self.metrics.record_expirations(removed);
        removed
    }

    /// Evicts the entry at `index`; returns false if there is none.
    pub fn evict_index(&mut self, index: usize) -> bool {
        match self.entries.shift_remove_index(index) {
            Some((key, entry)) => {
                self.occupancy.on_remove(&key, entry.value());
                self.metrics.record_evictions(1);
                true
            }
            None => false,
        }
    }

    /// Evicts every entry for which `predicate` returns true; returns how
    /// many.
    pub fn evict_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&K, &mut CacheEntry<V>) -> bool,
    {
        let occupancy = self.occupancy;
        let before = self.entries.len();

        self.entries.retain(|key, entry| {
            if predicate(key, entry) {
                occupancy.on_remove(key, entry.value());
                false
            } else {
                true
            }
        });

        let removed = before - self.entries.len();
        self.metrics.record_evictions(removed);
        removed
    }

    /// Moves the entry at `index` to the back of the order.
    pub fn move_to_back(&mut self, index: usize) {
        let len = self.entries.len();
        if index < len {
            self.entries.move_index(index, len - 1);
        }
    }

    /// Removes the entry at `index` because it expired.
    pub(crate) fn expire_index(&mut self, index: usize) -> bool {
        match self.entries.shift_remove_index(index) {
            Some((key, entry)) => {
                self.occupancy.on_remove(&key, entry.value());
                self.metrics.record_expirations(1);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Fixtures shared by the strategy unit tests.
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    pub(crate) const MS: u64 = 1_000_000;

    /// Occupancy that counts removals on top of the default fullness rule.
    #[derive(Default)]
    pub(crate) struct CountingOccupancy {
        pub(crate) removed: AtomicUsize,
    }

    impl<K, V> Occupancy<K, V> for CountingOccupancy {
        fn on_remove(&self, _key: &K, _value: &V) {
            self.removed.fetch_add(1, Ordering::Relaxed);
        }
    }

    impl CountingOccupancy {
        pub(crate) fn removed(&self) -> usize {
            self.removed.load(Ordering::Relaxed)
        }
    }

    /// Builds an ordered map from `(key, ttl_ms, reads)` triples, all
    /// inserted at time zero.
    pub(crate) fn entries(layout: &[(&'static str, u64, u64)]) -> IndexMap<&'static str, CacheEntry<u64>> {
        layout.iter()
            .enumerate()
            .map(|(i, &(key, ttl_ms, reads))| {
                let entry = CacheEntry::new(i as u64, Duration::from_millis(ttl_ms), 0);
                for _ in 0..reads {
                    entry.touch(0);
                }
                (key, entry)
            })
            .collect()
    }

    pub(crate) fn keys(map: &IndexMap<&'static str, CacheEntry<u64>>) -> Vec<&'static str> {
        map.keys().copied().collect()
    }
}
