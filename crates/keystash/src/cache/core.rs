//! The cache engine shared by every strategy
//!
//! [`CacheMap`] owns the entries, the reader/writer lock, capacity, default
//! ttl and counters. What gets evicted is delegated to an
//! [`EvictionStrategy`]; what counts as "full" and what happens when an entry
//! leaves is delegated to an [`Occupancy`].

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::{debug, trace};

use super::config::CacheConfig;
use super::entry::CacheEntry;
use super::iter::LiveValues;
use super::occupancy::{EntryCount, Occupancy};
use super::stats::{CacheStats, MetricsCollector};
use super::strategy::{EvictionContext, EvictionStrategy, Fifo, Lfu, Lru, Timed};
use crate::clock::{saturating_nanos, Clock, SystemClock};

/// Cache evicting the oldest inserted entry
pub type FifoCache<K, V, C = SystemClock> = CacheMap<K, V, Fifo, C>;

/// Cache evicting the least recently used entry
pub type LruCache<K, V, C = SystemClock> = CacheMap<K, V, Lru, C>;

/// Cache evicting the least frequently used entries
pub type LfuCache<K, V, C = SystemClock> = CacheMap<K, V, Lfu, C>;

/// Cache that only ever removes expired entries
pub type TimedCache<K, V, C = SystemClock> = CacheMap<K, V, Timed, C>;

/// Internal storage for cache entries
#[derive(Debug)]
struct CacheStorage<K, V> {
    /// Front is the eldest entry
    entries: IndexMap<K, CacheEntry<V>>,
    /// Set by any put with a non-zero ttl; never cleared
    custom_ttl_used: bool,
}

/// Generic thread-safe cache with a pluggable eviction strategy
///
/// # Type Parameters
/// - `K`: Key type (must be `Eq + Hash`)
/// - `V`: Value type; lookups return clones
/// - `S`: The [`EvictionStrategy`]
/// - `C`: Clock type for expiry (defaults to [`SystemClock`])
///
/// # Example
/// ```
/// use keystash::cache::{CacheConfig, LruCache};
///
/// let cache: LruCache<String, i32> = LruCache::new(CacheConfig::bounded(2));
/// cache.put("a".to_string(), 1);
/// cache.put("b".to_string(), 2);
/// assert_eq!(cache.get("a"), Some(1));
///
/// cache.put("c".to_string(), 3);
/// assert_eq!(cache.get("b"), None);
/// assert_eq!(cache.len(), 2);
/// ```
pub struct CacheMap<K, V, S, C = SystemClock> {
    storage: RwLock<CacheStorage<K, V>>,
    strategy: S,
    capacity: usize,
    default_ttl: Duration,
    occupancy: Arc<dyn Occupancy<K, V>>,
    metrics: MetricsCollector,
    clock: C,
    epoch: Instant,
}

impl<K, V, S> CacheMap<K, V, S, SystemClock>
where
    K: Hash + Eq,
    S: EvictionStrategy + Default,
{
    /// Create a new cache with the given configuration using system clock
    pub fn new(config: CacheConfig) -> Self {
        Self::with_strategy(S::default(), config, SystemClock)
    }
}

impl<K, V, S, C> CacheMap<K, V, S, C>
where
    K: Hash + Eq,
    S: EvictionStrategy,
    C: Clock,
{
    /// Create a new cache with a custom clock (useful for testing)
    pub fn with_clock(config: CacheConfig, clock: C) -> Self
    where
        S: Default,
    {
        Self::with_strategy(S::default(), config, clock)
    }

    /// Create a cache around an explicit strategy instance
    pub fn with_strategy(strategy: S, config: CacheConfig, clock: C) -> Self {
        let epoch = clock.now();
        Self {
            storage: RwLock::new(CacheStorage { entries: IndexMap::new(), custom_ttl_used: false }),
            strategy,
            capacity: config.capacity,
            default_ttl: config.default_ttl,
            occupancy: Arc::new(EntryCount),
            metrics: MetricsCollector::new(),
            clock,
            epoch,
        }
    }

    /// Replace the occupancy hook
    ///
    /// Intended for construction time; entries already stored were never
    /// reported to the new hook.
    #[must_use]
    pub fn with_occupancy(mut self, occupancy: Arc<dyn Occupancy<K, V>>) -> Self {
        self.occupancy = occupancy;
        self
    }

    /// Maximum number of entries (0 = unbounded)
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Ttl applied by [`put`](Self::put) (zero = no expiry)
    pub const fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Name of the eviction strategy
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Insert a value with the default ttl
    pub fn put(&self, key: K, value: V) {
        self.put_with_ttl(key, value, self.default_ttl);
    }

    /// Insert a value with its own ttl (zero = never expires)
    ///
    /// If the cache is full, the strategy prunes before the insertion. Any
    /// previous entry for `key` is replaced by a fresh one at the back of the
    /// order, with its access count and last access reset.
    pub fn put_with_ttl(&self, key: K, value: V, ttl: Duration) {
        let mut guard = self.storage.write();
        // Read under the lock so last_access never predates the insertion
        let now = self.now();
        let storage = &mut *guard;

        if !ttl.is_zero() {
            storage.custom_ttl_used = true;
        }
        let expiry_active = self.expiry_active(storage.custom_ttl_used);

        self.occupancy.on_insert(&key, &value);

        let mut ctx = self.context(&mut storage.entries, now, expiry_active);
        if ctx.is_full() {
            let pruned = self.strategy.prune(&mut ctx);
            trace!(strategy = self.strategy.name(), pruned, "pruned before insert");
        }

        if let Some((_, old_key, old)) = storage.entries.shift_remove_full(&key) {
            self.occupancy.on_remove(&old_key, old.value());
        }
        storage.entries.insert(key, CacheEntry::new(value, ttl, now));
        self.metrics.record_insert();

        let mut ctx = self.context(&mut storage.entries, now, expiry_active);
        let evicted = self.strategy.on_insert(&mut ctx);
        if evicted > 0 {
            trace!(strategy = self.strategy.name(), evicted, "evicted after insert");
        }
    }

    /// Look up a value
    ///
    /// Returns `None` if the key is absent or its entry has expired; an
    /// expired entry found here is removed. A hit refreshes the entry's last
    /// access and bumps its access count.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        {
            let storage = self.storage.read();
            let now = self.now();
            match storage.entries.get(key) {
                None => {
                    self.metrics.record_miss();
                    return None;
                }
                Some(entry) if !entry.is_expired(now) && !self.strategy.promotes_on_access() => {
                    entry.touch(now);
                    self.metrics.record_hit();
                    return Some(entry.value().clone());
                }
                Some(_) => {}
            }
        }
        self.get_exclusive(key)
    }

    /// Slow path of `get`: re-validates under the write lock, then either
    /// evicts the expired entry or records the hit and lets the strategy
    /// reorder.
    fn get_exclusive<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let mut guard = self.storage.write();
        let now = self.now();
        let storage = &mut *guard;
        let expiry_active = self.expiry_active(storage.custom_ttl_used);

        let Some((index, _, entry)) = storage.entries.get_full(key) else {
            self.metrics.record_miss();
            return None;
        };

        if entry.is_expired(now) {
            self.context(&mut storage.entries, now, expiry_active).expire_index(index);
            self.metrics.record_miss();
            return None;
        }

        entry.touch(now);
        let value = entry.value().clone();
        if self.strategy.promotes_on_access() {
            let mut ctx = self.context(&mut storage.entries, now, expiry_active);
            self.strategy.on_access(&mut ctx, index);
        }
        self.metrics.record_hit();
        Some(value)
    }

    /// Get or insert with a generator function
    ///
    /// If the key exists and hasn't expired, returns the cached value.
    /// Otherwise, generates a new value, stores it with the default ttl and
    /// returns it.
    ///
    /// # Example
    /// ```
    /// use keystash::cache::{CacheConfig, FifoCache};
    ///
    /// let cache: FifoCache<&str, i32> = FifoCache::new(CacheConfig::bounded(100));
    /// assert_eq!(cache.get_or_insert_with("answer", || 42), 42);
    /// assert_eq!(cache.get_or_insert_with("answer", || 0), 42);
    /// ```
    pub fn get_or_insert_with<F>(&self, key: K, f: F) -> V
    where
        F: FnOnce() -> V,
        V: Clone,
    {
        if let Some(value) = self.get(&key) {
            return value;
        }

        let value = f();
        self.put(key, value.clone());
        value
    }

    /// Remove an entry, returning its value; absent keys are a no-op
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (_, key, entry) = self.storage.write().entries.shift_remove_full(key)?;
        self.occupancy.on_remove(&key, entry.value());
        Some(entry.into_value())
    }

    /// Clear all entries from the cache
    ///
    /// Counters are kept, and the occupancy hears about every dropped entry.
    pub fn clear(&self) {
        let mut storage = self.storage.write();
        for (key, entry) in storage.entries.drain(..) {
            self.occupancy.on_remove(&key, entry.value());
        }
    }

    /// Get the current number of entries, expired ones included
    pub fn len(&self) -> usize {
        self.storage.read().entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the next insertion would have to make room first
    pub fn is_full(&self) -> bool {
        self.occupancy.is_full(self.len(), self.capacity)
    }

    /// Run the strategy's prune; returns the number of entries removed
    pub fn prune(&self) -> usize {
        let mut guard = self.storage.write();
        let now = self.now();
        let storage = &mut *guard;
        let expiry_active = self.expiry_active(storage.custom_ttl_used);

        let before = storage.entries.len();
        let mut ctx = self.context(&mut storage.entries, now, expiry_active);
        let removed = self.strategy.prune(&mut ctx);
        debug!(
            strategy = self.strategy.name(),
            before,
            removed,
            remaining = storage.entries.len(),
            "cache pruned"
        );
        removed
    }

    /// Iterate over the values of live entries
    ///
    /// See [`LiveValues`] for the consistency guarantees.
    pub fn values(&self) -> LiveValues<'_, K, V, S, C>
    where
        K: Clone,
        V: Clone,
    {
        LiveValues::new(self)
    }

    /// Number of lookups that found a live entry
    pub fn hit_count(&self) -> u64 {
        self.metrics.hits()
    }

    /// Number of lookups that found nothing or an expired entry
    pub fn miss_count(&self) -> u64 {
        self.metrics.misses()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.metrics.snapshot(self.len(), self.capacity)
    }

    pub(crate) fn snapshot_keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.storage.read().entries.keys().cloned().collect()
    }

    /// Value of a live entry without counting it as an access.
    pub(crate) fn peek_live(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let storage = self.storage.read();
        let now = self.now();
        storage.entries.get(key).filter(|entry| !entry.is_expired(now)).map(|entry| entry.value().clone())
    }

    fn now(&self) -> u64 {
        saturating_nanos(self.clock.now().saturating_duration_since(self.epoch))
    }

    fn expiry_active(&self, custom_ttl_used: bool) -> bool {
        !self.default_ttl.is_zero() || custom_ttl_used
    }

    fn context<'a>(
        &'a self,
        entries: &'a mut IndexMap<K, CacheEntry<V>>,
        now: u64,
        expiry_active: bool,
    ) -> EvictionContext<'a, K, V> {
        EvictionContext::new(entries, &*self.occupancy, &self.metrics, self.capacity, now, expiry_active)
    }
}

impl<K, V, S, C> fmt::Debug for CacheMap<K, V, S, C>
where
    S: EvictionStrategy,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheMap")
            .field("strategy", &self.strategy.name())
            .field("capacity", &self.capacity)
            .field("default_ttl", &self.default_ttl)
            .field("len", &self.storage.read().entries.len())
            .finish_non_exhaustive()
    }
}
