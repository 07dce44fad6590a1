//! Generic in-process caches with interchangeable eviction strategies
//!
//! Every cache here implements one contract, [`Cache`], so callers can swap
//! strategies (or switch caching off with [`NullCache`]) without touching call
//! sites.
//!
//! # Features
//!
//! - **Thread-safe**: one `parking_lot::RwLock` per cache; hits on FIFO, LFU
//!   and timed caches run under the shared lock
//! - **Pluggable eviction**: FIFO, LRU, LFU or expiry only, through the
//!   [`EvictionStrategy`] trait
//! - **TTL support**: per-cache default plus per-entry override, measured from
//!   the last access
//! - **Metrics tracking**: hit/miss/insert/eviction/expiration counters
//! - **Testable**: clock abstraction for deterministic expiry tests
//!
//! # Examples
//!
//! ## Simple LRU Cache
//! ```
//! use keystash::cache::{CacheConfig, LruCache};
//!
//! let cache: LruCache<String, i32> = LruCache::new(CacheConfig::bounded(100));
//! cache.put("key".to_string(), 42);
//! assert_eq!(cache.get("key"), Some(42));
//! ```
//!
//! ## TTL-based Cache
//! ```
//! use std::time::Duration;
//!
//! use keystash::cache::{CacheConfig, TimedCache};
//!
//! let cache: TimedCache<String, String> =
//!     TimedCache::new(CacheConfig::timed(Duration::from_secs(3600)));
//! cache.put("session".to_string(), "data".to_string());
//! cache.put_with_ttl("nonce".to_string(), "abc".to_string(), Duration::from_secs(30));
//! ```
//!
//! ## Strategy from Configuration
//! ```
//! use keystash::cache::{Cache, PolicyCache, PolicyConfig};
//!
//! let config: PolicyConfig =
//!     serde_json::from_str(r#"{"policy":"lfu","capacity":500,"default_ttl_ms":1800000}"#)
//!         .unwrap();
//!
//! let cache: PolicyCache<String, i32> = PolicyCache::from_config(config);
//! cache.put("key".to_string(), 1);
//! ```
//!
//! ## Cache Statistics
//! ```
//! use keystash::cache::{CacheConfig, FifoCache};
//!
//! let cache: FifoCache<String, i32> = FifoCache::new(CacheConfig::bounded(100));
//!
//! cache.put("key1".to_string(), 1);
//! let _ = cache.get("key1");
//!
//! let stats = cache.stats();
//! assert_eq!(stats.hits, 1);
//! assert_eq!(stats.capacity, Some(100));
//! ```
//!
//! # Eviction Strategies
//!
//! - **FIFO**: when full, drops expired entries, then the oldest insertion
//! - **LRU**: every hit refreshes the entry; an insertion past capacity evicts
//!   the least recently used entry immediately
//! - **LFU**: when full, drops expired entries, then every entry tied at the
//!   lowest access count (counts are rebased so old popularity fades)
//! - **Timed**: only ever drops expired entries; capacity is not enforced
//!
//! # Thread Safety
//!
//! Caches are `Send + Sync` whenever their keys and values are, and are shared
//! across threads with `Arc`:
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//!
//! use keystash::cache::{CacheConfig, LfuCache};
//!
//! let cache = Arc::new(LfuCache::new(CacheConfig::bounded(100)));
//!
//! let mut handles = vec![];
//! for i in 0..10 {
//!     let cache_clone = Arc::clone(&cache);
//!     handles.push(thread::spawn(move || {
//!         cache_clone.put(format!("key-{i}"), i);
//!     }));
//! }
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert_eq!(cache.len(), 10);
//! ```

use std::hash::Hash;
use std::time::Duration;

mod config;
mod core;
mod entry;
mod iter;
mod null;
mod occupancy;
mod policy;
mod stats;
pub mod strategy;

pub use self::config::{CacheConfig, CacheConfigBuilder, EvictionPolicy, PolicyConfig};
pub use self::core::{CacheMap, FifoCache, LfuCache, LruCache, TimedCache};
pub use self::entry::CacheEntry;
pub use self::iter::LiveValues;
pub use self::null::NullCache;
pub use self::occupancy::{EntryCount, Occupancy};
pub use self::policy::PolicyCache;
pub use self::stats::CacheStats;
pub use self::strategy::{EvictionContext, EvictionStrategy, Fifo, Lfu, Lru, Timed};
use crate::clock::Clock;

/// The operations every cache supports
///
/// Absent keys are never an error: lookups return `None` and removing an
/// absent key does nothing.
pub trait Cache<K, V> {
    /// Iterator returned by [`values`](Self::values)
    type Values<'a>: Iterator<Item = V>
    where
        Self: 'a;

    /// Maximum number of entries (0 = unbounded)
    fn capacity(&self) -> usize;

    /// Ttl applied by [`put`](Self::put) (zero = no expiry)
    fn default_ttl(&self) -> Duration;

    /// Store a value with the default ttl
    fn put(&self, key: K, value: V);

    /// Store a value with its own ttl (zero = never expires)
    fn put_with_ttl(&self, key: K, value: V, ttl: Duration);

    /// Look up a live value
    fn get(&self, key: &K) -> Option<V>;

    /// Remove an entry, returning its value
    fn remove(&self, key: &K) -> Option<V>;

    /// Remove every entry
    fn clear(&self);

    /// Number of stored entries, expired ones included until pruned
    fn len(&self) -> usize;

    /// Whether no entries are stored
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the next insertion would have to make room first
    fn is_full(&self) -> bool;

    /// Remove expired and/or over-capacity entries; returns how many
    fn prune(&self) -> usize;

    /// Iterate over live values
    fn values(&self) -> Self::Values<'_>;
}

impl<K, V, S, C> Cache<K, V> for CacheMap<K, V, S, C>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: EvictionStrategy,
    C: Clock,
{
    type Values<'a> = LiveValues<'a, K, V, S, C> where Self: 'a;

    fn capacity(&self) -> usize {
        Self::capacity(self)
    }

    fn default_ttl(&self) -> Duration {
        Self::default_ttl(self)
    }

    fn put(&self, key: K, value: V) {
        Self::put(self, key, value);
    }

    fn put_with_ttl(&self, key: K, value: V, ttl: Duration) {
        Self::put_with_ttl(self, key, value, ttl);
    }

    fn get(&self, key: &K) -> Option<V> {
        Self::get(self, key)
    }

    fn remove(&self, key: &K) -> Option<V> {
        Self::remove(self, key)
    }

    fn clear(&self) {
        Self::clear(self);
    }

    fn len(&self) -> usize {
        Self::len(self)
    }

    fn is_empty(&self) -> bool {
        Self::is_empty(self)
    }

    fn is_full(&self) -> bool {
        Self::is_full(self)
    }

    fn prune(&self) -> usize {
        Self::prune(self)
    }

    fn values(&self) -> Self::Values<'_> {
        Self::values(self)
    }
}
