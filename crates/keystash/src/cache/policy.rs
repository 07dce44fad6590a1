//! Strategy chosen at runtime from configuration.

use std::hash::Hash;
use std::time::Duration;

use super::config::{EvictionPolicy, PolicyConfig};
use super::core::{FifoCache, LfuCache, LruCache, TimedCache};
use super::null::NullCache;
use super::stats::CacheStats;
use super::Cache;
use crate::clock::{Clock, SystemClock};

/// A cache whose eviction policy is picked from a [`PolicyConfig`]
///
/// ```
/// use keystash::cache::{Cache, PolicyCache, PolicyConfig};
///
/// let config: PolicyConfig =
///     serde_json::from_str(r#"{"policy":"fifo","capacity":2}"#).unwrap();
/// let cache: PolicyCache<&str, i32> = PolicyCache::from_config(config);
///
/// cache.put("a", 1);
/// cache.put("b", 2);
/// cache.put("c", 3);
/// assert_eq!(cache.get(&"a"), None);
/// assert_eq!(cache.policy().as_str(), "fifo");
/// ```
#[derive(Debug)]
pub enum PolicyCache<K, V, C = SystemClock> {
    /// First in, first out
    Fifo(FifoCache<K, V, C>),
    /// Least recently used
    Lru(LruCache<K, V, C>),
    /// Least frequently used
    Lfu(LfuCache<K, V, C>),
    /// Expiry only
    Timed(TimedCache<K, V, C>),
    /// Caching switched off
    Disabled(NullCache),
}

impl<K, V> PolicyCache<K, V, SystemClock>
where
    K: Hash + Eq,
{
    /// Build the cache a configuration asks for
    pub fn from_config(config: PolicyConfig) -> Self {
        Self::from_config_with_clock(config, SystemClock)
    }
}

impl<K, V, C> PolicyCache<K, V, C>
where
    K: Hash + Eq,
    C: Clock,
{
    /// Build the cache a configuration asks for, reading time from `clock`
    pub fn from_config_with_clock(config: PolicyConfig, clock: C) -> Self {
        let cache = config.cache;
        match config.policy {
            EvictionPolicy::Fifo => Self::Fifo(FifoCache::with_clock(cache, clock)),
            EvictionPolicy::Lru => Self::Lru(LruCache::with_clock(cache, clock)),
            EvictionPolicy::Lfu => Self::Lfu(LfuCache::with_clock(cache, clock)),
            EvictionPolicy::Timed => Self::Timed(TimedCache::with_clock(cache, clock)),
            EvictionPolicy::Disabled => Self::Disabled(NullCache),
        }
    }

    /// The policy this cache was built with
    pub const fn policy(&self) -> EvictionPolicy {
        match self {
            Self::Fifo(_) => EvictionPolicy::Fifo,
            Self::Lru(_) => EvictionPolicy::Lru,
            Self::Lfu(_) => EvictionPolicy::Lfu,
            Self::Timed(_) => EvictionPolicy::Timed,
            Self::Disabled(_) => EvictionPolicy::Disabled,
        }
    }

    /// Statistics snapshot; a disabled cache reports all zeros
    pub fn stats(&self) -> CacheStats {
        match self {
            Self::Fifo(cache) => cache.stats(),
            Self::Lru(cache) => cache.stats(),
            Self::Lfu(cache) => cache.stats(),
            Self::Timed(cache) => cache.stats(),
            Self::Disabled(_) => CacheStats::default(),
        }
    }
}

macro_rules! dispatch {
    ($self:expr, $cache:ident => $body:expr, disabled => $disabled:expr) => {
        match $self {
            PolicyCache::Fifo($cache) => $body,
            PolicyCache::Lru($cache) => $body,
            PolicyCache::Lfu($cache) => $body,
            PolicyCache::Timed($cache) => $body,
            PolicyCache::Disabled(_) => $disabled,
        }
    };
}

impl<K, V, C> Cache<K, V> for PolicyCache<K, V, C>
where
    K: Hash + Eq + Clone,
    V: Clone,
    C: Clock,
{
    type Values<'a> = Box<dyn Iterator<Item = V> + 'a> where Self: 'a;

    fn capacity(&self) -> usize {
        dispatch!(self, cache => cache.capacity(), disabled => 0)
    }

    fn default_ttl(&self) -> Duration {
        dispatch!(self, cache => cache.default_ttl(), disabled => Duration::ZERO)
    }

    fn put(&self, key: K, value: V) {
        dispatch!(self, cache => cache.put(key, value), disabled => ())
    }

    fn put_with_ttl(&self, key: K, value: V, ttl: Duration) {
        dispatch!(self, cache => cache.put_with_ttl(key, value, ttl), disabled => ())
    }

    fn get(&self, key: &K) -> Option<V> {
        dispatch!(self, cache => cache.get(key), disabled => None)
    }

    fn remove(&self, key: &K) -> Option<V> {
        dispatch!(self, cache => cache.remove(key), disabled => None)
    }

    fn clear(&self) {
        dispatch!(self, cache => cache.clear(), disabled => ())
    }

    fn len(&self) -> usize {
        dispatch!(self, cache => cache.len(), disabled => 0)
    }

    fn is_full(&self) -> bool {
        dispatch!(self, cache => cache.is_full(), disabled => true)
    }

    fn prune(&self) -> usize {
        dispatch!(self, cache => cache.prune(), disabled => 0)
    }

    fn values(&self) -> Self::Values<'_> {
        dispatch!(self, cache => Box::new(cache.values()), disabled => Box::new(std::iter::empty()))
    }
}
