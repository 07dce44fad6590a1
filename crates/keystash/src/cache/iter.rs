//! Iteration over live cache values.

use std::hash::Hash;
use std::iter::FusedIterator;
use std::vec;

use super::core::CacheMap;
use super::strategy::EvictionStrategy;
use crate::clock::Clock;

/// Iterator over the values of non-expired entries
///
/// The key order is snapshotted when the iterator is created; every step then
/// looks the next key up under a short read lock, so the cache stays usable by
/// other threads while iteration is in progress. Keys removed concurrently
/// are skipped, keys inserted after creation are not visited, and expired
/// entries are skipped but left in place for a later prune.
///
/// Reading through the iterator does not count as an access: hit counters,
/// LRU order and LFU counts are unaffected.
///
/// ```
/// use keystash::cache::{CacheConfig, FifoCache};
///
/// let cache: FifoCache<&str, i32> = FifoCache::new(CacheConfig::unbounded());
/// cache.put("a", 1);
/// cache.put("b", 2);
///
/// let mut values = cache.values();
/// assert_eq!(values.next(), Some(1));
/// assert_eq!(values.remove(), Some(1));
/// assert_eq!(values.collect::<Vec<_>>(), vec![2]);
/// assert_eq!(cache.len(), 1);
/// ```
pub struct LiveValues<'a, K, V, S, C> {
    cache: &'a CacheMap<K, V, S, C>,
    keys: vec::IntoIter<K>,
    lookahead: Option<(K, V)>,
    last_yielded: Option<K>,
}

impl<'a, K, V, S, C> LiveValues<'a, K, V, S, C>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: EvictionStrategy,
    C: Clock,
{
    pub(crate) fn new(cache: &'a CacheMap<K, V, S, C>) -> Self {
        let keys = cache.snapshot_keys().into_iter();
        let mut iter = Self { cache, keys, lookahead: None, last_yielded: None };
        iter.advance();
        iter
    }

    /// Whether another live value is buffered
    pub const fn has_next(&self) -> bool {
        self.lookahead.is_some()
    }

    /// Remove the entry whose value was yielded last
    ///
    /// Returns `None` if nothing has been yielded yet, the entry was already
    /// removed, or `remove` was already called for it. Skipped (expired)
    /// entries are never removed here.
    pub fn remove(&mut self) -> Option<V> {
        let key = self.last_yielded.take()?;
        self.cache.remove(&key)
    }

    fn advance(&mut self) {
        self.lookahead = None;
        for key in self.keys.by_ref() {
            if let Some(value) = self.cache.peek_live(&key) {
                self.lookahead = Some((key, value));
                return;
            }
        }
    }
}

impl<K, V, S, C> Iterator for LiveValues<'_, K, V, S, C>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: EvictionStrategy,
    C: Clock,
{
    type Item = V;

    fn next(&mut self) -> Option<V> {
        let (key, value) = self.lookahead.take()?;
        self.last_yielded = Some(key);
        self.advance();
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let buffered = usize::from(self.lookahead.is_some());
        (buffered, Some(buffered + self.keys.len()))
    }
}

impl<K, V, S, C> FusedIterator for LiveValues<'_, K, V, S, C>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: EvictionStrategy,
    C: Clock,
{
}
