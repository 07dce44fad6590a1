//! A cache that stores nothing.

use std::iter;
use std::time::Duration;

use super::Cache;

/// No-op cache for switching caching off without changing call sites
///
/// Every `put` is dropped and every `get` misses. `is_full` reports true,
/// so callers that check before inserting skip the work altogether.
///
/// ```
/// use keystash::cache::{Cache, NullCache};
///
/// let cache = NullCache;
/// Cache::<&str, i32>::put(&cache, "k", 1);
/// assert_eq!(Cache::<&str, i32>::get(&cache, &"k"), None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullCache;

impl<K, V> Cache<K, V> for NullCache {
    type Values<'a> = iter::Empty<V> where Self: 'a;

    fn capacity(&self) -> usize {
        0
    }

    fn default_ttl(&self) -> Duration {
        Duration::ZERO
    }

    fn put(&self, _key: K, _value: V) {}

    fn put_with_ttl(&self, _key: K, _value: V, _ttl: Duration) {}

    fn get(&self, _key: &K) -> Option<V> {
        None
    }

    fn remove(&self, _key: &K) -> Option<V> {
        None
    }

    fn clear(&self) {}

    fn len(&self) -> usize {
        0
    }

    fn is_empty(&self) -> bool {
        true
    }

    fn is_full(&self) -> bool {
        true
    }

    fn prune(&self) -> usize {
        0
    }

    fn values(&self) -> Self::Values<'_> {
        iter::empty()
    }
}
