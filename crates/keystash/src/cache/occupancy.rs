//! Fullness decision and insertion/removal notifications.
//!
//! The engine consults an [`Occupancy`] before every insertion and notifies it
//! of every entry that enters or leaves the map, whichever path removes it
//! (explicit `remove`, overwrite, prune, expiry found by `get`, iterator
//! removal, `clear`). Wrappers use this to layer their own accounting, such as
//! the byte budget of [`FileContentCache`](crate::file::FileContentCache), on
//! top of an unchanged engine.

/// Hook deciding when a cache is full and observing entry turnover
///
/// Callbacks run while the engine holds its write lock; implementations must
/// not call back into the cache.
pub trait Occupancy<K, V>: Send + Sync {
    /// Called just before `value` is stored under `key`.
    fn on_insert(&self, _key: &K, _value: &V) {}

    /// Called once for every entry that leaves the cache.
    fn on_remove(&self, _key: &K, _value: &V) {}

    /// Whether the cache should make room before the next insertion.
    fn is_full(&self, len: usize, capacity: usize) -> bool {
        capacity > 0 && len >= capacity
    }
}

/// Default occupancy: an entry count compared against capacity
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryCount;

impl<K, V> Occupancy<K, V> for EntryCount {}

#[cfg(test)]
mod tests {
    //! Unit tests for cache::occupancy.
    use super::*;

    /// Validates the default `is_full` rule of `EntryCount`.
    ///
    /// Assertions:
    /// - Ensures capacity 0 is never full.
    /// - Ensures full is reached at `len == capacity`.
    #[test]
    fn test_entry_count_is_full() {
        let occupancy = EntryCount;
        let is_full = |len, cap| Occupancy::<u8, u8>::is_full(&occupancy, len, cap);

        assert!(!is_full(10_000, 0));
        assert!(!is_full(2, 3));
        assert!(is_full(3, 3));
        assert!(is_full(4, 3));
    }
}
