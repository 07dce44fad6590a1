//! Cached value plus the bookkeeping the eviction strategies read.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::clock::saturating_nanos;

/// Entry stored in a cache with metadata for the eviction strategies
///
/// Timestamps are nanoseconds since the owning cache's epoch. Access metadata
/// is atomic so a lookup holding only the shared lock can record the hit.
#[derive(Debug)]
pub struct CacheEntry<V> {
    value: V,
    ttl_nanos: u64,
    last_access: AtomicU64,
    access_count: AtomicU64,
}

impl<V> CacheEntry<V> {
    pub(crate) fn new(value: V, ttl: Duration, now: u64) -> Self {
        Self {
            value,
            ttl_nanos: saturating_nanos(ttl),
            last_access: AtomicU64::new(now),
            access_count: AtomicU64::new(0),
        }
    }

    /// The stored value
    pub const fn value(&self) -> &V {
        &self.value
    }

    /// Time to live measured from the last access; zero never expires
    pub const fn ttl(&self) -> Duration {
        Duration::from_nanos(self.ttl_nanos)
    }

    /// Number of successful reads since insertion (less any LFU decay)
    pub fn access_count(&self) -> u64 {
        self.access_count.load(Ordering::Relaxed)
    }

    pub(crate) fn last_access(&self) -> u64 {
        self.last_access.load(Ordering::Relaxed)
    }

    /// Expired iff it has a ttl and `now >= last_access + ttl`.
    pub(crate) fn is_expired(&self, now: u64) -> bool {
        self.ttl_nanos != 0 && now >= self.last_access().saturating_add(self.ttl_nanos)
    }

    /// Records a successful read.
    pub(crate) fn touch(&self, now: u64) {
        self.last_access.fetch_max(now, Ordering::Relaxed);
        self.access_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Lowers the access count by `amount`, returning what is left.
    pub(crate) fn decay(&mut self, amount: u64) -> u64 {
        let count = self.access_count.get_mut();
        *count = count.saturating_sub(amount);
        *count
    }

    pub(crate) fn into_value(self) -> V {
        self.value
    }
}
