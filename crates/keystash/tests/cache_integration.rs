//! Integration tests for the cache module
//!
//! Covers each eviction strategy through the public API, expiry against both
//! the wall clock and the mock clock, live iteration, the null cache and
//! configuration-driven construction.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use keystash::cache::{
    Cache, CacheConfig, EvictionPolicy, FifoCache, LfuCache, LruCache, NullCache, PolicyCache,
    PolicyConfig, TimedCache,
};
use keystash::clock::MockClock;

fn keys_of<C: Cache<&'static str, &'static str>>(cache: &C) -> Vec<&'static str> {
    cache.values().collect()
}

/// Verifies FIFO eviction drops the oldest insertion.
///
/// # Test Steps
/// 1. Put A, B into a FIFO cache of capacity 2
/// 2. Put C, which must evict A
/// 3. Verify the remaining entries are B then C, in that order
#[test]
fn test_fifo_evicts_oldest() {
    let cache: FifoCache<&str, &str> = FifoCache::new(CacheConfig::bounded(2));

    cache.put("A", "A");
    cache.put("B", "B");
    cache.put("C", "C");

    assert_eq!(keys_of(&cache), vec!["B", "C"]);
    assert_eq!(cache.get("A"), None);
    assert_eq!(cache.stats().evictions, 1);
}

/// Verifies LRU eviction honours reads.
///
/// # Test Steps
/// 1. Put A, B into an LRU cache of capacity 2
/// 2. Read A so that B becomes least recently used
/// 3. Put C, which must evict B
/// 4. Verify the remaining entries are {A, C}
#[test]
fn test_lru_evicts_least_recently_used() {
    let cache: LruCache<&str, &str> = LruCache::new(CacheConfig::bounded(2));

    cache.put("A", "A");
    cache.put("B", "B");
    assert_eq!(cache.get("A"), Some("A"));
    cache.put("C", "C");

    let mut remaining = keys_of(&cache);
    remaining.sort_unstable();
    assert_eq!(remaining, vec!["A", "C"]);
    assert_eq!(cache.get("B"), None);
}

/// Validates LFU normalization when the minimum access count is zero.
///
/// # Test Steps
/// 1. Put A, B, C into an LFU cache of capacity 3
/// 2. Read A twice and B once
/// 3. Put D, which must evict only C (the sole entry at count 0)
/// 4. Verify the key set is {A, B, D}
#[test]
fn test_lfu_evicts_minimum_count() {
    let cache: LfuCache<&str, &str> = LfuCache::new(CacheConfig::bounded(3));

    cache.put("A", "A");
    cache.put("B", "B");
    cache.put("C", "C");
    let _ = cache.get("A");
    let _ = cache.get("A");
    let _ = cache.get("B");

    cache.put("D", "D");

    assert_eq!(keys_of(&cache), vec!["A", "B", "D"]);
    assert_eq!(cache.len(), 3);
}

/// Validates that LFU evicts every entry tied at the minimum in one pass.
///
/// # Test Steps
/// 1. Fill a capacity-3 LFU cache and read only A
/// 2. Put D, which must evict both B and C
/// 3. Verify only A and D remain
#[test]
fn test_lfu_evicts_all_ties() {
    let cache: LfuCache<&str, &str> = LfuCache::new(CacheConfig::bounded(3));

    cache.put("A", "A");
    cache.put("B", "B");
    cache.put("C", "C");
    let _ = cache.get("A");

    cache.put("D", "D");

    assert_eq!(keys_of(&cache), vec!["A", "D"]);
    assert_eq!(cache.stats().evictions, 2);
}

/// Validates that `len() <= capacity` holds after every put for the
/// capacity-enforcing strategies.
///
/// # Test Steps
/// 1. For FIFO, LRU and LFU with capacity 4, put 200 keys with interleaved
///    reads and overwrites
/// 2. After every put, verify the size bound
#[test]
fn test_size_never_exceeds_capacity() {
    let config = CacheConfig::bounded(4);
    let fifo: FifoCache<u32, u32> = FifoCache::new(config);
    let lru: LruCache<u32, u32> = LruCache::new(config);
    let lfu: LfuCache<u32, u32> = LfuCache::new(config);

    for i in 0..200_u32 {
        let key = (i * 7) % 13;
        fifo.put(key, i);
        lru.put(key, i);
        lfu.put(key, i);
        let _ = lru.get(&(i % 5));
        let _ = lfu.get(&(i % 3));

        assert!(fifo.len() <= 4);
        assert!(lru.len() <= 4);
        assert!(lfu.len() <= 4);
    }
}

/// Validates wall-clock expiry of an entry with its own ttl.
///
/// # Test Steps
/// 1. Put k with a 50ms ttl and k2 with no ttl
/// 2. Sleep 60ms
/// 3. Verify `get(k)` misses, evicts the entry, and iteration sees only k2
#[test]
fn test_expiry_after_sleep() {
    let cache: TimedCache<&str, &str> = TimedCache::new(CacheConfig::unbounded());

    cache.put_with_ttl("k", "short", Duration::from_millis(50));
    cache.put("k2", "forever");
    assert_eq!(cache.values().count(), 2);

    thread::sleep(Duration::from_millis(60));

    assert_eq!(cache.get("k"), None);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.values().collect::<Vec<_>>(), vec!["forever"]);
}

/// Validates that a zero ttl never expires regardless of elapsed time.
///
/// # Test Steps
/// 1. Put an entry with ttl 0 into a cache whose default ttl is 10ms
/// 2. Advance the mock clock by a day and prune
/// 3. Verify the entry is still present
#[test]
fn test_zero_ttl_never_expires() {
    let clock = MockClock::new();
    let cache: TimedCache<&str, i32, MockClock> =
        TimedCache::with_clock(CacheConfig::timed(Duration::from_millis(10)), clock.clone());

    cache.put_with_ttl("pinned", 1, Duration::ZERO);
    cache.put("default", 2);
    clock.advance(Duration::from_secs(86_400));

    assert_eq!(cache.prune(), 1);
    assert_eq!(cache.get("pinned"), Some(1));
}

/// Validates that iteration skips expired entries without removing them.
///
/// # Test Steps
/// 1. Put one entry that expires and one that does not
/// 2. Advance past the ttl
/// 3. Verify iteration yields only the live value while `len` still counts 2
/// 4. Prune and verify `len` drops to 1
#[test]
fn test_iterator_skips_expired() {
    let clock = MockClock::new();
    let cache: FifoCache<&str, &str, MockClock> =
        FifoCache::with_clock(CacheConfig::bounded(10), clock.clone());

    cache.put_with_ttl("stale", "stale", Duration::from_millis(5));
    cache.put("live", "live");
    clock.advance_millis(6);

    assert_eq!(keys_of(&cache), vec!["live"]);
    assert_eq!(cache.len(), 2);

    assert_eq!(cache.prune(), 1);
    assert_eq!(cache.len(), 1);
}

/// Validates iterator removal through the public API.
///
/// # Test Steps
/// 1. Fill a cache with five values
/// 2. Iterate and remove every even value
/// 3. Verify only odd values remain
#[test]
fn test_iterator_remove() {
    let cache: LruCache<u32, u32> = LruCache::new(CacheConfig::unbounded());
    for i in 0..5 {
        cache.put(i, i);
    }

    let mut values = cache.values();
    while values.has_next() {
        if let Some(value) = values.next() {
            if value % 2 == 0 {
                assert_eq!(values.remove(), Some(value));
            }
        }
    }

    assert_eq!(cache.values().collect::<Vec<_>>(), vec![1, 3]);
}

/// Validates remove/clear idempotence and counter persistence.
///
/// # Test Steps
/// 1. Remove a key twice; the second call is a no-op
/// 2. Clear twice; size is 0 each time
/// 3. Verify hit and miss counters survive `clear`
#[test]
fn test_remove_and_clear_idempotent() {
    let cache: LfuCache<&str, i32> = LfuCache::new(CacheConfig::bounded(8));
    cache.put("a", 1);
    cache.put("b", 2);
    let _ = cache.get("a");
    let _ = cache.get("zzz");

    assert_eq!(cache.remove("a"), Some(1));
    assert_eq!(cache.remove("a"), None);
    assert_eq!(cache.len(), 1);

    cache.clear();
    assert_eq!(cache.len(), 0);
    cache.clear();
    assert_eq!(cache.len(), 0);

    assert_eq!(cache.hit_count(), 1);
    assert_eq!(cache.miss_count(), 1);
}

/// Validates the null cache contract.
///
/// # Test Steps
/// 1. Put several values into a `NullCache`
/// 2. Verify every get misses, it is always empty, and prune returns 0
#[test]
fn test_null_cache_stores_nothing() {
    let cache = NullCache;

    for i in 0..10_u64 {
        Cache::<u64, u64>::put(&cache, i, i);
        assert_eq!(Cache::<u64, u64>::get(&cache, &i), None);
    }

    assert!(Cache::<u64, u64>::is_empty(&cache));
    assert_eq!(Cache::<u64, u64>::prune(&cache), 0);
}

/// Validates building caches from JSON configuration.
///
/// # Test Steps
/// 1. Deserialize a FIFO config and check it evicts in insertion order
/// 2. Deserialize a disabled config and check it behaves as `NullCache`
#[test]
fn test_policy_cache_from_json() {
    let fifo: PolicyConfig =
        serde_json::from_str(r#"{"policy":"fifo","capacity":2,"default_ttl_ms":0}"#).unwrap();
    assert_eq!(fifo.policy, EvictionPolicy::Fifo);

    let cache: PolicyCache<&str, &str> = PolicyCache::from_config(fifo);
    cache.put("A", "A");
    let _ = cache.get(&"A");
    cache.put("B", "B");
    cache.put("C", "C");
    assert_eq!(keys_of(&cache), vec!["B", "C"]);

    let disabled: PolicyConfig = serde_json::from_str(r#"{"policy":"disabled"}"#).unwrap();
    let cache: PolicyCache<&str, &str> = PolicyCache::from_config(disabled);
    cache.put("A", "A");
    assert_eq!(cache.get(&"A"), None);
    assert!(cache.is_empty());
}

/// Validates concurrent readers and writers on a shared cache.
///
/// # Test Steps
/// 1. Spawn writer and reader threads over one LFU cache with a ttl
/// 2. Join them and verify the capacity bound and counters are consistent
#[test]
fn test_concurrent_readers_and_writers() {
    let cache: Arc<LfuCache<u32, u32>> =
        Arc::new(LfuCache::new(CacheConfig::bounded_timed(64, Duration::from_secs(60))));
    let mut handles = vec![];

    for t in 0..4_u32 {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..500_u32 {
                cache.put(t * 1000 + i, i);
            }
        }));
    }
    for _ in 0..4 {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..500_u32 {
                let _ = cache.get(&i);
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let stats = cache.stats();
    assert!(stats.size <= 64);
    assert_eq!(stats.hits + stats.misses, 2000);
    assert_eq!(stats.inserts, 2000);
}
