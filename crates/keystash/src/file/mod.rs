//! LFU cache of file contents under a total byte budget
//!
//! [`FileContentCache`] keeps whole files in memory as shared byte slices.
//! Fullness is measured in bytes rather than entries: once the cached bytes
//! exceed `max_bytes`, the next load triggers LFU eviction. Files larger than
//! `max_file_bytes` are read and returned but never stored.
//!
//! ```no_run
//! use keystash::file::{FileCacheConfig, FileContentCache};
//!
//! # fn main() -> Result<(), keystash::file::FileCacheError> {
//! let cache = FileContentCache::new(FileCacheConfig::new(64 * 1024 * 1024));
//!
//! let first = cache.get_content("templates/index.html")?;
//! let again = cache.get_content("templates/index.html")?;
//! assert!(std::sync::Arc::ptr_eq(&first, &again));
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace};

use crate::cache::{CacheConfig, CacheStats, LfuCache, Occupancy};
use crate::clock::{Clock, SystemClock};

mod config;
mod error;

pub use self::config::FileCacheConfig;
pub use self::error::{FileCacheError, FileCacheResult};

/// Occupancy that measures a cache in bytes
///
/// The cache is full once the cached bytes exceed the budget, regardless of
/// how many files that is.
#[derive(Debug)]
pub struct ByteBudget {
    used: AtomicU64,
    max: u64,
}

impl ByteBudget {
    /// An empty budget of `max` bytes
    pub const fn new(max: u64) -> Self {
        Self { used: AtomicU64::new(0), max }
    }

    /// Bytes currently accounted for
    pub fn used(&self) -> u64 {
        self.used.load(Ordering::Acquire)
    }

    /// Budget in bytes
    pub const fn max(&self) -> u64 {
        self.max
    }
}

impl Occupancy<PathBuf, Arc<[u8]>> for ByteBudget {
    fn on_insert(&self, _key: &PathBuf, value: &Arc<[u8]>) {
        self.used.fetch_add(value.len() as u64, Ordering::AcqRel);
    }

    fn on_remove(&self, _key: &PathBuf, value: &Arc<[u8]>) {
        let len = value.len() as u64;
        let mut used = self.used.load(Ordering::Acquire);
        loop {
            match self.used.compare_exchange_weak(
                used,
                used.saturating_sub(len),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(actual) => used = actual,
            }
        }
    }

    fn is_full(&self, _len: usize, _capacity: usize) -> bool {
        self.used() > self.max
    }
}

/// Cache of file bytes keyed by path, evicting least frequently used files
///
/// Paths are used as given; `a/../b.txt` and `b.txt` are different keys.
pub struct FileContentCache<C = SystemClock> {
    cache: LfuCache<PathBuf, Arc<[u8]>, C>,
    budget: Arc<ByteBudget>,
    max_file_bytes: u64,
}

impl FileContentCache<SystemClock> {
    /// Create a file cache using the system clock
    pub fn new(config: FileCacheConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> FileContentCache<C> {
    /// Create a file cache with a custom clock (useful for testing)
    pub fn with_clock(config: FileCacheConfig, clock: C) -> Self {
        let budget = Arc::new(ByteBudget::new(config.max_bytes));
        let cache = LfuCache::with_clock(CacheConfig::timed(config.default_ttl), clock)
            .with_occupancy(budget.clone());
        Self { cache, budget, max_file_bytes: config.max_file_bytes }
    }

    /// Return the file's bytes, from the cache when present
    ///
    /// On a miss the file is read outside the cache lock; it is stored only if
    /// it fits under the per-file ceiling.
    ///
    /// # Errors
    ///
    /// [`FileCacheError::NotFound`] if nothing exists at `path`,
    /// [`FileCacheError::NotAFile`] for directories and other non-regular
    /// files, [`FileCacheError::TooLarge`] if the length cannot be addressed
    /// in memory, and [`FileCacheError::Io`] for any other read failure.
    pub fn get_content(&self, path: impl AsRef<Path>) -> FileCacheResult<Arc<[u8]>> {
        self.load_with(path.as_ref(), read_file)
    }

    /// Lookup then `read` on a miss; no cache lock is held while `read` runs.
    fn load_with<F>(&self, path: &Path, read: F) -> FileCacheResult<Arc<[u8]>>
    where
        F: FnOnce(&Path) -> FileCacheResult<Arc<[u8]>>,
    {
        if let Some(bytes) = self.cache.get(path) {
            return Ok(bytes);
        }

        let bytes = read(path)?;
        let len = bytes.len() as u64;

        if self.max_file_bytes != 0 && len > self.max_file_bytes {
            debug!(
                path = %path.display(),
                len,
                max_file_bytes = self.max_file_bytes,
                "file exceeds per-file ceiling, not cached"
            );
            return Ok(bytes);
        }

        self.cache.put(path.to_path_buf(), Arc::clone(&bytes));
        trace!(path = %path.display(), len, used_bytes = self.used_bytes(), "file cached");
        Ok(bytes)
    }

    /// Budget in bytes
    pub fn max_bytes(&self) -> u64 {
        self.budget.max()
    }

    /// Bytes currently cached
    pub fn used_bytes(&self) -> u64 {
        self.budget.used()
    }

    /// Largest file that is cached (0 = no ceiling)
    pub const fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes
    }

    /// Number of files currently cached
    pub fn cached_files_count(&self) -> usize {
        self.cache.len()
    }

    /// Ttl applied to cached files (zero = no expiry)
    pub const fn default_ttl(&self) -> Duration {
        self.cache.default_ttl()
    }

    /// Statistics of the underlying LFU cache
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop one file from the cache; returns whether it was cached
    pub fn invalidate(&self, path: impl AsRef<Path>) -> bool {
        self.cache.remove(path.as_ref()).is_some()
    }

    /// Remove expired files and, if over budget, the least used ones
    pub fn prune(&self) -> usize {
        self.cache.prune()
    }

    /// Drop every cached file; used bytes return to zero
    pub fn clear(&self) {
        self.cache.clear();
    }
}

impl<C> std::fmt::Debug for FileContentCache<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileContentCache")
            .field("budget", &self.budget)
            .field("max_file_bytes", &self.max_file_bytes)
            .finish_non_exhaustive()
    }
}

fn read_file(path: &Path) -> FileCacheResult<Arc<[u8]>> {
    let metadata = fs::metadata(path).map_err(|e| FileCacheError::from_io(path.to_path_buf(), e))?;
    if !metadata.is_file() {
        return Err(FileCacheError::NotAFile { path: path.to_path_buf() });
    }

    let len = metadata.len();
    if usize::try_from(len).map_or(true, |len| len > isize::MAX as usize) {
        return Err(FileCacheError::TooLarge { path: path.to_path_buf(), len });
    }

    let bytes = fs::read(path).map_err(|e| FileCacheError::from_io(path.to_path_buf(), e))?;
    Ok(Arc::from(bytes))
}

#[cfg(test)]
mod tests {
    //! Unit tests for file.
    use super::*;

    fn bytes(len: usize) -> Arc<[u8]> {
        Arc::from(vec![0_u8; len])
    }

    /// Validates `ByteBudget` accounting and its fullness rule.
    ///
    /// Assertions:
    /// - Ensures the budget is not full at exactly `max` bytes.
    /// - Ensures it is full one byte over.
    /// - Confirms removals never underflow.
    #[test]
    fn test_byte_budget_accounting() {
        let budget = ByteBudget::new(10);
        let key = PathBuf::from("a");

        budget.on_insert(&key, &bytes(10));
        assert_eq!(budget.used(), 10);
        assert!(!Occupancy::<PathBuf, Arc<[u8]>>::is_full(&budget, 1, 0));

        budget.on_insert(&key, &bytes(1));
        assert!(Occupancy::<PathBuf, Arc<[u8]>>::is_full(&budget, 2, 0));

        budget.on_remove(&key, &bytes(11));
        budget.on_remove(&key, &bytes(5));
        assert_eq!(budget.used(), 0);
    }

    /// Validates that concurrent accounting never underflows or drifts.
    ///
    /// Assertions:
    /// - Confirms used bytes return to zero after balanced inserts and
    ///   removals from several threads.
    #[test]
    fn test_byte_budget_concurrent_balance() {
        let budget = Arc::new(ByteBudget::new(1 << 20));
        let key = PathBuf::from("a");

        std::thread::scope(|s| {
            for len in [1_usize, 7, 64, 512] {
                let budget = &budget;
                let key = &key;
                s.spawn(move || {
                    let value = bytes(len);
                    for _ in 0..1000 {
                        budget.on_insert(key, &value);
                        budget.on_remove(key, &value);
                    }
                });
            }
        });

        assert_eq!(budget.used(), 0);
    }

    /// Validates that the file read runs without the cache lock and leaves
    /// the cache untouched until it completes.
    ///
    /// Assertions:
    /// - Confirms another thread can `invalidate`, `prune` and count files
    ///   while the read is in progress.
    /// - Confirms the loading path is not cached and no bytes are accounted
    ///   during the read.
    /// - Confirms the file is cached once the read returns.
    #[test]
    fn test_read_runs_outside_cache_lock() {
        use std::sync::mpsc;

        let cache = FileContentCache::new(FileCacheConfig::new(1024));
        let other = PathBuf::from("other.txt");
        let loading = PathBuf::from("loading.txt");

        let loaded = cache
            .load_with(&other, |_| Ok(bytes(10)))
            .and_then(|_| {
                cache.load_with(&loading, |_| {
                    let (tx, rx) = mpsc::channel();
                    let (cache, other) = (&cache, &other);
                    std::thread::scope(|s| {
                        s.spawn(move || {
                            let snapshot = (cache.cached_files_count(), cache.used_bytes());
                            let invalidated = cache.invalidate(&other);
                            let pruned = cache.prune();
                            let _ = tx.send((snapshot, invalidated, pruned));
                        });
                        let seen = rx.recv_timeout(Duration::from_secs(5));
                        assert_eq!(seen, Ok(((1, 10), true, 0)));
                    });
                    Ok(bytes(20))
                })
            })
            .unwrap();

        assert_eq!(loaded.len(), 20);
        assert_eq!(cache.cached_files_count(), 1);
        assert_eq!(cache.used_bytes(), 20);
    }

    /// Validates that a missing path is reported and nothing is cached.
    ///
    /// Assertions:
    /// - Ensures the error is `NotFound`.
    /// - Confirms `cached_files_count()` equals `0`.
    #[test]
    fn test_missing_file_not_cached() {
        let cache = FileContentCache::new(FileCacheConfig::new(1024));
        let result = cache.get_content("/definitely/not/here.txt");

        assert!(matches!(result, Err(FileCacheError::NotFound { .. })));
        assert_eq!(cache.cached_files_count(), 0);
        assert_eq!(cache.used_bytes(), 0);
    }
}
