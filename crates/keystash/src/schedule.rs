//! Periodic pruning on a tokio interval
//!
//! Caches never prune on their own schedule; expired entries are dropped
//! lazily by `get`, or eagerly by `prune()`. This module runs `prune()` on a
//! timer for caches whose readers may never come back for their stale keys.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use keystash::cache::{CacheConfig, TimedCache};
//! use keystash::schedule::schedule_prune;
//!
//! #[tokio::main]
//! async fn main() {
//!     let cache: Arc<TimedCache<String, String>> =
//!         Arc::new(TimedCache::new(CacheConfig::timed(Duration::from_secs(60))));
//!
//!     let handle = schedule_prune(Arc::clone(&cache), Duration::from_secs(30)).unwrap();
//!     // ...
//!     handle.cancel();
//! }
//! ```

use std::hash::Hash;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::{Cache, CacheMap, EvictionStrategy, NullCache, PolicyCache};
use crate::clock::Clock;
use crate::error::{ErrorClassification, ErrorSeverity};
use crate::file::FileContentCache;

/// Anything that can be pruned from a background task
pub trait Prunable: Send + Sync + 'static {
    /// Remove expired and/or over-capacity entries; returns how many
    fn prune(&self) -> usize;
}

impl<K, V, S, C> Prunable for CacheMap<K, V, S, C>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Send + Sync + 'static,
    S: EvictionStrategy,
    C: Clock,
{
    fn prune(&self) -> usize {
        Self::prune(self)
    }
}

impl<K, V, C> Prunable for PolicyCache<K, V, C>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    C: Clock,
{
    fn prune(&self) -> usize {
        <Self as Cache<K, V>>::prune(self)
    }
}

impl Prunable for NullCache {
    fn prune(&self) -> usize {
        0
    }
}

impl<C: Clock> Prunable for FileContentCache<C> {
    fn prune(&self) -> usize {
        Self::prune(self)
    }
}

/// Reasons a prune schedule could not start
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    /// A zero period would spin
    #[error("Prune period must be greater than zero")]
    ZeroPeriod,

    /// Called outside a tokio runtime
    #[error("No tokio runtime is running on this thread")]
    NoRuntime,
}

impl ErrorClassification for ScheduleError {
    fn is_retryable(&self) -> bool {
        false
    }

    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }
}

/// Handle to a running prune schedule
///
/// Dropping the handle cancels the schedule.
#[derive(Debug)]
pub struct PruneHandle {
    cancelled: Arc<AtomicBool>,
    runs: Arc<AtomicU64>,
    task: JoinHandle<()>,
}

impl PruneHandle {
    /// Stop the schedule; a prune already in progress finishes
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            self.task.abort();
            info!(runs = self.runs(), "prune schedule cancelled");
        }
    }

    /// Check if the schedule has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Number of prunes run so far
    pub fn runs(&self) -> u64 {
        self.runs.load(Ordering::Acquire)
    }
}

impl Drop for PruneHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Prune `cache` every `period`, starting one period from now
///
/// # Errors
///
/// [`ScheduleError::ZeroPeriod`] for a zero period and
/// [`ScheduleError::NoRuntime`] when called outside a tokio runtime.
pub fn schedule_prune<P: Prunable>(cache: Arc<P>, period: Duration) -> Result<PruneHandle, ScheduleError> {
    if period.is_zero() {
        return Err(ScheduleError::ZeroPeriod);
    }
    let runtime = Handle::try_current().map_err(|_| ScheduleError::NoRuntime)?;

    let cancelled = Arc::new(AtomicBool::new(false));
    let runs = Arc::new(AtomicU64::new(0));

    let task = runtime.spawn({
        let cancelled = Arc::clone(&cancelled);
        let runs = Arc::clone(&runs);
        async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if cancelled.load(Ordering::SeqCst) {
                    break;
                }
                let removed = cache.prune();
                let run = runs.fetch_add(1, Ordering::AcqRel) + 1;
                debug!(run, removed, "scheduled prune");
            }
        }
    });

    info!(period_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX), "prune schedule started");
    Ok(PruneHandle { cancelled, runs, task })
}
