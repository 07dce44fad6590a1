//! In-process key-value caches with interchangeable eviction strategies.
//!
//! # Modules
//!
//! - [`cache`]: the [`Cache`](cache::Cache) contract, the generic engine and
//!   its FIFO, LRU, LFU and timed strategies, the no-op cache, and
//!   configuration-driven construction
//! - [`file`]: an LFU cache of file contents bounded by total bytes
//! - [`clock`]: the time source used for expiry, with a mock for tests
//! - [`error`]: error classification shared by the fallible layers
//! - `schedule`: periodic pruning on a tokio interval (feature `scheduler`)
//!
//! # Feature Flags
//!
//! - `scheduler`: enables the `schedule` module and pulls in tokio
//!
//! # Logging
//!
//! The crate emits `tracing` events (`trace`/`debug` for cache internals,
//! `info` for scheduler start/stop) and never installs a subscriber.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod cache;
pub mod clock;
pub mod error;
pub mod file;
#[cfg(feature = "scheduler")]
pub mod schedule;
pub mod utils;

pub use cache::{
    Cache, CacheConfig, CacheMap, CacheStats, EvictionPolicy, FifoCache, LfuCache, LruCache,
    NullCache, PolicyCache, PolicyConfig, TimedCache,
};
pub use clock::{Clock, MockClock, SystemClock};
pub use error::{ErrorClassification, ErrorSeverity};
pub use file::{FileCacheConfig, FileCacheError, FileContentCache};
pub use utils::duration_millis;
