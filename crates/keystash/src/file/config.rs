//! File content cache configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::utils::serde::duration_millis;

/// Byte budget and expiry for a [`FileContentCache`](super::FileContentCache)
///
/// ```
/// use keystash::file::FileCacheConfig;
///
/// let config = FileCacheConfig::new(1024 * 1024);
/// assert_eq!(config.max_file_bytes, 512 * 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCacheConfig {
    /// Total bytes the cache may hold before LFU eviction starts
    pub max_bytes: u64,

    /// Largest file that is cached (0 = no per-file ceiling); larger files
    /// are still returned, just not stored
    pub max_file_bytes: u64,

    /// Ttl for cached files (zero = no expiry)
    #[serde(default, rename = "default_ttl_ms", with = "duration_millis")]
    pub default_ttl: Duration,
}

impl FileCacheConfig {
    /// Budget of `max_bytes`, with the per-file ceiling at half of it
    pub const fn new(max_bytes: u64) -> Self {
        Self { max_bytes, max_file_bytes: max_bytes / 2, default_ttl: Duration::ZERO }
    }

    /// Override the per-file ceiling (0 = none)
    #[must_use]
    pub const fn with_max_file_bytes(mut self, max_file_bytes: u64) -> Self {
        self.max_file_bytes = max_file_bytes;
        self
    }

    /// Expire cached files after `ttl` without access
    #[must_use]
    pub const fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }
}
