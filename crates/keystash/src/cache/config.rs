//! Cache configuration types and builder patterns
//!
//! [`CacheConfig`] carries the two knobs every engine shares (capacity and
//! default ttl). [`PolicyConfig`] adds the eviction policy so a cache can be
//! chosen from a configuration file; see
//! [`PolicyCache`](super::PolicyCache).
//!
//! Both are serde-capable. Durations are written as whole milliseconds:
//!
//! ```toml
//! policy = "lfu"
//! capacity = 512
//! default_ttl_ms = 30000
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::utils::serde::duration_millis;

/// Eviction policy selecting which engine a [`PolicyConfig`] builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicy {
    /// First In First Out - evicts the oldest entry by insertion order
    Fifo,
    /// Least Recently Used - evicts the least recently accessed entry
    #[default]
    Lru,
    /// Least Frequently Used - evicts every entry tied at the lowest access
    /// count
    Lfu,
    /// Expiry only; capacity is never enforced
    Timed,
    /// Caching switched off; every lookup misses
    Disabled,
}

impl EvictionPolicy {
    /// Lowercase name as used in configuration files
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fifo => "fifo",
            Self::Lru => "lru",
            Self::Lfu => "lfu",
            Self::Timed => "timed",
            Self::Disabled => "disabled",
        }
    }
}

/// Configuration shared by every cache engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries (0 = unbounded)
    pub capacity: usize,

    /// Time-to-live applied by `put` (zero = entries never expire)
    #[serde(rename = "default_ttl_ms", with = "duration_millis")]
    pub default_ttl: Duration,
}

impl CacheConfig {
    /// Create a new configuration builder
    pub fn builder() -> CacheConfigBuilder {
        CacheConfigBuilder::default()
    }

    /// No capacity limit and no default expiry
    pub const fn unbounded() -> Self {
        Self { capacity: 0, default_ttl: Duration::ZERO }
    }

    /// Quick preset for a size-bounded cache without expiry
    ///
    /// # Example
    /// ```
    /// use keystash::cache::CacheConfig;
    ///
    /// let config = CacheConfig::bounded(1000);
    /// assert_eq!(config.capacity, 1000);
    /// ```
    pub const fn bounded(capacity: usize) -> Self {
        Self { capacity, default_ttl: Duration::ZERO }
    }

    /// Quick preset for an unbounded cache whose entries expire
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    ///
    /// use keystash::cache::CacheConfig;
    ///
    /// let config = CacheConfig::timed(Duration::from_secs(3600));
    /// assert_eq!(config.capacity, 0);
    /// ```
    pub const fn timed(default_ttl: Duration) -> Self {
        Self { capacity: 0, default_ttl }
    }

    /// Size bound plus default expiry
    pub const fn bounded_timed(capacity: usize, default_ttl: Duration) -> Self {
        Self { capacity, default_ttl }
    }
}

/// Builder for CacheConfig with fluent API
#[derive(Debug, Default)]
pub struct CacheConfigBuilder {
    config: CacheConfig,
}

impl CacheConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum number of entries (0 = unbounded)
    pub const fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Set the ttl used by `put`
    pub const fn default_ttl(mut self, ttl: Duration) -> Self {
        self.config.default_ttl = ttl;
        self
    }

    /// Build the configuration
    pub const fn build(self) -> CacheConfig {
        self.config
    }
}

/// Engine configuration plus the policy that selects the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Which strategy to build
    pub policy: EvictionPolicy,

    /// Capacity and default ttl
    #[serde(flatten)]
    pub cache: CacheConfig,
}

impl PolicyConfig {
    /// Pair a policy with an engine configuration
    pub const fn new(policy: EvictionPolicy, cache: CacheConfig) -> Self {
        Self { policy, cache }
    }
}
