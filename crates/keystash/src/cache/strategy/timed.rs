//! Expiry only.

use std::hash::Hash;

use super::{EvictionContext, EvictionStrategy};

/// Removes expired entries and never evicts for capacity
///
/// A timed cache may grow past its configured capacity; `is_full` still
/// reports the comparison, but nothing acts on it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Timed;

impl EvictionStrategy for Timed {
    fn name(&self) -> &'static str {
        "timed"
    }

    fn prune<K: Hash + Eq, V>(&self, ctx: &mut EvictionContext<'_, K, V>) -> usize {
        if !ctx.expiry_active() {
            return 0;
        }
        ctx.remove_expired()
    }
}
