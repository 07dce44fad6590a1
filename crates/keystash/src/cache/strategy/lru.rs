//! Least recently used.

use std::hash::Hash;

use super::{EvictionContext, EvictionStrategy};

/// Evicts the least recently used entry as soon as an insertion overflows
/// capacity
///
/// Every hit moves the entry to the back of the order, so the front is always
/// the eldest. Capacity is enforced by [`on_insert`](EvictionStrategy::on_insert)
/// rather than by prune, which only sweeps expired entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lru;

impl EvictionStrategy for Lru {
    fn name(&self) -> &'static str {
        "lru"
    }

    fn promotes_on_access(&self) -> bool {
        true
    }

    fn on_access<K: Hash + Eq, V>(&self, ctx: &mut EvictionContext<'_, K, V>, index: usize) {
        ctx.move_to_back(index);
    }

    fn on_insert<K: Hash + Eq, V>(&self, ctx: &mut EvictionContext<'_, K, V>) -> usize {
        let mut evicted = 0;
        while ctx.capacity() > 0 && ctx.len() > ctx.capacity() && ctx.evict_index(0) {
            evicted += 1;
        }
        evicted
    }

    fn prune<K: Hash + Eq, V>(&self, ctx: &mut EvictionContext<'_, K, V>) -> usize {
        if !ctx.expiry_active() {
            return 0;
        }
        ctx.remove_expired()
    }
}
