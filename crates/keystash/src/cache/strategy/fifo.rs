//! First in, first out.

use std::hash::Hash;

use super::{EvictionContext, EvictionStrategy};

/// Evicts the oldest inserted entry
///
/// Prune first sweeps expired entries; only if the cache is still full does
/// it evict, and then exactly one entry: the front of the insertion order.
/// Re-putting a key counts as a new insertion and moves it to the back.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fifo;

impl EvictionStrategy for Fifo {
    fn name(&self) -> &'static str {
        "fifo"
    }

    fn prune<K: Hash + Eq, V>(&self, ctx: &mut EvictionContext<'_, K, V>) -> usize {
        let mut removed = ctx.remove_expired();
        if ctx.is_full() && ctx.evict_index(0) {
            removed += 1;
        }
        removed
    }
}
