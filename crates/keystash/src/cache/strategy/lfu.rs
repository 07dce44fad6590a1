//! Least frequently used.

use std::hash::Hash;

use tracing::trace;

use super::{EvictionContext, EvictionStrategy};

/// Evicts every entry tied at the lowest access count
///
/// Prune runs in one pass over the entries, dropping expired ones and finding
/// the minimum access count among the survivors. If the cache is still full,
/// that minimum is subtracted from every survivor and the entries that reach
/// zero are evicted. The subtraction keeps counts relative, so an entry that
/// was hot long ago cannot pin itself in the cache forever.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lfu;

impl EvictionStrategy for Lfu {
    fn name(&self) -> &'static str {
        "lfu"
    }

    fn prune<K: Hash + Eq, V>(&self, ctx: &mut EvictionContext<'_, K, V>) -> usize {
        let mut min_count: Option<u64> = None;
        let expired = ctx.remove_expired_visiting(|_, entry| {
            let count = entry.access_count();
            if min_count.map_or(true, |min| count < min) {
                min_count = Some(count);
            }
        });

        if !ctx.is_full() {
            return expired;
        }
        let Some(min) = min_count else {
            return expired;
        };

        let evicted = ctx.evict_where(|_, entry| entry.decay(min) == 0);
        trace!(min_count = min, evicted, "lfu normalization");
        expired + evicted
    }
}
