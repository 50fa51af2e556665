//! Maps items to shard indices.
//!
//! The default hasher is [`rustc_hash::FxHasher`] behind a [`BuildHasherDefault`], so it carries
//! no per-instance state: two sets with the same shard count always place an item in the same
//! shard.
use std::hash::{BuildHasher, BuildHasherDefault};

use rustc_hash::FxHasher;

/// The hasher used by [`crate::ShardSet`] and [`crate::LocalSet`] unless another one is supplied.
pub type DefaultHashBuilder = BuildHasherDefault<FxHasher>;

/// Returns the shard an item belongs to in a set of `shards` shards built with the default
/// hasher.
///
/// # Example
/// ```
/// use shardset::bucket_index;
///
/// let idx = bucket_index("foo", 64);
/// assert!(idx < 64);
/// assert_eq!(idx, bucket_index("foo", 64));
/// ```
pub fn bucket_index(item: &str, shards: usize) -> usize {
    index_for_hash(DefaultHashBuilder::default().hash_one(item), shards)
}

#[inline]
pub(crate) fn index_for_hash(hash: u64, shards: usize) -> usize {
    debug_assert!(shards > 0);
    // Skip the 7 high bits hashbrown uses for its control tag and the low bits it probes with,
    // otherwise every item of a shard would share the same table bucket bits.
    (((hash << 7) >> 32) % shards as u64) as usize
}
