//! Shuffle-and-stride partitioning of the global book list into shards.

use rand::seq::SliceRandom;
use rand::Rng;

/// Partition `items` into `num_shards` shards by stride: shard `s` receives
/// items at positions `s, s+P, s+2P, ...`. Equivalent to round-robin
/// dealing. Mixes small and large books across shards for load balance.
pub fn stride_partition<T>(items: Vec<T>, num_shards: usize) -> Vec<Vec<T>> {
    let mut shards: Vec<Vec<T>> = (0..num_shards).map(|_| Vec::new()).collect();
    for (idx, item) in items.into_iter().enumerate() {
        shards[idx % num_shards].push(item);
    }
    shards
}

/// Shuffle `items` in place using `rng`, then stride-partition.
pub fn shuffle_and_partition<T>(mut items: Vec<T>, num_shards: usize, rng: &mut impl Rng) -> Vec<Vec<T>> {
    items.shuffle(rng);
    stride_partition(items, num_shards)
}
