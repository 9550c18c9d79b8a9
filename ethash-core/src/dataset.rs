//! Dataset element synthesis: recompute the `index`-th 64-byte
//! dataset item from the cache on demand. The dataset itself is never
//! materialized.

use sha3::{Digest, Keccak512};

use crate::cache::EpochCache;
use crate::epoch::DATASET_PARENTS;
use crate::fnv::fnv;

fn words_le(bytes: &[u8]) -> [u32; 16] {
    let mut words = [0u32; 16];
    for (w, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
        *w = u32::from_le_bytes(chunk.try_into().unwrap());
    }
    words
}

fn bytes_le(words: &[u32; 16]) -> [u8; 64] {
    let mut bytes = [0u8; 64];
    for (chunk, w) in bytes.chunks_exact_mut(4).zip(words.iter()) {
        chunk.copy_from_slice(&w.to_le_bytes());
    }
    bytes
}

/// Recompute dataset item `index` from `cache`. Reads at most
/// `1 + DATASET_PARENTS` cache items (self plus 256 parents).
pub fn calc_dataset_item(cache: &EpochCache, index: u32) -> [u8; 64] {
    let n = cache.len() as u32;

    let seed_item = cache.item(index % n);
    let mut mix_bytes = [0u8; 64];
    mix_bytes.copy_from_slice(seed_item);

    let first_word = u32::from_le_bytes(mix_bytes[0..4].try_into().unwrap());
    mix_bytes[0..4].copy_from_slice(&(first_word ^ index).to_le_bytes());

    let mut hasher = Keccak512::new();
    hasher.update(mix_bytes);
    let digest = hasher.finalize();
    let mut mix = words_le(&digest);

    for k in 0..DATASET_PARENTS {
        let parent_idx = fnv(index ^ k, mix[(k % 16) as usize]) % n;
        let parent = words_le(cache.item(parent_idx));
        for w in 0..16 {
            mix[w] = fnv(mix[w], parent[w]);
        }
    }

    let mut hasher = Keccak512::new();
    hasher.update(bytes_le(&mix));
    let digest = hasher.finalize();
    let mut out = [0u8; 64];
    out.copy_from_slice(&digest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A toy-sized cache: real epoch-0 sizes are ~16MB and too slow to
    /// build per test. `calc_dataset_item` only cares that the cache is
    /// at least `1 + DATASET_PARENTS`-ish items for the modulo to be
    /// meaningful, not that its size satisfies the epoch primality rule.
    fn test_cache() -> EpochCache {
        EpochCache::build(0, [5u8; 32], 64 * 17)
    }

    #[test]
    fn is_deterministic() {
        let cache = test_cache();
        assert_eq!(calc_dataset_item(&cache, 0), calc_dataset_item(&cache, 0));
    }

    #[test]
    fn distinct_indices_give_distinct_items() {
        let cache = test_cache();
        assert_ne!(calc_dataset_item(&cache, 0), calc_dataset_item(&cache, 1));
    }

    #[test]
    fn index_wraps_with_cache_len() {
        let cache = test_cache();
        let n = cache.len() as u32;
        assert_eq!(calc_dataset_item(&cache, 0), calc_dataset_item(&cache, n));
    }
}
