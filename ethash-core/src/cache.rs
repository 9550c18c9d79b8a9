//! Cache construction: the small seed-derived buffer that the
//! dataset-element synthesizer recomputes dataset items from.

use sha3::{Digest, Keccak512};
use tracing::debug;

use crate::epoch::{CACHE_ROUNDS, HASH_BYTES};

/// An immutable, fully built epoch cache. Handed out from the LRU
/// (`crate::verifier`) as a shared, read-only `Arc`.
#[derive(Debug)]
pub struct EpochCache {
    epoch: u64,
    bytes: Vec<u8>,
}

impl EpochCache {
    /// Build the cache for `seed`, `cache_size` bytes long (a multiple of
    /// `HASH_BYTES`, as returned by `crate::epoch::cache_size`).
    pub fn build(epoch: u64, seed: [u8; 32], cache_size: u64) -> Self {
        let n = (cache_size / HASH_BYTES) as usize;
        debug!(epoch, cache_size, items = n, "building epoch cache");

        let mut bytes = vec![0u8; cache_size as usize];

        let mut hasher = Keccak512::new();
        hasher.update(seed);
        bytes[0..64].copy_from_slice(&hasher.finalize());

        for i in 1..n {
            let mut hasher = Keccak512::new();
            hasher.update(&bytes[(i - 1) * 64..i * 64]);
            let digest = hasher.finalize();
            bytes[i * 64..(i + 1) * 64].copy_from_slice(&digest);
        }

        let mut scratch = [0u8; 64];
        for _round in 0..CACHE_ROUNDS {
            for i in 0..n {
                let v = (u32::from_le_bytes(bytes[i * 64..i * 64 + 4].try_into().unwrap())
                    as usize)
                    % n;
                let prev = (i + n - 1) % n;

                for b in 0..64 {
                    scratch[b] = bytes[prev * 64 + b] ^ bytes[v * 64 + b];
                }

                let mut hasher = Keccak512::new();
                hasher.update(scratch);
                let digest = hasher.finalize();
                bytes[i * 64..(i + 1) * 64].copy_from_slice(&digest);
            }
        }

        debug!(epoch, "epoch cache built");
        EpochCache { epoch, bytes }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Number of 64-byte items in this cache.
    pub fn len(&self) -> usize {
        self.bytes.len() / 64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// The `index`-th 64-byte item (indices wrap modulo `len()`).
    pub fn item(&self, index: u32) -> &[u8] {
        let i = (index as usize) % self.len();
        &self.bytes[i * 64..(i + 1) * 64]
    }
}
