//! The Hashimoto mixer: 64 pseudorandom dataset accesses folded with
//! FNV, compressed into the 32-byte mix hash, and hashed down to the
//! final 32-byte result.

use sha3::{Digest, Keccak256, Keccak512};

use crate::epoch::{ACCESSES, HASH_BYTES, MIX_BYTES};
use crate::fnv::{fnv, fnv_words};

const WORDS_IN_MIX: usize = (MIX_BYTES / 4) as usize; // 32
const HASHES_IN_MIX: u64 = MIX_BYTES / HASH_BYTES; // 2

/// A 64-byte dataset element accessor. In light-verification mode this is
/// C3 bound to a cache (`crate::verifier`); tests may bind it to a fully
/// materialized dataset to check P6 (the two must agree byte-for-byte).
pub trait DatasetAccessor {
    fn get(&self, index: u32) -> [u8; 64];
}

impl<F: Fn(u32) -> [u8; 64]> DatasetAccessor for F {
    fn get(&self, index: u32) -> [u8; 64] {
        self(index)
    }
}

fn words_le(bytes: &[u8]) -> Vec<u32> {
    bytes.chunks_exact(4).map(|c| u32::from_le_bytes(c.try_into().unwrap())).collect()
}

/// Run Hashimoto over a dataset of `data_size` bytes, using `accessor` to
/// fetch individual 64-byte elements. Returns `(mix_hash, result)`.
pub fn hashimoto<A: DatasetAccessor>(
    data_size: u64,
    accessor: &A,
    header_hash: [u8; 32],
    nonce: u64,
) -> ([u8; 32], [u8; 32]) {
    let hashes_in_full = data_size / HASH_BYTES;

    let mut seed_input = [0u8; 40];
    seed_input[0..32].copy_from_slice(&header_hash);
    seed_input[32..40].copy_from_slice(&nonce.to_le_bytes());
    let mut hasher = Keccak512::new();
    hasher.update(seed_input);
    let seed_digest = hasher.finalize();
    let mut seed = [0u8; 64];
    seed.copy_from_slice(&seed_digest);

    let seed_words = words_le(&seed);
    let mut mix = [0u32; WORDS_IN_MIX];
    for (w, &sw) in mix.iter_mut().zip(seed_words.iter().cycle()) {
        *w = sw;
    }

    let mut new_data_bytes = [0u8; MIX_BYTES as usize];
    for i in 0..ACCESSES {
        let p = (fnv(i as u32 ^ seed_words[0], mix[i % WORDS_IN_MIX])
            % (hashes_in_full / HASHES_IN_MIX) as u32) as u64
            * HASHES_IN_MIX;

        for j in 0..HASHES_IN_MIX {
            let item = accessor.get((p + j) as u32);
            let offset = (j * HASH_BYTES) as usize;
            new_data_bytes[offset..offset + HASH_BYTES as usize].copy_from_slice(&item);
        }

        let new_data_words = words_le(&new_data_bytes);
        fnv_words(&mut mix, &new_data_words);
    }

    let mut cmix = [0u32; 8];
    for (i, c) in cmix.iter_mut().enumerate() {
        let base = i * 4;
        *c = fnv(fnv(fnv(mix[base], mix[base + 1]), mix[base + 2]), mix[base + 3]);
    }
    let mut cmix_bytes = [0u8; 32];
    for (chunk, w) in cmix_bytes.chunks_exact_mut(4).zip(cmix.iter()) {
        chunk.copy_from_slice(&w.to_le_bytes());
    }

    let mut final_input = Vec::with_capacity(96);
    final_input.extend_from_slice(&seed);
    final_input.extend_from_slice(&cmix_bytes);
    let mut hasher = Keccak256::new();
    hasher.update(&final_input);
    let result_digest = hasher.finalize();
    let mut result = [0u8; 32];
    result.copy_from_slice(&result_digest);

    (cmix_bytes, result)
}
