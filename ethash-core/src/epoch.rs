//! Epoch-parameter derivation: epoch index, cache/dataset sizes and
//! seed hash, all as pure functions of a block number.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use sha3::{Digest, Keccak256};

use crate::error::{EthashError, Result};

pub const WORD_BYTES: u64 = 4;
pub const HASH_BYTES: u64 = 64;
pub const MIX_BYTES: u64 = 128;
pub const DATASET_PARENTS: u32 = 256;
pub const CACHE_ROUNDS: usize = 3;
pub const ACCESSES: usize = 64;
pub const EPOCH_LENGTH: u64 = 30_000;
pub const DATASET_BYTES_INIT: u64 = 1 << 30;
pub const DATASET_BYTES_GROWTH: u64 = 1 << 23;
pub const CACHE_BYTES_INIT: u64 = 1 << 24;
pub const CACHE_BYTES_GROWTH: u64 = 1 << 17;

/// Largest epoch index this implementation will derive sizes for. Beyond
/// this the seed-hash chain and size search would take unreasonable time
/// and are not a supported operating point.
const MAX_SUPPORTED_EPOCH: u64 = 1 << 32;

/// `N / EpochLength`.
pub fn epoch(block_number: u64) -> u64 {
    block_number / EPOCH_LENGTH
}

/// Trial-division primality test: rules out 2 and 3 directly, then checks
/// `6k ± 1` candidates up to `sqrt(n)`. `n` is expected to be the item
/// count (`size / unit`), which stays well under 2^40 for any supported
/// epoch, so `u64` arithmetic with `checked_mul` guards is sufficient.
fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 || n == 3 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut k = 5u64;
    loop {
        match k.checked_mul(k) {
            Some(k2) if k2 <= n => {}
            _ => break,
        }
        if n % k == 0 || n % (k + 2) == 0 {
            return false;
        }
        k += 6;
    }
    true
}

/// Largest multiple of `unit` at most `budget` whose `/ unit` quotient is
/// prime, searching downward in steps of `2 * unit` starting one `unit`
/// below `budget` (matching the reference search order exactly).
fn largest_prime_sized(budget: u64, unit: u64) -> u64 {
    let mut size = budget - unit;
    while !is_prime(size / unit) {
        size -= 2 * unit;
    }
    size
}

/// Cache size in bytes for the epoch containing `block_number`: the
/// largest prime-itemized multiple of `HASH_BYTES` not exceeding
/// `CacheBytesInit + CacheBytesGrowth * epoch - HashBytes`.
pub fn cache_size(block_number: u64) -> Result<u64> {
    let e = epoch(block_number);
    if e >= MAX_SUPPORTED_EPOCH {
        return Err(EthashError::ParameterOutOfRange { block_number });
    }
    let budget = CACHE_BYTES_INIT + CACHE_BYTES_GROWTH * e;
    Ok(largest_prime_sized(budget, HASH_BYTES))
}

/// Dataset size in bytes for the epoch containing `block_number`: the
/// largest prime-itemized multiple of `MIX_BYTES` not exceeding
/// `DatasetBytesInit + DatasetBytesGrowth * epoch - MixBytes`.
pub fn dataset_size(block_number: u64) -> Result<u64> {
    let e = epoch(block_number);
    if e >= MAX_SUPPORTED_EPOCH {
        return Err(EthashError::ParameterOutOfRange { block_number });
    }
    let budget = DATASET_BYTES_INIT + DATASET_BYTES_GROWTH * e;
    Ok(largest_prime_sized(budget, MIX_BYTES))
}

/// Keccak-256, applied `epoch` times to the 32 zero bytes. Successive
/// epochs extend the same chain by one hash, so the chain computed so far
/// is memoized and reused across calls.
static SEED_CHAIN: Lazy<Mutex<Vec<[u8; 32]>>> = Lazy::new(|| Mutex::new(vec![[0u8; 32]]));

pub fn seed_hash(block_number: u64) -> Result<[u8; 32]> {
    let e = epoch(block_number);
    if e >= MAX_SUPPORTED_EPOCH {
        return Err(EthashError::ParameterOutOfRange { block_number });
    }
    let e = e as usize;
    let mut chain = SEED_CHAIN.lock();
    while chain.len() <= e {
        let prev = *chain.last().expect("seed chain is never empty");
        let mut hasher = Keccak256::new();
        hasher.update(prev);
        let digest = hasher.finalize();
        let mut next = [0u8; 32];
        next.copy_from_slice(&digest);
        chain.push(next);
    }
    Ok(chain[e])
}

/// The three epoch-scoped parameters a verifier needs, bundled for
/// diagnostics and testing (`epoch_params` in the public API).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EpochParams {
    pub epoch: u64,
    pub cache_size: u64,
    pub dataset_size: u64,
    pub seed_hash: [u8; 32],
}

pub fn epoch_params(block_number: u64) -> Result<EpochParams> {
    Ok(EpochParams {
        epoch: epoch(block_number),
        cache_size: cache_size(block_number)?,
        dataset_size: dataset_size(block_number)?,
        seed_hash: seed_hash(block_number)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primality_boundary_cases() {
        assert!(!is_prime(0));
        assert!(!is_prime(1));
        assert!(is_prime(2));
        assert!(is_prime(3));
        assert!(!is_prime(9));
        assert!(is_prime(262_139));
        assert!(!is_prime(262_144));
    }

    #[test]
    fn epoch_zero_parameters_match_reference_vectors() {
        assert_eq!(cache_size(0).unwrap(), 16_776_896);
        assert_eq!(dataset_size(0).unwrap(), 1_073_739_904);
        assert_eq!(seed_hash(0).unwrap(), [0u8; 32]);

        assert_eq!(cache_size(0).unwrap() / HASH_BYTES, 262_139);
        assert!(is_prime(cache_size(0).unwrap() / HASH_BYTES));
        assert_eq!(dataset_size(0).unwrap() / MIX_BYTES, 8_388_593);
        assert!(is_prime(dataset_size(0).unwrap() / MIX_BYTES));
    }

    #[test]
    fn epoch_one_seed_hash_is_single_keccak() {
        let mut hasher = Keccak256::new();
        hasher.update([0u8; 32]);
        let expected = hasher.finalize();
        assert_eq!(&seed_hash(EPOCH_LENGTH).unwrap()[..], &expected[..]);
    }

    #[test]
    fn sizes_grow_monotonically_with_epoch() {
        let c0 = cache_size(0).unwrap();
        let c1 = cache_size(EPOCH_LENGTH).unwrap();
        assert!(c1 > c0);

        let d0 = dataset_size(0).unwrap();
        let d1 = dataset_size(EPOCH_LENGTH).unwrap();
        assert!(d1 > d0);
    }

    #[test]
    fn seed_hash_depends_only_on_epoch() {
        let a = seed_hash(0).unwrap();
        let b = seed_hash(EPOCH_LENGTH - 1).unwrap();
        assert_eq!(a, b);

        let c = seed_hash(EPOCH_LENGTH).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn sizes_are_always_unit_aligned() {
        for n in [0, 1, EPOCH_LENGTH, EPOCH_LENGTH * 5, EPOCH_LENGTH * 100] {
            assert_eq!(cache_size(n).unwrap() % HASH_BYTES, 0);
            assert_eq!(dataset_size(n).unwrap() % MIX_BYTES, 0);
        }
    }
}
