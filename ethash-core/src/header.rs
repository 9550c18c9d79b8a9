//! The boundary between this crate and the header/RLP world it does not
//! own. Callers implement [`SealedHeader`] against their own
//! block type instead of this crate depending on an RLP encoder.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::error::EthashError;

/// Everything Hashimoto needs from a block header, without this crate
/// knowing anything about RLP or the rest of the header's fields.
pub trait SealedHeader {
    /// Block number, used to derive the epoch.
    fn number(&self) -> u64;

    /// The nonce under test.
    fn nonce(&self) -> u64;

    /// The seal's mix hash, or `[0; 32]` if absent (treated as "not yet
    /// sealed", which skips the mix-hash comparison).
    fn mix_hash(&self) -> [u8; 32];

    /// PoW difficulty target.
    fn difficulty(&self) -> BigUint;

    /// Keccak-256 of the canonical pre-seal header encoding (every field
    /// except `mixHash` and `nonce`). Produced by an external RLP
    /// encoder this crate does not own; surfaced as
    /// `EthashError::HeaderEncoding` on failure.
    fn bare_hash(&self) -> Result<[u8; 32], EthashError>;
}

/// `floor(2^256 / difficulty)`. Difficulty 0 has no finite threshold;
/// rather than divide by zero, it is treated as unsatisfiable and maps to
/// a threshold of 0 (no 32-byte result is ever strictly below it).
pub fn difficulty_threshold(difficulty: &BigUint) -> BigUint {
    if difficulty.is_zero() {
        return BigUint::zero();
    }
    (BigUint::one() << 256usize) / difficulty
}

/// Big-endian unsigned interpretation of a 32-byte Hashimoto result.
pub fn result_as_uint(result: &[u8; 32]) -> BigUint {
    BigUint::from_bytes_be(result)
}
