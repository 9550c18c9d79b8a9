//! Error types for the Ethash core.

use thiserror::Error;

/// Failures raised by epoch-parameter derivation, cache construction and
/// validation. Consensus-invalid headers are never an `Err` — see
/// [`crate::verifier::EthashVerifier::validate`].
#[derive(Error, Debug)]
pub enum EthashError {
    /// The block number implies an epoch index beyond what this
    /// implementation supports (roughly 2^32 epochs).
    #[error("block number {block_number} is out of the supported epoch range")]
    ParameterOutOfRange { block_number: u64 },

    /// The caller-supplied header could not be encoded into the
    /// pre-seal byte form Hashimoto needs.
    #[error("header encoding failed: {0}")]
    HeaderEncoding(String),

    /// A hash primitive reported a failure (should not happen with `sha3`,
    /// but kept for forward compatibility with pluggable hashers).
    #[error("hash primitive failure: {0}")]
    Hash(String),
}

pub type Result<T> = std::result::Result<T, EthashError>;

/// Terminal outcome of a [`crate::verifier::EthashVerifier::mine`] call.
#[derive(Error, Debug)]
pub enum MiningOutcome {
    /// The caller's cancellation token was observed before a solution
    /// was found.
    #[error("mining cancelled before a solution was found")]
    Cancelled,

    /// Epoch-parameter derivation or cache construction failed before
    /// the search could even start.
    #[error(transparent)]
    Failed(#[from] EthashError),
}
