//! Ethash — the memory-hard proof-of-work pipeline used to validate and
//! mine block headers on an Ethereum-style chain prior to the
//! proof-of-stake transition.
//!
//! The pipeline is five components wired leaves-first:
//!
//! - [`epoch`]: pure epoch-parameter derivation from a block number.
//! - [`cache`]: the small seed-derived cache a dataset is recomputed from.
//! - [`dataset`]: on-demand synthesis of individual dataset elements.
//! - [`hashimoto`]: the 64-access mixing loop over the dataset.
//! - [`verifier`]: an epoch-cache LRU plus `validate`/`mine` entry points.
//!
//! Callers that don't own a full block type implement [`header::SealedHeader`]
//! against it; this crate never encodes RLP or hashes anything but the
//! Ethash-internal buffers, delegating Keccak-256/512 to the `sha3` crate.

pub mod cache;
pub mod config;
pub mod dataset;
pub mod epoch;
pub mod error;
pub mod fnv;
pub mod hashimoto;
pub mod header;
pub mod verifier;

pub use cache::EpochCache;
pub use config::EthashConfig;
pub use epoch::{epoch_params, EpochParams};
pub use error::{EthashError, MiningOutcome, Result};
pub use fnv::fnv;
pub use hashimoto::{hashimoto, DatasetAccessor};
pub use header::SealedHeader;
pub use verifier::{CancellationToken, EthashVerifier};
