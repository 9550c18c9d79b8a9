//! Diagnostics CLI over the ethash-core library. Not part of the crate's
//! public contract (design §6) — a thin `clap` front end for
//! `epoch_params` and `EthashVerifier::validate`, printing JSON.

use clap::{Parser, Subcommand};
use num_bigint::BigUint;
use serde::Serialize;

use ethash_core::{epoch_params, EthashError, EthashVerifier, SealedHeader};

#[derive(Parser)]
#[command(name = "ethash-cli", about = "Ethash epoch-parameter and validation diagnostics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the epoch, cache size, dataset size and seed hash for a block number.
    EpochParams { block_number: u64 },

    /// Validate a header's proof of work against its bare (pre-seal) hash.
    Validate {
        block_number: u64,
        nonce: u64,
        /// Hex-encoded 32-byte Keccak-256 of the bare header (no mix/nonce fields).
        bare_hash: String,
        /// Hex-encoded 32-byte claimed mix hash, or all-zero if unsealed.
        mix_hash: String,
        difficulty: String,
    },
}

struct CliHeader {
    number: u64,
    nonce: u64,
    mix_hash: [u8; 32],
    difficulty: BigUint,
    bare_hash: [u8; 32],
}

impl SealedHeader for CliHeader {
    fn number(&self) -> u64 {
        self.number
    }
    fn nonce(&self) -> u64 {
        self.nonce
    }
    fn mix_hash(&self) -> [u8; 32] {
        self.mix_hash
    }
    fn difficulty(&self) -> BigUint {
        self.difficulty.clone()
    }
    fn bare_hash(&self) -> Result<[u8; 32], EthashError> {
        Ok(self.bare_hash)
    }
}

fn parse_hash32(s: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = hex::decode(s.trim_start_matches("0x"))?;
    anyhow::ensure!(bytes.len() == 32, "expected 32 bytes, got {}", bytes.len());
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    Ok(out)
}

#[derive(Serialize)]
struct ValidateOutput {
    valid: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Command::EpochParams { block_number } => {
            let params = epoch_params(block_number)?;
            println!("{}", serde_json::to_string_pretty(&params)?);
        }
        Command::Validate { block_number, nonce, bare_hash, mix_hash, difficulty } => {
            let header = CliHeader {
                number: block_number,
                nonce,
                mix_hash: parse_hash32(&mix_hash)?,
                difficulty: difficulty.parse::<BigUint>()?,
                bare_hash: parse_hash32(&bare_hash)?,
            };
            let verifier = EthashVerifier::default();
            let valid = verifier.validate(&header)?;
            println!("{}", serde_json::to_string_pretty(&ValidateOutput { valid })?);
        }
    }

    Ok(())
}
