//! Epoch-cache LRU, header validation and nonce search.
//!
//! A plain `Arc<RwLock<HashMap<epoch, Arc<_>>>>` would serialize every
//! cache lookup behind one lock; this swaps that for a concurrent map plus
//! a single-flight slot per epoch, so two validators racing to build the
//! same new epoch's cache share one build instead of each building their
//! own.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::cache::EpochCache;
use crate::config::EthashConfig;
use crate::dataset::calc_dataset_item;
use crate::epoch::epoch_params;
use crate::error::{EthashError, MiningOutcome, Result};
use crate::hashimoto::hashimoto;
use crate::header::{difficulty_threshold, result_as_uint, SealedHeader};

/// A shared flag a caller can flip from another thread to stop a
/// [`EthashVerifier::mine`] search in progress.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

type CacheSlot = Arc<OnceCell<Arc<EpochCache>>>;

/// Validates headers and searches for nonces, keeping a bounded,
/// least-recently-used set of epoch caches resident.
pub struct EthashVerifier {
    config: EthashConfig,
    slots: DashMap<u64, CacheSlot>,
    order: Mutex<VecDeque<u64>>,
}

impl EthashVerifier {
    pub fn new(config: EthashConfig) -> Self {
        Self { config, slots: DashMap::new(), order: Mutex::new(VecDeque::new()) }
    }

    /// The epoch cache for the epoch containing `block_number`, built on
    /// first use and shared by every caller that asks for the same
    /// epoch concurrently (single-flight via `OnceCell`).
    fn epoch_cache(&self, epoch: u64, seed_hash: [u8; 32], cache_size: u64) -> Arc<EpochCache> {
        let slot = self.slots.entry(epoch).or_insert_with(|| Arc::new(OnceCell::new())).clone();

        let cache = slot
            .get_or_init(|| Arc::new(EpochCache::build(epoch, seed_hash, cache_size)))
            .clone();

        self.touch(epoch);
        self.evict_if_needed();
        cache
    }

    fn touch(&self, epoch: u64) {
        let mut order = self.order.lock();
        if let Some(pos) = order.iter().position(|&e| e == epoch) {
            order.remove(pos);
        }
        order.push_back(epoch);
    }

    fn evict_if_needed(&self) {
        let mut order = self.order.lock();
        while order.len() > self.config.lru_capacity {
            if let Some(oldest) = order.pop_front() {
                self.slots.remove(&oldest);
                debug!(epoch = oldest, "evicted epoch cache");
            } else {
                break;
            }
        }
    }

    /// Validate that `header`'s nonce produces a result below its
    /// difficulty threshold, recomputing the mix hash and result with
    /// [`hashimoto`] against a lazily-built epoch cache. If the header
    /// already carries a non-zero mix hash (a sealed header being
    /// re-checked) it must match exactly, or validation fails.
    pub fn validate<H: SealedHeader>(&self, header: &H) -> Result<bool> {
        let params = epoch_params(header.number())?;
        let cache = self.epoch_cache(params.epoch, params.seed_hash, params.cache_size);
        let bare_hash = header.bare_hash()?;

        let accessor = |index: u32| calc_dataset_item(&cache, index);
        let (mix_hash, result) = hashimoto(params.dataset_size, &accessor, bare_hash, header.nonce());

        let claimed_mix = header.mix_hash();
        if claimed_mix != [0u8; 32] && claimed_mix != mix_hash {
            return Ok(false);
        }

        let threshold = difficulty_threshold(&header.difficulty());
        Ok(result_as_uint(&result) < threshold)
    }

    /// Search for a nonce that satisfies `header`'s difficulty, starting
    /// from a random point and scanning forward. Runs on rayon's global
    /// pool (sized per `EthashConfig::mining_threads`) when
    /// `config.use_rayon` is set; otherwise searches on the calling
    /// thread. Either way, `cancel` is polled frequently enough that a
    /// caller can interrupt a search that would otherwise run forever.
    pub fn mine<H: SealedHeader>(
        &self,
        header: &H,
        cancel: &CancellationToken,
    ) -> std::result::Result<u64, MiningOutcome> {
        let params = epoch_params(header.number())?;
        let cache = self.epoch_cache(params.epoch, params.seed_hash, params.cache_size);
        let bare_hash = header.bare_hash()?;
        let threshold = difficulty_threshold(&header.difficulty());

        let start_nonce: u64 = rand::thread_rng().gen();
        info!(epoch = params.epoch, start_nonce, "starting nonce search");

        const CHUNK: u64 = 4096;

        if self.config.use_rayon {
            let pool = match self.config.mining_threads {
                Some(n) => rayon::ThreadPoolBuilder::new().num_threads(n).build().ok(),
                None => None,
            };
            let search = || {
                (0u64..u64::MAX / CHUNK).into_par_iter().find_map_any(|chunk| {
                    if cancel.is_cancelled() {
                        return None;
                    }
                    let base = start_nonce.wrapping_add(chunk.wrapping_mul(CHUNK));
                    for offset in 0..CHUNK {
                        if cancel.is_cancelled() {
                            return None;
                        }
                        let nonce = base.wrapping_add(offset);
                        let accessor = |index: u32| calc_dataset_item(&cache, index);
                        let (_, result) = hashimoto(params.dataset_size, &accessor, bare_hash, nonce);
                        if result_as_uint(&result) < threshold {
                            return Some(nonce);
                        }
                    }
                    None
                })
            };
            let found = match pool {
                Some(pool) => pool.install(search),
                None => search(),
            };
            return found.ok_or(MiningOutcome::Cancelled);
        }

        let mut nonce = start_nonce;
        loop {
            if cancel.is_cancelled() {
                warn!("nonce search cancelled");
                return Err(MiningOutcome::Cancelled);
            }
            let accessor = |index: u32| calc_dataset_item(&cache, index);
            let (_, result) = hashimoto(params.dataset_size, &accessor, bare_hash, nonce);
            if result_as_uint(&result) < threshold {
                return Ok(nonce);
            }
            nonce = nonce.wrapping_add(1);
        }
    }

    /// Number of epoch caches currently resident.
    pub fn resident_epochs(&self) -> usize {
        self.slots.len()
    }
}

impl Default for EthashVerifier {
    fn default() -> Self {
        Self::new(EthashConfig::default())
    }
}
