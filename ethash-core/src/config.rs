//! Tunables for [`crate::verifier::EthashVerifier`]: a builder-with-defaults
//! struct, serde-derived for diagnostics, no external config-file parser.

use serde::{Deserialize, Serialize};

/// `CacheCacheSizeLimit` from the historical reference: six epoch caches
/// resident at once.
fn default_lru_capacity() -> usize {
    6
}

fn default_use_rayon() -> bool {
    true
}

/// Configuration for an [`crate::verifier::EthashVerifier`] instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EthashConfig {
    /// Number of epoch caches kept resident at once. Defaults to the
    /// historical `CacheCacheSizeLimit` of 6.
    #[serde(default = "default_lru_capacity")]
    pub lru_capacity: usize,

    /// Whether independent epoch cache builds may run on the rayon
    /// global pool. Building a single cache is never parallelized
    /// internally (the three RandMemoHash rounds are sequential); this
    /// only affects whether two different epochs can build at once.
    #[serde(default = "default_use_rayon")]
    pub use_rayon: bool,

    /// Optional cap on the rayon thread pool used for mining's
    /// nonce search. `None` defers to rayon's default (number of CPUs).
    #[serde(default)]
    pub mining_threads: Option<usize>,
}

impl Default for EthashConfig {
    fn default() -> Self {
        Self {
            lru_capacity: default_lru_capacity(),
            use_rayon: default_use_rayon(),
            mining_threads: None,
        }
    }
}

impl EthashConfig {
    pub fn with_lru_capacity(mut self, capacity: usize) -> Self {
        self.lru_capacity = capacity.max(1);
        self
    }

    pub fn with_use_rayon(mut self, use_rayon: bool) -> Self {
        self.use_rayon = use_rayon;
        self
    }

    pub fn with_mining_threads(mut self, threads: usize) -> Self {
        self.mining_threads = Some(threads);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_capacity() {
        let cfg = EthashConfig::default();
        assert!(cfg.lru_capacity >= 2);
        assert!(cfg.use_rayon);
        assert_eq!(cfg.mining_threads, None);
    }

    #[test]
    fn builder_methods_chain() {
        let cfg = EthashConfig::default().with_lru_capacity(5).with_use_rayon(false).with_mining_threads(4);
        assert_eq!(cfg.lru_capacity, 5);
        assert!(!cfg.use_rayon);
        assert_eq!(cfg.mining_threads, Some(4));
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let cfg = EthashConfig::default().with_lru_capacity(0);
        assert_eq!(cfg.lru_capacity, 1);
    }
}
