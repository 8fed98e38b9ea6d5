//! Mutation Planner
//!
//! Deterministic, seeded reordering and multiplicative jitter. Every draw is
//! keyed by `(seed, scope, device_id, salt)`, so one scope never shifts the
//! values of another and identical tuples always reproduce.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::rng::{derive_seed, SplitMix64};
use super::strategy::MutationStrategy;

const THRESHOLD_SCOPE: &str = "threshold:";
const SCORE_SCOPE: &str = "score:";

/// Where the planner's seed came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedSource {
    Policy,
    Clock,
}

#[derive(Debug, Clone)]
pub struct MutationPlanner {
    strategy: MutationStrategy,
    seed: u64,
    seed_source: SeedSource,
    device_id: String,
    salt: String,
}

impl MutationPlanner {
    /// Build a planner; a missing seed is resolved once from the clock
    pub fn new(strategy: MutationStrategy, device_id: impl Into<String>, salt: impl Into<String>) -> Self {
        let strategy = strategy.normalized();
        let (seed, seed_source) = match strategy.seed {
            Some(seed) => (seed, SeedSource::Policy),
            None => (clock_seed(), SeedSource::Clock),
        };

        Self {
            strategy,
            seed,
            seed_source,
            device_id: device_id.into(),
            salt: salt.into(),
        }
    }

    /// No shuffle, no jitter
    pub fn disabled(device_id: impl Into<String>) -> Self {
        Self::new(MutationStrategy::disabled(), device_id, "")
    }

    pub fn strategy(&self) -> &MutationStrategy {
        &self.strategy
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn seed_source(&self) -> SeedSource {
        self.seed_source
    }

    /// Fresh generator for one scope
    pub fn rng(&self, scope: &str) -> SplitMix64 {
        SplitMix64::new(derive_seed(self.seed, scope, &self.device_id, &self.salt))
    }

    /// Fisher–Yates permutation of `0..len` for `scope`
    pub fn permutation(&self, scope: &str, len: usize) -> Vec<usize> {
        self.shuffle(scope, (0..len).collect())
    }

    /// Reorder `items`; identity when shuffling is disabled
    pub fn shuffle<T>(&self, scope: &str, mut items: Vec<T>) -> Vec<T> {
        if !self.strategy.shuffle_checks || items.len() < 2 {
            return items;
        }

        let mut rng = self.rng(scope);
        for i in (1..items.len()).rev() {
            let j = rng.next_below(i + 1);
            items.swap(i, j);
        }
        items
    }

    /// Nominal threshold scaled within ±threshold_jitter_bps
    pub fn jitter_threshold(&self, scope: &str, nominal: f64) -> f64 {
        self.jitter(THRESHOLD_SCOPE, scope, nominal, self.strategy.threshold_jitter_bps)
    }

    /// Nominal score scaled within ±score_jitter_bps
    pub fn jitter_score(&self, scope: &str, nominal: f64) -> f64 {
        self.jitter(SCORE_SCOPE, scope, nominal, self.strategy.score_jitter_bps)
    }

    fn jitter(&self, prefix: &str, scope: &str, nominal: f64, bps: i32) -> f64 {
        if bps == 0 || !nominal.is_finite() {
            return nominal;
        }
        let bound = bps as f64 / 10_000.0;
        let mut rng = self.rng(&format!("{}{}", prefix, scope));
        nominal * (1.0 + rng.next_signed_unit() * bound)
    }

    /// Short audit id of this planner's keying (not the seed itself)
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.seed.to_le_bytes());
        for part in [self.device_id.as_str(), self.salt.as_str()] {
            hasher.update((part.len() as u64).to_le_bytes());
            hasher.update(part.as_bytes());
        }
        hex::encode(&hasher.finalize()[..8])
    }
}

fn clock_seed() -> u64 {
    let now = Utc::now();
    now.timestamp_nanos_opt()
        .map(|n| n as u64)
        .unwrap_or_else(|| now.timestamp_micros() as u64)
}
