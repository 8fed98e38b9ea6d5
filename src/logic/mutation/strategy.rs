//! Mutation Strategy
//!
//! Supplied by the policy collaborator, valid for one evaluation cycle or
//! policy epoch. `bps` = basis points (1/100 of a percent).

use serde::{Deserialize, Serialize};
use crate::logic::error::{RiskError, RiskResult};

/// Largest meaningful jitter bound (100%)
pub const MAX_JITTER_BPS: i32 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MutationStrategy {
    /// None → time-derived seed (non-reproducible)
    pub seed: Option<u64>,
    pub shuffle_checks: bool,
    pub threshold_jitter_bps: i32,
    pub score_jitter_bps: i32,
}

impl MutationStrategy {
    /// Identity permutation, zero jitter
    pub fn disabled() -> Self {
        Self {
            seed: Some(0),
            ..Default::default()
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            shuffle_checks: true,
            ..Default::default()
        }
    }

    pub fn with_threshold_jitter(mut self, bps: i32) -> Self {
        self.threshold_jitter_bps = bps;
        self
    }

    pub fn with_score_jitter(mut self, bps: i32) -> Self {
        self.score_jitter_bps = bps;
        self
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle_checks = shuffle;
        self
    }

    pub fn is_disabled(&self) -> bool {
        !self.shuffle_checks && self.threshold_jitter_bps == 0 && self.score_jitter_bps == 0
    }

    /// Bps folded into [0, 10000]
    pub fn normalized(mut self) -> Self {
        self.threshold_jitter_bps = self.threshold_jitter_bps.saturating_abs().min(MAX_JITTER_BPS);
        self.score_jitter_bps = self.score_jitter_bps.saturating_abs().min(MAX_JITTER_BPS);
        self
    }

    /// Parse a policy document
    pub fn from_json(json: &str) -> RiskResult<Self> {
        let strategy: MutationStrategy = serde_json::from_str(json)
            .map_err(|e| RiskError::InvalidPolicy(e.to_string()))?;
        Ok(strategy.normalized())
    }
}
