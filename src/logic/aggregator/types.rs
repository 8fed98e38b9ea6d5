//! Aggregator Types
//!
//! KHÔNG chứa logic - chỉ data structures.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

use crate::logic::signal::{RiskSignalState, SignalCategory};

// ============================================================================
// RISK TIER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    /// Genuine device, allow
    Low,
    /// Some evidence, step-up or monitor
    Medium,
    /// Likely non-genuine, block sensitive actions
    High,
    /// Near-certain tampering
    Critical,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
            RiskTier::Critical => "critical",
        }
    }

    pub fn severity_level(&self) -> u8 {
        match self {
            RiskTier::Low => 0,
            RiskTier::Medium => 1,
            RiskTier::High => 2,
            RiskTier::Critical => 3,
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// EVIDENCE TRAIL
// ============================================================================

/// One signal as it was scored, for downstream audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceEntry {
    pub id: String,
    pub category: SignalCategory,
    pub layer: u8,
    pub state: RiskSignalState,
    pub evidence: BTreeMap<String, String>,
    pub weight_hint: f64,
    pub score: f64,
    /// Points this signal added after any discount
    pub contribution: f64,
    /// Reduced by a tamper verdict
    pub discounted: bool,
}

// ============================================================================
// SCORE BREAKDOWN
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// State-derived points before discount
    pub state_total: f64,
    /// Legacy score points before discount
    pub legacy_total: f64,
    /// Points removed by the tamper discount
    pub discount_removed: f64,
    pub final_score: f64,
}

// ============================================================================
// VERDICT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskVerdict {
    pub tier: RiskTier,
    pub score: f64,
    /// A hard(true) signal forced the tier
    pub fatal: bool,
    /// Lowest layer carrying a tampered signal
    pub tamper_layer: Option<u8>,
    pub reasons: Vec<String>,
    pub breakdown: ScoreBreakdown,
    /// Ordered by (layer, id)
    pub evidence: Vec<EvidenceEntry>,
}

impl RiskVerdict {
    pub fn is_tampered(&self) -> bool {
        self.tamper_layer.is_some()
    }

    /// Entries at one layer
    pub fn layer(&self, layer: u8) -> impl Iterator<Item = &EvidenceEntry> {
        self.evidence.iter().filter(move |e| e.layer == layer)
    }

    pub fn entry(&self, id: &str) -> Option<&EvidenceEntry> {
        self.evidence.iter().find(|e| e.id == id)
    }
}
