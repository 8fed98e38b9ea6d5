//! Risk Signal Types
//!
//! Shared vocabulary mà mọi detection capability emit ra.
//! KHÔNG chứa scoring logic - chỉ data structures.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

// ============================================================================
// LAYERS
// ============================================================================

/// Coarse environment fingerprinting (emulator, jailbreak markers)
pub const LAYER_ENVIRONMENT: u8 = 1;
/// Active anti-tamper / hook detection
pub const LAYER_ANTI_TAMPER: u8 = 2;
/// Behavioral analysis (touch, motion)
pub const LAYER_BEHAVIOR: u8 = 3;
/// Server-dependent enrichment
pub const LAYER_SERVER: u8 = 4;

/// Upper bound of `weight_hint`
pub const MAX_WEIGHT_HINT: f64 = 100.0;

// ============================================================================
// DETECTOR RESULT
// ============================================================================

/// Output of one detection capability for one evaluation pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectorResult {
    /// Capability-local severity, no fixed upper bound
    pub score: f64,
    /// Sub-checks that fired, in the order they fired
    pub methods: Vec<String>,
}

impl DetectorResult {
    pub fn new(score: f64, methods: Vec<String>) -> Self {
        Self {
            score: if score.is_finite() { score.max(0.0) } else { 0.0 },
            methods,
        }
    }

    /// Nothing fired
    pub fn clean() -> Self {
        Self::default()
    }

    pub fn fired(&self) -> bool {
        self.score > 0.0 || !self.methods.is_empty()
    }
}

// ============================================================================
// CATEGORY
// ============================================================================

/// Reporting taxonomy; groups signals, never affects scoring
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    Device,
    Behavior,
    AntiTamper,
    Server,
    Other(String),
}

impl SignalCategory {
    pub fn as_str(&self) -> &str {
        match self {
            SignalCategory::Device => "device",
            SignalCategory::Behavior => "behavior",
            SignalCategory::AntiTamper => "anti_tamper",
            SignalCategory::Server => "server",
            SignalCategory::Other(name) => name.as_str(),
        }
    }
}

impl std::fmt::Display for SignalCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// STATE
// ============================================================================

/// Authoritative severity classification of a signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiskSignalState {
    /// Deterministic verdict from a reliable check
    Hard { detected: bool },
    /// Probabilistic evidence, confidence in [0, 1]
    Soft { confidence: f64 },
    /// Check could not execute
    Unavailable,
    /// Must be scored by a remote authority
    ServerRequired,
    /// The measurement apparatus itself is compromised
    Tampered,
}

impl RiskSignalState {
    pub fn hard(detected: bool) -> Self {
        RiskSignalState::Hard { detected }
    }

    /// Soft state with confidence clamped to [0, 1] (NaN → 0)
    pub fn soft(confidence: f64) -> Self {
        let confidence = if confidence.is_nan() { 0.0 } else { confidence.clamp(0.0, 1.0) };
        RiskSignalState::Soft { confidence }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskSignalState::Hard { .. } => "hard",
            RiskSignalState::Soft { .. } => "soft",
            RiskSignalState::Unavailable => "unavailable",
            RiskSignalState::ServerRequired => "server_required",
            RiskSignalState::Tampered => "tampered",
        }
    }

    /// Hard(true) - near-certain tampering
    pub fn is_fatal(&self) -> bool {
        matches!(self, RiskSignalState::Hard { detected: true })
    }

    /// Hard or Soft - the states a tamper verdict can discount
    pub fn is_scored_locally(&self) -> bool {
        matches!(self, RiskSignalState::Hard { .. } | RiskSignalState::Soft { .. })
    }
}

impl std::fmt::Display for RiskSignalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskSignalState::Hard { detected } => write!(f, "hard({})", detected),
            RiskSignalState::Soft { confidence } => write!(f, "soft({:.2})", confidence),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

// ============================================================================
// RISK SIGNAL
// ============================================================================

/// Canonical unit of evidence passed to aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSignal {
    /// Stable id of the semantic check
    pub id: String,
    pub category: SignalCategory,
    /// Legacy direct point contribution
    pub score: f64,
    /// Forensic key/value pairs, never used for scoring
    pub evidence: BTreeMap<String, String>,
    pub state: RiskSignalState,
    /// Trust tier (1..=4)
    pub layer: u8,
    /// Author's estimate of impact in soft/hard state, [0, 100]
    pub weight_hint: f64,
}

impl RiskSignal {
    pub fn new(id: impl Into<String>, category: SignalCategory, layer: u8, state: RiskSignalState) -> Self {
        Self {
            id: id.into(),
            category,
            score: 0.0,
            evidence: BTreeMap::new(),
            state,
            layer,
            weight_hint: 0.0,
        }
    }

    /// Weight hint, clamped to [0, 100]
    pub fn with_weight(mut self, weight_hint: f64) -> Self {
        self.weight_hint = clamp_weight(weight_hint);
        self
    }

    /// Legacy score, clamped to >= 0
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = if score.is_finite() { score.max(0.0) } else { 0.0 };
        self
    }

    pub fn with_evidence(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.evidence.insert(key.into(), value.to_string());
        self
    }
}

pub(crate) fn clamp_weight(weight: f64) -> f64 {
    if weight.is_nan() {
        0.0
    } else {
        weight.clamp(0.0, MAX_WEIGHT_HINT)
    }
}

// ============================================================================
// TESTS
// ============================================================================
