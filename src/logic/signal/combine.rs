//! State Combination Rules
//!
//! CHỈ chứa logic: RiskSignalState → numeric contribution.
//! Legacy `score` and state-derived contribution are two additive paths.

use super::types::{RiskSignal, RiskSignalState};

/// Contribution derived from the signal's state and weight hint
pub fn state_contribution(signal: &RiskSignal) -> f64 {
    match signal.state {
        RiskSignalState::Hard { detected: true } => signal.weight_hint,
        RiskSignalState::Hard { detected: false } => 0.0,
        RiskSignalState::Soft { confidence } => signal.weight_hint * confidence,
        RiskSignalState::Unavailable | RiskSignalState::ServerRequired => 0.0,
        RiskSignalState::Tampered => signal.weight_hint,
    }
}

/// Legacy score path, independent of state
pub fn legacy_contribution(signal: &RiskSignal) -> f64 {
    signal.score
}

/// Undiscounted total contribution of one signal
pub fn contribution(signal: &RiskSignal) -> f64 {
    state_contribution(signal) + legacy_contribution(signal)
}

// ============================================================================
// TESTS
// ============================================================================
