//! Aggregation Rules & Thresholds
//!
//! KHÔNG chứa logic aggregate - chỉ constants và config.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CRITICAL_MIN, DEFAULT_HIGH_MIN, DEFAULT_MEDIUM_MIN, DEFAULT_TAMPER_DISCOUNT,
};
use crate::logic::error::{RiskError, RiskResult};
use crate::logic::mutation::MutationPlanner;

// ============================================================================
// TAMPER SCOPE
// ============================================================================

/// Which layers a `tampered` verdict at layer L discounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TamperScope {
    /// layer >= L: a compromised layer cannot vouch for anything built on it
    AtOrAbove,
    /// layer <= L: the same instrumentation produced the lower layers
    AtOrBelow,
    /// Every layer
    All,
}

impl TamperScope {
    pub fn covers(&self, tamper_layer: u8, layer: u8) -> bool {
        match self {
            TamperScope::AtOrAbove => layer >= tamper_layer,
            TamperScope::AtOrBelow => layer <= tamper_layer,
            TamperScope::All => true,
        }
    }
}

// ============================================================================
// CONFIGURABLE POLICY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationPolicy {
    /// Fraction removed from each in-scope contribution (0.5 = 50%)
    pub tamper_discount: f64,
    pub tamper_scope: TamperScope,
    /// Any hard(true) forces the Critical tier
    pub fatal_short_circuit: bool,
    pub medium_min: f64,
    pub high_min: f64,
    pub critical_min: f64,
}

impl Default for AggregationPolicy {
    fn default() -> Self {
        Self {
            tamper_discount: DEFAULT_TAMPER_DISCOUNT,
            tamper_scope: TamperScope::AtOrAbove,
            fatal_short_circuit: true,
            medium_min: DEFAULT_MEDIUM_MIN,
            high_min: DEFAULT_HIGH_MIN,
            critical_min: DEFAULT_CRITICAL_MIN,
        }
    }
}

impl AggregationPolicy {
    /// Lower cut-offs, harsher discount
    pub fn strict() -> Self {
        Self {
            tamper_discount: 0.75,
            tamper_scope: TamperScope::All,
            medium_min: 20.0,
            high_min: 45.0,
            critical_min: 80.0,
            ..Default::default()
        }
    }

    /// Higher cut-offs
    pub fn lenient() -> Self {
        Self {
            tamper_discount: 0.25,
            medium_min: 40.0,
            high_min: 80.0,
            critical_min: 130.0,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> RiskResult<()> {
        if !(0.0..=1.0).contains(&self.tamper_discount) {
            return Err(RiskError::InvalidConfig(format!(
                "tamper_discount {} outside [0, 1]",
                self.tamper_discount
            )));
        }
        let ordered = self.medium_min >= 0.0
            && self.medium_min <= self.high_min
            && self.high_min <= self.critical_min;
        if !ordered {
            return Err(RiskError::InvalidConfig(format!(
                "tier thresholds must satisfy 0 <= medium ({}) <= high ({}) <= critical ({})",
                self.medium_min, self.high_min, self.critical_min
            )));
        }
        Ok(())
    }

    /// Copy with tier thresholds jittered by the planner, order preserved
    pub fn jittered(&self, planner: &MutationPlanner) -> Self {
        let medium_min = planner.jitter_threshold("tier.medium", self.medium_min);
        let high_min = planner.jitter_threshold("tier.high", self.high_min).max(medium_min);
        let critical_min = planner.jitter_threshold("tier.critical", self.critical_min).max(high_min);
        Self {
            medium_min,
            high_min,
            critical_min,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::mutation::MutationStrategy;

    #[test]
    fn test_scope_coverage() {
        assert!(TamperScope::AtOrAbove.covers(2, 3));
        assert!(TamperScope::AtOrAbove.covers(2, 2));
        assert!(!TamperScope::AtOrAbove.covers(2, 1));
        assert!(TamperScope::AtOrBelow.covers(2, 1));
        assert!(!TamperScope::AtOrBelow.covers(2, 3));
        assert!(TamperScope::All.covers(4, 1));
    }

    #[test]
    fn test_presets_validate() {
        assert!(AggregationPolicy::default().validate().is_ok());
        assert!(AggregationPolicy::strict().validate().is_ok());
        assert!(AggregationPolicy::lenient().validate().is_ok());
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let bad_discount = AggregationPolicy { tamper_discount: 1.5, ..Default::default() };
        assert!(bad_discount.validate().is_err());

        let unordered = AggregationPolicy { medium_min: 70.0, ..Default::default() };
        assert!(unordered.validate().is_err());
    }

    #[test]
    fn test_jittered_thresholds_stay_ordered_and_bounded() {
        let base = AggregationPolicy { medium_min: 50.0, high_min: 51.0, critical_min: 52.0, ..Default::default() };
        for seed in 0..200u64 {
            let planner = MutationPlanner::new(
                MutationStrategy::seeded(seed).with_threshold_jitter(500),
                "device-a",
                "salt",
            );
            let j = base.jittered(&planner);
            assert!(j.medium_min <= j.high_min && j.high_min <= j.critical_min);
            assert!((j.medium_min - 50.0).abs() <= 2.5 + 1e-9);
            assert!(j.validate().is_ok());
        }
    }
}
