//! Engine Configuration
//!
//! Loaded from JSON or environment, validated once, then shared read-only.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::constants::{
    self, DEFAULT_HIGH_ACTION_COUNT, DEFAULT_LOW_CORRELATION, DEFAULT_MOTION_VARIANCE_FLOOR,
    DEFAULT_SERVER_INTEL_TTL_SECS, DEFAULT_TOUCH_CV_FLOOR,
};
use crate::logic::aggregator::AggregationPolicy;
use crate::logic::error::{RiskError, RiskResult};

/// Process-wide configuration derived from `DEVICE_RISK_*` variables
pub static DEFAULT_CONFIG: Lazy<EngineConfig> = Lazy::new(EngineConfig::from_env);

// ============================================================================
// BEHAVIOR THRESHOLDS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorThresholds {
    /// Correlation below this counts as decoupled
    pub low_correlation: f64,
    /// Actions required before decoupling is scored
    pub high_action_count: usize,
    /// Motion energy variance floor (g²)
    pub motion_variance_floor: f64,
    /// Touch interval CV floor
    pub touch_cv_floor: f64,
    pub coupling_weight: f64,
    pub motion_static_weight: f64,
    pub touch_cadence_weight: f64,
}

impl Default for BehaviorThresholds {
    fn default() -> Self {
        Self {
            low_correlation: DEFAULT_LOW_CORRELATION,
            high_action_count: DEFAULT_HIGH_ACTION_COUNT,
            motion_variance_floor: DEFAULT_MOTION_VARIANCE_FLOOR,
            touch_cv_floor: DEFAULT_TOUCH_CV_FLOOR,
            coupling_weight: 45.0,
            motion_static_weight: 40.0,
            touch_cadence_weight: 35.0,
        }
    }
}

impl BehaviorThresholds {
    /// More willing to flag robotic input
    pub fn high_sensitivity() -> Self {
        Self {
            low_correlation: 0.2,
            high_action_count: 8,
            touch_cv_floor: 0.1,
            ..Default::default()
        }
    }

    pub fn low_sensitivity() -> Self {
        Self {
            low_correlation: 0.0,
            high_action_count: 20,
            touch_cv_floor: 0.02,
            ..Default::default()
        }
    }
}

// ============================================================================
// ENGINE CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub aggregation: AggregationPolicy,
    pub behavior: BehaviorThresholds,
    /// Per-probe time budget
    pub probe_budget_ms: u64,
    pub mutation_salt: String,
    pub touch_capacity: usize,
    pub motion_capacity: usize,
    pub server_intel_ttl_secs: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            aggregation: AggregationPolicy::default(),
            behavior: BehaviorThresholds::default(),
            probe_budget_ms: constants::DEFAULT_PROBE_BUDGET_MS,
            mutation_salt: constants::DEFAULT_MUTATION_SALT.to_string(),
            touch_capacity: constants::DEFAULT_TOUCH_CAPACITY,
            motion_capacity: constants::DEFAULT_MOTION_CAPACITY,
            server_intel_ttl_secs: DEFAULT_SERVER_INTEL_TTL_SECS,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `DEVICE_RISK_*` variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.aggregation.tamper_discount = constants::get_tamper_discount();
        config.aggregation.fatal_short_circuit = constants::is_fatal_short_circuit_enabled();
        config.probe_budget_ms = constants::get_probe_budget_ms();
        config.mutation_salt = constants::get_mutation_salt();
        config.touch_capacity = constants::get_touch_capacity();
        config.motion_capacity = constants::get_motion_capacity();
        config
    }

    pub fn from_json(json: &str) -> RiskResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> RiskResult<()> {
        self.aggregation.validate()?;
        if self.probe_budget_ms == 0 {
            return Err(RiskError::InvalidConfig("probe_budget_ms must be > 0".into()));
        }
        if self.touch_capacity == 0 || self.motion_capacity == 0 {
            return Err(RiskError::InvalidConfig("capture capacities must be > 0".into()));
        }
        if self.server_intel_ttl_secs <= 0 {
            return Err(RiskError::InvalidConfig("server_intel_ttl_secs must be > 0".into()));
        }
        let b = &self.behavior;
        if !(-1.0..=1.0).contains(&b.low_correlation) {
            return Err(RiskError::InvalidConfig(format!(
                "low_correlation {} outside [-1, 1]",
                b.low_correlation
            )));
        }
        if b.motion_variance_floor < 0.0 || b.touch_cv_floor < 0.0 {
            return Err(RiskError::InvalidConfig("behavior floors must be >= 0".into()));
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.aggregation.tamper_discount, 0.5);
        assert_eq!(config.probe_budget_ms, 250);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(
            r#"{"probe_budget_ms": 100, "aggregation": {"tamper_scope": "all"}}"#,
        )
        .unwrap();
        assert_eq!(config.probe_budget_ms, 100);
        assert_eq!(config.aggregation.tamper_scope, crate::logic::aggregator::TamperScope::All);
        assert_eq!(config.aggregation.high_min, 60.0);
        assert_eq!(config.behavior, BehaviorThresholds::default());
    }

    #[test]
    fn test_invalid_json_config_rejected() {
        assert!(EngineConfig::from_json(r#"{"probe_budget_ms": 0}"#).is_err());
        assert!(EngineConfig::from_json(r#"{"aggregation": {"tamper_discount": 2.0}}"#).is_err());
        assert!(EngineConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_sensitivity_presets() {
        let high = BehaviorThresholds::high_sensitivity();
        let low = BehaviorThresholds::low_sensitivity();
        assert!(high.low_correlation > low.low_correlation);
        assert!(high.high_action_count < low.high_action_count);
    }
}
