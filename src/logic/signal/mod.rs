//! Risk Signal Model
//!
//! ## Structure
//! - `types`: DetectorResult, RiskSignal, RiskSignalState, SignalCategory, layers
//! - `combine`: state → contribution rules

pub mod types;
pub mod combine;

pub use types::{
    DetectorResult,
    RiskSignal,
    RiskSignalState,
    SignalCategory,
    LAYER_ENVIRONMENT,
    LAYER_ANTI_TAMPER,
    LAYER_BEHAVIOR,
    LAYER_SERVER,
    MAX_WEIGHT_HINT,
};

pub use combine::{contribution, legacy_contribution, state_contribution};
