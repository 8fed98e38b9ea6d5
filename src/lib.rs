//! Device Risk Engine
//!
//! Combines individually spoofable on-device checks into one layered,
//! tamper-aware verdict.

pub mod constants;
pub mod logic;

pub use logic::aggregator::{aggregate, aggregate_with_policy, AggregationPolicy, RiskTier, RiskVerdict};
pub use logic::config::EngineConfig;
pub use logic::engine::{EvaluationReport, RiskEngine, RiskEngineBuilder};
pub use logic::error::{RiskError, RiskResult};
pub use logic::signal::{RiskSignal, RiskSignalState, SignalCategory};
