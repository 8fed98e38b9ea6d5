//! Logic Module - Risk Engine
//!
//! Chứa toàn bộ engine: signal model, consensus, mutation, coupling, aggregator.
//!
//! ## Architecture
//! - `signal/` - RiskSignal vocabulary + state combination
//! - `consensus/` - multi-primitive majority / hook verdict
//! - `mutation/` - seeded shuffle + jitter planner
//! - `coupling/` - touch/motion correlation
//! - `aggregator/` - layered score, tamper discount, tier
//! - `capture/`, `probes/`, `providers/` - evidence sources
//! - `identity/`, `policy/` - collaborators keying the planner

// Core modules
pub mod error;
pub mod signal;
pub mod consensus;
pub mod mutation;
pub mod coupling;
pub mod aggregator;

// Evidence sources
pub mod capture;
pub mod probes;
pub mod providers;
pub mod checks;

// Collaborators & orchestration
pub mod identity;
pub mod policy;
pub mod config;
pub mod snapshot;
pub mod engine;
