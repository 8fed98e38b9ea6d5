//! Aggregator Module
//!
//! Turns one cycle's RiskSignals into the final verdict. Đây là CORE STEP -
//! nơi quyết định Low/Medium/High/Critical.
//!
//! ## Structure
//! - `types`: RiskTier, RiskVerdict, EvidenceEntry, ScoreBreakdown
//! - `rules`: AggregationPolicy, TamperScope
//! - `aggregate`: scoring, tamper discount, fatal short-circuit
//!
//! ## Usage
//! ```ignore
//! use device_risk::logic::aggregator::{aggregate, RiskTier};
//!
//! let verdict = aggregate(&signals);
//! if verdict.tier >= RiskTier::High {
//!     // block the sensitive action
//! }
//! ```

pub mod types;
pub mod rules;
pub mod aggregate;


pub use types::{EvidenceEntry, RiskTier, RiskVerdict, ScoreBreakdown};
pub use rules::{AggregationPolicy, TamperScope};
pub use aggregate::{aggregate, aggregate_with_policy, tier_for_score};
