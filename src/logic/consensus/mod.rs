//! Consensus Module
//!
//! Majority vote across independent primitives that test the same fact, with
//! minority disagreement reported as a hook.

pub mod types;
pub mod evaluator;

pub use types::{ConsensusResult, MethodVote};
pub use evaluator::{evaluate, MIN_VOTES};
