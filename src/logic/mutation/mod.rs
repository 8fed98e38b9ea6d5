//! Mutation Module - Anti-fingerprinting
//!
//! Seeded reordering of check execution and jitter of thresholds/scores so an
//! attacker cannot learn a fixed detection order or cut-off from one run.
//!
//! ## Structure
//! - `rng`: SplitMix64 + seed derivation (no clock)
//! - `strategy`: MutationStrategy from the policy collaborator
//! - `planner`: shuffle / jitter keyed by (seed, scope, device_id, salt)

pub mod rng;
pub mod strategy;
pub mod planner;


pub use rng::{derive_seed, SplitMix64};
pub use strategy::{MutationStrategy, MAX_JITTER_BPS};
pub use planner::{MutationPlanner, SeedSource};
