//! Coupling Module
//!
//! Touch-action timestamps vs. continuous motion energy.

pub mod analyzer;

#[cfg(test)]
mod tests;

pub use analyzer::{
    analyze, correlate, pearson, CouplingReport,
    MIN_ACTIONS, MIN_MOTION_SAMPLES, MIN_OVERLAP_SPAN, MIN_BUCKETS, MAX_BUCKETS,
};
