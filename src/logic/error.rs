//! Engine Errors
//!
//! Only caller errors and collaborator I/O surface here. Probes, the mutation
//! planner and the coupling analyzer never return errors (fail-open).

use thiserror::Error;

pub type RiskResult<T> = Result<T, RiskError>;

#[derive(Debug, Error)]
pub enum RiskError {
    /// Consensus needs at least two independent results for the same fact
    #[error("consensus for '{fact}' needs at least 2 votes, got {got}")]
    InsufficientVotes { fact: String, got: usize },

    #[error("identity error: {0}")]
    Identity(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
