//! Policy Module
//!
//! Supplies the active MutationStrategy for the current epoch. No strategy
//! means mutation is disabled (identity permutation, zero jitter).

use std::path::Path;

use parking_lot::RwLock;

use crate::logic::error::RiskResult;
use crate::logic::mutation::MutationStrategy;

/// Policy collaborator
pub trait PolicySource: Send + Sync {
    fn current_strategy(&self) -> Option<MutationStrategy>;
}

/// No policy: mutation disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPolicy;

impl PolicySource for NoPolicy {
    fn current_strategy(&self) -> Option<MutationStrategy> {
        None
    }
}

/// Policy held in memory; `update` rolls the epoch
#[derive(Debug, Default)]
pub struct StaticPolicy {
    strategy: RwLock<Option<MutationStrategy>>,
}

impl StaticPolicy {
    pub fn new(strategy: MutationStrategy) -> Self {
        Self {
            strategy: RwLock::new(Some(strategy.normalized())),
        }
    }

    pub fn from_json(json: &str) -> RiskResult<Self> {
        Ok(Self::new(MutationStrategy::from_json(json)?))
    }

    pub fn from_file(path: &Path) -> RiskResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn update(&self, strategy: Option<MutationStrategy>) {
        *self.strategy.write() = strategy.map(MutationStrategy::normalized);
    }
}

impl PolicySource for StaticPolicy {
    fn current_strategy(&self) -> Option<MutationStrategy> {
        self.strategy.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_policy() {
        assert!(NoPolicy.current_strategy().is_none());
    }

    #[test]
    fn test_static_policy_update() {
        let policy = StaticPolicy::new(MutationStrategy::seeded(1).with_score_jitter(-300));
        assert_eq!(policy.current_strategy().unwrap().score_jitter_bps, 300);

        policy.update(None);
        assert!(policy.current_strategy().is_none());
    }

    #[test]
    fn test_policy_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.json");
        std::fs::write(&path, r#"{"seed": 11, "shuffleChecks": true}"#).unwrap();

        let policy = StaticPolicy::from_file(&path).unwrap();
        let strategy = policy.current_strategy().unwrap();
        assert_eq!(strategy.seed, Some(11));
        assert!(strategy.shuffle_checks);
    }
}
