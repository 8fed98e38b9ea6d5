//! Consensus Types

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// One independent primitive's answer for a fact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodVote {
    pub method: String,
    pub value: bool,
}

impl MethodVote {
    pub fn new(method: impl Into<String>, value: bool) -> Self {
        Self { method: method.into(), value }
    }
}

/// Majority verdict plus minority ("hook") verdict for one fact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub fact: String,
    pub true_count: usize,
    pub false_count: usize,
    /// Strict majority of true votes; ties favor "does not exist"
    pub consensus_exists: bool,
    /// Primitives disagree
    pub is_hooked: bool,
    /// Methods on the minority side (both sides on a tie)
    pub hook_methods: Vec<String>,
    /// Every vote, in input order
    pub votes: Vec<MethodVote>,
}

impl ConsensusResult {
    pub fn total(&self) -> usize {
        self.true_count + self.false_count
    }

    pub fn is_tie(&self) -> bool {
        self.true_count == self.false_count
    }

    /// Forensic view: one `vote.<method>` entry per vote, duplicates suffixed
    pub fn evidence(&self) -> BTreeMap<String, String> {
        let mut evidence = BTreeMap::new();
        for vote in &self.votes {
            let base = format!("vote.{}", vote.method);
            let mut key = base.clone();
            let mut n = 2;
            while evidence.contains_key(&key) {
                key = format!("{}#{}", base, n);
                n += 1;
            }
            evidence.insert(key, vote.value.to_string());
        }
        evidence.insert("true_count".to_string(), self.true_count.to_string());
        evidence.insert("false_count".to_string(), self.false_count.to_string());
        if self.is_hooked {
            evidence.insert("hook_methods".to_string(), self.hook_methods.join(","));
        }
        evidence
    }
}
