//! Consensus Evaluator
//!
//! Input: N >= 2 independent boolean results for the same fact.
//! Output: majority verdict + the minority methods suspected of being hooked.
//!
//! An adversary who patches a detection primitive usually flips only a subset
//! of the equivalent code paths, so the minority side is the hook candidate.

use super::types::{ConsensusResult, MethodVote};
use crate::logic::error::{RiskError, RiskResult};

/// Minimum votes needed for a consensus
pub const MIN_VOTES: usize = 2;

/// Evaluate consensus for `fact`
pub fn evaluate(fact: &str, votes: Vec<MethodVote>) -> RiskResult<ConsensusResult> {
    if votes.len() < MIN_VOTES {
        return Err(RiskError::InsufficientVotes {
            fact: fact.to_string(),
            got: votes.len(),
        });
    }

    let true_count = votes.iter().filter(|v| v.value).count();
    let false_count = votes.len() - true_count;

    let consensus_exists = true_count > false_count;
    let is_hooked = true_count > 0 && false_count > 0;

    let hook_methods = if !is_hooked {
        Vec::new()
    } else if true_count == false_count {
        // Tie: no hookable minority, report both sides
        votes.iter().map(|v| v.method.clone()).collect()
    } else {
        let minority = true_count < false_count;
        votes
            .iter()
            .filter(|v| v.value == minority)
            .map(|v| v.method.clone())
            .collect()
    };

    if is_hooked {
        log::warn!(
            "Consensus disagreement on '{}': {} true / {} false, suspect [{}]",
            fact, true_count, false_count, hook_methods.join(", ")
        );
    }

    Ok(ConsensusResult {
        fact: fact.to_string(),
        true_count,
        false_count,
        consensus_exists,
        is_hooked,
        hook_methods,
        votes,
    })
}

// ============================================================================
// TESTS
// ============================================================================
