//! Layered Aggregator
//!
//! CHỈ chứa logic aggregate.
//! Input: all RiskSignals of one evaluation cycle + AggregationPolicy
//! Output: RiskVerdict (score, tier, layer-ordered evidence)
//!
//! Pure function of its input: no clock, no memory across cycles.

use super::rules::AggregationPolicy;
use super::types::{EvidenceEntry, RiskTier, RiskVerdict, ScoreBreakdown};
use crate::logic::signal::{legacy_contribution, state_contribution, RiskSignal, RiskSignalState};

// ============================================================================
// MAIN AGGREGATION FUNCTION
// ============================================================================

/// Aggregate with the default policy
pub fn aggregate(signals: &[RiskSignal]) -> RiskVerdict {
    aggregate_with_policy(signals, &AggregationPolicy::default())
}

/// Aggregate with a custom policy
pub fn aggregate_with_policy(signals: &[RiskSignal], policy: &AggregationPolicy) -> RiskVerdict {
    let mut reasons = Vec::new();
    let mut breakdown = ScoreBreakdown::default();

    let tamper_layer = signals
        .iter()
        .filter(|s| s.state == RiskSignalState::Tampered)
        .map(|s| s.layer)
        .min();

    let keep = 1.0 - policy.tamper_discount.clamp(0.0, 1.0);
    let mut discounted_count = 0usize;
    let mut evidence = Vec::with_capacity(signals.len());

    for signal in signals {
        let state_points = state_contribution(signal);
        let legacy_points = legacy_contribution(signal);
        let raw = state_points + legacy_points;

        breakdown.state_total += state_points;
        breakdown.legacy_total += legacy_points;

        let in_scope = match tamper_layer {
            Some(lt) => signal.state != RiskSignalState::Tampered && policy.tamper_scope.covers(lt, signal.layer),
            None => false,
        };

        let contribution = if in_scope { raw * keep } else { raw };
        let discounted = in_scope && raw > 0.0;
        if discounted {
            discounted_count += 1;
            breakdown.discount_removed += raw - contribution;
        }
        breakdown.final_score += contribution;

        evidence.push(EvidenceEntry {
            id: signal.id.clone(),
            category: signal.category.clone(),
            layer: signal.layer,
            state: signal.state,
            evidence: signal.evidence.clone(),
            weight_hint: signal.weight_hint,
            score: signal.score,
            contribution,
            discounted,
        });
    }

    evidence.sort_by(|a, b| a.layer.cmp(&b.layer).then_with(|| a.id.cmp(&b.id)));

    if let Some(lt) = tamper_layer {
        reasons.push(format!(
            "Tampered instrumentation at layer {}: {} signal(s) discounted by {:.0}%",
            lt,
            discounted_count,
            policy.tamper_discount * 100.0
        ));
    }

    let fatal_ids: Vec<&str> = signals
        .iter()
        .filter(|s| s.state.is_fatal())
        .map(|s| s.id.as_str())
        .collect();

    let score = breakdown.final_score;
    let mut tier = tier_for_score(score, policy);
    let fatal = policy.fatal_short_circuit && !fatal_ids.is_empty();
    if fatal {
        tier = RiskTier::Critical;
        reasons.push(format!("Fatal signal(s): {}", fatal_ids.join(", ")));
    }

    let unavailable = signals.iter().filter(|s| s.state == RiskSignalState::Unavailable).count();
    if unavailable > 0 {
        reasons.push(format!("{} check(s) unavailable", unavailable));
    }

    reasons.push(format!("Final score: {:.2}, tier: {}", score, tier));

    RiskVerdict {
        tier,
        score,
        fatal,
        tamper_layer,
        reasons,
        breakdown,
        evidence,
    }
}

/// Tier from the additive score alone
pub fn tier_for_score(score: f64, policy: &AggregationPolicy) -> RiskTier {
    if score >= policy.critical_min {
        RiskTier::Critical
    } else if score >= policy.high_min {
        RiskTier::High
    } else if score >= policy.medium_min {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}
