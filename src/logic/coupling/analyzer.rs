//! Behavior Coupling Analyzer
//!
//! Organic touches on a physical device perturb the accelerometer; scripted or
//! emulator-relayed input does not. Bucket both series over their common time
//! window and correlate touch counts with mean motion energy.

use serde::{Deserialize, Serialize};
use crate::logic::capture::MotionSample;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Minimum action timestamps
pub const MIN_ACTIONS: usize = 6;

/// Minimum motion samples
pub const MIN_MOTION_SAMPLES: usize = 40;

/// Minimum overlap of the two ranges (time units)
pub const MIN_OVERLAP_SPAN: f64 = 4.0;

pub const MIN_BUCKETS: usize = 4;
pub const MAX_BUCKETS: usize = 60;

// ============================================================================
// REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouplingReport {
    /// Pearson coefficient in [-1, 1]
    pub correlation: f64,
    pub bucket_count: usize,
    pub window_start: f64,
    pub window_end: f64,
    pub actions_in_window: usize,
    pub motion_in_window: usize,
}

// ============================================================================
// ANALYSIS
// ============================================================================

/// Correlation coefficient only; `None` whenever the analysis is undefined
pub fn correlate(actions: &[f64], motion: &[MotionSample]) -> Option<f64> {
    analyze(actions, motion).map(|report| report.correlation)
}

/// Full analysis; `None` is a normal outcome under low data volume
pub fn analyze(actions: &[f64], motion: &[MotionSample]) -> Option<CouplingReport> {
    let actions: Vec<f64> = actions.iter().copied().filter(|t| t.is_finite()).collect();
    let motion: Vec<(f64, f64)> = motion
        .iter()
        .map(|s| (s.timestamp, s.energy()))
        .filter(|(t, e)| t.is_finite() && e.is_finite())
        .collect();

    if actions.len() < MIN_ACTIONS || motion.len() < MIN_MOTION_SAMPLES {
        return None;
    }

    let (action_min, action_max) = range(actions.iter().copied());
    let (motion_min, motion_max) = range(motion.iter().map(|(t, _)| *t));

    let start = action_min.max(motion_min);
    let end = action_max.min(motion_max);
    let span = end - start;
    if !(span >= MIN_OVERLAP_SPAN) {
        return None;
    }

    let bucket_count = (span.floor() as usize).clamp(MIN_BUCKETS, MAX_BUCKETS);
    if bucket_count < MIN_BUCKETS {
        return None;
    }

    let bucket_of = |t: f64| -> usize {
        let idx = ((t - start) * bucket_count as f64 / span).floor() as usize;
        idx.min(bucket_count - 1)
    };

    let mut touch_buckets = vec![0.0f64; bucket_count];
    let mut actions_in_window = 0;
    for &t in &actions {
        if t >= start && t <= end {
            touch_buckets[bucket_of(t)] += 1.0;
            actions_in_window += 1;
        }
    }

    let mut energy_sum = vec![0.0f64; bucket_count];
    let mut energy_count = vec![0usize; bucket_count];
    let mut motion_in_window = 0;
    for &(t, energy) in &motion {
        if t >= start && t <= end {
            let idx = bucket_of(t);
            energy_sum[idx] += energy;
            energy_count[idx] += 1;
            motion_in_window += 1;
        }
    }

    let motion_buckets: Vec<f64> = energy_sum
        .iter()
        .zip(&energy_count)
        .map(|(sum, &count)| if count > 0 { sum / count as f64 } else { 0.0 })
        .collect();

    let correlation = pearson(&touch_buckets, &motion_buckets)?;

    Some(CouplingReport {
        correlation,
        bucket_count,
        window_start: start,
        window_end: end,
        actions_in_window,
        motion_in_window,
    })
}

/// Pearson correlation; `None` for mismatched/empty input or a constant series
pub fn pearson(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() || a.len() < 2 {
        return None;
    }

    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    // Rounding noise of a constant series scales with its magnitude
    let flat = |var: f64, mean: f64| var <= f64::EPSILON * n * mean * mean;
    if flat(var_a, mean_a) || flat(var_b, mean_b) {
        return None;
    }

    Some((cov / (var_a.sqrt() * var_b.sqrt())).clamp(-1.0, 1.0))
}

fn range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}
