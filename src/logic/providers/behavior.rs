//! Behavior Signal Provider
//!
//! Layer 3 signals from the drained touch/motion buffers. Each threshold is
//! jittered per device/epoch so an attacker cannot tune input to sit just
//! under a fixed cut-off.

use crate::logic::config::BehaviorThresholds;
use crate::logic::coupling::{analyze, MIN_ACTIONS, MIN_MOTION_SAMPLES};
use crate::logic::mutation::MutationPlanner;
use crate::logic::signal::{RiskSignal, RiskSignalState, SignalCategory, LAYER_BEHAVIOR};
use crate::logic::snapshot::RiskSnapshot;

use super::RiskSignalProvider;

pub const SIGNAL_TOUCH_MOTION_COUPLING: &str = "behavior.touch_motion_coupling";
pub const SIGNAL_MOTION_STATIC: &str = "behavior.motion_static";
pub const SIGNAL_TOUCH_CADENCE: &str = "behavior.touch_cadence";

const MOTION_STATIC_CONFIDENCE: f64 = 0.8;
const CADENCE_CONFIDENCE: f64 = 0.7;
const CADENCE_SAME_POINT_CONFIDENCE: f64 = 0.9;

#[derive(Debug, Clone, Default)]
pub struct BehaviorSignalProvider {
    thresholds: BehaviorThresholds,
}

impl BehaviorSignalProvider {
    pub fn new(thresholds: BehaviorThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &BehaviorThresholds {
        &self.thresholds
    }

    fn signal(&self, id: &str, state: RiskSignalState, weight: f64) -> RiskSignal {
        RiskSignal::new(id, SignalCategory::Behavior, LAYER_BEHAVIOR, state).with_weight(weight)
    }

    // ========================================================================
    // COUPLING
    // ========================================================================

    fn coupling_signal(&self, snapshot: &RiskSnapshot, planner: &MutationPlanner) -> RiskSignal {
        let t = &self.thresholds;
        let behavior = &snapshot.behavior;
        let actions = behavior.action_timestamps();

        let report = match analyze(&actions, &behavior.motion_samples) {
            Some(report) => report,
            None => {
                return self
                    .signal(SIGNAL_TOUCH_MOTION_COUPLING, RiskSignalState::Unavailable, t.coupling_weight)
                    .with_evidence("actions", actions.len())
                    .with_evidence("motion_samples", behavior.motion_samples.len());
            }
        };

        let low = planner.jitter_threshold(SIGNAL_TOUCH_MOTION_COUPLING, t.low_correlation);
        let state = if report.correlation < low && report.actions_in_window >= t.high_action_count {
            // r = low → 0, r = -1 → 1
            RiskSignalState::soft((low - report.correlation) / (low + 1.0))
        } else {
            RiskSignalState::hard(false)
        };

        self.signal(SIGNAL_TOUCH_MOTION_COUPLING, state, t.coupling_weight)
            .with_evidence("correlation", format!("{:.4}", report.correlation))
            .with_evidence("threshold", format!("{:.4}", low))
            .with_evidence("buckets", report.bucket_count)
            .with_evidence("actions_in_window", report.actions_in_window)
            .with_evidence("motion_in_window", report.motion_in_window)
    }

    // ========================================================================
    // STATIC MOTION
    // ========================================================================

    fn motion_static_signal(&self, snapshot: &RiskSnapshot, planner: &MutationPlanner) -> RiskSignal {
        let t = &self.thresholds;
        let motion = &snapshot.behavior.motion;

        if motion.sample_count < MIN_MOTION_SAMPLES {
            return self
                .signal(SIGNAL_MOTION_STATIC, RiskSignalState::Unavailable, t.motion_static_weight)
                .with_evidence("samples", motion.sample_count);
        }

        let floor = planner.jitter_threshold(SIGNAL_MOTION_STATIC, t.motion_variance_floor);
        let state = if motion.variance < floor {
            RiskSignalState::soft(MOTION_STATIC_CONFIDENCE)
        } else {
            RiskSignalState::hard(false)
        };

        self.signal(SIGNAL_MOTION_STATIC, state, t.motion_static_weight)
            .with_evidence("samples", motion.sample_count)
            .with_evidence("variance", format!("{:.3e}", motion.variance))
            .with_evidence("mean_energy", format!("{:.4}", motion.mean))
    }

    // ========================================================================
    // TOUCH CADENCE
    // ========================================================================

    fn cadence_signal(&self, snapshot: &RiskSnapshot, planner: &MutationPlanner) -> RiskSignal {
        let t = &self.thresholds;
        let touch = &snapshot.behavior.touch;

        if touch.sample_count < MIN_ACTIONS {
            return self
                .signal(SIGNAL_TOUCH_CADENCE, RiskSignalState::Unavailable, t.touch_cadence_weight)
                .with_evidence("touches", touch.sample_count);
        }

        let floor = planner.jitter_threshold(SIGNAL_TOUCH_CADENCE, t.touch_cv_floor);
        let same_point = touch.spatial_spread.map_or(false, |s| s <= f64::EPSILON);
        let state = if touch.coefficient_of_variation < floor {
            if same_point {
                RiskSignalState::soft(CADENCE_SAME_POINT_CONFIDENCE)
            } else {
                RiskSignalState::soft(CADENCE_CONFIDENCE)
            }
        } else {
            RiskSignalState::hard(false)
        };

        let mut signal = self
            .signal(SIGNAL_TOUCH_CADENCE, state, t.touch_cadence_weight)
            .with_evidence("touches", touch.sample_count)
            .with_evidence("interval_cv", format!("{:.4}", touch.coefficient_of_variation))
            .with_evidence("mean_interval", format!("{:.4}", touch.mean));
        if let Some(spread) = touch.spatial_spread {
            signal = signal.with_evidence("spatial_spread", format!("{:.2}", spread));
        }
        signal
    }
}

impl RiskSignalProvider for BehaviorSignalProvider {
    fn name(&self) -> &str {
        "behavior"
    }

    fn signals(&self, snapshot: &RiskSnapshot, planner: &MutationPlanner) -> Vec<RiskSignal> {
        vec![
            self.coupling_signal(snapshot, planner),
            self.motion_static_signal(snapshot, planner),
            self.cadence_signal(snapshot, planner),
        ]
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::capture::{MotionSample, TouchSample};
    use crate::logic::snapshot::BehaviorSnapshot;

    fn find<'a>(signals: &'a [RiskSignal], id: &str) -> &'a RiskSignal {
        signals.iter().find(|s| s.id == id).unwrap()
    }

    fn snapshot(touches: Vec<TouchSample>, motion: Vec<MotionSample>) -> RiskSnapshot {
        RiskSnapshot::new("device-a").with_behavior(BehaviorSnapshot::from_samples(touches, motion))
    }

    /// Motion at 10 Hz over [0, 20]; a spike wherever `spike(second)` holds
    fn motion(spike: impl Fn(i64) -> bool) -> Vec<MotionSample> {
        (0..=200)
            .map(|i| {
                let t = i as f64 / 10.0;
                let z = if spike(t.floor() as i64) { 1.6 } else { 1.0 };
                MotionSample::new(t, 0.0, 0.0, z)
            })
            .collect()
    }

    /// Three touches in every even second, plus window anchors at 0 and 20
    fn even_second_touches() -> Vec<TouchSample> {
        let mut touches = vec![TouchSample::new(0.0, 0.0, 40.0)];
        for s in (0..20).filter(|s| s % 2 == 0) {
            for k in 0..3 {
                touches.push(TouchSample::new(s as f64 + 0.1 + k as f64 * 0.2, k as f64 * 30.0, 40.0));
            }
        }
        touches.push(TouchSample::new(20.0, 0.0, 40.0));
        touches
    }

    #[test]
    fn test_empty_snapshot_all_unavailable() {
        let provider = BehaviorSignalProvider::default();
        let signals = provider.signals(&RiskSnapshot::new("d"), &MutationPlanner::disabled("d"));
        assert_eq!(signals.len(), 3);
        assert!(signals.iter().all(|s| s.state == RiskSignalState::Unavailable));
        assert!(signals.iter().all(|s| s.layer == LAYER_BEHAVIOR));
    }

    #[test]
    fn test_coupled_input_is_clean() {
        let snap = snapshot(even_second_touches(), motion(|s| s % 2 == 0));

        let signals = BehaviorSignalProvider::default().signals(&snap, &MutationPlanner::disabled("d"));
        let coupling = find(&signals, SIGNAL_TOUCH_MOTION_COUPLING);
        assert_eq!(coupling.state, RiskSignalState::hard(false));
    }

    #[test]
    fn test_decoupled_input_is_soft() {
        // Motion spikes only in the seconds without touches
        let snap = snapshot(even_second_touches(), motion(|s| s % 2 == 1));

        let signals = BehaviorSignalProvider::default().signals(&snap, &MutationPlanner::disabled("d"));
        let coupling = find(&signals, SIGNAL_TOUCH_MOTION_COUPLING);
        match coupling.state {
            RiskSignalState::Soft { confidence } => assert!(confidence > 0.5),
            other => panic!("expected soft, got {}", other),
        }
        assert!(coupling.evidence.contains_key("correlation"));
    }

    #[test]
    fn test_static_motion_flagged() {
        let flat: Vec<MotionSample> = (0..60).map(|i| MotionSample::new(i as f64 * 0.1, 0.0, 0.0, 1.0)).collect();
        let signals = BehaviorSignalProvider::default().signals(&snapshot(vec![], flat), &MutationPlanner::disabled("d"));
        assert_eq!(find(&signals, SIGNAL_MOTION_STATIC).state, RiskSignalState::soft(0.8));
    }

    #[test]
    fn test_robotic_cadence_same_point() {
        let touches: Vec<TouchSample> = (0..10).map(|i| TouchSample::new(i as f64 * 0.5, 100.0, 200.0)).collect();
        let signals = BehaviorSignalProvider::default().signals(&snapshot(touches, vec![]), &MutationPlanner::disabled("d"));
        assert_eq!(find(&signals, SIGNAL_TOUCH_CADENCE).state, RiskSignalState::soft(0.9));
    }

    #[test]
    fn test_robotic_cadence_moving_point() {
        let touches: Vec<TouchSample> = (0..10).map(|i| TouchSample::new(i as f64 * 0.5, i as f64 * 10.0, 200.0)).collect();
        let signals = BehaviorSignalProvider::default().signals(&snapshot(touches, vec![]), &MutationPlanner::disabled("d"));
        assert_eq!(find(&signals, SIGNAL_TOUCH_CADENCE).state, RiskSignalState::soft(0.7));
    }

    #[test]
    fn test_human_cadence_clean() {
        let gaps = [0.3, 0.9, 0.4, 1.7, 0.6, 0.2, 1.1, 0.8];
        let mut t = 0.0;
        let touches: Vec<TouchSample> = gaps
            .iter()
            .enumerate()
            .map(|(i, g)| {
                t += g;
                TouchSample::new(t, i as f64 * 13.0, 50.0 + i as f64 * 7.0)
            })
            .collect();
        let signals = BehaviorSignalProvider::default().signals(&snapshot(touches, vec![]), &MutationPlanner::disabled("d"));
        assert_eq!(find(&signals, SIGNAL_TOUCH_CADENCE).state, RiskSignalState::hard(false));
    }
}
