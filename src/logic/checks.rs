//! Checks - probe-backed signal emitters
//!
//! A check owns its probes and turns their budgeted outcomes into RiskSignals.
//! - `ConsensusCheck`: one fact, ≥ 2 independent primitives, majority + hook verdict
//! - `DetectorCheck`: one scored capability folded into a legacy-scored signal

use std::sync::Arc;

use crate::logic::consensus::{self, MethodVote, MIN_VOTES};
use crate::logic::mutation::MutationPlanner;
use crate::logic::probes::{Detector, FactProbe, ProbeOutcome, ProbeRunner};
use crate::logic::signal::{RiskSignal, RiskSignalState, SignalCategory, LAYER_ANTI_TAMPER};

/// Default impact of a confirmed fact
pub const DEFAULT_FACT_WEIGHT: f64 = 80.0;
/// Default impact of a hook verdict
pub const DEFAULT_HOOK_WEIGHT: f64 = 50.0;

// ============================================================================
// CHECK
// ============================================================================

pub enum Check {
    Consensus(ConsensusCheck),
    Detector(DetectorCheck),
}

impl Check {
    pub fn id(&self) -> &str {
        match self {
            Check::Consensus(c) => &c.fact,
            Check::Detector(d) => d.detector.id(),
        }
    }

    pub async fn run(&self, runner: &ProbeRunner, planner: &MutationPlanner) -> Vec<RiskSignal> {
        match self {
            Check::Consensus(c) => c.run(runner, planner).await,
            Check::Detector(d) => vec![d.run(runner).await],
        }
    }
}

impl From<ConsensusCheck> for Check {
    fn from(check: ConsensusCheck) -> Self {
        Check::Consensus(check)
    }
}

impl From<DetectorCheck> for Check {
    fn from(check: DetectorCheck) -> Self {
        Check::Detector(check)
    }
}

// ============================================================================
// CONSENSUS CHECK
// ============================================================================

pub struct ConsensusCheck {
    fact: String,
    category: SignalCategory,
    layer: u8,
    fact_weight: f64,
    hook_layer: u8,
    hook_weight: f64,
    probes: Vec<Arc<dyn FactProbe>>,
}

impl ConsensusCheck {
    pub fn new(fact: impl Into<String>, layer: u8, probes: Vec<Arc<dyn FactProbe>>) -> Self {
        Self {
            fact: fact.into(),
            category: SignalCategory::Device,
            layer,
            fact_weight: DEFAULT_FACT_WEIGHT,
            hook_layer: LAYER_ANTI_TAMPER,
            hook_weight: DEFAULT_HOOK_WEIGHT,
            probes,
        }
    }

    pub fn with_category(mut self, category: SignalCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_fact_weight(mut self, weight: f64) -> Self {
        self.fact_weight = weight;
        self
    }

    pub fn with_hook(mut self, layer: u8, weight: f64) -> Self {
        self.hook_layer = layer;
        self.hook_weight = weight;
        self
    }

    pub fn fact(&self) -> &str {
        &self.fact
    }

    /// Id of the companion tamper signal
    pub fn hook_signal_id(&self) -> String {
        format!("{}.hook", self.fact)
    }

    pub async fn run(&self, runner: &ProbeRunner, planner: &MutationPlanner) -> Vec<RiskSignal> {
        let probes = planner.shuffle(&self.fact, self.probes.clone());

        let mut votes = Vec::with_capacity(probes.len());
        let mut skipped = Vec::new();
        for probe in probes {
            let method = probe.method().to_string();
            match runner.run_fact(probe).await {
                ProbeOutcome::Completed(value) => votes.push(MethodVote::new(method, value)),
                outcome => skipped.push(format!("{}:{}", method, outcome.label())),
            }
        }

        let result = if votes.len() < MIN_VOTES {
            None
        } else {
            consensus::evaluate(&self.fact, votes.clone()).ok()
        };

        let result = match result {
            Some(result) => result,
            None => {
                log::debug!("Fact '{}' unavailable: {} usable vote(s)", self.fact, votes.len());
                let mut signal = RiskSignal::new(&self.fact, self.category.clone(), self.layer, RiskSignalState::Unavailable)
                    .with_weight(self.fact_weight)
                    .with_evidence("usable_votes", votes.len());
                for vote in &votes {
                    signal = signal.with_evidence(format!("vote.{}", vote.method), vote.value);
                }
                if !skipped.is_empty() {
                    signal = signal.with_evidence("skipped", skipped.join(","));
                }
                return vec![signal];
            }
        };

        let mut fact_signal = RiskSignal::new(
            &self.fact,
            self.category.clone(),
            self.layer,
            RiskSignalState::hard(result.consensus_exists),
        )
        .with_weight(self.fact_weight);
        fact_signal.evidence = result.evidence();
        if !skipped.is_empty() {
            fact_signal = fact_signal.with_evidence("skipped", skipped.join(","));
        }

        let mut signals = vec![fact_signal];
        if result.is_hooked {
            signals.push(
                RiskSignal::new(self.hook_signal_id(), SignalCategory::AntiTamper, self.hook_layer, RiskSignalState::Tampered)
                    .with_weight(self.hook_weight)
                    .with_evidence("fact", &self.fact)
                    .with_evidence("consensus", result.consensus_exists)
                    .with_evidence("hook_methods", result.hook_methods.join(",")),
            );
        }
        signals
    }
}

// ============================================================================
// DETECTOR CHECK
// ============================================================================

pub struct DetectorCheck {
    detector: Arc<dyn Detector>,
}

impl DetectorCheck {
    pub fn new(detector: Arc<dyn Detector>) -> Self {
        Self { detector }
    }

    /// Fired → soft(1.0) carrying the capability score; clean → hard(false)
    pub async fn run(&self, runner: &ProbeRunner) -> RiskSignal {
        let id = self.detector.id().to_string();
        let category = self.detector.category();
        let layer = self.detector.layer();

        match runner.run_detector(self.detector.clone()).await {
            ProbeOutcome::Completed(result) => {
                let state = if result.fired() {
                    RiskSignalState::soft(1.0)
                } else {
                    RiskSignalState::hard(false)
                };
                let mut signal = RiskSignal::new(id, category, layer, state).with_score(result.score);
                if !result.methods.is_empty() {
                    signal = signal.with_evidence("methods", result.methods.join(","));
                }
                signal
            }
            outcome => RiskSignal::new(id, category, layer, RiskSignalState::Unavailable)
                .with_evidence("probe", outcome.label()),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::logic::probes::{FnDetector, FnProbe};
    use crate::logic::signal::{DetectorResult, LAYER_ENVIRONMENT};

    fn runner() -> ProbeRunner {
        ProbeRunner::new(Duration::from_millis(200))
    }

    fn probe(method: &str, value: bool) -> Arc<dyn FactProbe> {
        Arc::new(FnProbe::new(method, move || value))
    }

    #[tokio::test]
    async fn test_agreeing_probes_no_hook() {
        let check = ConsensusCheck::new("marker.x", LAYER_ENVIRONMENT, vec![probe("a", true), probe("b", true)]);
        let signals = check.run(&runner(), &MutationPlanner::disabled("d")).await;
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].state, RiskSignalState::hard(true));
        assert_eq!(signals[0].weight_hint, DEFAULT_FACT_WEIGHT);
    }

    #[tokio::test]
    async fn test_disagreement_emits_tampered() {
        let check = ConsensusCheck::new(
            "marker.x",
            LAYER_ENVIRONMENT,
            vec![probe("a", false), probe("b", false), probe("c", true)],
        );
        let signals = check.run(&runner(), &MutationPlanner::disabled("d")).await;
        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].state, RiskSignalState::hard(false));

        let hook = &signals[1];
        assert_eq!(hook.id, "marker.x.hook");
        assert_eq!(hook.state, RiskSignalState::Tampered);
        assert_eq!(hook.layer, LAYER_ANTI_TAMPER);
        assert_eq!(hook.evidence.get("hook_methods").map(String::as_str), Some("c"));
    }

    #[tokio::test]
    async fn test_timed_out_probe_not_counted() {
        let slow: Arc<dyn FactProbe> = Arc::new(FnProbe::new("slow", || {
            std::thread::sleep(Duration::from_millis(600));
            true
        }));
        let check = ConsensusCheck::new("marker.x", LAYER_ENVIRONMENT, vec![probe("a", false), slow]);
        let signals = check.run(&runner(), &MutationPlanner::disabled("d")).await;
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].state, RiskSignalState::Unavailable);
        assert_eq!(signals[0].evidence.get("skipped").map(String::as_str), Some("slow:timeout"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_socket_marker_not_hooked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qemud");
        let _listener = std::os::unix::net::UnixListener::bind(&path).unwrap();

        let check = ConsensusCheck::new("marker.qemud", LAYER_ENVIRONMENT, crate::logic::probes::marker_probes(&path));
        let signals = check.run(&runner(), &MutationPlanner::disabled("d")).await;
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].state, RiskSignalState::hard(true));
        assert_eq!(signals[0].evidence.get("vote.open").map(String::as_str), Some("true"));
    }

    #[tokio::test]
    async fn test_detector_check_mapping() {
        let fired: Arc<dyn Detector> = Arc::new(FnDetector::new("debugger", SignalCategory::AntiTamper, 2, || {
            DetectorResult::new(25.0, vec!["ptrace".into()])
        }));
        let signal = DetectorCheck::new(fired).run(&runner()).await;
        assert_eq!(signal.state, RiskSignalState::soft(1.0));
        assert_eq!(signal.score, 25.0);
        assert_eq!(signal.weight_hint, 0.0);
        assert_eq!(signal.evidence.get("methods").map(String::as_str), Some("ptrace"));

        let clean: Arc<dyn Detector> = Arc::new(FnDetector::new("emulator", SignalCategory::Device, 1, DetectorResult::clean));
        let signal = DetectorCheck::new(clean).run(&runner()).await;
        assert_eq!(signal.state, RiskSignalState::hard(false));
        assert_eq!(signal.score, 0.0);
    }
}
