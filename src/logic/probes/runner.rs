//! Budgeted Probe Runner
//!
//! Probes may make short blocking OS calls. Each runs on the blocking pool
//! under a time budget; an overrun or a panic becomes an outcome the caller
//! maps to `unavailable` instead of hanging or failing the cycle.

use std::sync::Arc;
use std::time::Duration;

use super::types::{Detector, FactProbe};
use crate::logic::signal::DetectorResult;

#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome<T> {
    Completed(T),
    TimedOut,
    Failed(String),
}

impl<T> ProbeOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            ProbeOutcome::Completed(value) => Some(value),
            _ => None,
        }
    }

    /// Evidence label for audit ("ok" / "timeout" / "failed")
    pub fn label(&self) -> &'static str {
        match self {
            ProbeOutcome::Completed(_) => "ok",
            ProbeOutcome::TimedOut => "timeout",
            ProbeOutcome::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProbeRunner {
    budget: Duration,
}

impl ProbeRunner {
    pub fn new(budget: Duration) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Run `check` under the budget.
    ///
    /// A timed-out blocking call cannot be cancelled; it finishes on the
    /// blocking pool and its result is discarded.
    pub async fn run<T, F>(&self, label: &str, check: F) -> ProbeOutcome<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        match tokio::time::timeout(self.budget, tokio::task::spawn_blocking(check)).await {
            Ok(Ok(value)) => ProbeOutcome::Completed(value),
            Ok(Err(e)) => {
                log::warn!("Probe '{}' failed: {}", label, e);
                ProbeOutcome::Failed(e.to_string())
            }
            Err(_) => {
                log::warn!("Probe '{}' exceeded {:?} budget", label, self.budget);
                ProbeOutcome::TimedOut
            }
        }
    }

    pub async fn run_fact(&self, probe: Arc<dyn FactProbe>) -> ProbeOutcome<bool> {
        let label = probe.method().to_string();
        self.run(&label, move || probe.probe()).await
    }

    pub async fn run_detector(&self, detector: Arc<dyn Detector>) -> ProbeOutcome<DetectorResult> {
        let label = detector.id().to_string();
        self.run(&label, move || detector.detect()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::probes::types::FnProbe;

    #[tokio::test]
    async fn test_completed_probe() {
        let runner = ProbeRunner::new(Duration::from_millis(500));
        let probe: Arc<dyn FactProbe> = Arc::new(FnProbe::new("stat", || true));
        assert_eq!(runner.run_fact(probe).await, ProbeOutcome::Completed(true));
    }

    #[tokio::test]
    async fn test_slow_probe_times_out() {
        let runner = ProbeRunner::new(Duration::from_millis(20));
        let probe: Arc<dyn FactProbe> = Arc::new(FnProbe::new("slow", || {
            std::thread::sleep(Duration::from_millis(300));
            true
        }));
        assert_eq!(runner.run_fact(probe).await, ProbeOutcome::TimedOut);
    }

    #[tokio::test]
    async fn test_panicking_probe_fails_open() {
        let runner = ProbeRunner::new(Duration::from_millis(500));
        let probe: Arc<dyn FactProbe> = Arc::new(FnProbe::new("boom", || panic!("probe crashed")));
        let outcome = runner.run_fact(probe).await;
        assert_eq!(outcome.label(), "failed");
        assert!(outcome.completed().is_none());
    }
}
