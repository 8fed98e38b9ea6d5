//! Risk Snapshot
//!
//! Immutable picture of one evaluation cycle handed to every signal provider.
//! KHÔNG chứa logic scoring.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::capture::{motion_metrics, touch_metrics, CaptureMetrics, MotionSample, TouchSample};
use crate::logic::providers::ServerAggregate;
use crate::logic::signal::RiskSignal;

/// Drained capture buffers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BehaviorSnapshot {
    pub touch: CaptureMetrics,
    pub motion: CaptureMetrics,
    pub touches: Vec<TouchSample>,
    pub motion_samples: Vec<MotionSample>,
}

impl BehaviorSnapshot {
    /// Build from raw samples, computing the metrics
    pub fn from_samples(touches: Vec<TouchSample>, motion_samples: Vec<MotionSample>) -> Self {
        Self {
            touch: touch_metrics(&touches),
            motion: motion_metrics(&motion_samples),
            touches,
            motion_samples,
        }
    }

    /// Touch timestamps, the action series for coupling analysis
    pub fn action_timestamps(&self) -> Vec<f64> {
        self.touches.iter().map(|t| t.timestamp).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskSnapshot {
    pub device_id: String,
    pub evaluated_at: DateTime<Utc>,
    pub behavior: BehaviorSnapshot,
    /// Latest fresh server aggregate, if any
    pub server: Option<ServerAggregate>,
    /// Signals already produced by checks this cycle
    pub prior_signals: Vec<RiskSignal>,
}

impl RiskSnapshot {
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            evaluated_at: Utc::now(),
            behavior: BehaviorSnapshot::default(),
            server: None,
            prior_signals: Vec::new(),
        }
    }

    pub fn with_behavior(mut self, behavior: BehaviorSnapshot) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn with_server(mut self, server: Option<ServerAggregate>) -> Self {
        self.server = server;
        self
    }
}
