//! Signal Providers
//!
//! Snapshot-driven emitters: each reads the immutable RiskSnapshot and returns
//! fresh RiskSignals for this cycle. Providers never mutate the snapshot.
//!
//! ## Structure
//! - `behavior`: touch/motion coupling, static motion, robotic cadence (layer 3)
//! - `server`: ServerAggregate → serverRequired signals (layer 4)

pub mod behavior;
pub mod server;

pub use behavior::{
    BehaviorSignalProvider, SIGNAL_MOTION_STATIC, SIGNAL_TOUCH_CADENCE, SIGNAL_TOUCH_MOTION_COUPLING,
};
pub use server::{
    ip_aggregation_score, ServerAggregate, ServerIntelCache, ServerSignalProvider, SIGNAL_DATACENTER,
    SIGNAL_IP_AGGREGATION, SIGNAL_NETWORK, SIGNAL_RISK_TAGS,
};

use crate::logic::mutation::MutationPlanner;
use crate::logic::signal::RiskSignal;
use crate::logic::snapshot::RiskSnapshot;

/// Provider collaborator
pub trait RiskSignalProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Signals for this cycle; thresholds may be jittered through `planner`
    fn signals(&self, snapshot: &RiskSnapshot, planner: &MutationPlanner) -> Vec<RiskSignal>;
}
