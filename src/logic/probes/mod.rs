//! Probes Module - Evidence Probe boundary
//!
//! ## Structure
//! - `types`: FactProbe / Detector traits + closure adapters
//! - `runner`: budgeted execution on the blocking pool
//! - `file_marker`: marker existence via independent primitives
//! - `debugger`: TracerPid probe

pub mod types;
pub mod runner;
pub mod file_marker;
pub mod debugger;

pub use types::{Detector, FactProbe, FnDetector, FnProbe};
pub use runner::{ProbeOutcome, ProbeRunner};
pub use file_marker::{
    marker_fact_id, marker_probes, ANDROID_ROOT_MARKERS, EMULATOR_MARKERS, IOS_JAILBREAK_MARKERS,
};
pub use debugger::{parse_tracer_pid, TracerPidProbe};
