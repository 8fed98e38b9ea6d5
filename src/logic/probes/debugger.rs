//! Debugger Probe (TracerPid)
//!
//! Linux/Android only; other platforms report false.

use super::types::FactProbe;

#[derive(Debug, Clone, Default)]
pub struct TracerPidProbe;

impl FactProbe for TracerPidProbe {
    fn method(&self) -> &str {
        "proc_status_tracer_pid"
    }

    fn probe(&self) -> bool {
        read_tracer_pid().map(|pid| pid != 0).unwrap_or(false)
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn read_tracer_pid() -> Option<i32> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    parse_tracer_pid(&status)
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn read_tracer_pid() -> Option<i32> {
    None
}

/// Extract `TracerPid:` from a /proc status document
pub fn parse_tracer_pid(status: &str) -> Option<i32> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("TracerPid:"))
        .and_then(|rest| rest.trim().parse().ok())
}
