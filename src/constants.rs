//! Central Configuration Constants
//!
//! Single source of truth for all engine defaults.
//! Every tunable can be overridden from the environment (`DEVICE_RISK_*`).

// ============================================
// Aggregation
// ============================================

/// Fraction removed from every contribution inside a tamper scope (50%)
pub const DEFAULT_TAMPER_DISCOUNT: f64 = 0.5;

/// Total score at which a verdict becomes Medium risk
pub const DEFAULT_MEDIUM_MIN: f64 = 30.0;

/// Total score at which a verdict becomes High risk
pub const DEFAULT_HIGH_MIN: f64 = 60.0;

/// Total score at which a verdict becomes Critical risk
pub const DEFAULT_CRITICAL_MIN: f64 = 100.0;

// ============================================
// Probes
// ============================================

/// Time budget for a single probe before it is treated as unavailable (ms)
pub const DEFAULT_PROBE_BUDGET_MS: u64 = 250;

// ============================================
// Capture buffers
// ============================================

/// Maximum retained touch samples
pub const DEFAULT_TOUCH_CAPACITY: usize = 512;

/// Maximum retained motion samples (~20s at 100Hz)
pub const DEFAULT_MOTION_CAPACITY: usize = 2048;

// ============================================
// Behavior thresholds
// ============================================

/// Correlation below this counts as touch/motion decoupling
pub const DEFAULT_LOW_CORRELATION: f64 = 0.1;

/// Minimum action count before decoupling is considered meaningful
pub const DEFAULT_HIGH_ACTION_COUNT: usize = 12;

/// Motion energy variance floor (g²); below it the sensor looks synthetic
pub const DEFAULT_MOTION_VARIANCE_FLOOR: f64 = 1e-6;

/// Touch interval coefficient of variation floor; below it cadence is robotic
pub const DEFAULT_TOUCH_CV_FLOOR: f64 = 0.05;

// ============================================
// Server signals
// ============================================

/// Fixed score for a datacenter-hosted public IP
pub const DATACENTER_SCORE: f64 = 30.0;

/// Fixed score per server risk tag
pub const RISK_TAG_SCORE: f64 = 10.0;

/// Cap on the summed risk tag score
pub const RISK_TAG_SCORE_CAP: f64 = 30.0;

/// Max age of a cached server aggregate (seconds)
pub const DEFAULT_SERVER_INTEL_TTL_SECS: i64 = 600;

// ============================================
// Identity / mutation
// ============================================

/// Fallback device id when the identity collaborator fails
pub const UNKNOWN_DEVICE_ID: &str = "unknown-device";

/// Identity file name inside the data directory
pub const IDENTITY_FILE_NAME: &str = "device_identity.json";

/// Default salt mixed into every mutation seed
pub const DEFAULT_MUTATION_SALT: &str = "device-risk-v1";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================
// Helper functions to read from env with fallback
// ============================================

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

/// Get tamper discount from environment or use default
pub fn get_tamper_discount() -> f64 {
    env_parse("DEVICE_RISK_TAMPER_DISCOUNT").unwrap_or(DEFAULT_TAMPER_DISCOUNT)
}

/// Get probe budget from environment or use default
pub fn get_probe_budget_ms() -> u64 {
    env_parse("DEVICE_RISK_PROBE_BUDGET_MS").unwrap_or(DEFAULT_PROBE_BUDGET_MS)
}

/// Get mutation salt from environment or use default
pub fn get_mutation_salt() -> String {
    std::env::var("DEVICE_RISK_MUTATION_SALT")
        .unwrap_or_else(|_| DEFAULT_MUTATION_SALT.to_string())
}

/// Get touch buffer capacity from environment or use default
pub fn get_touch_capacity() -> usize {
    env_parse("DEVICE_RISK_TOUCH_CAPACITY").unwrap_or(DEFAULT_TOUCH_CAPACITY)
}

/// Get motion buffer capacity from environment or use default
pub fn get_motion_capacity() -> usize {
    env_parse("DEVICE_RISK_MOTION_CAPACITY").unwrap_or(DEFAULT_MOTION_CAPACITY)
}

/// Check if the fatal short-circuit is enabled
pub fn is_fatal_short_circuit_enabled() -> bool {
    std::env::var("DEVICE_RISK_FATAL_SHORT_CIRCUIT")
        .map(|s| s.to_lowercase() != "false" && s != "0")
        .unwrap_or(true)
}
