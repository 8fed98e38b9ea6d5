//! Evidence Probe Interfaces
//!
//! A probe performs one concrete OS/runtime check. It must not panic or block
//! forever for unsupported environments: return false / a clean result instead.

use crate::logic::signal::{DetectorResult, SignalCategory, LAYER_ENVIRONMENT};

/// One boolean fact tested by one primitive
pub trait FactProbe: Send + Sync {
    /// Diagnostic tag naming the primitive (e.g. "stat", "fopen")
    fn method(&self) -> &str;
    fn probe(&self) -> bool;
}

/// Capability returning a scored result with the sub-checks that fired
pub trait Detector: Send + Sync {
    fn id(&self) -> &str;

    fn category(&self) -> SignalCategory {
        SignalCategory::Device
    }

    fn layer(&self) -> u8 {
        LAYER_ENVIRONMENT
    }

    fn detect(&self) -> DetectorResult;
}

// ============================================================================
// CLOSURE ADAPTERS
// ============================================================================

/// FactProbe backed by a closure
pub struct FnProbe {
    method: String,
    check: Box<dyn Fn() -> bool + Send + Sync>,
}

impl FnProbe {
    pub fn new(method: impl Into<String>, check: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        Self {
            method: method.into(),
            check: Box::new(check),
        }
    }
}

impl FactProbe for FnProbe {
    fn method(&self) -> &str {
        &self.method
    }

    fn probe(&self) -> bool {
        (self.check)()
    }
}

impl std::fmt::Debug for FnProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnProbe").field("method", &self.method).finish()
    }
}

/// Detector backed by a closure
pub struct FnDetector {
    id: String,
    category: SignalCategory,
    layer: u8,
    check: Box<dyn Fn() -> DetectorResult + Send + Sync>,
}

impl FnDetector {
    pub fn new(
        id: impl Into<String>,
        category: SignalCategory,
        layer: u8,
        check: impl Fn() -> DetectorResult + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            layer,
            check: Box::new(check),
        }
    }
}

impl Detector for FnDetector {
    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> SignalCategory {
        self.category.clone()
    }

    fn layer(&self) -> u8 {
        self.layer
    }

    fn detect(&self) -> DetectorResult {
        (self.check)()
    }
}
