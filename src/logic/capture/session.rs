//! Capture Collaborators - Touch & Motion
//!
//! Owned state with an explicit start/stop lifecycle. A background producer
//! records samples while running; evaluation cycles drain them with
//! `snapshot_and_reset` / `snapshot_detail_and_reset`.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use super::buffer::BoundedBuffer;
use super::types::{motion_metrics, touch_metrics, CaptureMetrics, MotionSample, TouchSample};

// ============================================================================
// SAMPLE KIND
// ============================================================================

/// What a capture needs to know about the samples it buffers
pub trait CaptureSample: Clone + Send {
    /// Name used in lifecycle logs
    const KIND: &'static str;

    /// Samples failing this are dropped at `record`
    fn is_valid(&self) -> bool;

    fn metrics(samples: &[Self]) -> CaptureMetrics;
}

impl CaptureSample for TouchSample {
    const KIND: &'static str = "Touch";

    fn is_valid(&self) -> bool {
        self.timestamp.is_finite()
    }

    fn metrics(samples: &[Self]) -> CaptureMetrics {
        touch_metrics(samples)
    }
}

impl CaptureSample for MotionSample {
    const KIND: &'static str = "Motion";

    fn is_valid(&self) -> bool {
        self.timestamp.is_finite() && self.energy().is_finite()
    }

    fn metrics(samples: &[Self]) -> CaptureMetrics {
        motion_metrics(samples)
    }
}

// ============================================================================
// CAPTURE
// ============================================================================

pub type TouchCapture = Capture<TouchSample>;
pub type MotionCapture = Capture<MotionSample>;

#[derive(Debug)]
pub struct Capture<S: CaptureSample> {
    buffer: BoundedBuffer<S>,
    running: AtomicBool,
    dropped: AtomicU64,
}

impl<S: CaptureSample> Capture<S> {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: BoundedBuffer::new(capacity),
            running: AtomicBool::new(false),
            dropped: AtomicU64::new(0),
        }
    }

    pub fn start(&self) {
        if !self.running.swap(true, Ordering::SeqCst) {
            log::debug!("{} capture started (capacity {})", S::KIND, self.buffer.capacity());
        }
    }

    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            log::debug!("{} capture stopped", S::KIND);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Record a sample; ignored (and counted) while stopped or when invalid
    pub fn record(&self, sample: S) -> bool {
        if !self.is_running() || !sample.is_valid() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        self.buffer.push(sample);
        true
    }

    /// Samples rejected because capture was stopped or the sample was invalid
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn snapshot_and_reset(&self) -> CaptureMetrics {
        self.snapshot_detail_and_reset().0
    }

    pub fn snapshot_detail_and_reset(&self) -> (CaptureMetrics, Vec<S>) {
        let samples = self.buffer.snapshot_and_reset();
        (S::metrics(&samples), samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_lifecycle() {
        let capture = TouchCapture::new(8);
        assert!(!capture.record(TouchSample::new(0.0, 1.0, 1.0)));
        assert_eq!(capture.dropped(), 1);

        capture.start();
        assert!(capture.record(TouchSample::new(0.0, 1.0, 1.0)));
        assert!(capture.record(TouchSample::new(0.5, 2.0, 1.0)));
        capture.stop();
        assert!(!capture.record(TouchSample::new(1.0, 1.0, 1.0)));

        let (metrics, samples) = capture.snapshot_detail_and_reset();
        assert_eq!(metrics.sample_count, 2);
        assert_eq!(samples.len(), 2);
        assert_eq!(capture.snapshot_and_reset().sample_count, 0);
    }

    #[test]
    fn test_motion_bounded() {
        let capture = MotionCapture::new(40);
        capture.start();
        for i in 0..100 {
            capture.record(MotionSample::new(i as f64 * 0.01, 0.0, 0.0, 1.0));
        }
        let (metrics, samples) = capture.snapshot_detail_and_reset();
        assert_eq!(metrics.sample_count, 40);
        assert!((samples[0].timestamp - 0.60).abs() < 1e-9);
        assert!(metrics.variance.abs() < 1e-12);
    }

    #[test]
    fn test_motion_rejects_non_finite() {
        let capture = MotionCapture::new(4);
        capture.start();
        assert!(!capture.record(MotionSample::new(0.0, f64::NAN, 0.0, 0.0)));
        assert!(!capture.record(MotionSample::new(f64::INFINITY, 0.0, 0.0, 0.0)));
        assert_eq!(capture.dropped(), 2);
    }

    #[test]
    fn test_touch_rejects_non_finite_timestamp() {
        let capture = TouchCapture::new(4);
        capture.start();
        assert!(!capture.record(TouchSample::new(f64::NAN, 1.0, 1.0)));
        // Touch validity ignores coordinates
        assert!(capture.record(TouchSample::new(0.0, f64::INFINITY, 1.0)));
        assert_eq!(capture.dropped(), 1);
        assert_eq!(capture.snapshot_and_reset().sample_count, 1);
    }

    #[test]
    fn test_restart_keeps_buffered_samples() {
        let capture = MotionCapture::new(8);
        capture.start();
        capture.record(MotionSample::new(0.0, 0.0, 0.0, 1.0));
        capture.stop();
        capture.start();
        assert!(capture.is_running());
        capture.record(MotionSample::new(0.1, 0.0, 0.0, 1.0));
        assert_eq!(capture.snapshot_detail_and_reset().1.len(), 2);
    }
}
