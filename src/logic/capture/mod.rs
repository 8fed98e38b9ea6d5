//! Capture Module - Touch & Motion buffers
//!
//! Continuously fed by background producers, drained once per evaluation cycle.
//!
//! ## Structure
//! - `buffer`: BoundedBuffer (mutex-guarded FIFO)
//! - `types`: samples + CaptureMetrics
//! - `session`: generic Capture lifecycle (TouchCapture / MotionCapture)

pub mod buffer;
pub mod types;
pub mod session;

pub use buffer::BoundedBuffer;
pub use types::{motion_metrics, touch_metrics, CaptureMetrics, MotionSample, TouchSample};
pub use session::{Capture, CaptureSample, MotionCapture, TouchCapture};
