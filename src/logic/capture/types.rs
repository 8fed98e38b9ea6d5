//! Capture Types
//!
//! Raw samples và derived metrics. KHÔNG chứa logic buffer.

use serde::{Deserialize, Serialize};

/// One touch-down event; `timestamp` in seconds on a monotonic clock
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchSample {
    pub timestamp: f64,
    pub x: f64,
    pub y: f64,
}

impl TouchSample {
    pub fn new(timestamp: f64, x: f64, y: f64) -> Self {
        Self { timestamp, x, y }
    }
}

/// One accelerometer reading (g); `timestamp` in seconds, same clock as touches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    pub timestamp: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl MotionSample {
    pub fn new(timestamp: f64, x: f64, y: f64, z: f64) -> Self {
        Self { timestamp, x, y, z }
    }

    /// Magnitude of the acceleration vector
    pub fn energy(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Summary statistics of one capture window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureMetrics {
    pub sample_count: usize,
    /// Mean of the measured series (touch intervals / motion energy)
    pub mean: f64,
    /// Population variance of the series
    pub variance: f64,
    /// std / mean, 0 when the mean is 0
    pub coefficient_of_variation: f64,
    /// max - min of the series
    pub spread: f64,
    /// Touch only: RMS distance of touch points from their centroid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spatial_spread: Option<f64>,
}

impl CaptureMetrics {
    /// Statistics over `values`; `sample_count` is set by the caller
    pub fn from_series(sample_count: usize, values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                sample_count,
                ..Default::default()
            };
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();
        let coefficient_of_variation = if mean.abs() > f64::EPSILON { std_dev / mean.abs() } else { 0.0 };
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);

        Self {
            sample_count,
            mean,
            variance,
            coefficient_of_variation,
            spread: max - min,
            spatial_spread: None,
        }
    }
}

/// Touch metrics: statistics over inter-touch intervals plus spatial spread
pub fn touch_metrics(samples: &[TouchSample]) -> CaptureMetrics {
    let mut timestamps: Vec<f64> = samples.iter().map(|s| s.timestamp).collect();
    timestamps.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let intervals: Vec<f64> = timestamps.windows(2).map(|w| w[1] - w[0]).collect();

    let mut metrics = CaptureMetrics::from_series(samples.len(), &intervals);
    if !samples.is_empty() {
        let n = samples.len() as f64;
        let cx = samples.iter().map(|s| s.x).sum::<f64>() / n;
        let cy = samples.iter().map(|s| s.y).sum::<f64>() / n;
        let mean_sq = samples
            .iter()
            .map(|s| (s.x - cx).powi(2) + (s.y - cy).powi(2))
            .sum::<f64>()
            / n;
        metrics.spatial_spread = Some(mean_sq.sqrt());
    }
    metrics
}

/// Motion metrics: statistics over per-sample energy
pub fn motion_metrics(samples: &[MotionSample]) -> CaptureMetrics {
    let energies: Vec<f64> = samples.iter().map(MotionSample::energy).collect();
    CaptureMetrics::from_series(samples.len(), &energies)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_stats() {
        let m = CaptureMetrics::from_series(4, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(m.sample_count, 4);
        assert!((m.mean - 2.5).abs() < 1e-12);
        assert!((m.variance - 1.25).abs() < 1e-12);
        assert!((m.spread - 3.0).abs() < 1e-12);
        assert!((m.coefficient_of_variation - 1.25f64.sqrt() / 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_series() {
        let m = CaptureMetrics::from_series(0, &[]);
        assert_eq!(m, CaptureMetrics::default());
    }

    #[test]
    fn test_touch_metrics_use_intervals() {
        let samples = vec![
            TouchSample::new(0.0, 10.0, 10.0),
            TouchSample::new(1.0, 10.0, 10.0),
            TouchSample::new(2.0, 10.0, 10.0),
        ];
        let m = touch_metrics(&samples);
        assert_eq!(m.sample_count, 3);
        assert!((m.mean - 1.0).abs() < 1e-12);
        assert_eq!(m.variance, 0.0);
        assert_eq!(m.coefficient_of_variation, 0.0);
        assert_eq!(m.spatial_spread, Some(0.0));
    }

    #[test]
    fn test_motion_energy() {
        let s = MotionSample::new(0.0, 3.0, 4.0, 0.0);
        assert!((s.energy() - 5.0).abs() < 1e-12);
        let m = motion_metrics(&[s, MotionSample::new(0.1, 0.0, 0.0, 1.0)]);
        assert!((m.mean - 3.0).abs() < 1e-12);
        assert!(m.spatial_spread.is_none());
    }
}
