//! Rolling-window anomaly detection.
//!
//! Each reading is compared against the mean and population standard
//! deviation of a window centered on it. Near the ends of the series the
//! window is clipped rather than padded, so it shrinks to as little as
//! `ANOMALY_WINDOW / 2` readings.
//!
//! When a window is constant its standard deviation is zero and any non-zero
//! deviation is flagged. That behaviour is kept as-is.

use std::ops::Range;

use crate::model::{AnomalyPoint, Series};

/// Nominal width of the local window, in readings.
pub const ANOMALY_WINDOW: usize = 24;

/// Readings further than this many standard deviations from the local mean
/// are flagged.
pub const THRESHOLD_SIGMAS: f64 = 2.0;

/// Population mean and standard deviation of a window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalStats {
    pub mean: f64,
    pub std_dev: f64,
}

impl LocalStats {
    /// Returns `None` for an empty slice.
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(LocalStats {
            mean,
            std_dev: variance.sqrt(),
        })
    }

    pub fn is_outlier(&self, value: f64, sigmas: f64) -> bool {
        (value - self.mean).abs() > sigmas * self.std_dev
    }
}

/// Bounds of the window centered on `index` in a sequence of `len` values:
/// `[index - floor(width/2), index + ceil(width/2))`, clipped to `[0, len)`.
pub fn local_window(index: usize, len: usize, width: usize) -> Range<usize> {
    let start = index.saturating_sub(width / 2);
    let end = len.min(index + width.div_ceil(2));
    start..end
}

/// Flags readings that deviate from their local window by more than
/// `sigmas` standard deviations. Output follows series order.
///
/// A series shorter than `width` yields no anomalies.
pub fn detect_with(series: &Series, width: usize, sigmas: f64) -> Vec<AnomalyPoint> {
    if series.is_empty() || series.len() < width {
        return Vec::new();
    }
    let values: Vec<f64> = series.values().collect();

    series
        .readings()
        .iter()
        .enumerate()
        .filter(|(i, reading)| {
            LocalStats::compute(&values[local_window(*i, values.len(), width)])
                .is_some_and(|stats| stats.is_outlier(reading.value, sigmas))
        })
        .map(|(_, reading)| AnomalyPoint {
            timestamp: reading.timestamp,
            value: reading.value,
        })
        .collect()
}

/// Anomalies using the fixed 24-reading window and 2-sigma threshold.
pub fn detect_anomalies(series: &Series) -> Vec<AnomalyPoint> {
    detect_with(series, ANOMALY_WINDOW, THRESHOLD_SIGMAS)
}
