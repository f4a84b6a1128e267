//! Signal-processing core of the pump monitoring service.
//!
//! `analyze` turns a complete water-level series into the derived signals the
//! dashboard needs. It is a pure function of its input: no ambient state, no
//! I/O, and identical results on every call with the same series.
//!
//! Submodules:
//! - `stats`     — whole-series sum, mean, min, max, current value.
//! - `cycles`    — pump-on/pump-off state machine, runtime accounting.
//! - `trend`     — 7-point trailing moving average.
//! - `anomalies` — centered 24-point rolling 2-sigma test.
//! - `daily`     — cycle starts grouped per calendar day.

pub mod anomalies;
pub mod cycles;
pub mod daily;
pub mod stats;
pub mod trend;

use chrono::{FixedOffset, Offset, Utc};
use serde::Serialize;

use crate::model::{AnalysisError, AnalysisWarning, AnomalyPoint, Series, TrendPoint};

pub use anomalies::{ANOMALY_WINDOW, THRESHOLD_SIGMAS, detect_anomalies};
pub use cycles::{CycleSummary, segment_cycles};
pub use daily::{DailyCounts, daily_cycle_counts};
pub use stats::SeriesStats;
pub use trend::{TREND_WINDOW, trend};

/// Minimum readings needed for at least one step delta.
const CYCLE_MIN_READINGS: usize = 2;

/// Per-run options. Window sizes and the anomaly threshold are fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    /// Offset used to decide which calendar day a cycle started on.
    pub day_offset: FixedOffset,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            day_offset: Utc.fix(),
        }
    }
}

/// Everything the output sink receives from one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub stats: SeriesStats,
    pub cycles: CycleSummary,
    pub trend: Vec<TrendPoint>,
    pub anomalies: Vec<AnomalyPoint>,
    pub daily_counts: DailyCounts,
    /// Stages that had too little data and returned empty results.
    pub warnings: Vec<AnalysisWarning>,
}

/// Runs the full pipeline with default options.
pub fn analyze(series: &Series) -> Result<AnalysisReport, AnalysisError> {
    analyze_with(series, &AnalysisOptions::default())
}

/// Runs stats, cycle segmentation, trend, anomaly detection and daily
/// aggregation, in that order.
///
/// An empty series aborts with `AnalysisError::EmptyInput` before any stage
/// runs. Stages with too little data contribute an empty result and a
/// warning instead of failing.
pub fn analyze_with(
    series: &Series,
    options: &AnalysisOptions,
) -> Result<AnalysisReport, AnalysisError> {
    let stats = SeriesStats::compute(series)?;
    let mut warnings = Vec::new();

    let cycles = segment_cycles(series);
    check_length(series, "cycles", CYCLE_MIN_READINGS, &mut warnings);

    let trend: Vec<TrendPoint> = trend(series).collect();
    check_length(series, "trend", TREND_WINDOW, &mut warnings);

    let anomalies = detect_anomalies(series);
    check_length(series, "anomalies", ANOMALY_WINDOW, &mut warnings);

    let daily_counts = daily_cycle_counts(&cycles.starts, &options.day_offset);

    for warning in &warnings {
        log::warn!(target: "analysis", "{}", warning);
    }
    log::debug!(
        target: "analysis",
        "{} readings: {} cycles, {} trend points, {} anomalies, {} days",
        stats.count,
        cycles.count,
        trend.len(),
        anomalies.len(),
        daily_counts.len()
    );

    Ok(AnalysisReport {
        stats,
        cycles,
        trend,
        anomalies,
        daily_counts,
        warnings,
    })
}

fn check_length(
    series: &Series,
    component: &'static str,
    required: usize,
    warnings: &mut Vec<AnalysisWarning>,
) {
    if series.len() < required {
        warnings.push(AnalysisWarning::InsufficientData {
            component,
            required,
            available: series.len(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeDelta, TimeZone};

    fn t(i: usize) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap() + TimeDelta::hours(i as i64)
    }

    fn series_of(values: &[f64]) -> Series {
        Series::from_pairs(values.iter().enumerate().map(|(i, v)| (t(i), *v)))
    }

    #[test]
    fn test_empty_series_aborts_run() {
        assert_eq!(analyze(&Series::default()), Err(AnalysisError::EmptyInput));
    }

    #[test]
    fn test_single_reading_warns_for_every_windowed_stage() {
        let report = analyze(&series_of(&[3.0])).unwrap();
        assert_eq!(report.stats.current, 3.0);
        assert_eq!(report.cycles.count, 0);
        assert!(report.trend.is_empty());
        assert!(report.anomalies.is_empty());
        assert!(report.daily_counts.is_empty());

        let components: Vec<&str> = report
            .warnings
            .iter()
            .map(|w| match w {
                AnalysisWarning::InsufficientData { component, .. } => *component,
            })
            .collect();
        assert_eq!(components, vec!["cycles", "trend", "anomalies"]);
    }

    #[test]
    fn test_long_series_has_no_warnings() {
        let values: Vec<f64> = (0..48).map(|i| (i % 6) as f64).collect();
        let report = analyze(&series_of(&values)).unwrap();
        assert!(report.warnings.is_empty());
        assert_eq!(report.trend.len(), 48 - TREND_WINDOW + 1);
    }

    #[test]
    fn test_daily_counts_come_from_cycle_starts() {
        // Pump kicks in every 6 hours across two days.
        let values: Vec<f64> = (0..48).map(|i| (i % 6) as f64).collect();
        let report = analyze(&series_of(&values)).unwrap();
        let total: usize = report.daily_counts.counts.iter().sum();
        assert_eq!(total, report.cycles.count);
        assert_eq!(report.daily_counts.len(), 2);
    }
}
