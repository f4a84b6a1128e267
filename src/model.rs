//! Core data types for the pump monitoring service.
//!
//! This module defines the shared domain model imported by all other modules:
//! the input series, the derived points produced by the analysis stages, and
//! the errors and warnings the core can report. It contains no I/O.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

// ---------------------------------------------------------------------------
// Input series
// ---------------------------------------------------------------------------

/// A single water-level measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Reading {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// An ordered sequence of readings, as handed over by the input adapter.
///
/// Row order is trusted: the series is never re-sorted, and timestamps are
/// expected (not checked) to be non-decreasing. An empty series can be
/// constructed; the analysis pipeline rejects it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Series {
    readings: Vec<Reading>,
}

impl Series {
    pub fn new(readings: Vec<Reading>) -> Self {
        Self { readings }
    }

    /// Builds a series from `(timestamp, value)` pairs, preserving order.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (DateTime<Utc>, f64)>,
    {
        pairs
            .into_iter()
            .map(|(timestamp, value)| Reading::new(timestamp, value))
            .collect()
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn last(&self) -> Option<&Reading> {
        self.readings.last()
    }

    /// Timestamp of the final reading, used to close a still-open cycle.
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.last().map(|r| r.timestamp)
    }

    /// The value sequence, in series order.
    pub fn values(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.readings.iter().map(|r| r.value)
    }
}

impl FromIterator<Reading> for Series {
    fn from_iter<T: IntoIterator<Item = Reading>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Derived points
// ---------------------------------------------------------------------------

/// One point of the moving-average trend line.
///
/// `timestamp` is always copied verbatim from the source reading at the end
/// of the averaging window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// A reading flagged as deviating from its local neighbourhood.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnomalyPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// A pump-on interval.
///
/// `end` is `None` when the pump was still running at the last reading; for
/// runtime purposes such a cycle lasts until the end of the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cycle {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

impl Cycle {
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Wall-clock length of the cycle; open cycles run until `series_end`.
    pub fn duration(&self, series_end: DateTime<Utc>) -> TimeDelta {
        self.end.unwrap_or(series_end) - self.start
    }
}

/// Number of cycle starts observed on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyBucket {
    pub day: NaiveDate,
    pub count: usize,
}

// ---------------------------------------------------------------------------
// Errors and warnings
// ---------------------------------------------------------------------------

/// Fatal conditions that abort an analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The series has zero readings; statistics are undefined.
    EmptyInput,
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::EmptyInput => write!(f, "Empty input: series contains no readings"),
        }
    }
}

impl std::error::Error for AnalysisError {}

/// Non-fatal conditions: a stage had too little data and produced an empty
/// result instead of failing the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisWarning {
    InsufficientData {
        component: &'static str,
        required: usize,
        available: usize,
    },
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisWarning::InsufficientData {
                component,
                required,
                available,
            } => write!(
                f,
                "Insufficient data for {}: needs {} readings, have {}",
                component, required, available
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Serialization helpers
// ---------------------------------------------------------------------------

/// Serializes a duration as whole milliseconds.
pub(crate) fn serialize_millis<S>(duration: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_i64(duration.num_milliseconds())
}

/// Rounds to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
