//! Pump cycle segmentation.
//!
//! A pump raising the level shows up as a step increase between consecutive
//! readings. The segmenter walks the per-step deltas with a two-state machine:
//!
//! ```text
//!   IDLE    --(delta >  START_DELTA)--> PUMPING   start = t[i-1], count += 1
//!   PUMPING --(delta <= STOP_DELTA)---> IDLE      runtime += t[i-1] - start
//! ```
//!
//! Deltas in `(STOP_DELTA, START_DELTA]` cause no transition in either state.
//! A cycle still running after the last step is closed at the final
//! timestamp.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::model::{Cycle, Series, serialize_millis};

/// Minimum rise between two readings that counts as a pump activation.
pub const START_DELTA: f64 = 0.5;

/// A step at or below this value ends a running cycle.
pub const STOP_DELTA: f64 = 0.0;

/// Output of cycle segmentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleSummary {
    /// Number of pump-on transitions.
    pub count: usize,
    /// Total on-time across all cycles, including a trailing open cycle.
    #[serde(rename = "total_runtime_ms", serialize_with = "serialize_millis")]
    pub total_runtime: TimeDelta,
    /// Start instant of every cycle, in detection order.
    pub starts: Vec<DateTime<Utc>>,
    pub cycles: Vec<Cycle>,
}

impl CycleSummary {
    fn empty() -> Self {
        CycleSummary {
            count: 0,
            total_runtime: TimeDelta::zero(),
            starts: Vec::new(),
            cycles: Vec::new(),
        }
    }

    /// Runtime in fractional hours, the unit the dashboard reports.
    pub fn runtime_hours(&self) -> f64 {
        self.total_runtime.num_milliseconds() as f64 / 1000.0 / 3600.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PumpState {
    Idle,
    Pumping { start: DateTime<Utc> },
}

/// Runs the pump-on/pump-off state machine over `series`.
///
/// Series shorter than two readings have no deltas and yield zero cycles.
pub fn segment_cycles(series: &Series) -> CycleSummary {
    let readings = series.readings();
    let Some(series_end) = series.end_time() else {
        return CycleSummary::empty();
    };

    let mut summary = CycleSummary::empty();
    let mut state = PumpState::Idle;

    for pair in readings.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        let delta = curr.value - prev.value;

        state = match state {
            PumpState::Idle if delta > START_DELTA => {
                summary.count += 1;
                summary.starts.push(prev.timestamp);
                PumpState::Pumping { start: prev.timestamp }
            }
            PumpState::Pumping { start } if delta <= STOP_DELTA => {
                let cycle = Cycle {
                    start,
                    end: Some(prev.timestamp),
                };
                summary.total_runtime += cycle.duration(series_end);
                summary.cycles.push(cycle);
                PumpState::Idle
            }
            unchanged => unchanged,
        };
    }

    if let PumpState::Pumping { start } = state {
        let cycle = Cycle { start, end: None };
        summary.total_runtime += cycle.duration(series_end);
        summary.cycles.push(cycle);
    }

    summary
}
