//! Summary statistics over a whole series.

use serde::Serialize;

use crate::model::{AnalysisError, Series, round2};

/// Whole-series reductions, kept at full precision.
///
/// `mean` and `current` are displayed rounded to two decimals by the output
/// sink; use `mean_display` / `current_display` for that and never feed the
/// rounded values back into a computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStats {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Value of the last reading.
    pub current: f64,
}

impl SeriesStats {
    /// Computes the summary statistics, failing on an empty series.
    pub fn compute(series: &Series) -> Result<Self, AnalysisError> {
        let current = series.last().ok_or(AnalysisError::EmptyInput)?.value;

        let count = series.len();
        let sum: f64 = series.values().sum();
        let min = series.values().fold(f64::INFINITY, f64::min);
        let max = series.values().fold(f64::NEG_INFINITY, f64::max);

        Ok(SeriesStats {
            count,
            sum,
            mean: sum / count as f64,
            min,
            max,
            current,
        })
    }

    pub fn mean_display(&self) -> f64 {
        round2(self.mean)
    }

    pub fn current_display(&self) -> f64 {
        round2(self.current)
    }
}
