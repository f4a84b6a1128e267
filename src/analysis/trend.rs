//! Moving-average trend line.

use crate::model::{Reading, Series, TrendPoint};

/// Look-back window of the trend line, in readings.
pub const TREND_WINDOW: usize = 7;

/// Trailing moving average of `readings` over `window` values.
///
/// The point at index `i` averages `values[i - window + 1 ..= i]` and carries
/// `timestamp[i]`; indices without a full look-back produce nothing, so the
/// sequence has `len - window + 1` points (or none). The iterator is lazy and
/// holds no state beyond the borrowed slice: clone it or call again to
/// restart.
pub fn moving_average(
    readings: &[Reading],
    window: usize,
) -> impl ExactSizeIterator<Item = TrendPoint> + Clone + '_ {
    // A zero window has no meaningful average; `windows(0)` would panic.
    let slice = if window == 0 { &readings[..0] } else { readings };
    slice.windows(window.max(1)).map(move |w| TrendPoint {
        timestamp: w[w.len() - 1].timestamp,
        value: w.iter().map(|r| r.value).sum::<f64>() / w.len() as f64,
    })
}

/// The 7-point trend line of a series.
pub fn trend(series: &Series) -> impl ExactSizeIterator<Item = TrendPoint> + Clone + '_ {
    moving_average(series.readings(), TREND_WINDOW)
}
