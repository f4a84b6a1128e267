//! Per-day pump cycle counts.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;

use crate::model::DailyBucket;

/// Cycle-start counts per calendar day, as parallel sequences.
///
/// Days appear in the order they were first encountered while scanning the
/// cycle starts; `counts[j]` belongs to `days[j]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DailyCounts {
    pub days: Vec<NaiveDate>,
    pub counts: Vec<usize>,
}

impl DailyCounts {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn buckets(&self) -> impl ExactSizeIterator<Item = DailyBucket> + '_ {
        self.days
            .iter()
            .zip(&self.counts)
            .map(|(&day, &count)| DailyBucket { day, count })
    }
}

/// Groups cycle starts by calendar day in the given UTC offset.
pub fn daily_cycle_counts(starts: &[DateTime<Utc>], offset: &FixedOffset) -> DailyCounts {
    let mut result = DailyCounts::default();
    let mut slot: HashMap<NaiveDate, usize> = HashMap::new();

    for start in starts {
        let day = start.with_timezone(offset).date_naive();
        match slot.get(&day) {
            Some(&j) => result.counts[j] += 1,
            None => {
                slot.insert(day, result.days.len());
                result.days.push(day);
                result.counts.push(1);
            }
        }
    }

    result
}
