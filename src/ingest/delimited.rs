//! Delimited-text parsing for water-level exports.
//!
//! The expected layout is one header row followed by `timestamp;value` rows:
//!
//! ```text
//! Timestamp;Level
//! 2024-05-01 00:00:00;3.42
//! 2024-05-01 00:15:00;3.44
//! ```
//!
//! Extra trailing fields are ignored. Blank lines are skipped. Any row whose
//! timestamp or value cannot be parsed fails the whole load.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};

use super::AdapterError;
use crate::model::{Reading, Series};

/// Naive layouts tried in order when a timestamp carries no offset.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// How to read a delimited export.
#[derive(Debug, Clone, PartialEq)]
pub struct InputOptions {
    pub delimiter: char,
    /// Skip exactly one header row (the first non-blank line).
    pub has_header: bool,
    /// Custom chrono format for naive timestamps, tried before the defaults.
    pub timestamp_format: Option<String>,
    /// Offset applied to timestamps that carry none.
    pub naive_offset: FixedOffset,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            delimiter: ';',
            has_header: true,
            timestamp_format: None,
            naive_offset: Utc.fix(),
        }
    }
}

/// Parses delimited text into a series, preserving row order.
///
/// Only a header yields an empty series; the analysis core rejects that.
pub fn parse_series(text: &str, options: &InputOptions) -> Result<Series, AdapterError> {
    let mut readings: Vec<Reading> = Vec::new();
    let mut header_pending = options.has_header;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        // The header is the first non-blank line.
        if header_pending {
            header_pending = false;
            continue;
        }

        let mut fields = line.split(options.delimiter);
        let ts_field = fields.next().unwrap_or_default().trim();
        let value_field = fields
            .next()
            .ok_or_else(|| malformed(line_no, format!("expected 2 fields separated by '{}'", options.delimiter)))?
            .trim();

        let timestamp = parse_timestamp(ts_field, options)
            .ok_or_else(|| malformed(line_no, format!("unparseable timestamp '{}'", ts_field)))?;
        let value = parse_value(value_field)
            .ok_or_else(|| malformed(line_no, format!("unparseable value '{}'", value_field)))?;

        if let Some(prev) = readings.last().map(|r| r.timestamp) {
            if timestamp < prev {
                log::warn!(
                    target: "ingest",
                    "line {}: timestamp {} precedes previous reading {}; keeping source order",
                    line_no,
                    timestamp,
                    prev
                );
            }
        }

        readings.push(Reading::new(timestamp, value));
    }

    Ok(Series::new(readings))
}

fn malformed(line: usize, reason: String) -> AdapterError {
    AdapterError::MalformedRow { line, reason }
}

/// Parses a timestamp field into UTC.
///
/// RFC 3339 strings keep their own offset; naive date-times and bare dates
/// (taken as midnight) are placed at `options.naive_offset`.
pub fn parse_timestamp(field: &str, options: &InputOptions) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(field) {
        return Some(dt.with_timezone(&Utc));
    }

    let custom = options.timestamp_format.as_deref();
    let naive = custom
        .into_iter()
        .chain(NAIVE_FORMATS.iter().copied())
        .find_map(|fmt| NaiveDateTime::parse_from_str(field, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(field, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    naive
        .and_local_timezone(options.naive_offset)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_value(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn opts() -> InputOptions {
        InputOptions::default()
    }

    // --- Happy path ---------------------------------------------------------

    #[test]
    fn test_header_is_skipped_and_order_kept() {
        let text = "Timestamp;Level\n\
                    2024-05-01 00:30:00;3.5\n\
                    2024-05-01 00:00:00;3.25\n";
        let series = parse_series(text, &opts()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.readings()[0].value, 3.5);
        assert_eq!(
            series.readings()[1].timestamp,
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_blank_lines_and_surrounding_whitespace_ignored() {
        let text = "\n\nTimestamp;Level\n2024-05-01T01:00;1.0\n\n  2024-05-01T02:00 ; 2.0 \n\n";
        let series = parse_series(text, &opts()).unwrap();
        let values: Vec<f64> = series.values().collect();
        assert_eq!(values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_header_only_gives_empty_series() {
        let series = parse_series("Timestamp;Level\n", &opts()).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_no_header_option_keeps_first_row() {
        let options = InputOptions {
            has_header: false,
            delimiter: ',',
            ..opts()
        };
        let series = parse_series("2024-05-01 00:00:00,1.5,extra\n", &options).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.readings()[0].value, 1.5);
    }

    // --- Timestamps ---------------------------------------------------------

    #[test]
    fn test_rfc3339_keeps_its_own_offset() {
        let options = InputOptions {
            naive_offset: FixedOffset::east_opt(3600).unwrap(),
            ..opts()
        };
        let ts = parse_timestamp("2024-05-01T08:00:00-05:00", &options).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap());
    }

    #[test]
    fn test_naive_timestamp_uses_configured_offset() {
        let options = InputOptions {
            naive_offset: FixedOffset::west_opt(6 * 3600).unwrap(),
            ..opts()
        };
        let ts = parse_timestamp("2024-05-01 07:00:00", &options).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap());
    }

    #[test]
    fn test_date_only_and_custom_format() {
        let midnight = parse_timestamp("2024-05-01", &opts()).unwrap();
        assert_eq!(midnight, Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());

        let options = InputOptions {
            timestamp_format: Some("%m/%d/%Y %H:%M".to_string()),
            ..opts()
        };
        let ts = parse_timestamp("05/01/2024 14:45", &options).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 5, 1, 14, 45, 0).unwrap());
    }

    // --- Rejection ----------------------------------------------------------

    #[test]
    fn test_bad_value_reports_line_number() {
        let text = "Timestamp;Level\n2024-05-01 00:00:00;1.0\n2024-05-01 00:15:00;abc\n";
        match parse_series(text, &opts()) {
            Err(AdapterError::MalformedRow { line, reason }) => {
                assert_eq!(line, 3);
                assert!(reason.contains("abc"), "reason was: {}", reason);
            }
            other => panic!("expected MalformedRow, got {:?}", other),
        }
    }

    #[test]
    fn test_line_numbers_count_leading_blank_lines() {
        let text = "\n\nTimestamp;Level\n2024-05-01 00:00:00;abc\n";
        assert!(matches!(
            parse_series(text, &opts()),
            Err(AdapterError::MalformedRow { line: 4, .. })
        ));

        let crlf = "\r\nTimestamp;Level\r\n2024-05-01 00:00:00;1.0\r\n\r\nbad;1.0\r\n";
        assert!(matches!(
            parse_series(crlf, &opts()),
            Err(AdapterError::MalformedRow { line: 5, .. })
        ));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        for bad in ["NaN", "inf", "-inf"] {
            let text = format!("h\n2024-05-01 00:00:00;{}\n", bad);
            assert!(
                matches!(parse_series(&text, &opts()), Err(AdapterError::MalformedRow { .. })),
                "'{}' should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_bad_timestamp_and_missing_field_rejected() {
        let bad_ts = "h\nyesterday;1.0\n";
        assert!(matches!(
            parse_series(bad_ts, &opts()),
            Err(AdapterError::MalformedRow { line: 2, .. })
        ));

        let missing = "h\n2024-05-01 00:00:00\n";
        assert!(matches!(
            parse_series(missing, &opts()),
            Err(AdapterError::MalformedRow { line: 2, .. })
        ));
    }
}
