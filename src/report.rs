//! Output sink: renders an `AnalysisReport` for people or for other tools.
//!
//! The analysis core never formats anything; unit labels, display rounding
//! and date strings are all decided here.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisReport;

/// Rendering strategy chosen by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Dashboard-style stat cards plus daily and anomaly tables.
    #[default]
    Summary,
    /// The full report as pretty-printed JSON.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summary" => Ok(OutputFormat::Summary),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}' (expected summary or json)", other)),
        }
    }
}

impl OutputFormat {
    pub fn render(self, report: &AnalysisReport, unit: &str) -> Result<String, serde_json::Error> {
        match self {
            OutputFormat::Summary => Ok(render_summary(report, unit)),
            OutputFormat::Json => render_json(report),
        }
    }
}

/// Serializes the whole report. Timestamps are RFC 3339, runtime is in
/// milliseconds.
pub fn render_json(report: &AnalysisReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Renders the stat cards and tables as plain text.
pub fn render_summary(report: &AnalysisReport, unit: &str) -> String {
    let stats = &report.stats;
    let mut out = String::new();

    // Stat cards
    let _ = writeln!(out, "Current Level: {:.2} {}", stats.current_display(), unit);
    let _ = writeln!(out, "Average Level: {:.2} {}", stats.mean_display(), unit);
    let _ = writeln!(out, "Max Level: {:.2} {}", stats.max, unit);
    let _ = writeln!(out, "Min Level: {:.2} {}", stats.min, unit);
    let _ = writeln!(out, "Pump Cycles: {}", report.cycles.count);
    let _ = writeln!(out, "Pump Runtime: {:.2} hrs", report.cycles.runtime_hours());
    if report.cycles.cycles.last().is_some_and(|c| c.is_open()) {
        out.push_str("   pump still running at end of series\n");
    }

    out.push('\n');
    out.push_str("Daily Pump Cycles:\n");
    if report.daily_counts.is_empty() {
        out.push_str("   no data\n");
    } else {
        for bucket in report.daily_counts.buckets() {
            let _ = writeln!(out, "   {}  {}", bucket.day.format("%Y-%m-%d"), bucket.count);
        }
    }

    out.push('\n');
    let _ = writeln!(out, "Trend Points (7-pt MA): {}", report.trend.len());
    if let Some(last) = report.trend.last() {
        let _ = writeln!(
            out,
            "   latest {:.2} {} at {}",
            last.value,
            unit,
            last.timestamp.format("%Y-%m-%d %H:%M")
        );
    } else {
        out.push_str("   no data\n");
    }

    out.push('\n');
    let _ = writeln!(out, "Anomalies: {}", report.anomalies.len());
    for point in &report.anomalies {
        let _ = writeln!(
            out,
            "   {}  {:.2} {}",
            point.timestamp.format("%Y-%m-%d %H:%M"),
            point.value,
            unit
        );
    }

    if !report.warnings.is_empty() {
        out.push('\n');
        out.push_str("Warnings:\n");
        for warning in &report.warnings {
            let _ = writeln!(out, "   ⚠ {}", warning);
        }
    }

    out
}
