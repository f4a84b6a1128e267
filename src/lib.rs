//! Water-level analytics for a pumped well or sump.
//!
//! The crate turns a time-ordered series of level readings into operational
//! signals: summary statistics, pump cycles and runtime, a moving-average
//! trend, locally anomalous readings, and per-day cycle counts.
//!
//! - `model`    — shared types and errors.
//! - `analysis` — the pure `analyze(series)` pipeline.
//! - `ingest`   — input adapter for delimited text exports.
//! - `report`   — output sink (text summary or JSON).
//! - `config`   — TOML / environment configuration.
//! - `logging`  — the service's `log` backend.

pub mod analysis;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod report;

pub use analysis::{AnalysisOptions, AnalysisReport, analyze, analyze_with};
pub use model::{AnalysisError, Reading, Series};
