//! Logging for the pump monitoring service.
//!
//! Components log through the `log` facade under a target naming the stage
//! (`ingest`, `analysis`, `report`). `init_logger` installs the service's own
//! backend, which writes to the console and optionally appends to a file.

use chrono::Utc;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Level parsing
// ---------------------------------------------------------------------------

/// Parses a level name as used in config files and on the command line.
/// Accepts `warning` as an alias for `warn`.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    match name.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Logger
// ---------------------------------------------------------------------------

pub struct Logger {
    /// Minimum log level to display
    min_level: LevelFilter,
    /// Optional file path for logging
    log_file: Option<PathBuf>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    pub fn new(min_level: LevelFilter, log_file: Option<PathBuf>, console_timestamps: bool) -> Self {
        Logger {
            min_level,
            log_file,
            console_timestamps,
        }
    }

    /// Full log line as written to the log file.
    fn format_entry(record: &Record<'_>) -> String {
        format!(
            "{} {} {}: {}",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
            record.level(),
            record.target(),
            record.args()
        )
    }

    /// Line written to stderr for one record.
    fn console_line(&self, record: &Record<'_>, entry: &str) -> String {
        if self.console_timestamps {
            return entry.to_string();
        }
        match record.level() {
            Level::Error => format!("   ✗ {}: {}", record.target(), record.args()),
            Level::Warn => format!("   ⚠ {}: {}", record.target(), record.args()),
            Level::Info => format!("   {}", record.args()),
            Level::Debug | Level::Trace => format!("   [DEBUG] {}", record.args()),
        }
    }

    fn append_to_file(path: &Path, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.min_level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let entry = Self::format_entry(record);
        // stdout belongs to the rendered report.
        eprintln!("{}", self.console_line(record, &entry));

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &entry) {
                eprintln!("Failed to write to log file {}: {}", path.display(), e);
            }
        }
    }

    fn flush(&self) {}
}

/// Installs the global logger. Fails if a logger is already installed.
pub fn init_logger(
    min_level: LevelFilter,
    log_file: Option<PathBuf>,
    console_timestamps: bool,
) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(Logger::new(min_level, log_file, console_timestamps)))?;
    log::set_max_level(min_level);
    Ok(())
}

// ---------------------------------------------------------------------------
// Summary logging
// ---------------------------------------------------------------------------

/// Log the outcome of loading one input source.
pub fn log_ingest_summary(source: &str, readings: usize) {
    if readings == 0 {
        log::warn!(target: "ingest", "Loaded {}: no data rows", source);
    } else {
        log::info!(target: "ingest", "Loaded {}: {} readings", source, readings);
    }
}
