//! Service configuration.
//!
//! Settings come from three layers, later ones winning:
//!   1. a TOML file (`pumpmon.toml`, or the path in `PUMPMON_CONFIG`),
//!   2. environment variables (after loading `.env`),
//!   3. command-line flags (applied by `main`).
//!
//! Every field has a default, so an empty file is a valid configuration.
//! Window sizes and the anomaly threshold are fixed in the analysis module
//! and deliberately absent here.
//!
//! Example:
//!
//! ```toml
//! [input]
//! source = "data/RawData.csv"
//! delimiter = ";"
//! utc_offset_minutes = -300
//!
//! [analysis]
//! utc_offset_minutes = -300
//!
//! [logging]
//! level = "info"
//! file = "pumpmon.log"
//!
//! [output]
//! format = "summary"
//! unit = "ft"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use log::LevelFilter;
use serde::Deserialize;

use crate::analysis::AnalysisOptions;
use crate::ingest::InputOptions;
use crate::logging::parse_level;
use crate::report::OutputFormat;

/// Config file used when neither `--config` nor `PUMPMON_CONFIG` is given.
pub const DEFAULT_CONFIG_PATH: &str = "pumpmon.toml";

pub const ENV_CONFIG: &str = "PUMPMON_CONFIG";
pub const ENV_INPUT: &str = "PUMPMON_INPUT";

// ---------------------------------------------------------------------------
// File layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub input: InputConfig,
    pub analysis: AnalysisConfig,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// File path or HTTP(S) URL of the delimited export.
    pub source: String,
    pub delimiter: String,
    pub has_header: bool,
    pub timestamp_format: Option<String>,
    /// Offset of timestamps that carry none, in minutes east of UTC.
    pub utc_offset_minutes: i32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            source: "RawData.csv".to_string(),
            delimiter: ";".to_string(),
            has_header: true,
            timestamp_format: None,
            utc_offset_minutes: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Offset used to assign cycle starts to calendar days, in minutes east
    /// of UTC.
    pub utc_offset_minutes: i32,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            timestamps: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Unit label printed after level values.
    pub unit: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Summary,
            unit: "ft".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "Failed to read config {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "Failed to parse config {}: {}", path.display(), source)
            }
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Invalid(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Reads and parses a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Loads the config for a run.
    ///
    /// An explicitly requested file (flag or `PUMPMON_CONFIG`) must exist.
    /// The default `pumpmon.toml` is optional; without it, defaults apply.
    /// `PUMPMON_INPUT` overrides `input.source`.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let requested = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(ENV_CONFIG).map(PathBuf::from));

        let mut config = match requested {
            Some(path) => Self::load(&path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::load(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        if let Ok(source) = std::env::var(ENV_INPUT) {
            if !source.trim().is_empty() {
                config.input.source = source;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks the values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.input_options()?;
        self.analysis_options()?;
        self.log_level()?;
        if self.input.source.trim().is_empty() {
            return Err(ConfigError::Invalid("input.source must not be empty".to_string()));
        }
        Ok(())
    }

    // --- Conversions into component options --------------------------------

    pub fn input_options(&self) -> Result<InputOptions, ConfigError> {
        let mut chars = self.input.delimiter.chars();
        let delimiter = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "input.delimiter must be a single character, got '{}'",
                    self.input.delimiter
                )));
            }
        };

        Ok(InputOptions {
            delimiter,
            has_header: self.input.has_header,
            timestamp_format: self.input.timestamp_format.clone(),
            naive_offset: offset_from_minutes("input.utc_offset_minutes", self.input.utc_offset_minutes)?,
        })
    }

    pub fn analysis_options(&self) -> Result<AnalysisOptions, ConfigError> {
        Ok(AnalysisOptions {
            day_offset: offset_from_minutes(
                "analysis.utc_offset_minutes",
                self.analysis.utc_offset_minutes,
            )?,
        })
    }

    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        parse_level(&self.logging.level).ok_or_else(|| {
            ConfigError::Invalid(format!("unknown logging.level '{}'", self.logging.level))
        })
    }
}

fn offset_from_minutes(field: &str, minutes: i32) -> Result<FixedOffset, ConfigError> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| ConfigError::Invalid(format!("{} out of range: {}", field, minutes)))
}
