//! Input adapter: turns delimited text exports into a `Series`.
//!
//! Submodules:
//! - `delimited` — row parsing (header skip, timestamp and value fields).
//! - `source`    — reads the raw text from a local path or an HTTP(S) URL.
//!
//! Malformed input is rejected here; the analysis core only ever sees a
//! well-formed series.

pub mod delimited;
pub mod source;

use std::fmt;

use crate::model::Series;

pub use delimited::{InputOptions, parse_series};
pub use source::load_text;

/// Errors raised while acquiring or parsing the input series.
#[derive(Debug)]
pub enum AdapterError {
    /// The source file could not be read.
    Io { path: String, source: std::io::Error },
    /// Non-2xx HTTP response when fetching a remote source.
    Http(u16),
    /// The HTTP request itself failed (DNS, TLS, timeout, body read).
    Request(String),
    /// A data row could not be parsed. `line` is 1-based in the source text.
    MalformedRow { line: usize, reason: String },
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterError::Io { path, source } => write!(f, "Failed to read {}: {}", path, source),
            AdapterError::Http(code) => write!(f, "HTTP error: {}", code),
            AdapterError::Request(msg) => write!(f, "Request failed: {}", msg),
            AdapterError::MalformedRow { line, reason } => {
                write!(f, "Malformed row at line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for AdapterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AdapterError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Reads `source` and parses it into a series.
pub fn load_series(source: &str, options: &InputOptions) -> Result<Series, AdapterError> {
    let text = load_text(source)?;
    let series = parse_series(&text, options)?;
    crate::logging::log_ingest_summary(source, series.len());
    Ok(series)
}
