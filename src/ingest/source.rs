//! Raw text acquisition for the input adapter.
//!
//! A source is either a local file path or an `http://` / `https://` URL.
//! Remote exports are fetched with a blocking client; the analysis is a batch
//! job and has nothing to do until the whole file is available.

use std::time::Duration;

use super::AdapterError;

const HTTP_TIMEOUT_SECS: u64 = 30;

/// Returns `true` if `source` should be fetched over HTTP.
pub fn is_remote(source: &str) -> bool {
    let lower = source.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Reads the full text of `source`.
pub fn load_text(source: &str) -> Result<String, AdapterError> {
    if is_remote(source) {
        fetch_remote(source)
    } else {
        std::fs::read_to_string(source).map_err(|e| AdapterError::Io {
            path: source.to_string(),
            source: e,
        })
    }
}

fn fetch_remote(url: &str) -> Result<String, AdapterError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .map_err(|e| AdapterError::Request(e.to_string()))?;

    log::info!(target: "ingest", "Fetching {}", url);

    let response = client
        .get(url)
        .header("Accept", "text/csv, text/plain")
        .send()
        .map_err(|e| AdapterError::Request(e.to_string()))?;

    if !response.status().is_success() {
        return Err(AdapterError::Http(response.status().as_u16()));
    }

    response
        .text()
        .map_err(|e| AdapterError::Request(e.to_string()))
}
