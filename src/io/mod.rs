//! File-facing collaborators: trade and points input, filter config, reports.
//!
//! Only this layer returns errors. Data problems inside rows are handled by
//! the engine; what fails here is opening, decoding or writing files.

pub mod config;
pub mod points_report;
pub mod report;
pub mod trades;

use std::path::PathBuf;
use thiserror::Error;

/// Errors from reading inputs or writing reports.
#[derive(Debug, Error)]
pub enum IoError {
    #[error("cannot access '{path}': {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, IoError>;

pub(crate) fn read_text(path: &std::path::Path) -> Result<String> {
    let content = std::fs::read_to_string(path).map_err(|source| IoError::File {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(content.trim_start_matches('\u{feff}').to_string())
}
