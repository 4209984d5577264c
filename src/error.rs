use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading a dashboard blob from disk.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("unsupported file format: .{0}")]
    UnsupportedFormat(String),
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid dashboard JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("cannot read spreadsheet: {0}")]
    Spreadsheet(String),
    #[error("no data found after the header row")]
    Empty,
}

/// Failures while reading a settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read settings {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
