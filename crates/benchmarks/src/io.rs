//! I/O operations for simulator result files.
//!
//! This module reads the JSON documents the simulator writes and derives
//! where rendered artefacts go.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extension of rendered chart files.
pub const CHART_EXTENSION: &str = "svg";

/// Errors that can occur while reading result files.
#[derive(Debug, Error)]
pub enum IoError {
    /// The file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON.
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, IoError>;

/// Read a results file as a raw JSON document.
pub fn read_results_json(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| IoError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Derive the chart path for an input file: `<dir>/<stem>.<suffix>.svg`.
///
/// `dir` defaults to the input file's own directory.
pub fn output_path(input: &Path, suffix: &str, dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "results".to_string());
    let dir = dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(format!("{stem}.{suffix}.{CHART_EXTENSION}"))
}
