//! Core errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors reading or writing the progress file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error on the progress file.
    #[error("progress file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The progress file exists but is not a valid record list.
    #[error("progress file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors reading the candidate CSV.
#[derive(Debug, Error)]
pub enum InputError {
    /// Input file missing or unreadable.
    #[error("cannot open input {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Header row lacks a required column.
    #[error("input {path} has no '{column}' column")]
    MissingColumn { path: PathBuf, column: &'static str },

    /// A row could not be parsed.
    #[error("input {path}, line {line}: {message}")]
    Malformed {
        path: PathBuf,
        line: u64,
        message: String,
    },
}
