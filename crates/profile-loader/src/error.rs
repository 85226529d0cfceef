//! Error types for the profile-loader crate.
//!
//! Only structural problems are errors here: a file that cannot be opened,
//! a CSV the reader rejects, a JSON document that is not a list of profiles.
//! Individual cells that are blank or malformed are data, not errors; they
//! load as `CellValue::Missing` or as text and are dealt with downstream.

use thiserror::Error;

/// Errors that can occur while reading or writing profile tables
#[derive(Error, Debug)]
pub enum LoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading or writing a file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The CSV reader or writer rejected the input
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// The JSON document could not be parsed or serialized
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File extension is not one we know how to read
    #[error("Unsupported file format: {path} (expected .csv or .json)")]
    UnsupportedFormat { path: String },

    /// The document parsed but does not have the expected shape
    #[error("Invalid structure in {file}: {reason}")]
    InvalidStructure { file: String, reason: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, LoadError>;
