//! io::errors — failures while reading or writing numeric text artifacts.
//!
//! Purpose
//! -------
//! Provide [`IoError`] and the [`IoResult`] alias for the text loaders and
//! the artifact writers. Payloads carry the path and, where known, the
//! 1-based line number so messages point at the offending input.
//!
//! Conventions
//! -----------
//! - Underlying `std::io` and `csv` errors are flattened into their message
//!   strings so that [`IoError`] stays `Clone + PartialEq` like the other
//!   error enums of the crate.
//! - With `python-bindings`, every variant maps to `OSError` except
//!   [`IoError::Parse`] and [`IoError::Signal`], which are `ValueError`s.

use std::path::Path;

#[cfg(feature = "python-bindings")]
use pyo3::{
    PyErr,
    exceptions::{PyOSError, PyValueError},
};

use crate::signal::errors::SignalError;

pub type IoResult<T> = Result<T, IoError>;

/// Failure conditions for the `io` subtree.
#[derive(Debug, Clone, PartialEq)]
pub enum IoError {
    /// Filesystem error (open, create, write).
    Io { path: String, reason: String },

    /// The csv reader/writer rejected the data.
    Csv { path: String, reason: String },

    /// A field could not be parsed as a floating-point number.
    Parse { path: String, line: u64, field: String },

    /// The file contains no numeric values.
    EmptyFile { path: String },

    /// A 1-D array was requested but the file holds a full matrix.
    NotOneDimensional { path: String, rows: usize, cols: usize },

    /// Rows of a matrix file have different lengths.
    RaggedRows { path: String, line: u64, expected: usize, found: usize },

    /// Resampling a regressor before export failed.
    Signal(SignalError),
}

impl IoError {
    pub(crate) fn io(path: &Path, err: std::io::Error) -> Self {
        IoError::Io { path: path.display().to_string(), reason: err.to_string() }
    }

    pub(crate) fn csv(path: &Path, err: csv::Error) -> Self {
        IoError::Csv { path: path.display().to_string(), reason: err.to_string() }
    }
}

impl From<SignalError> for IoError {
    fn from(err: SignalError) -> Self {
        IoError::Signal(err)
    }
}

impl std::error::Error for IoError {}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoError::Io { path, reason } => write!(f, "I/O error on {path}: {reason}"),
            IoError::Csv { path, reason } => write!(f, "Malformed text data in {path}: {reason}"),
            IoError::Parse { path, line, field } => {
                write!(f, "{path}:{line}: \"{field}\" is not a number.")
            }
            IoError::EmptyFile { path } => write!(f, "{path} contains no numeric values."),
            IoError::NotOneDimensional { path, rows, cols } => {
                write!(f, "{path} holds a {rows}x{cols} matrix; a 1-D array was expected.")
            }
            IoError::RaggedRows { path, line, expected, found } => {
                write!(f, "{path}:{line}: expected {expected} values per row, found {found}.")
            }
            IoError::Signal(err) => write!(f, "Could not prepare regressor for export: {err}"),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<IoError> for PyErr {
    fn from(err: IoError) -> PyErr {
        match err {
            IoError::Parse { .. } | IoError::Signal(_) => PyValueError::new_err(err.to_string()),
            _ => PyOSError::new_err(err.to_string()),
        }
    }
}
