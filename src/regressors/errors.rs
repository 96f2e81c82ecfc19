//! regressors::errors — error type for the regressor pipeline.
//!
//! Purpose
//! -------
//! Provide [`RegressorError`] and the [`RegressorResult`] alias returned by
//! the pipeline entry points. Failures from the lower subtrees are wrapped
//! verbatim; pipeline-level conditions (alignment, lag bounds, timing) get
//! their own variants.
//!
//! Conventions
//! -----------
//! - Shift payloads are sample counts at the regressor frequency; lag
//!   bounds are in seconds.
//! - With `python-bindings`, wrapped errors keep the exception class of
//!   their own subtree and pipeline-level variants become `ValueError`.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::{io::IoError, signal::SignalError, stats::XCorrError};

pub type RegressorResult<T> = Result<T, RegressorError>;

/// Failure conditions for the regressor pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum RegressorError {
    Signal(SignalError),
    Io(IoError),
    XCorr(XCorrError),

    /// The bulk shift plus the functional length runs past the regressor.
    AlignmentOverflow { shift: usize, func_len: usize, regr_len: usize },

    /// Lag bounds must be finite with `lag_min <= 0 <= lag_max`.
    InvalidLagBounds { lag_max: f64, lag_min: f64 },

    /// The lag bounds cover no sample at the regressor frequency.
    EmptyLagBank { lag_max: f64, lag_min: f64 },

    /// Repetition time must be finite and > 0.
    InvalidRepetitionTime { value: f64 },
}

impl std::error::Error for RegressorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegressorError::Signal(err) => Some(err),
            RegressorError::Io(err) => Some(err),
            RegressorError::XCorr(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for RegressorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegressorError::Signal(err) => write!(f, "{err}"),
            RegressorError::Io(err) => write!(f, "{err}"),
            RegressorError::XCorr(err) => write!(f, "{err}"),
            RegressorError::AlignmentOverflow { shift, func_len, regr_len } => write!(
                f,
                "The identified optimal shift of {shift} samples removes too many samples to continue: {shift} + {func_len} > {regr_len}."
            ),
            RegressorError::InvalidLagBounds { lag_max, lag_min } => write!(
                f,
                "Invalid lag bounds: lag_min = {lag_min}, lag_max = {lag_max}. Must satisfy lag_min <= 0 <= lag_max."
            ),
            RegressorError::EmptyLagBank { lag_max, lag_min } => write!(
                f,
                "Lag bounds [{lag_min}, {lag_max}] s contain no sample at the regressor frequency."
            ),
            RegressorError::InvalidRepetitionTime { value } => {
                write!(f, "Repetition time must be finite and > 0; got: {value}")
            }
        }
    }
}

impl From<SignalError> for RegressorError {
    fn from(err: SignalError) -> Self {
        RegressorError::Signal(err)
    }
}

impl From<IoError> for RegressorError {
    fn from(err: IoError) -> Self {
        RegressorError::Io(err)
    }
}

impl From<XCorrError> for RegressorError {
    fn from(err: XCorrError) -> Self {
        RegressorError::XCorr(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<RegressorError> for PyErr {
    fn from(err: RegressorError) -> PyErr {
        match err {
            RegressorError::Signal(inner) => inner.into(),
            RegressorError::Io(inner) => inner.into(),
            RegressorError::XCorr(inner) => inner.into(),
            other => PyValueError::new_err(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // The alignment failure must quote the offending quantities.
    //
    // Given
    // -----
    // - shift 30, functional length 80, regressor length 100.
    //
    // Expect
    // ------
    // - "30 + 80 > 100" in the message.
    fn alignment_overflow_message_shows_arithmetic() {
        // Arrange
        let err = RegressorError::AlignmentOverflow { shift: 30, func_len: 80, regr_len: 100 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("30 + 80 > 100"), "Got: {msg}");
    }

    #[test]
    fn wrapped_errors_keep_their_message_and_source() {
        use std::error::Error;

        let inner = XCorrError::NoShifts;
        let err = RegressorError::from(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
        assert!(err.source().is_some());
    }
}
