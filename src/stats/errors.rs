//! stats::errors — error type for the cross-correlation search.
//!
//! With `python-bindings`, every variant maps to `ValueError` with the
//! `Display` message preserved.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type XCorrResult<T> = Result<T, XCorrError>;

/// Failure conditions for [`x_corr`](crate::stats::xcorr::x_corr).
///
/// Variants
/// --------
/// - `FunctionalTooLong`
///   The functional signal plus the offset does not fit inside the
///   regressor, so not even one window can be compared.
/// - `TooShort`
///   The functional signal has fewer than two samples; a Pearson
///   correlation is undefined.
/// - `NoShifts`
///   Zero candidate shifts were requested.
/// - `DegenerateCorrelation`
///   Every candidate window (or the functional signal itself) has zero
///   variance, so no finite correlation exists.
/// - `NonFiniteData`
///   An input sample is NaN/±inf.
#[derive(Debug, Clone, PartialEq)]
pub enum XCorrError {
    FunctionalTooLong { func_len: usize, offset: usize, regr_len: usize },
    TooShort { len: usize },
    NoShifts,
    DegenerateCorrelation { n_shifts: usize },
    NonFiniteData { index: usize, value: f64 },
}

impl std::error::Error for XCorrError {}

impl std::fmt::Display for XCorrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            XCorrError::FunctionalTooLong { func_len, offset, regr_len } => write!(
                f,
                "Functional signal ({func_len} samples) starting at offset {offset} does not fit in a regressor of {regr_len} samples."
            ),
            XCorrError::TooShort { len } => {
                write!(f, "Cross-correlation needs at least 2 functional samples; got {len}.")
            }
            XCorrError::NoShifts => write!(f, "Number of shifts must be at least 1."),
            XCorrError::DegenerateCorrelation { n_shifts } => write!(
                f,
                "No finite correlation across {n_shifts} shifts; the signals have zero variance."
            ),
            XCorrError::NonFiniteData { index, value } => {
                write!(f, "Sample at index {index} is non-finite: {value}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<XCorrError> for PyErr {
    fn from(err: XCorrError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn functional_too_long_reports_all_lengths() {
        let msg = XCorrError::FunctionalTooLong { func_len: 120, offset: 5, regr_len: 100 }
            .to_string();
        assert!(msg.contains("120") && msg.contains('5') && msg.contains("100"), "Got: {msg}");
    }
}
