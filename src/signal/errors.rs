//! signal::errors — error type for resampling, envelope and convolution code.
//!
//! Purpose
//! -------
//! Provide [`SignalError`] and the [`SignalResult`] alias used by every
//! routine in the `signal` subtree. Kernel-resolution failures are split
//! into distinct variants so that callers can tell a missing optional
//! provider apart from a bad kernel specification.
//!
//! Conventions
//! -----------
//! - Indices in payloads are 0-based.
//! - Messages describe the violated constraint, not the code path.
//! - With `python-bindings`, [`SignalError::MissingDependency`] maps to
//!   `ImportError`, [`SignalError::KernelNotFound`] to `OSError`, and all
//!   other variants to `ValueError`.

#[cfg(feature = "python-bindings")]
use pyo3::{
    PyErr,
    exceptions::{PyImportError, PyOSError, PyValueError},
};
use statrs::distribution::GammaError;

pub type SignalResult<T> = Result<T, SignalError>;

/// Failure conditions for the `signal` subtree.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalError {
    // ---- Input/data validation ----
    /// Input has more than one non-singleton dimension.
    InvalidShape { shape: Vec<usize> },

    /// Input series is empty.
    EmptySeries,

    /// Input series has fewer samples than the routine needs.
    TooShort { len: usize, min: usize },

    /// A sample is NaN/±inf.
    NonFiniteData { index: usize, value: f64 },

    /// Sampling frequency must be finite and > 0.
    InvalidFrequency { value: f64 },

    // ---- Interpolation ----
    /// Knot positions and knot values differ in length.
    KnotLengthMismatch { positions: usize, values: usize },

    /// Knot position at `index` does not exceed the previous one.
    UnsortedKnots { index: usize },

    // ---- Envelope ----
    /// Fewer than two distinct peaks after deduplication.
    InsufficientPeaks { found: usize },

    /// Peak index does not address a sample of the trace.
    PeakOutOfRange { index: usize, len: usize },

    // ---- Response kernels ----
    /// Kernel specification is neither a known name, an existing path, nor numeric.
    UnsupportedKernel { spec: String },

    /// A named kernel was requested but no provider was supplied.
    MissingDependency { kernel: &'static str },

    /// Kernel path does not exist.
    KernelNotFound { path: String },

    /// Literal kernel contains a non-numeric (non-finite) entry.
    NonNumericKernel { index: usize, value: f64 },

    /// Literal or loaded kernel has no samples.
    EmptyKernel,

    /// Kernel file exists but could not be read as a 1-D numeric array.
    KernelLoad { path: String, reason: String },

    /// Gamma density construction rejected its parameters.
    GammaParam { reason: String },

    /// Convolution mode is not one of `full`, `same`, `valid`.
    UnsupportedMode { mode: String },

    // ---- Band-pass filter ----
    /// Cut-offs must satisfy `0 < lowcut < highcut < nyquist`.
    InvalidBand { lowcut: f64, highcut: f64, nyquist: f64 },

    /// Butterworth order must be at least 1.
    InvalidFilterOrder { order: usize },

    /// Filter design did not produce second-order sections.
    FilterDesign { reason: String },
}

impl std::error::Error for SignalError {}

impl std::fmt::Display for SignalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalError::InvalidShape { shape } => {
                write!(
                    f,
                    "Only 1-D signals are supported; got shape {shape:?} after squeezing singleton axes."
                )
            }
            SignalError::EmptySeries => write!(f, "Input series is empty."),
            SignalError::TooShort { len, min } => {
                write!(f, "Input series has {len} samples; at least {min} are required.")
            }
            SignalError::NonFiniteData { index, value } => {
                write!(f, "Sample at index {index} is non-finite: {value}")
            }
            SignalError::InvalidFrequency { value } => {
                write!(f, "Sampling frequency must be finite and > 0; got: {value}")
            }
            SignalError::KnotLengthMismatch { positions, values } => {
                write!(
                    f,
                    "Interpolation needs one value per knot; got {positions} positions and {values} values."
                )
            }
            SignalError::UnsortedKnots { index } => {
                write!(f, "Knot positions must be strictly increasing; knot {index} is not.")
            }
            SignalError::InsufficientPeaks { found } => {
                write!(
                    f,
                    "End-tidal interpolation needs at least 2 distinct peaks; got {found}."
                )
            }
            SignalError::PeakOutOfRange { index, len } => {
                write!(f, "Peak index {index} is out of range for a trace of {len} samples.")
            }
            SignalError::UnsupportedKernel { spec } => {
                write!(
                    f,
                    "Response function \"{spec}\" is not supported yet or file was not found."
                )
            }
            SignalError::MissingDependency { kernel } => {
                write!(
                    f,
                    "A response provider is required for the use of {kernel} response functions; none was supplied."
                )
            }
            SignalError::KernelNotFound { path } => write!(f, "{path} not found in system."),
            SignalError::NonNumericKernel { index, value } => {
                write!(
                    f,
                    "Provided response function is not numeric: entry {index} is {value}."
                )
            }
            SignalError::EmptyKernel => write!(f, "Provided response function has no samples."),
            SignalError::KernelLoad { path, reason } => {
                write!(f, "Could not load response function from {path}: {reason}")
            }
            SignalError::GammaParam { reason } => {
                write!(f, "Invalid gamma density parameters: {reason}")
            }
            SignalError::UnsupportedMode { mode } => {
                write!(f, "Convolution mode \"{mode}\" is not one of full, same, valid.")
            }
            SignalError::InvalidBand { lowcut, highcut, nyquist } => {
                write!(
                    f,
                    "Band-pass cut-offs must satisfy 0 < lowcut < highcut < {nyquist} Hz (Nyquist); got lowcut = {lowcut}, highcut = {highcut}."
                )
            }
            SignalError::InvalidFilterOrder { order } => {
                write!(f, "Butterworth order must be >= 1; got: {order}")
            }
            SignalError::FilterDesign { reason } => {
                write!(f, "Band-pass design failed: {reason}")
            }
        }
    }
}

impl From<GammaError> for SignalError {
    fn from(err: GammaError) -> SignalError {
        SignalError::GammaParam { reason: format!("{err:?}") }
    }
}

#[cfg(feature = "python-bindings")]
impl From<SignalError> for PyErr {
    fn from(err: SignalError) -> PyErr {
        match err {
            SignalError::MissingDependency { .. } => PyImportError::new_err(err.to_string()),
            SignalError::KernelNotFound { .. } => PyOSError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}
