//! signal::response — response-kernel specification and resolution.
//!
//! Purpose
//! -------
//! Describe which kernel a regressor should be convolved with and turn that
//! description into a concrete numeric array exactly once, before any
//! convolution happens.
//!
//! Key behaviors
//! -------------
//! - [`ResponseFunction`] is a tagged union over the accepted kernel
//!   specifications: skip (`None`), the internal canonical HRF, a named
//!   physiological kernel, a file path, or literal samples.
//! - [`ResponseFunction::parse`] maps user strings onto the union: an
//!   existing path wins, then the case-insensitive names `none`, `hrf`,
//!   `rrf`, `crf`, `icrf`; anything else is `UnsupportedKernel`.
//! - Named kernels are delegated to an injected [`ResponseProvider`]. When
//!   no provider is available, resolution fails with `MissingDependency`
//!   rather than a generic error.
//! - [`StandardResponses`] is a ready-made provider implementing the
//!   respiration (Birn et al., 2008) and cardiac (Chang et al., 2009)
//!   response functions.
//!
//! Invariants & assumptions
//! ------------------------
//! - [`resolve_response`] returns `Ok(None)` only for
//!   [`ResponseFunction::None`]; every other `Ok` carries a non-empty,
//!   all-finite kernel.
//!
//! Testing notes
//! -------------
//! - Unit tests cover string parsing, every resolution branch (including
//!   the missing-provider and missing-file failures) and the shape of the
//!   standard RRF/CRF kernels.

use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use ndarray::Array1;

use crate::{
    diagnostics::DiagnosticSink,
    io,
    signal::{
        errors::{SignalError, SignalResult},
        hrf::create_hrf,
        validation::validate_frequency,
    },
};

/// Physiological kernels supplied by a [`ResponseProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedResponse {
    /// Respiration response function.
    Rrf,
    /// Cardiac response function.
    Crf,
    /// Inverse cardiac response function.
    Icrf,
}

impl NamedResponse {
    pub fn label(&self) -> &'static str {
        match self {
            NamedResponse::Rrf => "RRF",
            NamedResponse::Crf => "CRF",
            NamedResponse::Icrf => "iCRF",
        }
    }
}

/// Kernel specification for [`convolve_signal`](crate::signal::convolve::convolve_signal).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResponseFunction {
    /// Skip the convolution.
    None,
    /// Internally generated canonical HRF.
    #[default]
    Hrf,
    /// Kernel resolved by a [`ResponseProvider`].
    Named(NamedResponse),
    /// Numeric kernel stored in a text file.
    Path(PathBuf),
    /// Kernel samples given directly.
    Literal(Vec<f64>),
}

impl ResponseFunction {
    /// Interpret a user-supplied kernel string.
    ///
    /// An existing filesystem path takes precedence over the names, so a
    /// file called `hrf` in the working directory is loaded as a kernel.
    ///
    /// Errors
    /// ------
    /// - `SignalError::UnsupportedKernel` when `spec` is neither an
    ///   existing path nor a known name.
    pub fn parse(spec: &str) -> SignalResult<Self> {
        if Path::new(spec).exists() {
            return Ok(ResponseFunction::Path(PathBuf::from(spec)));
        }
        match spec.to_lowercase().as_str() {
            "none" => Ok(ResponseFunction::None),
            "hrf" => Ok(ResponseFunction::Hrf),
            "rrf" => Ok(ResponseFunction::Named(NamedResponse::Rrf)),
            "crf" => Ok(ResponseFunction::Named(NamedResponse::Crf)),
            "icrf" => Ok(ResponseFunction::Named(NamedResponse::Icrf)),
            _ => Err(SignalError::UnsupportedKernel { spec: spec.to_string() }),
        }
    }

    /// `true` for the variant that skips convolution.
    pub fn is_none(&self) -> bool {
        matches!(self, ResponseFunction::None)
    }
}

/// Capability that supplies named physiological response kernels.
pub trait ResponseProvider {
    /// Kernel for `kind`, sampled every `dt` seconds.
    fn response(&self, kind: NamedResponse, dt: f64) -> SignalResult<Array1<f64>>;
}

/// Built-in respiration and cardiac response functions.
///
/// - RRF: `0.6 t^2.1 e^{-t/1.6} − 0.0023 t^3.54 e^{-t/4.25}` over `[0, 50)` s.
/// - CRF: `0.6 t^2.7 e^{-t/1.6} − 16 N(t − 12; 0, 3)` over `[0, 32)` s.
/// - iCRF: the negated CRF.
///
/// Each kernel is divided by its maximum absolute value.
#[derive(Debug, Clone, Copy)]
pub struct StandardResponses {
    pub rrf_length_s: f64,
    pub crf_length_s: f64,
}

impl Default for StandardResponses {
    fn default() -> Self {
        StandardResponses { rrf_length_s: 50.0, crf_length_s: 32.0 }
    }
}

impl StandardResponses {
    fn sample(length_s: f64, dt: f64, f: impl Fn(f64) -> f64) -> Array1<f64> {
        let n = (length_s / dt).ceil() as usize;
        let mut kernel = Array1::from_iter((0..n).map(|i| f(i as f64 * dt)));
        let peak = kernel.iter().fold(0.0_f64, |acc, &v| acc.max(v.abs()));
        if peak > 0.0 {
            kernel.mapv_inplace(|v| v / peak);
        }
        kernel
    }

    fn rrf(t: f64) -> f64 {
        0.6 * t.powf(2.1) * (-t / 1.6).exp() - 0.0023 * t.powf(3.54) * (-t / 4.25).exp()
    }

    fn crf(t: f64) -> f64 {
        let sigma = 3.0;
        let gauss = (-(t - 12.0).powi(2) / (2.0 * sigma * sigma)).exp() / (sigma * (2.0 * PI).sqrt());
        0.6 * t.powf(2.7) * (-t / 1.6).exp() - 16.0 * gauss
    }
}

impl ResponseProvider for StandardResponses {
    fn response(&self, kind: NamedResponse, dt: f64) -> SignalResult<Array1<f64>> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SignalError::InvalidFrequency { value: 1.0 / dt });
        }
        Ok(match kind {
            NamedResponse::Rrf => Self::sample(self.rrf_length_s, dt, Self::rrf),
            NamedResponse::Crf => Self::sample(self.crf_length_s, dt, Self::crf),
            NamedResponse::Icrf => -Self::sample(self.crf_length_s, dt, Self::crf),
        })
    }
}

fn validate_kernel(values: Vec<f64>) -> SignalResult<Array1<f64>> {
    if values.is_empty() {
        return Err(SignalError::EmptyKernel);
    }
    if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(SignalError::NonNumericKernel { index, value });
    }
    Ok(Array1::from(values))
}

/// Resolve `response` into kernel samples at `freq` Hz.
///
/// Resolution order: literal samples, skip, canonical HRF, named kernel via
/// `provider`, file path.
///
/// Returns
/// -------
/// - `Ok(None)` for [`ResponseFunction::None`] (caller skips convolution).
/// - `Ok(Some(kernel))` otherwise.
///
/// Errors
/// ------
/// - `NonNumericKernel` / `EmptyKernel` for bad literal or loaded samples.
/// - `MissingDependency` for a named kernel when `provider` is `None`.
/// - `KernelNotFound` when the path does not exist; `KernelLoad` when it
///   exists but is not a 1-D numeric file.
/// - `InvalidFrequency` for a bad `freq`.
pub fn resolve_response(
    response: &ResponseFunction, freq: f64, provider: Option<&dyn ResponseProvider>,
    sink: &mut dyn DiagnosticSink,
) -> SignalResult<Option<Array1<f64>>> {
    validate_frequency(freq)?;
    match response {
        ResponseFunction::Literal(values) => validate_kernel(values.clone()).map(Some),
        ResponseFunction::None => Ok(None),
        ResponseFunction::Hrf => create_hrf(freq).map(Some),
        ResponseFunction::Named(kind) => {
            let provider =
                provider.ok_or(SignalError::MissingDependency { kernel: kind.label() })?;
            let kernel = provider.response(*kind, 1.0 / freq)?;
            validate_kernel(kernel.to_vec()).map(Some)
        }
        ResponseFunction::Path(path) => {
            if !path.exists() {
                return Err(SignalError::KernelNotFound { path: path.display().to_string() });
            }
            sink.debug(format!("{} is a valid file", path.display()));
            let values = io::load_array(path).map_err(|err| SignalError::KernelLoad {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?;
            validate_kernel(values.to_vec()).map(Some)
        }
    }
}
