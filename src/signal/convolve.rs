//! signal::convolve — discrete convolution with a response kernel.
//!
//! Purpose
//! -------
//! Convolve a 1-D trace with a resolved response kernel and map the result
//! back onto the amplitude range of the input trace, producing e.g.
//! PetCO2hrf from PetCO2.
//!
//! Key behaviors
//! -------------
//! - [`convolve`] is a direct discrete convolution with three output
//!   extents: `Full` (`n + m − 1`), `Same` (`max(n, m)`, centred) and
//!   `Valid` (`max(n, m) − min(n, m) + 1`).
//! - [`convolve_signal`] resolves the kernel through
//!   [`resolve_response`], convolves, then rescales the result linearly so
//!   its minimum and maximum land on the input's minimum and maximum.
//! - A `ResponseFunction::None` kernel returns the input untouched, tagged
//!   as [`Convolution::Skipped`].
//!
//! Invariants & assumptions
//! ------------------------
//! - The `Same` window starts at `(min(n, m) − 1) / 2` of the full output,
//!   and `Valid` keeps the samples where the shorter operand fully overlaps
//!   the longer one. Both hold regardless of which operand is longer.
//! - A convolution with zero range (flat output) rescales to the input's
//!   maximum everywhere.
//!
//! Conventions
//! -----------
//! - Convolution is O(n·m); kernels are at most a few thousand samples.

use ndarray::{Array1, ArrayView1, ArrayViewD};

use crate::{
    diagnostics::DiagnosticSink,
    signal::{
        errors::{SignalError, SignalResult},
        response::{ResponseFunction, ResponseProvider, resolve_response},
        validation::{squeeze_to_1d, validate_series},
    },
};

/// Output extent of [`convolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvolveMode {
    #[default]
    Full,
    Same,
    Valid,
}

impl std::str::FromStr for ConvolveMode {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(ConvolveMode::Full),
            "same" => Ok(ConvolveMode::Same),
            "valid" => Ok(ConvolveMode::Valid),
            _ => Err(SignalError::UnsupportedMode { mode: s.to_string() }),
        }
    }
}

/// Result of [`convolve_signal`].
#[derive(Debug, Clone, PartialEq)]
pub enum Convolution {
    /// No kernel was requested; the squeezed input is returned unchanged.
    Skipped(Array1<f64>),
    /// Convolved and rescaled signal.
    Applied(Array1<f64>),
}

impl Convolution {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Convolution::Skipped(_))
    }

    pub fn as_array(&self) -> &Array1<f64> {
        match self {
            Convolution::Skipped(a) | Convolution::Applied(a) => a,
        }
    }

    pub fn into_inner(self) -> Array1<f64> {
        match self {
            Convolution::Skipped(a) | Convolution::Applied(a) => a,
        }
    }
}

/// Discrete convolution of `signal` with `kernel`.
///
/// Empty operands produce an empty output.
pub fn convolve(
    signal: ArrayView1<'_, f64>, kernel: ArrayView1<'_, f64>, mode: ConvolveMode,
) -> Array1<f64> {
    let (n, m) = (signal.len(), kernel.len());
    if n == 0 || m == 0 {
        return Array1::zeros(0);
    }

    let mut full = Array1::<f64>::zeros(n + m - 1);
    for (i, &s) in signal.iter().enumerate() {
        if s == 0.0 {
            continue;
        }
        for (j, &k) in kernel.iter().enumerate() {
            full[i + j] += s * k;
        }
    }

    let (long, short) = (n.max(m), n.min(m));
    let (start, len) = match mode {
        ConvolveMode::Full => return full,
        ConvolveMode::Same => ((short - 1) / 2, long),
        ConvolveMode::Valid => (short - 1, long - short + 1),
    };
    full.slice_move(ndarray::s![start..start + len])
}

/// Linearly map `values` from their own range onto `[lo, hi]`.
fn rescale_into(values: &mut Array1<f64>, lo: f64, hi: f64) {
    let cmin = values.iter().copied().fold(f64::INFINITY, f64::min);
    let cmax = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = cmax - cmin;
    if span > 0.0 {
        values.mapv_inplace(|v| lo + (v - cmin) * (hi - lo) / span);
    } else {
        values.fill(hi);
    }
}

/// Convolve `signal` with the kernel described by `response`.
///
/// Parameters
/// ----------
/// - `signal`: `ArrayViewD<f64>`
///   Trace to convolve; length-1 axes are squeezed away.
/// - `freq`: `f64`
///   Sampling frequency of `signal` (and of the kernel) in Hz.
/// - `response`: `&ResponseFunction`
///   Kernel specification, resolved once by [`resolve_response`].
/// - `mode`: [`ConvolveMode`]
/// - `provider`: `Option<&dyn ResponseProvider>`
///   Source of named kernels; `None` makes named kernels fail with
///   `MissingDependency`.
/// - `sink`: `&mut dyn DiagnosticSink`
///
/// Returns
/// -------
/// [`Convolution::Skipped`] with the squeezed input for
/// `ResponseFunction::None`, otherwise [`Convolution::Applied`] with the
/// convolved signal rescaled into `[signal.min(), signal.max()]`.
///
/// Errors
/// ------
/// - Shape and series errors from squeezing/validation.
/// - Every kernel-resolution error of [`resolve_response`].
pub fn convolve_signal(
    signal: ArrayViewD<'_, f64>, freq: f64, response: &ResponseFunction, mode: ConvolveMode,
    provider: Option<&dyn ResponseProvider>, sink: &mut dyn DiagnosticSink,
) -> SignalResult<Convolution> {
    let signal = squeeze_to_1d(signal)?;
    validate_series(signal.view(), 1)?;

    let Some(kernel) = resolve_response(response, freq, provider, sink)? else {
        sink.info("Skipping convolution with response function".to_string());
        return Ok(Convolution::Skipped(signal));
    };

    let smin = signal.iter().copied().fold(f64::INFINITY, f64::min);
    let smax = signal.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut convolved = convolve(signal.view(), kernel.view(), mode);
    rescale_into(&mut convolved, smin, smax);
    Ok(Convolution::Applied(convolved))
}
