//! stats::xcorr — sliding Pearson cross-correlation.
//!
//! Purpose
//! -------
//! Find where a (shorter) functional signal best matches a (longer)
//! regressor by sliding it along the regressor one sample at a time and
//! computing the Pearson correlation of each overlapping window.
//!
//! Key behaviors
//! -------------
//! - Window `i` is `regr[i + offset .. i + offset + func.len()]`, for
//!   `i in 0..n_shifts`.
//! - `n_shifts` defaults to every admissible position,
//!   `regr.len() − func.len() − offset + 1`. A larger explicit request is
//!   clamped to that value and reported as a warning diagnostic.
//! - Windows with zero variance produce `NaN` in the curve and are never
//!   selected. Ties resolve to the first (smallest) index.
//! - With `abs_xcorr`, the arg-max is taken over `|r|` but the reported
//!   peak keeps its sign, so anti-correlation is visible to the caller.
//!
//! Invariants & assumptions
//! ------------------------
//! - The returned index is relative to `offset`: the best window starts at
//!   `regr[index + offset]`.
//! - `curve.len()` equals the (possibly clamped) number of shifts.
//!
//! Testing notes
//! -------------
//! - Unit tests recover a known embedding position, check the signed peak
//!   under `abs_xcorr`, the tie rule, clamping and the degenerate cases.

use ndarray::{Array1, ArrayView1};

use crate::{
    diagnostics::DiagnosticSink,
    stats::errors::{XCorrError, XCorrResult},
};

/// Outcome of [`x_corr`].
#[derive(Debug, Clone, PartialEq)]
pub struct XCorr {
    /// Correlation at the selected shift (signed).
    pub peak: f64,
    /// Selected shift, in samples after `offset`.
    pub index: usize,
    /// Correlation for every evaluated shift; `NaN` where undefined.
    pub curve: Array1<f64>,
}

fn check_finite(data: ArrayView1<'_, f64>) -> XCorrResult<()> {
    match data.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        Some((index, &value)) => Err(XCorrError::NonFiniteData { index, value }),
        None => Ok(()),
    }
}

/// Centred copy of `data` and the Euclidean norm of the centred values.
fn centre(data: ArrayView1<'_, f64>) -> (Array1<f64>, f64) {
    let mean = data.sum() / data.len() as f64;
    let centred = data.mapv(|v| v - mean);
    let norm = centred.dot(&centred).sqrt();
    (centred, norm)
}

/// Cross-correlate `func` against sliding windows of `regr`.
///
/// Parameters
/// ----------
/// - `func`: `ArrayView1<f64>`
///   Functional signal (already at the regressor's rate).
/// - `regr`: `ArrayView1<f64>`
///   Regressor to slide along.
/// - `n_shifts`: `Option<usize>`
///   Number of candidate shifts; `None` for every admissible one.
/// - `offset`: `usize`
///   Start position in `regr` of shift 0.
/// - `abs_xcorr`: `bool`
///   Select by absolute correlation.
/// - `sink`: `&mut dyn DiagnosticSink`
///   Receives the clamping warning.
///
/// Errors
/// ------
/// - `XCorrError::TooShort` when `func` has fewer than 2 samples.
/// - `XCorrError::FunctionalTooLong` when `func.len() + offset > regr.len()`.
/// - `XCorrError::NoShifts` for `n_shifts == Some(0)`.
/// - `XCorrError::NonFiniteData` for NaN/±inf inputs.
/// - `XCorrError::DegenerateCorrelation` when no shift yields a finite value.
pub fn x_corr(
    func: ArrayView1<'_, f64>, regr: ArrayView1<'_, f64>, n_shifts: Option<usize>, offset: usize,
    abs_xcorr: bool, sink: &mut dyn DiagnosticSink,
) -> XCorrResult<XCorr> {
    let n = func.len();
    if n < 2 {
        return Err(XCorrError::TooShort { len: n });
    }
    if n + offset > regr.len() {
        return Err(XCorrError::FunctionalTooLong {
            func_len: n,
            offset,
            regr_len: regr.len(),
        });
    }
    check_finite(func)?;
    check_finite(regr)?;

    let max_shifts = regr.len() - n - offset + 1;
    let n_shifts = match n_shifts {
        Some(0) => return Err(XCorrError::NoShifts),
        Some(requested) if requested > max_shifts => {
            sink.warn(format!(
                "Requested {requested} shifts but only {max_shifts} fit in the regressor; using {max_shifts}."
            ));
            max_shifts
        }
        Some(requested) => requested,
        None => max_shifts,
    };

    let (func_c, func_norm) = centre(func);
    let mut curve = Array1::from_elem(n_shifts, f64::NAN);
    if func_norm > 0.0 {
        for (i, r) in curve.iter_mut().enumerate() {
            let start = i + offset;
            let (window_c, window_norm) = centre(regr.slice(ndarray::s![start..start + n]));
            if window_norm > 0.0 {
                *r = func_c.dot(&window_c) / (func_norm * window_norm);
            }
        }
    }

    let score = |r: f64| if abs_xcorr { r.abs() } else { r };
    let mut best: Option<usize> = None;
    for (i, &r) in curve.iter().enumerate() {
        if !r.is_finite() {
            continue;
        }
        match best {
            Some(b) if score(r) <= score(curve[b]) => {}
            _ => best = Some(i),
        }
    }

    let index = best.ok_or(XCorrError::DegenerateCorrelation { n_shifts })?;
    Ok(XCorr { peak: curve[index], index, curve })
}
