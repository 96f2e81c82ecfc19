//! signal::validation — shared input guards for signal routines.
//!
//! Purpose
//! -------
//! Centralize the checks every signal routine needs before doing index
//! arithmetic: dimensionality, minimum length, finiteness and positive
//! sampling frequencies. Routines call these at their entry points and can
//! then assume well-formed inputs.
//!
//! Testing notes
//! -------------
//! - Unit tests cover each error branch and the squeeze behavior for
//!   column/row vectors.

use ndarray::{Array1, ArrayView1, ArrayViewD, Axis};

use crate::signal::errors::{SignalError, SignalResult};

/// Collapse singleton axes and return the remaining 1-D signal.
///
/// Parameters
/// ----------
/// - `data`: `ArrayViewD<f64>`
///   Signal of any dimensionality. Axes of length 1 are removed, so
///   `(n,)`, `(n, 1)` and `(1, n, 1)` all become `(n,)`. A 0-d scalar
///   becomes a single-sample series.
///
/// Returns
/// -------
/// `SignalResult<Array1<f64>>`
///   - `Ok(series)` when at most one non-singleton axis remains.
///   - `Err(SignalError::InvalidShape { shape })` otherwise, with `shape`
///     the original shape.
pub fn squeeze_to_1d(data: ArrayViewD<'_, f64>) -> SignalResult<Array1<f64>> {
    let shape = data.shape().to_vec();
    let mut view = data;
    let mut axis = 0;
    while axis < view.ndim() {
        if view.len_of(Axis(axis)) == 1 && view.ndim() > 1 {
            view = view.index_axis_move(Axis(axis), 0);
        } else {
            axis += 1;
        }
    }
    match view.ndim() {
        0 => Ok(Array1::from_elem(1, view.iter().copied().next().unwrap_or(f64::NAN))),
        1 => Ok(view.iter().copied().collect()),
        _ => Err(SignalError::InvalidShape { shape }),
    }
}

/// Require at least `min_len` samples, all finite.
pub fn validate_series(data: ArrayView1<'_, f64>, min_len: usize) -> SignalResult<()> {
    if data.is_empty() {
        return Err(SignalError::EmptySeries);
    }
    if data.len() < min_len {
        return Err(SignalError::TooShort { len: data.len(), min: min_len });
    }
    for (index, &value) in data.iter().enumerate() {
        if !value.is_finite() {
            return Err(SignalError::NonFiniteData { index, value });
        }
    }
    Ok(())
}

/// Require a finite, strictly positive sampling frequency.
pub fn validate_frequency(freq: f64) -> SignalResult<()> {
    if !freq.is_finite() || freq <= 0.0 {
        return Err(SignalError::InvalidFrequency { value: freq });
    }
    Ok(())
}
