//! signal::interp — piecewise-linear interpolation with edge extrapolation.
//!
//! Purpose
//! -------
//! Provide the single interpolation primitive used by the resampler and the
//! end-tidal envelope: a linear interpolant over strictly increasing knots
//! that extrapolates beyond the first and last knot using the outermost
//! segments.
//!
//! Key behaviors
//! -------------
//! - Bracketing follows a left-sided binary search clipped to
//!   `[1, n - 1]`, so queries left of the first knot use segment `(0, 1)`
//!   and queries right of the last knot use segment `(n - 2, n - 1)`.
//! - A query that lands exactly on a knot returns the knot value without
//!   arithmetic, so interpolating at the knots reproduces the data
//!   bit-for-bit.
//! - [`linspace`] reproduces the `start + i · step` construction with the
//!   final sample pinned to `stop`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Knots are strictly increasing, finite, paired one value per position,
//!   and there are at least two of them; [`LinearInterpolator::new`] rejects
//!   anything else with a [`SignalError`].

use ndarray::{Array1, ArrayView1};

use crate::signal::errors::{SignalError, SignalResult};

/// Evenly spaced samples over `[start, stop]`, endpoint included.
///
/// `num == 0` yields an empty array and `num == 1` yields `[start]`.
pub fn linspace(start: f64, stop: f64, num: usize) -> Array1<f64> {
    match num {
        0 => Array1::zeros(0),
        1 => Array1::from_elem(1, start),
        _ => {
            let step = (stop - start) / ((num - 1) as f64);
            let mut out = Array1::from_iter((0..num).map(|i| (i as f64) * step + start));
            out[num - 1] = stop;
            out
        }
    }
}

/// Linear interpolant over strictly increasing knots `(x, y)`.
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl LinearInterpolator {
    /// Build an interpolant from knot positions and values.
    ///
    /// Errors
    /// ------
    /// - `SignalError::KnotLengthMismatch` when `x` and `y` differ in length.
    /// - `SignalError::TooShort` when fewer than two knots are given.
    /// - `SignalError::NonFiniteData` when a knot value or position is not
    ///   finite.
    /// - `SignalError::UnsortedKnots` when `x` is not strictly increasing.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> SignalResult<Self> {
        if x.len() != y.len() {
            return Err(SignalError::KnotLengthMismatch { positions: x.len(), values: y.len() });
        }
        if x.len() < 2 {
            return Err(SignalError::TooShort { len: x.len(), min: 2 });
        }
        for (index, (&xi, &yi)) in x.iter().zip(y.iter()).enumerate() {
            if !xi.is_finite() {
                return Err(SignalError::NonFiniteData { index, value: xi });
            }
            if !yi.is_finite() {
                return Err(SignalError::NonFiniteData { index, value: yi });
            }
        }
        if let Some(offset) = x.windows(2).position(|w| w[0] >= w[1]) {
            return Err(SignalError::UnsortedKnots { index: offset + 1 });
        }
        Ok(LinearInterpolator { x, y })
    }

    /// Interpolated (or extrapolated) value at `query`.
    pub fn eval(&self, query: f64) -> f64 {
        let n = self.x.len();
        let idx = self.x.partition_point(|&knot| knot < query);
        if idx < n && self.x[idx] == query {
            return self.y[idx];
        }
        let hi = idx.clamp(1, n - 1);
        let lo = hi - 1;
        let slope = (self.y[hi] - self.y[lo]) / (self.x[hi] - self.x[lo]);
        slope * (query - self.x[lo]) + self.y[lo]
    }

    /// Evaluate at every query position.
    pub fn eval_many(&self, queries: ArrayView1<'_, f64>) -> Array1<f64> {
        queries.mapv(|q| self.eval(q))
    }
}
