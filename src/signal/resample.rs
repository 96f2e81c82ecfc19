//! signal::resample — move timeseries between sampling rates.
//!
//! Purpose
//! -------
//! Convert a timeseries sampled at one rate to another by linear
//! interpolation over its original sample positions, extrapolating at the
//! edges. This is what moves the functional average up to the regressor
//! rate before the bulk-shift search, and every lag window back down to the
//! functional rate afterwards.
//!
//! Key behaviors
//! -------------
//! - [`resample_signal_samples`] targets an explicit sample count: the
//!   output grid is `linspace(0, len - 1, samples)` over original positions
//!   `0..len`.
//! - [`resample_signal_freqs`] targets a frequency: original positions are
//!   re-expressed in seconds (`linspace(0, (len - 1) / freq1, len)`) and the
//!   output grid is `linspace(0, (len - 1) / freq1, resampled_len(..))`.
//! - [`resample_samples_along`] / [`resample_freqs_along`] apply the same
//!   mapping to every lane of a 2-D array along a chosen axis.
//!
//! Invariants & assumptions
//! ------------------------
//! - The output length of a frequency resample is exactly
//!   `floor((len - 1) / freq1 * freq2) + 1`, evaluated in that operation
//!   order. Window sizes in the bulk-shift search and the lag bank are
//!   derived from it, so [`resampled_len`] is the single place it is computed.
//! - Inputs must have at least two finite samples and frequencies must be
//!   finite and strictly positive.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the length formula, check that resampling is the
//!   identity when rates match, that a linear ramp is reproduced exactly
//!   and that an up/down round trip restores a smooth trend.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::signal::{
    errors::SignalResult,
    interp::{LinearInterpolator, linspace},
    validation::{validate_frequency, validate_series},
};

/// Number of samples produced when resampling `len` samples from `freq1` to `freq2`.
///
/// `floor((len - 1) / freq1 * freq2) + 1`. `len == 0` maps to 0.
pub fn resampled_len(len: usize, freq1: f64, freq2: f64) -> usize {
    if len == 0 {
        return 0;
    }
    let len_s = ((len - 1) as f64) / freq1;
    (len_s * freq2).floor() as usize + 1
}

/// Resample `ts` to exactly `samples` points.
///
/// Errors
/// ------
/// - `SignalError::EmptySeries`, `SignalError::TooShort` (fewer than two
///   samples) or `SignalError::NonFiniteData`.
pub fn resample_signal_samples(ts: ArrayView1<'_, f64>, samples: usize) -> SignalResult<Array1<f64>> {
    validate_series(ts, 2)?;
    let len = ts.len();
    let last = (len - 1) as f64;
    let time_t = linspace(0.0, last, len);
    let regr_t = linspace(0.0, last, samples);
    let interp = LinearInterpolator::new(time_t.to_vec(), ts.to_vec())?;
    Ok(interp.eval_many(regr_t.view()))
}

/// Resample `ts` from `freq1` Hz to `freq2` Hz.
///
/// Returns [`resampled_len`]`(ts.len(), freq1, freq2)` samples covering the
/// same physical duration as the input.
///
/// Errors
/// ------
/// - `SignalError::InvalidFrequency` for a non-positive or non-finite rate.
/// - The series errors of [`resample_signal_samples`].
pub fn resample_signal_freqs(
    ts: ArrayView1<'_, f64>, freq1: f64, freq2: f64,
) -> SignalResult<Array1<f64>> {
    validate_frequency(freq1)?;
    validate_frequency(freq2)?;
    validate_series(ts, 2)?;
    let len = ts.len();
    let len_s = ((len - 1) as f64) / freq1;
    let time_t = linspace(0.0, len_s, len);
    let regr_t = linspace(0.0, len_s, resampled_len(len, freq1, freq2));
    let interp = LinearInterpolator::new(time_t.to_vec(), ts.to_vec())?;
    Ok(interp.eval_many(regr_t.view()))
}

/// Resample every lane of `data` along `axis` to `samples` points.
///
/// With `axis = Axis(1)` each row is treated as a timeseries, which is the
/// layout of the lag bank.
pub fn resample_samples_along(
    data: ArrayView2<'_, f64>, samples: usize, axis: Axis,
) -> SignalResult<Array2<f64>> {
    let mut shape = [data.nrows(), data.ncols()];
    shape[axis.index()] = samples;
    let mut out = Array2::zeros(shape);
    for (lane, mut target) in data.lanes(axis).into_iter().zip(out.lanes_mut(axis)) {
        target.assign(&resample_signal_samples(lane, samples)?);
    }
    Ok(out)
}

/// Resample every lane of `data` along `axis` from `freq1` Hz to `freq2` Hz.
pub fn resample_freqs_along(
    data: ArrayView2<'_, f64>, freq1: f64, freq2: f64, axis: Axis,
) -> SignalResult<Array2<f64>> {
    let samples = resampled_len(data.len_of(axis), freq1, freq2);
    let mut shape = [data.nrows(), data.ncols()];
    shape[axis.index()] = samples;
    let mut out = Array2::zeros(shape);
    for (lane, mut target) in data.lanes(axis).into_iter().zip(out.lanes_mut(axis)) {
        target.assign(&resample_signal_freqs(lane, freq1, freq2)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::errors::SignalError;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The output-length formula of frequency resampling.
    // - Exactness on linear ramps, identity resampling and the up/down
    //   round trip on a smooth signal.
    // - Lane-wise resampling of 2-D arrays.
    //
    // They intentionally DO NOT cover:
    // - Interpolation bracketing details, which live in `signal::interp`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Pin the frequency-resample output length on the values the pipeline
    // actually uses (TR = 1.5 s to 40 Hz and back).
    //
    // Given
    // -----
    // - 100 functional samples at 1/1.5 Hz resampled to 40 Hz.
    // - 5941 samples at 40 Hz resampled to 1/1.5 Hz.
    //
    // Expect
    // ------
    // - floor(99 · 1.5 · 40) + 1 = 5941 and floor(5940 / 40 / 1.5) + 1 = 100.
    fn resampled_len_matches_floor_formula() {
        // Arrange
        let tr: f64 = 1.5;

        // Act
        let up = resampled_len(100, 1.0 / tr, 40.0);
        let down = resampled_len(5941, 40.0, 1.0 / tr);

        // Assert
        assert_eq!(up, 5941);
        assert_eq!(down, 100);
        assert_eq!(resampled_len(0, 1.0, 2.0), 0);
        assert_eq!(resampled_len(1, 1.0, 2.0), 1);
    }

    #[test]
    fn resample_freqs_output_length_agrees_with_formula() {
        let ts = Array1::from_iter((0..37).map(|i| (i as f64 * 0.3).sin()));
        let out = resample_signal_freqs(ts.view(), 2.0, 7.0).unwrap();
        assert_eq!(out.len(), resampled_len(37, 2.0, 7.0));
        assert_eq!(out.len(), 127);
    }

    #[test]
    // Purpose
    // -------
    // A linear ramp must be reproduced exactly (up to rounding) by a
    // linear resampler, including the extrapolated tail.
    //
    // Given
    // -----
    // - ramp[i] = 2·i + 1 for i in 0..10, resampled to 19 samples.
    //
    // Expect
    // ------
    // - out[j] = 2·(j/2) + 1, i.e. j + 1.
    fn resample_samples_reproduces_linear_ramp() {
        // Arrange
        let ramp = Array1::from_iter((0..10).map(|i| 2.0 * i as f64 + 1.0));

        // Act
        let out = resample_signal_samples(ramp.view(), 19).unwrap();

        // Assert
        assert_eq!(out.len(), 19);
        for (j, &v) in out.iter().enumerate() {
            assert_relative_eq!(v, j as f64 + 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn resample_samples_is_identity_for_same_length() {
        let ts = array![3.0, -1.0, 4.0, 1.5];
        let out = resample_signal_samples(ts.view(), 4).unwrap();
        assert_eq!(out, ts);
    }

    #[test]
    // Purpose
    // -------
    // Resampling up and back down must restore a smooth trend.
    //
    // Given
    // -----
    // - A slow sine sampled at 2 Hz (200 samples), taken to 40 Hz and back.
    //
    // Expect
    // ------
    // - Same length as the input and agreement within 1e-9.
    fn resample_round_trip_restores_trend() {
        // Arrange
        let ts = Array1::from_iter((0..200).map(|i| (i as f64 / 2.0 * 0.1).sin()));

        // Act
        let up = resample_signal_freqs(ts.view(), 2.0, 40.0).unwrap();
        let back = resample_signal_freqs(up.view(), 40.0, 2.0).unwrap();

        // Assert
        assert_eq!(back.len(), ts.len());
        for (a, b) in back.iter().zip(ts.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn resample_rejects_short_series_and_bad_frequencies() {
        let single = array![1.0];
        assert!(matches!(
            resample_signal_samples(single.view(), 4),
            Err(SignalError::TooShort { .. })
        ));
        let ts = array![1.0, 2.0];
        assert!(matches!(
            resample_signal_freqs(ts.view(), 0.0, 2.0),
            Err(SignalError::InvalidFrequency { .. })
        ));
    }

    #[test]
    fn resample_samples_along_rows_resamples_each_row() {
        let data = array![[0.0, 1.0, 2.0], [4.0, 4.0, 4.0]];
        let out = resample_samples_along(data.view(), 5, Axis(1)).unwrap();
        assert_eq!(out.dim(), (2, 5));
        assert_relative_eq!(out[[0, 1]], 0.5, epsilon = 1e-12);
        assert_relative_eq!(out[[1, 3]], 4.0, epsilon = 1e-12);

        let cols = resample_samples_along(data.view(), 3, Axis(0)).unwrap();
        assert_eq!(cols.dim(), (3, 3));
        assert_relative_eq!(cols[[1, 0]], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn resample_freqs_along_uses_formula_length() {
        let data = Array2::from_shape_fn((3, 11), |(r, c)| (r * c) as f64);
        let out = resample_freqs_along(data.view(), 1.0, 3.0, Axis(1)).unwrap();
        assert_eq!(out.dim(), (3, resampled_len(11, 1.0, 3.0)));
    }
}
