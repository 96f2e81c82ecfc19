//! regressors::lag_bank — dense bank of finely lagged regressors.
//!
//! Purpose
//! -------
//! Around the bulk shift, produce one regressor per integer sample lag at
//! the regressor frequency, each cut to the functional signal's duration
//! and brought back to its native timepoint count, for per-voxel lag
//! optimisation downstream.
//!
//! Key behaviors
//! -------------
//! - Lag limits convert to sample counts as
//!   `neg_shifts = round(|lag_min| · freq)` and
//!   `pos_shifts = round(lag_max · freq) + 1` (`+ 0` in legacy mode, which
//!   excludes the positive limit).
//! - Row `k` is the window `regr[bulk + neg_shifts − 1 − k ..]` of the
//!   upsampled functional length, so rows step back one sample at a time
//!   from `bulk + neg_shifts − 1` down to `bulk − pos_shifts`. A positive
//!   lag takes the regressor from earlier, i.e. models a later response.
//!   Row `neg_shifts − 1` is exactly the bulk-shifted regressor; row `k`
//!   has lag `k + 1 − neg_shifts` samples.
//! - The regressor is padded with its own mean on either side by exactly
//!   the amount the extreme windows need, so no window is truncated.
//! - Every row is resampled to the functional timepoint count and
//!   demeaned.
//!
//! Invariants & assumptions
//! ------------------------
//! - `regressors.nrows() == neg_shifts + pos_shifts`, which is
//!   `2 · round(lag_max · freq) + 1` for symmetric non-legacy bounds and
//!   `2 · round(lag_max · freq)` in legacy mode.
//! - `regressors.ncols()` equals the functional timepoint count.
//! - Lags run from `−(neg_shifts − 1)` to `pos_shifts` samples; the bank is
//!   one sample later than a range centred on the bulk shift.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the row-count formulas, the centre-row identity, the
//!   one-sample step between rows and mean padding at both edges.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, s};

use crate::{
    io::prepare_regressor,
    regressors::{
        errors::{RegressorError, RegressorResult},
        options::LagBounds,
    },
};

/// Lagged regressors around a bulk shift.
#[derive(Debug, Clone, PartialEq)]
pub struct LagBank {
    /// One demeaned regressor per row, ordered from most negative to most
    /// positive lag.
    pub regressors: Array2<f64>,
    pub neg_shifts: usize,
    pub pos_shifts: usize,
    /// Bulk shift the lags are relative to, in samples at `freq`.
    pub bulk_shift: usize,
    pub freq: f64,
}

impl LagBank {
    pub fn n_lags(&self) -> usize {
        self.regressors.nrows()
    }

    /// Lag of `row` relative to the bulk shift, in samples at `freq`.
    pub fn lag_samples(&self, row: usize) -> isize {
        row as isize + 1 - self.neg_shifts as isize
    }

    /// Lag of `row` relative to the bulk shift, in seconds.
    pub fn lag_seconds(&self, row: usize) -> f64 {
        self.lag_samples(row) as f64 / self.freq
    }

    /// Row holding the regressor at exactly the bulk shift; `None` when
    /// `neg_shifts == 0`, where every row lags the bulk shift.
    pub fn centre_row(&self) -> Option<ArrayView1<'_, f64>> {
        self.neg_shifts.checked_sub(1).map(|row| self.regressors.row(row))
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.regressors.view()
    }
}

/// `(neg_shifts, pos_shifts)` for `bounds` at `freq`.
pub fn shift_counts(bounds: &LagBounds, freq: f64, legacy: bool) -> (usize, usize) {
    let neg = (bounds.lag_min.abs() * freq).round() as usize;
    let pos = (bounds.lag_max * freq).round() as usize + usize::from(!legacy);
    (neg, pos)
}

/// Cut `neg_shifts + pos_shifts` windows of `window_len` samples out of
/// `regr` around `bulk_shift`, at the regressor rate.
///
/// Row `k` starts at `bulk_shift + neg_shifts − 1 − k` of the unpadded
/// trace; positions outside the trace read the trace mean.
pub fn extract_lag_windows(
    regr: ArrayView1<'_, f64>, bulk_shift: usize, neg_shifts: usize, pos_shifts: usize,
    window_len: usize,
) -> Array2<f64> {
    let rows = neg_shifts + pos_shifts;
    let len = regr.len() as isize;
    let bulk = bulk_shift as isize;
    let (neg, pos, width) = (neg_shifts as isize, pos_shifts as isize, window_len as isize);

    let lpad = (pos - bulk).max(0);
    let rpad = (bulk + neg - 1 + width - len).max(0);

    let mean = regr.mean().unwrap_or(0.0);
    let mut padded = Array1::from_elem((lpad + len + rpad) as usize, mean);
    padded.slice_mut(s![lpad as usize..(lpad + len) as usize]).assign(&regr);

    let mut windows = Array2::zeros((rows, window_len));
    for (k, mut row) in windows.rows_mut().into_iter().enumerate() {
        let start = (bulk + neg - 1 - k as isize + lpad) as usize;
        row.assign(&padded.slice(s![start..start + window_len]));
    }
    windows
}

/// Build the lag bank for `petco2hrf` around `bulk_shift`.
///
/// Parameters
/// ----------
/// - `petco2hrf`: `ArrayView1<f64>`
///   Regressor at `freq`.
/// - `bulk_shift`: `usize`
/// - `bounds`: `&LagBounds`
/// - `freq`: `f64`
/// - `func_len`: `usize`
///   Functional timepoint count; columns of the result.
/// - `func_upsampled_len`: `usize`
///   Functional length at `freq`; window length before resampling.
/// - `legacy`: `bool`
///   Exclude the positive lag limit.
///
/// Errors
/// ------
/// - `RegressorError::EmptyLagBank` when the bounds cover no sample.
/// - `RegressorError::Io` if resampling a row fails (e.g. windows shorter
///   than two samples).
pub fn build_lag_bank(
    petco2hrf: ArrayView1<'_, f64>, bulk_shift: usize, bounds: &LagBounds, freq: f64,
    func_len: usize, func_upsampled_len: usize, legacy: bool,
) -> RegressorResult<LagBank> {
    let (neg_shifts, pos_shifts) = shift_counts(bounds, freq, legacy);
    if neg_shifts + pos_shifts == 0 {
        return Err(RegressorError::EmptyLagBank {
            lag_max: bounds.lag_max,
            lag_min: bounds.lag_min,
        });
    }

    let windows =
        extract_lag_windows(petco2hrf, bulk_shift, neg_shifts, pos_shifts, func_upsampled_len);
    let regressors = prepare_regressor(windows.view(), func_len)?;

    Ok(LagBank { regressors, neg_shifts, pos_shifts, bulk_shift, freq })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::prepare_series;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Row-count formulas in both modes, including asymmetric bounds.
    // - Window placement: centre row, one-sample steps, padding with the
    //   trace mean.
    // - Shape and centring of the resampled bank.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Pin the row count, the place where off-by-one defects show up.
    //
    // Given
    // -----
    // - lag ±9 s at 40 Hz, non-legacy and legacy.
    // - lag [-2, 5] s at 10 Hz, non-legacy.
    //
    // Expect
    // ------
    // - 721 and 720 rows; 20 + 51 = 71 rows.
    fn shift_counts_match_row_count_formulas() {
        // Arrange
        let symmetric = LagBounds::new(9.0, None).unwrap();
        let asymmetric = LagBounds::new(5.0, Some(-2.0)).unwrap();

        // Act
        let (n1, p1) = shift_counts(&symmetric, 40.0, false);
        let (n2, p2) = shift_counts(&symmetric, 40.0, true);
        let (n3, p3) = shift_counts(&asymmetric, 10.0, false);

        // Assert
        assert_eq!((n1, p1), (360, 361));
        assert_eq!(n1 + p1, 721);
        assert_eq!(n2 + p2, 720);
        assert_eq!((n3, p3), (20, 51));
    }

    #[test]
    // Purpose
    // -------
    // Rows step one sample at a time and the bulk-shifted regressor sits at
    // row `neg_shifts − 1`.
    //
    // Given
    // -----
    // - regr = 0..20, bulk 8, neg 2, pos 3, window 5 (no padding needed).
    //
    // Expect
    // ------
    // - Row k starts at 9 − k: rows start at 9, 8, 7, 6, 5.
    // - Row 1 equals regr[8..13].
    fn extract_lag_windows_places_rows_around_bulk_shift() {
        // Arrange
        let regr = Array1::from_iter((0..20).map(|i| i as f64));

        // Act
        let windows = extract_lag_windows(regr.view(), 8, 2, 3, 5);

        // Assert
        assert_eq!(windows.dim(), (5, 5));
        let starts: Vec<f64> = windows.column(0).to_vec();
        assert_eq!(starts, vec![9.0, 8.0, 7.0, 6.0, 5.0]);
        assert_eq!(windows.row(1), regr.slice(s![8..13]));
    }

    #[test]
    // Purpose
    // -------
    // Pin row starts against the reversed sliding-window slice
    // `windows[bulk + neg − 1 .. bulk − pos − 1 : −1]`.
    //
    // Given
    // -----
    // - regr = 0..40, bulk 15, neg 4, pos 5, window 6.
    //
    // Expect
    // ------
    // - 9 rows starting at 18, 17, ..., 10; every row is a contiguous run.
    fn extract_lag_windows_matches_reversed_window_slice() {
        // Arrange
        let regr = Array1::from_iter((0..40).map(|i| i as f64));

        // Act
        let windows = extract_lag_windows(regr.view(), 15, 4, 5, 6);

        // Assert
        let starts: Vec<f64> = windows.column(0).to_vec();
        let expected: Vec<f64> = (10..=18).rev().map(|i| i as f64).collect();
        assert_eq!(starts, expected);
        for row in windows.rows() {
            assert_eq!(row[5] - row[0], 5.0);
        }
    }

    #[test]
    // Purpose
    // -------
    // Windows reaching past either end read the trace mean.
    //
    // Given
    // -----
    // - regr = [0, 1, 2, 3, 4, 5] (mean 2.5), bulk 1, neg 2, pos 3,
    //   window 5.
    //
    // Expect
    // ------
    // - Row 0 starts at 2 and runs past the end: [2, 3, 4, 5, 2.5].
    // - Row 4 starts at -2: [2.5, 2.5, 0, 1, 2].
    fn extract_lag_windows_pads_with_trace_mean() {
        // Arrange
        let regr = array![0.0, 1.0, 2.0, 3.0, 4.0, 5.0];

        // Act
        let windows = extract_lag_windows(regr.view(), 1, 2, 3, 5);

        // Assert
        assert_eq!(windows.row(0), array![2.0, 3.0, 4.0, 5.0, 2.5]);
        assert_eq!(windows.row(2), array![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(windows.row(4), array![2.5, 2.5, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn build_lag_bank_resamples_and_demeans_rows() {
        let regr = Array1::from_iter((0..400).map(|i| (i as f64 / 13.0).sin()));
        let bounds = LagBounds::new(1.0, None).unwrap();

        let bank = build_lag_bank(regr.view(), 100, &bounds, 10.0, 21, 201, false).unwrap();

        assert_eq!(bank.n_lags(), 21);
        assert_eq!(bank.regressors.ncols(), 21);
        for row in bank.regressors.rows() {
            assert_abs_diff_eq!(row.sum(), 0.0, epsilon = 1e-10);
        }
        assert_eq!(bank.lag_samples(0), -9);
        assert_eq!(bank.lag_samples(20), 11);
        assert_abs_diff_eq!(bank.lag_seconds(20), 1.1, epsilon = 1e-12);

        let centre = bank.centre_row().unwrap();
        assert_eq!(centre, bank.regressors.row(9));
        let expected = prepare_series(regr.slice(s![100..301]), 21).unwrap();
        for (a, b) in centre.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn centre_row_is_absent_without_negative_lags() {
        let regr = Array1::from_iter((0..100).map(|i| (i as f64 / 7.0).cos()));
        let bounds = LagBounds::new(1.0, Some(0.0)).unwrap();

        let bank = build_lag_bank(regr.view(), 0, &bounds, 10.0, 5, 21, false).unwrap();

        assert_eq!(bank.n_lags(), 11);
        assert!(bank.centre_row().is_none());
        assert_eq!(bank.lag_samples(0), 1);
    }

    #[test]
    fn build_lag_bank_rejects_empty_bounds() {
        let regr = Array1::from_iter((0..50).map(|i| i as f64));
        let bounds = LagBounds::new(0.01, None).unwrap();
        let result = build_lag_bank(regr.view(), 0, &bounds, 10.0, 5, 10, true);
        assert!(matches!(result, Err(RegressorError::EmptyLagBank { .. })));
    }
}
