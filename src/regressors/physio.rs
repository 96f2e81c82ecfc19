//! regressors::physio — align PetCO2hrf with the functional signal.
//!
//! Purpose
//! -------
//! Second pipeline entry point: given PetCO2hrf and the average functional
//! timeseries, find the bulk shift, export the optimally shifted regressor
//! and, on request, the bank of finely lagged regressors.
//!
//! Key behaviors
//! -------------
//! - The functional average is resampled from `1 / tr` to `freq` so both
//!   signals share a time base for the search.
//! - The bulk shift is estimated by cross-correlation (or fixed at 0 when
//!   `skip_xcorr`), written to `{prefix}_optshift.1D` in seconds with 4
//!   decimals, and the correlation curve is plotted.
//! - The shifted regressor is plotted against the functional average
//!   (z-scored) and exported as `{prefix}_petco2hrf_simple{ext}`.
//! - The lag bank goes to `{outdir}/regr/{base}_shifts{ext}`. Requesting it
//!   without `lag_max` is a warning and the bank is skipped.
//!
//! Invariants & assumptions
//! ------------------------
//! - `simple.len()` equals the functional timepoint count and its mean is 0.
//! - The alignment guard runs on both the estimated and the fixed shift, so
//!   the regressor is never silently truncated.

use std::path::{Path, PathBuf};

use ndarray::{Array1, ArrayView1, ArrayViewD, s};

use crate::{
    io::{artifact_path, export::REGRESSOR_PRECISION, export_series},
    regressors::{
        bulk_shift::{BulkShift, check_alignment, estimate_bulk_shift},
        errors::{RegressorError, RegressorResult},
        lag_bank::{LagBank, build_lag_bank},
        options::{PhysioOptions, PipelineContext},
    },
    signal::{
        resample_signal_freqs,
        validation::{squeeze_to_1d, validate_frequency, validate_series},
    },
};

/// Decimals of the exported optimal shift (seconds).
const OPTSHIFT_PRECISION: usize = 4;

/// Regressors produced by [`create_physio_regressor`].
#[derive(Debug, Clone, PartialEq)]
pub struct PhysioRegressors {
    /// Demeaned, bulk-shifted regressor at the functional timepoint count.
    pub simple: Array1<f64>,
    /// Lag bank, when requested and `lag_max` was given.
    pub lagged: Option<LagBank>,
    pub bulk_shift: BulkShift,
}

/// `{outdir}/regr/{base}` for an output prefix `{outdir}/{base}`.
pub fn lag_bank_prefix(outprefix: &Path) -> PathBuf {
    let base = outprefix.file_name().unwrap_or_default();
    match outprefix.parent() {
        Some(dir) => dir.join("regr").join(base),
        None => Path::new("regr").join(base),
    }
}

/// Build the aligned regressor set.
///
/// Parameters
/// ----------
/// - `func_avg`: `ArrayViewD<f64>`
///   Average functional timeseries; length-1 axes are squeezed away.
/// - `petco2hrf`: `ArrayView1<f64>`
///   Convolved regressor at `freq`.
/// - `tr`: `f64`
///   Repetition time of the functional signal in seconds.
/// - `freq`: `f64`
///   Sampling frequency of `petco2hrf` in Hz.
/// - `outprefix`: `&Path`
/// - `opts`: `&PhysioOptions`
/// - `ctx`: `&mut PipelineContext`
///
/// Errors
/// ------
/// - `RegressorError::InvalidRepetitionTime` for a non-positive `tr`.
/// - `RegressorError::AlignmentOverflow` when the shifted window does not
///   fit in `petco2hrf`.
/// - `RegressorError::InvalidLagBounds` / `EmptyLagBank` for unusable lag
///   limits.
/// - Wrapped signal, cross-correlation and I/O failures.
pub fn create_physio_regressor(
    func_avg: ArrayViewD<'_, f64>, petco2hrf: ArrayView1<'_, f64>, tr: f64, freq: f64,
    outprefix: &Path, opts: &PhysioOptions, ctx: &mut PipelineContext<'_>,
) -> RegressorResult<PhysioRegressors> {
    if !tr.is_finite() || tr <= 0.0 {
        return Err(RegressorError::InvalidRepetitionTime { value: tr });
    }
    validate_frequency(freq)?;
    let func = squeeze_to_1d(func_avg)?;
    validate_series(func.view(), 2)?;
    let ntp = func.len();

    let func_upsampled = resample_signal_freqs(func.view(), 1.0 / tr, freq)?;
    let upsampled_len = func_upsampled.len();

    let bulk_shift = if opts.skip_xcorr {
        ctx.sink.info("Skipping Bulk Shift Computation".to_string());
        BulkShift::fixed(0, freq)
    } else {
        let bulk = estimate_bulk_shift(
            func_upsampled.view(),
            petco2hrf,
            freq,
            &opts.trial,
            opts.abs_xcorr,
            &mut *ctx.sink,
        )?;
        ctx.writer.write_text(
            &artifact_path(outprefix, "optshift", ".1D"),
            &format!("{:.prec$}\n", bulk.seconds, prec = OPTSHIFT_PRECISION),
        )?;
        if let Some(xcorr) = &bulk.xcorr {
            ctx.plotter.plot_xcorr(xcorr.curve.view(), outprefix, freq)?;
        }
        bulk
    };

    let shift = bulk_shift.shift;
    check_alignment(shift, upsampled_len, petco2hrf.len())?;
    let shifted = petco2hrf.slice(s![shift..shift + upsampled_len]);

    ctx.plotter.plot_two_timeseries(
        shifted,
        func_upsampled.view(),
        &artifact_path(outprefix, "petco2hrf_vs_avgroi", ".png"),
        "Optimally shifted regressor",
        "Average ROI signal",
        freq,
        true,
    )?;

    let simple = export_series(&mut *ctx.writer, shifted, ntp, outprefix, "petco2hrf_simple", &opts.ext)?;

    let lagged = if !opts.lagged_regression {
        ctx.sink.info("Skipping generation of lagged regressors.".to_string());
        None
    } else if let Some(bounds) = opts.lag_bounds()? {
        let bank =
            build_lag_bank(petco2hrf, shift, &bounds, freq, ntp, upsampled_len, opts.legacy)?;
        ctx.sink.debug(format!(
            "Built {} lagged regressors from {} s to {} s",
            bank.n_lags(),
            bank.lag_seconds(0),
            bank.lag_seconds(bank.n_lags() - 1)
        ));
        ctx.writer.write_matrix(
            &artifact_path(&lag_bank_prefix(outprefix), "shifts", &opts.ext),
            bank.view(),
            REGRESSOR_PRECISION,
        )?;
        Some(bank)
    } else {
        ctx.sink
            .warn("Lagged regressors requested but maximum lag not provided. Skipping.".to_string());
        None
    };

    Ok(PhysioRegressors { simple, lagged, bulk_shift })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        diagnostics::CollectingSink,
        io::{Artifact, MemoryWriter, NoPlots},
    };
    use approx::assert_abs_diff_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Output naming (optshift, simple regressor, lag bank directory).
    // - skip_xcorr, lag-bank skip rules and their diagnostics.
    // - The alignment guard on the fixed-shift path and bad TR values.
    //
    // The end-to-end scenario with a realistic CO2 trace lives in
    // `tests/integration_cvr_pipeline.rs`.
    // -------------------------------------------------------------------------

    fn regressor(len: usize) -> Array1<f64> {
        Array1::from_iter((0..len).map(|i| {
            let t = i as f64;
            (t / 23.0).sin() + 0.4 * (t / 7.0).cos() + 0.1 * (t * t / 9000.0).sin()
        }))
    }

    /// Functional signal at 1 Hz whose upsampled version is `regr[start..]`.
    fn functional(regr: &Array1<f64>, start: usize, ntp: usize, freq: usize) -> Array1<f64> {
        Array1::from_iter((0..ntp).map(|t| regr[start + t * freq]))
    }

    #[test]
    fn lag_bank_prefix_inserts_regr_directory() {
        assert_eq!(lag_bank_prefix(Path::new("out/sub-01")), PathBuf::from("out/regr/sub-01"));
        assert_eq!(lag_bank_prefix(Path::new("sub-01")), PathBuf::from("regr/sub-01"));
    }

    #[test]
    // Purpose
    // -------
    // Recover a known shift and export all artifacts under their names.
    //
    // Given
    // -----
    // - Regressor of 2000 samples at 10 Hz; functional signal at TR 1 s
    //   sampled from regr[300..] (60 TRs).
    // - lag_max 2 s.
    //
    // Expect
    // ------
    // - Shift within 2 samples of 300; optshift text with 4 decimals.
    // - Simple regressor of 60 samples with mean 0.
    // - Lag bank of 41 rows written under `out/regr/`.
    fn create_physio_regressor_exports_everything() {
        // Arrange
        let regr = regressor(2000);
        let func = functional(&regr, 300, 60, 10);
        let opts = PhysioOptions { lag_max: Some(2.0), ..PhysioOptions::default() };
        let mut writer = MemoryWriter::new();
        let mut plotter = NoPlots;
        let mut sink = CollectingSink::new();
        let mut ctx = PipelineContext::new(&mut writer, &mut plotter, &mut sink);

        // Act
        let out = create_physio_regressor(
            func.view().into_dyn(),
            regr.view(),
            1.0,
            10.0,
            Path::new("out/sub"),
            &opts,
            &mut ctx,
        )
        .unwrap();

        // Assert
        assert!(out.bulk_shift.shift.abs_diff(300) <= 2, "shift = {}", out.bulk_shift.shift);
        let expected_text = format!("{:.4}\n", out.bulk_shift.shift as f64 / 10.0);
        assert_eq!(writer.get("out/sub_optshift.1D"), Some(&Artifact::Text(expected_text)));

        assert_eq!(out.simple.len(), 60);
        assert_abs_diff_eq!(out.simple.mean().unwrap(), 0.0, epsilon = 1e-10);
        assert!(matches!(writer.get("out/sub_petco2hrf_simple.1D"), Some(Artifact::Series(_))));

        let bank = out.lagged.expect("lag bank requested");
        assert_eq!(bank.regressors.dim(), (41, 60));
        assert!(matches!(writer.get("out/regr/sub_shifts.1D"), Some(Artifact::Matrix(_))));
    }

    #[test]
    // Purpose
    // -------
    // skip_xcorr fixes the shift at 0 and writes no optshift file; a lag
    // bank requested without lag_max is skipped with a warning.
    //
    // Given
    // -----
    // - skip_xcorr = true, lagged_regression = true, lag_max = None.
    //
    // Expect
    // ------
    // - shift 0, no xcorr, no optshift artifact, no bank, one warning.
    fn create_physio_regressor_skip_paths() {
        // Arrange
        let regr = regressor(1000);
        let func = functional(&regr, 0, 40, 10);
        let opts = PhysioOptions { skip_xcorr: true, ..PhysioOptions::default() };
        let mut writer = MemoryWriter::new();
        let mut plotter = NoPlots;
        let mut sink = CollectingSink::new();
        let mut ctx = PipelineContext::new(&mut writer, &mut plotter, &mut sink);

        // Act
        let out = create_physio_regressor(
            func.view().into_dyn(),
            regr.view(),
            1.0,
            10.0,
            Path::new("sub"),
            &opts,
            &mut ctx,
        )
        .unwrap();

        // Assert
        assert_eq!(out.bulk_shift, BulkShift::fixed(0, 10.0));
        assert!(out.lagged.is_none());
        assert!(writer.get("sub_optshift.1D").is_none());
        assert!(sink.contains("Skipping Bulk Shift Computation"));
        assert_eq!(
            sink.warnings(),
            vec!["Lagged regressors requested but maximum lag not provided. Skipping."]
        );
    }

    #[test]
    fn create_physio_regressor_reports_unrequested_bank() {
        let regr = regressor(1000);
        let func = functional(&regr, 100, 40, 10);
        let opts = PhysioOptions {
            lag_max: Some(3.0),
            lagged_regression: false,
            ..PhysioOptions::default()
        };
        let mut writer = MemoryWriter::new();
        let mut plotter = NoPlots;
        let mut sink = CollectingSink::new();
        let mut ctx = PipelineContext::new(&mut writer, &mut plotter, &mut sink);

        let out = create_physio_regressor(
            func.view().into_dyn(),
            regr.view(),
            1.0,
            10.0,
            Path::new("sub"),
            &opts,
            &mut ctx,
        )
        .unwrap();

        assert!(out.lagged.is_none());
        assert!(sink.contains("Skipping generation of lagged regressors."));
        assert!(sink.warnings().is_empty());
    }

    #[test]
    // Purpose
    // -------
    // A functional signal longer than the regressor cannot be aligned,
    // even when the shift is fixed at 0.
    //
    // Given
    // -----
    // - skip_xcorr with an upsampled functional length of 391 against a
    //   regressor of 300 samples.
    //
    // Expect
    // ------
    // - AlignmentOverflow { shift: 0, func_len: 391, regr_len: 300 }.
    fn create_physio_regressor_flags_alignment_overflow() {
        // Arrange
        let regr = regressor(300);
        let func = Array1::from_iter((0..40).map(|i| (i as f64 / 3.0).sin()));
        let opts = PhysioOptions { skip_xcorr: true, ..PhysioOptions::default() };
        let mut writer = MemoryWriter::new();
        let mut plotter = NoPlots;
        let mut sink = CollectingSink::new();
        let mut ctx = PipelineContext::new(&mut writer, &mut plotter, &mut sink);

        // Act
        let result = create_physio_regressor(
            func.view().into_dyn(),
            regr.view(),
            1.0,
            10.0,
            Path::new("sub"),
            &opts,
            &mut ctx,
        );

        // Assert
        assert_eq!(
            result,
            Err(RegressorError::AlignmentOverflow { shift: 0, func_len: 391, regr_len: 300 })
        );
    }

    #[test]
    fn create_physio_regressor_rejects_bad_tr() {
        let regr = regressor(300);
        let func = regressor(10);
        let mut writer = MemoryWriter::new();
        let mut plotter = NoPlots;
        let mut sink = CollectingSink::new();
        let mut ctx = PipelineContext::new(&mut writer, &mut plotter, &mut sink);

        let result = create_physio_regressor(
            func.view().into_dyn(),
            regr.view(),
            0.0,
            10.0,
            Path::new("sub"),
            &PhysioOptions::default(),
            &mut ctx,
        );

        assert_eq!(result, Err(RegressorError::InvalidRepetitionTime { value: 0.0 }));
    }
}
