//! regressors::petco2 — raw physiological trace to PetCO2hrf.
//!
//! Purpose
//! -------
//! First pipeline entry point: turn a raw CO2 (or other physiological)
//! trace and its end-tidal peaks into the convolved regressor PetCO2hrf.
//!
//! Key behaviors
//! -------------
//! - Optional end-tidal interpolation through the peaks; the envelope is
//!   plotted against the raw trace, demeaned and written as
//!   `{prefix}_petco2.1D` with 18 decimals.
//! - When interpolation is skipped the raw trace is only demeaned, and an
//!   info diagnostic notes that raw CO2 should normally be interpolated.
//! - Optional convolution with the configured kernel, plotted against its
//!   input; `ResponseFunction::None` skips it with an info diagnostic.

use std::path::Path;

use ndarray::{Array1, ArrayViewD};

use crate::{
    io::artifact_path,
    regressors::{
        errors::RegressorResult,
        options::{PetCO2Options, PipelineContext},
    },
    signal::{
        convolve_signal, demean, endtidal_interpolation,
        validation::{squeeze_to_1d, validate_frequency, validate_series},
    },
};

/// Decimals of the exported PetCO2 trace.
const PETCO2_PRECISION: usize = 18;

fn plot_path(prefix: &Path, suffix: &str) -> std::path::PathBuf {
    artifact_path(prefix, suffix, ".png")
}

/// Build PetCO2hrf from a raw trace.
///
/// Parameters
/// ----------
/// - `co2`: `ArrayViewD<f64>`
///   Raw trace; length-1 axes are squeezed away.
/// - `peaks`: `&[usize]`
///   End-tidal peak indices (any order, duplicates allowed).
/// - `freq`: `f64`
///   Sampling frequency of `co2` in Hz.
/// - `outprefix`: `&Path`
///   Prefix of every artifact written by this stage.
/// - `opts`: `&PetCO2Options`
/// - `ctx`: `&mut PipelineContext`
///
/// Returns
/// -------
/// `RegressorResult<Array1<f64>>`
///   PetCO2hrf at `freq`. With `ResponseFunction::None` this is the
///   demeaned PetCO2 itself.
///
/// Errors
/// ------
/// - `RegressorError::Signal` for shape, envelope and kernel failures.
/// - `RegressorError::Io` when an artifact cannot be written or plotted.
pub fn compute_petco2hrf(
    co2: ArrayViewD<'_, f64>, peaks: &[usize], freq: f64, outprefix: &Path, opts: &PetCO2Options,
    ctx: &mut PipelineContext<'_>,
) -> RegressorResult<Array1<f64>> {
    validate_frequency(freq)?;
    let co2 = squeeze_to_1d(co2)?;
    validate_series(co2.view(), 1)?;

    let petco2 = if opts.comp_endtidal {
        let envelope = endtidal_interpolation(co2.view(), peaks)?;
        ctx.plotter.plot_two_timeseries(
            envelope.view(),
            co2.view(),
            &plot_path(outprefix, "co2_vs_petco2"),
            "PetCO2",
            "CO2",
            freq,
            false,
        )?;
        let petco2 = demean(&envelope);
        ctx.writer.write_series(
            &artifact_path(outprefix, "petco2", ".1D"),
            petco2.view(),
            PETCO2_PRECISION,
        )?;
        petco2
    } else {
        ctx.sink.info(
            "Skipping End Tidal interpolation of PetCO2 trace (if you provided raw CO2 data, \
             then you probably should not be doing this)"
                .to_string(),
        );
        demean(&co2)
    };

    if opts.response.is_none() {
        ctx.sink.info("Skipping convolution of PetCO2 trace".to_string());
        return Ok(petco2);
    }

    let petco2hrf = convolve_signal(
        petco2.view().into_dyn(),
        freq,
        &opts.response,
        opts.mode,
        ctx.responses,
        &mut *ctx.sink,
    )?
    .into_inner();

    ctx.plotter.plot_two_timeseries(
        petco2hrf.view(),
        petco2.view(),
        &plot_path(outprefix, "petco2_vs_petco2hrf"),
        "Convolved PetCO2",
        "PetCO2",
        freq,
        false,
    )?;

    Ok(petco2hrf)
}
