//! io::export — resample, demean and persist regressors.
//!
//! Purpose
//! -------
//! Bring regressors computed at the physiological rate back to the
//! functional timepoint count, centre them, and write them under the
//! `{prefix}_{suffix}{ext}` naming convention.
//!
//! Key behaviors
//! -------------
//! - [`prepare_regressor`] / [`prepare_series`] are the pure part:
//!   resample each timeseries to `ntp` samples (a no-op when the length
//!   already matches) and subtract its mean.
//! - [`export_regressor`] / [`export_series`] additionally hand the result
//!   to an [`ArtifactWriter`] at 6 decimals and return it.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every returned row has `ntp` samples and mean 0 up to rounding.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::{
    io::{errors::IoResult, writer::ArtifactWriter},
    signal::{demean, resample_samples_along, resample_signal_samples},
};

/// Decimals used for exported regressors.
pub const REGRESSOR_PRECISION: usize = 6;

/// `{prefix}_{suffix}{ext}`, keeping any directory part of `prefix`.
pub fn artifact_path(prefix: &Path, suffix: &str, ext: &str) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push("_");
    name.push(suffix);
    name.push(ext);
    PathBuf::from(name)
}

/// Resample each row of `values` to `ntp` samples and demean it.
pub fn prepare_regressor(values: ArrayView2<'_, f64>, ntp: usize) -> IoResult<Array2<f64>> {
    let resampled = if values.ncols() == ntp {
        values.to_owned()
    } else {
        resample_samples_along(values, ntp, Axis(1))?
    };
    Ok(demean(&resampled))
}

/// 1-D counterpart of [`prepare_regressor`].
pub fn prepare_series(values: ArrayView1<'_, f64>, ntp: usize) -> IoResult<Array1<f64>> {
    let resampled =
        if values.len() == ntp { values.to_owned() } else { resample_signal_samples(values, ntp)? };
    Ok(demean(&resampled))
}

/// Prepare a bank of regressors (one per row) and write it as
/// `{prefix}_{suffix}{ext}`.
///
/// Returns the demeaned, resampled matrix that was written.
pub fn export_regressor(
    writer: &mut dyn ArtifactWriter, values: ArrayView2<'_, f64>, ntp: usize, prefix: &Path,
    suffix: &str, ext: &str,
) -> IoResult<Array2<f64>> {
    let prepared = prepare_regressor(values, ntp)?;
    writer.write_matrix(&artifact_path(prefix, suffix, ext), prepared.view(), REGRESSOR_PRECISION)?;
    Ok(prepared)
}

/// Prepare a single regressor and write it as `{prefix}_{suffix}{ext}`, one
/// value per line.
pub fn export_series(
    writer: &mut dyn ArtifactWriter, values: ArrayView1<'_, f64>, ntp: usize, prefix: &Path,
    suffix: &str, ext: &str,
) -> IoResult<Array1<f64>> {
    let prepared = prepare_series(values, ntp)?;
    writer.write_series(&artifact_path(prefix, suffix, ext), prepared.view(), REGRESSOR_PRECISION)?;
    Ok(prepared)
}
