//! io::plot — plotting seam for diagnostic figures.
//!
//! The pipeline asks for two kinds of figures: two overlaid timeseries
//! (CO2 vs PetCO2, PetCO2 vs PetCO2hrf, shifted regressor vs functional
//! average) and the bulk-shift cross-correlation curve. Rendering lives
//! outside this crate; [`NoPlots`] discards the requests and
//! [`RecordingPlotter`] keeps a description of each one.

use std::path::{Path, PathBuf};

use ndarray::ArrayView1;

use crate::io::errors::IoResult;

/// Renderer for the pipeline's diagnostic figures.
pub trait Plotter {
    /// Overlay `a` and `b` (sampled at `freq`) and save the figure to `path`.
    ///
    /// With `zscore`, both series are standardised before plotting.
    #[allow(clippy::too_many_arguments)]
    fn plot_two_timeseries(
        &mut self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>, path: &Path, label_a: &str,
        label_b: &str, freq: f64, zscore: bool,
    ) -> IoResult<()>;

    /// Plot the cross-correlation curve, saving next to `outprefix`.
    fn plot_xcorr(
        &mut self, curve: ArrayView1<'_, f64>, outprefix: &Path, freq: f64,
    ) -> IoResult<()>;
}

/// Discards every plot request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPlots;

impl Plotter for NoPlots {
    fn plot_two_timeseries(
        &mut self, _: ArrayView1<'_, f64>, _: ArrayView1<'_, f64>, _: &Path, _: &str, _: &str,
        _: f64, _: bool,
    ) -> IoResult<()> {
        Ok(())
    }

    fn plot_xcorr(&mut self, _: ArrayView1<'_, f64>, _: &Path, _: f64) -> IoResult<()> {
        Ok(())
    }
}

/// A plot request captured by [`RecordingPlotter`].
#[derive(Debug, Clone, PartialEq)]
pub enum PlotRequest {
    TwoTimeseries { path: PathBuf, labels: (String, String), lens: (usize, usize), zscore: bool },
    XCorr { outprefix: PathBuf, len: usize },
}

/// Records plot requests instead of rendering them.
#[derive(Debug, Clone, Default)]
pub struct RecordingPlotter {
    pub requests: Vec<PlotRequest>,
}

impl RecordingPlotter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Plotter for RecordingPlotter {
    fn plot_two_timeseries(
        &mut self, a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>, path: &Path, label_a: &str,
        label_b: &str, _: f64, zscore: bool,
    ) -> IoResult<()> {
        self.requests.push(PlotRequest::TwoTimeseries {
            path: path.to_path_buf(),
            labels: (label_a.to_string(), label_b.to_string()),
            lens: (a.len(), b.len()),
            zscore,
        });
        Ok(())
    }

    fn plot_xcorr(
        &mut self, curve: ArrayView1<'_, f64>, outprefix: &Path, _: f64,
    ) -> IoResult<()> {
        self.requests
            .push(PlotRequest::XCorr { outprefix: outprefix.to_path_buf(), len: curve.len() });
        Ok(())
    }
}
