//! regressors::options — configuration for the two pipeline entry points.
//!
//! Purpose
//! -------
//! Hold the knobs of [`compute_petco2hrf`](crate::regressors::petco2::compute_petco2hrf)
//! and [`create_physio_regressor`](crate::regressors::physio::create_physio_regressor)
//! in plain structs with phys2cvr's defaults, plus the [`PipelineContext`]
//! bundling the collaborators every stage reports to.
//!
//! Key behaviors
//! -------------
//! - `Default` impls give: end-tidal interpolation on, HRF kernel, full
//!   convolution, `.1D` extension, lagged regression on, legacy off,
//!   signed cross-correlation, cross-correlation not skipped.
//! - [`LagBounds::new`] validates lag limits once, filling `lag_min` with
//!   `-lag_max` when absent.
//!
//! Invariants & assumptions
//! ------------------------
//! - A validated [`LagBounds`] always satisfies
//!   `lag_min <= 0 <= lag_max`, both finite.
//! - A `lag_max` of 0 is treated as "not provided", matching how trial
//!   parameters treat zero.

use crate::{
    diagnostics::DiagnosticSink,
    io::{ArtifactWriter, Plotter},
    regressors::{
        bulk_shift::TrialStructure,
        errors::{RegressorError, RegressorResult},
    },
    signal::{ConvolveMode, ResponseFunction, ResponseProvider},
};

/// Options for building PetCO2hrf from a raw trace.
#[derive(Debug, Clone, PartialEq)]
pub struct PetCO2Options {
    /// Reconstruct the end-tidal envelope before convolving.
    pub comp_endtidal: bool,
    /// Kernel to convolve with; `ResponseFunction::None` skips convolution.
    pub response: ResponseFunction,
    pub mode: ConvolveMode,
}

impl Default for PetCO2Options {
    fn default() -> Self {
        PetCO2Options {
            comp_endtidal: true,
            response: ResponseFunction::Hrf,
            mode: ConvolveMode::Full,
        }
    }
}

/// Options for aligning PetCO2hrf with the functional signal.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysioOptions {
    /// Largest lag explored by the lag bank, in seconds.
    pub lag_max: Option<f64>,
    /// Smallest (most negative) lag, in seconds; defaults to `-lag_max`.
    pub lag_min: Option<f64>,
    pub trial: TrialStructure,
    /// Extension of exported regressors, including the dot.
    pub ext: String,
    /// Build the lag bank.
    pub lagged_regression: bool,
    /// Exclude the positive lag limit from the bank.
    pub legacy: bool,
    /// Select the bulk shift by absolute correlation.
    pub abs_xcorr: bool,
    /// Fix the bulk shift at 0 instead of searching for it.
    pub skip_xcorr: bool,
}

impl Default for PhysioOptions {
    fn default() -> Self {
        PhysioOptions {
            lag_max: None,
            lag_min: None,
            trial: TrialStructure::default(),
            ext: ".1D".to_string(),
            lagged_regression: true,
            legacy: false,
            abs_xcorr: false,
            skip_xcorr: false,
        }
    }
}

impl PhysioOptions {
    /// Lag bounds to build the bank with, or `None` when no usable
    /// `lag_max` was given.
    pub fn lag_bounds(&self) -> RegressorResult<Option<LagBounds>> {
        match self.lag_max {
            Some(lag_max) if lag_max != 0.0 => LagBounds::new(lag_max, self.lag_min).map(Some),
            _ => Ok(None),
        }
    }
}

/// Validated lag limits in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LagBounds {
    pub lag_max: f64,
    pub lag_min: f64,
}

impl LagBounds {
    /// Errors
    /// ------
    /// - `RegressorError::InvalidLagBounds` unless both values are finite
    ///   and `lag_min <= 0 <= lag_max`.
    pub fn new(lag_max: f64, lag_min: Option<f64>) -> RegressorResult<Self> {
        let lag_min = lag_min.unwrap_or(-lag_max);
        let valid =
            lag_max.is_finite() && lag_min.is_finite() && lag_max >= 0.0 && lag_min <= 0.0;
        if !valid {
            return Err(RegressorError::InvalidLagBounds { lag_max, lag_min });
        }
        Ok(LagBounds { lag_max, lag_min })
    }
}

/// Collaborators shared by every pipeline stage.
pub struct PipelineContext<'a> {
    pub writer: &'a mut dyn ArtifactWriter,
    pub plotter: &'a mut dyn Plotter,
    pub sink: &'a mut dyn DiagnosticSink,
    /// Source of named response kernels (RRF, CRF, iCRF).
    pub responses: Option<&'a dyn ResponseProvider>,
}

impl<'a> PipelineContext<'a> {
    pub fn new(
        writer: &'a mut dyn ArtifactWriter, plotter: &'a mut dyn Plotter,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        PipelineContext { writer, plotter, sink, responses: None }
    }

    pub fn with_responses(mut self, provider: &'a dyn ResponseProvider) -> Self {
        self.responses = Some(provider);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_pipeline_defaults() {
        let petco2 = PetCO2Options::default();
        assert!(petco2.comp_endtidal);
        assert_eq!(petco2.response, ResponseFunction::Hrf);
        assert_eq!(petco2.mode, ConvolveMode::Full);

        let physio = PhysioOptions::default();
        assert_eq!(physio.ext, ".1D");
        assert!(physio.lagged_regression && !physio.legacy);
        assert!(!physio.abs_xcorr && !physio.skip_xcorr);
        assert_eq!(physio.lag_bounds(), Ok(None));
    }

    #[test]
    // Purpose
    // -------
    // Lag bounds default to a symmetric window and reject inverted limits.
    //
    // Given
    // -----
    // - lag_max 9 without lag_min; lag_max 9 with lag_min 2; NaN.
    //
    // Expect
    // ------
    // - [-9, 9]; InvalidLagBounds twice.
    fn lag_bounds_default_and_validate() {
        // Arrange / Act
        let symmetric = LagBounds::new(9.0, None);
        let inverted = LagBounds::new(9.0, Some(2.0));
        let nan = LagBounds::new(f64::NAN, None);

        // Assert
        assert_eq!(symmetric, Ok(LagBounds { lag_max: 9.0, lag_min: -9.0 }));
        assert!(matches!(inverted, Err(RegressorError::InvalidLagBounds { .. })));
        assert!(matches!(nan, Err(RegressorError::InvalidLagBounds { .. })));
    }

    #[test]
    fn zero_lag_max_counts_as_absent() {
        let opts = PhysioOptions { lag_max: Some(0.0), ..PhysioOptions::default() };
        assert_eq!(opts.lag_bounds(), Ok(None));
    }
}
