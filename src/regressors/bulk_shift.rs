//! regressors::bulk_shift — coarse alignment of regressor and functional signal.
//!
//! Purpose
//! -------
//! Estimate the single sample offset ("bulk shift") at which PetCO2hrf best
//! matches the functional average, both sampled at the regressor
//! frequency, and check that the regressor is long enough to be sliced
//! there.
//!
//! Key behaviors
//! -------------
//! - [`TrialStructure::search_window`] restricts the search for block
//!   designs: with more than 3 trials the first trial is left out of the
//!   match (`first_tp = int(trial_len · freq)`), with more than 4 the last
//!   one is too (`n_shifts = first_tp · (n_trials − 2)`).
//! - [`estimate_bulk_shift`] cross-correlates `func[first_tp..]` against
//!   the regressor starting at `first_tp` and takes the arg-max index as
//!   the shift.
//! - [`check_alignment`] is the fatal guard applied before slicing.
//!
//! Invariants & assumptions
//! ------------------------
//! - The shift is a sample count at the regressor frequency; a positive
//!   shift means the regressor leads the functional signal.
//! - Only-one-of trial length / trial count is a recoverable condition:
//!   a warning is emitted and the whole signal is used.

use ndarray::ArrayView1;

use crate::{
    diagnostics::DiagnosticSink,
    regressors::errors::{RegressorError, RegressorResult},
    stats::{XCorr, x_corr},
};

/// Trial layout of a block-design acquisition. Zero values count as absent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrialStructure {
    /// Length of one trial in seconds.
    pub trial_len: Option<f64>,
    /// Number of trials in the acquisition.
    pub n_trials: Option<usize>,
}

/// Portion of the signals the bulk-shift search looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchWindow {
    /// Samples skipped at the start of both signals.
    pub first_tp: usize,
    /// Number of candidate shifts; `None` for all that fit.
    pub n_shifts: Option<usize>,
}

impl TrialStructure {
    pub fn new(trial_len: Option<f64>, n_trials: Option<usize>) -> Self {
        TrialStructure { trial_len, n_trials }
    }

    fn given_len(&self) -> Option<f64> {
        self.trial_len.filter(|&len| len != 0.0)
    }

    fn given_trials(&self) -> Option<usize> {
        self.n_trials.filter(|&n| n != 0)
    }

    /// Search window at `freq` Hz, reporting the decision to `sink`.
    pub fn search_window(&self, freq: f64, sink: &mut dyn DiagnosticSink) -> SearchWindow {
        let mut window = SearchWindow::default();
        match (self.given_len(), self.given_trials()) {
            (Some(trial_len), Some(n_trials)) => {
                sink.info(format!("Specified {n_trials} trials lasting {trial_len} seconds"));
                if n_trials > 3 {
                    sink.info("Ignoring first trial to improve bulk shift estimation".to_string());
                    window.first_tp = (trial_len * freq) as usize;
                } else {
                    sink.info("Using all trials for bulk shift estimation".to_string());
                }
                if n_trials > 4 {
                    sink.info("Ignoring last trial to improve bulk shift estimation".to_string());
                    window.n_shifts = Some(window.first_tp * (n_trials - 2));
                }
            }
            (Some(_), None) => sink.warn(
                "The length of trial was specified, but the number of trials was not. \
                 Using all available trials for bulk shift estimation"
                    .to_string(),
            ),
            (None, Some(_)) => sink.warn(
                "The number of trials was specified, but the length of trial was not. \
                 Using all available trials for bulk shift estimation"
                    .to_string(),
            ),
            (None, None) => sink.info("Using all trials for bulk shift estimation.".to_string()),
        }
        window
    }
}

/// Outcome of the bulk-shift stage.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkShift {
    /// Shift in samples at the regressor frequency.
    pub shift: usize,
    /// Shift in seconds.
    pub seconds: f64,
    /// Cross-correlation result; `None` when the search was skipped.
    pub xcorr: Option<XCorr>,
}

impl BulkShift {
    /// A fixed shift that was not estimated.
    pub fn fixed(shift: usize, freq: f64) -> Self {
        BulkShift { shift, seconds: shift as f64 / freq, xcorr: None }
    }
}

/// Estimate the bulk shift of `petco2hrf` relative to `func_upsampled`.
///
/// Parameters
/// ----------
/// - `func_upsampled`: `ArrayView1<f64>`
///   Functional average resampled to `freq`.
/// - `petco2hrf`: `ArrayView1<f64>`
///   Regressor at `freq`, longer than the functional signal.
/// - `freq`: `f64`
/// - `trial`: `&TrialStructure`
/// - `abs_xcorr`: `bool`
///   Select by absolute correlation.
/// - `sink`: `&mut dyn DiagnosticSink`
///
/// Errors
/// ------
/// - `RegressorError::XCorr` for any cross-correlation failure, e.g. when
///   the functional signal is longer than the regressor.
pub fn estimate_bulk_shift(
    func_upsampled: ArrayView1<'_, f64>, petco2hrf: ArrayView1<'_, f64>, freq: f64,
    trial: &TrialStructure, abs_xcorr: bool, sink: &mut dyn DiagnosticSink,
) -> RegressorResult<BulkShift> {
    let window = trial.search_window(freq, sink);
    let first_tp = window.first_tp.min(func_upsampled.len());
    let func_cut = func_upsampled.slice(ndarray::s![first_tp..]);

    let xcorr = x_corr(func_cut, petco2hrf, window.n_shifts, first_tp, abs_xcorr, sink)?;
    let shift = xcorr.index;
    let seconds = shift as f64 / freq;
    sink.info(format!("Cross correlation estimated a bulk shift of {seconds} seconds"));

    Ok(BulkShift { shift, seconds, xcorr: Some(xcorr) })
}

/// Check that `regr[shift .. shift + func_len]` exists.
///
/// Errors
/// ------
/// - `RegressorError::AlignmentOverflow` when `shift + func_len > regr_len`.
pub fn check_alignment(shift: usize, func_len: usize, regr_len: usize) -> RegressorResult<()> {
    if shift + func_len > regr_len {
        return Err(RegressorError::AlignmentOverflow { shift, func_len, regr_len });
    }
    Ok(())
}
