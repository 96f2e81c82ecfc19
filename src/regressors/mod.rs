//! regressors — CVR regressor pipeline.
//!
//! Purpose
//! -------
//! Compose the `signal`, `stats` and `io` building blocks into the two
//! pipeline entry points:
//!
//! 1. [`compute_petco2hrf`]: raw trace + end-tidal peaks → PetCO2hrf.
//! 2. [`create_physio_regressor`]: PetCO2hrf + functional average →
//!    bulk-shifted regressor and (optionally) a dense lag bank.
//!
//! Key behaviors
//! -------------
//! - [`bulk_shift`]: trial-aware cross-correlation search and the
//!   alignment guard.
//! - [`lag_bank`]: sliding windows around the bulk shift, one per sample
//!   lag, padded with the trace mean and resampled to the functional rate.
//! - [`options`]: option structs with defaults and the
//!   [`PipelineContext`] of collaborators (writer, plotter, diagnostics,
//!   response provider).
//!
//! Invariants & assumptions
//! ------------------------
//! - Three time bases are in play: the regressor frequency `freq`, the
//!   functional repetition time `tr`, and the lag resolution of one sample
//!   at `freq`. Shifts and lags are sample counts at `freq` unless a name
//!   says seconds.
//! - Entry points never panic on user input; failures are
//!   [`RegressorError`]s and recoverable conditions are warning
//!   diagnostics.
//!
//! Downstream usage
//! ----------------
//! ```rust,no_run
//! use std::path::Path;
//! use cvr_regressors::diagnostics::LogSink;
//! use cvr_regressors::io::{NoPlots, TextWriter};
//! use cvr_regressors::regressors::prelude::*;
//! # fn run(co2: ndarray::ArrayViewD<f64>, peaks: &[usize], func: ndarray::ArrayViewD<f64>)
//! # -> Result<(), RegressorError> {
//! let (mut writer, mut plotter, mut sink) = (TextWriter, NoPlots, LogSink);
//! let mut ctx = PipelineContext::new(&mut writer, &mut plotter, &mut sink);
//! let out = Path::new("out/sub-01");
//! let petco2hrf = compute_petco2hrf(co2, peaks, 40.0, out, &PetCO2Options::default(), &mut ctx)?;
//! let opts = PhysioOptions { lag_max: Some(9.0), ..PhysioOptions::default() };
//! let regressors = create_physio_regressor(func, petco2hrf.view(), 1.5, 40.0, out, &opts, &mut ctx)?;
//! # let _ = regressors;
//! # Ok(())
//! # }
//! ```

pub mod bulk_shift;
pub mod errors;
pub mod lag_bank;
pub mod options;
pub mod petco2;
pub mod physio;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::bulk_shift::{
    BulkShift, SearchWindow, TrialStructure, check_alignment, estimate_bulk_shift,
};
pub use self::errors::{RegressorError, RegressorResult};
pub use self::lag_bank::{LagBank, build_lag_bank, extract_lag_windows, shift_counts};
pub use self::options::{LagBounds, PetCO2Options, PhysioOptions, PipelineContext};
pub use self::petco2::compute_petco2hrf;
pub use self::physio::{PhysioRegressors, create_physio_regressor, lag_bank_prefix};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::bulk_shift::TrialStructure;
    pub use super::errors::{RegressorError, RegressorResult};
    pub use super::lag_bank::LagBank;
    pub use super::options::{LagBounds, PetCO2Options, PhysioOptions, PipelineContext};
    pub use super::petco2::compute_petco2hrf;
    pub use super::physio::{PhysioRegressors, create_physio_regressor};
}
