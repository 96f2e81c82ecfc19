//! signal — resampling, envelopes and response convolution.
//!
//! Purpose
//! -------
//! Collect the 1-D signal-processing building blocks of the regressor
//! pipeline: moving traces between sampling rates, reconstructing the
//! end-tidal envelope of a CO2 trace, and convolving it with a response
//! kernel.
//!
//! Key behaviors
//! -------------
//! - [`resample`]: linear resampling by sample count or by frequency, with
//!   the exact output-length rule in [`resampled_len`].
//! - [`envelope`]: [`endtidal_interpolation`] through detected peaks.
//! - [`hrf`], [`response`], [`convolve`]: canonical HRF synthesis, kernel
//!   specification/resolution, and the rescaled convolution
//!   [`convolve_signal`].
//! - [`normalize`]: [`demean`] and [`spc`] along the last axis.
//! - [`filter`]: zero-phase Butterworth band-pass [`filter_signal`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Every public routine validates its inputs via [`validation`] and
//!   reports failures as [`SignalError`]; nothing here panics on user data.
//! - Routines are pure functions of their inputs, except that kernel
//!   resolution may read a file and report progress to a
//!   [`DiagnosticSink`](crate::diagnostics::DiagnosticSink).
//!
//! Downstream usage
//! ----------------
//! - The `regressors` subtree composes these routines; Rust callers
//!   typically import the surface through [`prelude`]:
//!
//!   ```rust
//!   use cvr_regressors::signal::prelude::*;
//!   ```

pub mod convolve;
pub mod envelope;
pub mod errors;
pub mod filter;
pub mod hrf;
pub mod interp;
pub mod normalize;
pub mod resample;
pub mod response;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::convolve::{ConvolveMode, Convolution, convolve_signal};
pub use self::envelope::endtidal_interpolation;
pub use self::errors::{SignalError, SignalResult};
pub use self::filter::{BandPass, filter_along, filter_signal};
pub use self::hrf::create_hrf;
pub use self::interp::{LinearInterpolator, linspace};
pub use self::normalize::{demean, spc};
pub use self::resample::{
    resample_freqs_along, resample_samples_along, resample_signal_freqs, resample_signal_samples,
    resampled_len,
};
pub use self::response::{
    NamedResponse, ResponseFunction, ResponseProvider, StandardResponses, resolve_response,
};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::convolve::{ConvolveMode, Convolution, convolve_signal};
    pub use super::envelope::endtidal_interpolation;
    pub use super::errors::{SignalError, SignalResult};
    pub use super::filter::{BandPass, filter_signal};
    pub use super::hrf::create_hrf;
    pub use super::resample::{resample_signal_freqs, resample_signal_samples};
    pub use super::response::{NamedResponse, ResponseFunction, ResponseProvider};
}
