//! stats — correlation primitives for lag estimation.
//!
//! Currently a single routine, [`x_corr`], the sliding Pearson
//! cross-correlation that the bulk-shift search is built on, together with
//! its error type [`XCorrError`].

pub mod errors;
pub mod xcorr;

pub use self::errors::{XCorrError, XCorrResult};
pub use self::xcorr::{XCorr, x_corr};
