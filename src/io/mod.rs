//! io — text artifacts, export conventions and the plotting seam.
//!
//! Purpose
//! -------
//! Everything the pipeline reads from or hands to the outside world:
//! numeric text loaders for externally supplied kernels, the
//! [`ArtifactWriter`] seam used for every exported regressor, the
//! `{prefix}_{suffix}{ext}` export convention, and the [`Plotter`] seam
//! for diagnostic figures.
//!
//! Key behaviors
//! -------------
//! - [`load_array`] / [`load_matrix`] parse whitespace- or comma-separated
//!   text with `#` comments through the `csv` reader.
//! - [`TextWriter`] persists artifacts to disk; [`MemoryWriter`] keeps them
//!   in memory.
//! - [`export_regressor`] / [`export_series`] resample to the functional
//!   timepoint count, demean and write.
//!
//! Conventions
//! -----------
//! - Exported regressors use 6 decimals; the PetCO2 trace uses 18 and the
//!   optimal shift 4, matching the files downstream tools expect.

pub mod errors;
pub mod export;
pub mod plot;
pub mod text;
pub mod writer;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{IoError, IoResult};
pub use self::export::{
    artifact_path, export_regressor, export_series, prepare_regressor, prepare_series,
};
pub use self::plot::{NoPlots, PlotRequest, Plotter, RecordingPlotter};
pub use self::text::{load_array, load_matrix};
pub use self::writer::{Artifact, ArtifactWriter, MemoryWriter, TextWriter};

pub mod prelude {
    pub use super::errors::{IoError, IoResult};
    pub use super::plot::{NoPlots, Plotter};
    pub use super::writer::{ArtifactWriter, MemoryWriter, TextWriter};
}
