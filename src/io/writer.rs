//! io::writer — persistence seam for exported regressors.
//!
//! Purpose
//! -------
//! Decouple the pipeline from the filesystem. Pipeline stages hand every
//! artifact (PetCO2 trace, optimal shift, single regressor, lag bank) to an
//! [`ArtifactWriter`]; whether it lands on disk or in memory is the
//! caller's choice.
//!
//! Key behaviors
//! -------------
//! - [`TextWriter`] writes space-delimited text through the `csv` writer:
//!   one value per line for series, one row per line for matrices,
//!   creating missing parent directories.
//! - [`MemoryWriter`] records artifacts by path, for tests and for callers
//!   that post-process results without touching the disk.
//!
//! Conventions
//! -----------
//! - `precision` is the number of decimals in fixed-point notation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, WriterBuilder};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::io::errors::{IoError, IoResult};

/// Destination for pipeline artifacts.
pub trait ArtifactWriter {
    /// Persist a 1-D series, one value per line.
    fn write_series(
        &mut self, path: &Path, values: ArrayView1<'_, f64>, precision: usize,
    ) -> IoResult<()>;

    /// Persist a matrix, one row per line.
    fn write_matrix(
        &mut self, path: &Path, values: ArrayView2<'_, f64>, precision: usize,
    ) -> IoResult<()>;

    /// Persist free-form text verbatim.
    fn write_text(&mut self, path: &Path, text: &str) -> IoResult<()>;
}

/// Writes artifacts as whitespace-delimited text files.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextWriter;

impl TextWriter {
    fn ensure_parent(path: &Path) -> IoResult<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                std::fs::create_dir_all(parent).map_err(|err| IoError::io(parent, err))
            }
            _ => Ok(()),
        }
    }

    fn write_rows<'a>(
        path: &Path, rows: impl Iterator<Item = ArrayView1<'a, f64>>, precision: usize,
    ) -> IoResult<()> {
        Self::ensure_parent(path)?;
        let mut writer = WriterBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .quote_style(QuoteStyle::Never)
            .from_path(path)
            .map_err(|err| IoError::csv(path, err))?;
        for row in rows {
            let record = row.iter().map(|v| format!("{v:.precision$}"));
            writer.write_record(record).map_err(|err| IoError::csv(path, err))?;
        }
        writer.flush().map_err(|err| IoError::io(path, err))
    }
}

impl ArtifactWriter for TextWriter {
    fn write_series(
        &mut self, path: &Path, values: ArrayView1<'_, f64>, precision: usize,
    ) -> IoResult<()> {
        let column = values.insert_axis(ndarray::Axis(1));
        Self::write_rows(path, column.rows().into_iter(), precision)
    }

    fn write_matrix(
        &mut self, path: &Path, values: ArrayView2<'_, f64>, precision: usize,
    ) -> IoResult<()> {
        Self::write_rows(path, values.rows().into_iter(), precision)
    }

    fn write_text(&mut self, path: &Path, text: &str) -> IoResult<()> {
        Self::ensure_parent(path)?;
        std::fs::write(path, text).map_err(|err| IoError::io(path, err))
    }
}

/// Artifact captured by [`MemoryWriter`].
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    Series(Array1<f64>),
    Matrix(Array2<f64>),
    Text(String),
}

/// Keeps every artifact in memory, keyed by its destination path.
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    pub artifacts: BTreeMap<PathBuf, Artifact>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&Artifact> {
        self.artifacts.get(path.as_ref())
    }

    pub fn paths(&self) -> Vec<&Path> {
        self.artifacts.keys().map(PathBuf::as_path).collect()
    }
}

impl ArtifactWriter for MemoryWriter {
    fn write_series(&mut self, path: &Path, values: ArrayView1<'_, f64>, _: usize) -> IoResult<()> {
        self.artifacts.insert(path.to_path_buf(), Artifact::Series(values.to_owned()));
        Ok(())
    }

    fn write_matrix(&mut self, path: &Path, values: ArrayView2<'_, f64>, _: usize) -> IoResult<()> {
        self.artifacts.insert(path.to_path_buf(), Artifact::Matrix(values.to_owned()));
        Ok(())
    }

    fn write_text(&mut self, path: &Path, text: &str) -> IoResult<()> {
        self.artifacts.insert(path.to_path_buf(), Artifact::Text(text.to_string()));
        Ok(())
    }
}
