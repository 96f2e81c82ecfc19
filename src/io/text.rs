//! io::text — loaders for flat numeric text files (`.1D`, `.txt`, `.csv`).
//!
//! Purpose
//! -------
//! Read whitespace- or comma-separated numeric tables such as externally
//! supplied response kernels or previously exported regressors.
//!
//! Key behaviors
//! -------------
//! - Tabs and commas are treated like spaces; runs of separators collapse.
//! - Lines starting with `#` and blank lines are ignored.
//! - [`load_array`] accepts a single column or a single row and returns it
//!   as a 1-D array; [`load_matrix`] returns the full row-major table.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every returned value was parsed from the file; nothing is padded or
//!   defaulted. Rows of a matrix all have the same length.

use std::path::Path;

use csv::{ReaderBuilder, Trim};
use ndarray::{Array1, Array2};

use crate::io::errors::{IoError, IoResult};

/// Parse `path` into rows of floats, keeping the 1-based line of each row.
fn read_rows(path: &Path) -> IoResult<Vec<(u64, Vec<f64>)>> {
    let text = std::fs::read_to_string(path).map_err(|err| IoError::io(path, err))?;
    let normalised = text.replace([',', '\t'], " ");

    let mut reader = ReaderBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(Trim::All)
        .from_reader(normalised.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| IoError::csv(path, err))?;
        let line = record.position().map_or(0, |p| p.line());
        let row = record
            .iter()
            .filter(|field| !field.is_empty())
            .map(|field| {
                field.parse::<f64>().map_err(|_| IoError::Parse {
                    path: path.display().to_string(),
                    line,
                    field: field.to_string(),
                })
            })
            .collect::<IoResult<Vec<f64>>>()?;
        if !row.is_empty() {
            rows.push((line, row));
        }
    }

    if rows.is_empty() {
        return Err(IoError::EmptyFile { path: path.display().to_string() });
    }
    Ok(rows)
}

/// Load a numeric table from `path` as a row-major matrix.
///
/// Errors
/// ------
/// - `IoError::Io` / `IoError::Csv` when the file cannot be read.
/// - `IoError::Parse` for a non-numeric field.
/// - `IoError::EmptyFile` when no values remain after skipping comments.
/// - `IoError::RaggedRows` when a row's length differs from the first row.
pub fn load_matrix(path: impl AsRef<Path>) -> IoResult<Array2<f64>> {
    let path = path.as_ref();
    let rows = read_rows(path)?;
    let cols = rows[0].1.len();

    let mut flat = Vec::with_capacity(rows.len() * cols);
    for (line, row) in &rows {
        if row.len() != cols {
            return Err(IoError::RaggedRows {
                path: path.display().to_string(),
                line: *line,
                expected: cols,
                found: row.len(),
            });
        }
        flat.extend_from_slice(row);
    }

    let n_rows = rows.len();
    Array2::from_shape_vec((n_rows, cols), flat).map_err(|err| IoError::Csv {
        path: path.display().to_string(),
        reason: err.to_string(),
    })
}

/// Load a 1-D numeric array from `path`.
///
/// A single column and a single row are both accepted.
///
/// Errors
/// ------
/// - The errors of [`load_matrix`].
/// - `IoError::NotOneDimensional` when the file holds more than one row and
///   more than one column.
pub fn load_array(path: impl AsRef<Path>) -> IoResult<Array1<f64>> {
    let path = path.as_ref();
    let matrix = load_matrix(path)?;
    let (rows, cols) = matrix.dim();
    if rows > 1 && cols > 1 {
        return Err(IoError::NotOneDimensional { path: path.display().to_string(), rows, cols });
    }
    Ok(Array1::from_iter(matrix.iter().copied()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Column, row and matrix layouts with mixed separators and comments.
    // - Parse, ragged-row, empty-file and dimensionality failures.
    // -------------------------------------------------------------------------

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    // Purpose
    // -------
    // A column file with comments and blank lines loads as a 1-D array.
    //
    // Given
    // -----
    // - "# kernel", a blank line, then four values one per line.
    //
    // Expect
    // ------
    // - [0.0, 0.5, 1.0, -0.25].
    fn load_array_reads_column_and_skips_comments() {
        // Arrange
        let file = write_temp("# kernel\n\n0.0\n0.5\n  1.0\n-0.25\n");

        // Act
        let values = load_array(file.path()).unwrap();

        // Assert
        assert_eq!(values, array![0.0, 0.5, 1.0, -0.25]);
    }

    #[test]
    fn load_array_accepts_single_row_with_mixed_separators() {
        let file = write_temp("1.5,  2.5\t3.5   4.5\n");
        assert_eq!(load_array(file.path()).unwrap(), array![1.5, 2.5, 3.5, 4.5]);
    }

    #[test]
    fn load_matrix_reads_rows_in_order() {
        let file = write_temp("1 2 3\n4 5 6\n");
        assert_eq!(load_matrix(file.path()).unwrap(), array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    }

    #[test]
    fn load_array_rejects_matrix() {
        let file = write_temp("1 2\n3 4\n");
        assert!(matches!(
            load_array(file.path()),
            Err(IoError::NotOneDimensional { rows: 2, cols: 2, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Malformed content is reported with a typed error, never defaulted.
    //
    // Given
    // -----
    // - A non-numeric field, a ragged table and a comment-only file.
    //
    // Expect
    // ------
    // - Parse (naming the field), RaggedRows, EmptyFile respectively.
    fn loaders_report_malformed_content() {
        // Arrange
        let bad = write_temp("1.0\nabc\n");
        let ragged = write_temp("1 2 3\n4 5\n");
        let empty = write_temp("# nothing here\n\n");

        // Act / Assert
        assert!(matches!(
            load_array(bad.path()),
            Err(IoError::Parse { ref field, .. }) if field == "abc"
        ));
        assert!(matches!(
            load_matrix(ragged.path()),
            Err(IoError::RaggedRows { expected: 3, found: 2, .. })
        ));
        assert!(matches!(load_array(empty.path()), Err(IoError::EmptyFile { .. })));
    }

    #[test]
    fn load_array_reports_missing_file() {
        let result = load_array("/definitely/not/here.1D");
        assert!(matches!(result, Err(IoError::Io { .. })));
    }
}
