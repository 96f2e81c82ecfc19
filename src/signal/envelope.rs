//! signal::envelope — end-tidal envelope reconstruction.
//!
//! Draws the curve through `(peak, trace[peak])` for every detected
//! end-tidal peak and samples it at every index of the trace. Peaks are
//! sorted and deduplicated first, so detector output can be passed
//! straight through.

use ndarray::{Array1, ArrayView1};

use crate::signal::{
    errors::{SignalError, SignalResult},
    interp::LinearInterpolator,
    validation::validate_series,
};

/// End-tidal interpolation of `trace` through the samples at `peaks`.
///
/// Parameters
/// ----------
/// - `trace`: `ArrayView1<f64>`
///   Raw physiological trace (e.g. CO2), finite.
/// - `peaks`: `&[usize]`
///   Indices of the end-tidal peaks. Order and duplicates do not matter.
///
/// Returns
/// -------
/// `SignalResult<Array1<f64>>`
///   Same length as `trace`. Linear between peaks and extrapolated from the
///   first/last pair of peaks outside them. At every peak index the output
///   equals `trace[peak]` exactly.
///
/// Errors
/// ------
/// - `SignalError::PeakOutOfRange` when a peak does not address the trace.
/// - `SignalError::InsufficientPeaks` when fewer than two distinct peaks
///   remain after deduplication.
/// - Series errors from validation (empty or non-finite trace).
pub fn endtidal_interpolation(trace: ArrayView1<'_, f64>, peaks: &[usize]) -> SignalResult<Array1<f64>> {
    validate_series(trace, 1)?;
    let len = trace.len();

    let mut support = peaks.to_vec();
    support.sort_unstable();
    support.dedup();

    if let Some(&index) = support.iter().find(|&&p| p >= len) {
        return Err(SignalError::PeakOutOfRange { index, len });
    }
    if support.len() < 2 {
        return Err(SignalError::InsufficientPeaks { found: support.len() });
    }

    let x: Vec<f64> = support.iter().map(|&p| p as f64).collect();
    let y: Vec<f64> = support.iter().map(|&p| trace[p]).collect();
    let interp = LinearInterpolator::new(x, y)?;

    Ok(Array1::from_iter((0..len).map(|i| interp.eval(i as f64))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // The envelope must pass exactly through the trace at each peak.
    //
    // Given
    // -----
    // - A noisy-looking trace and peaks at 1, 4, 6 (with awkward slopes
    //   that do not divide evenly).
    //
    // Expect
    // ------
    // - out[p] == trace[p] bit-for-bit for every peak.
    fn envelope_reproduces_trace_at_peaks() {
        // Arrange
        let trace = array![0.3, 1.7, 0.2, 0.1, 2.9, 0.4, 1.1, 0.0];
        let peaks = [1, 4, 6];

        // Act
        let out = endtidal_interpolation(trace.view(), &peaks).unwrap();

        // Assert
        assert_eq!(out.len(), trace.len());
        for &p in &peaks {
            assert_eq!(out[p], trace[p]);
        }
    }

    #[test]
    // Purpose
    // -------
    // Unsorted and duplicated peaks must be accepted and give the same
    // envelope as their sorted, deduplicated form.
    //
    // Given
    // -----
    // - Peaks [6, 1, 4, 4, 1] vs [1, 4, 6].
    //
    // Expect
    // ------
    // - Identical outputs.
    fn envelope_ignores_peak_order_and_duplicates() {
        // Arrange
        let trace = array![0.3, 1.7, 0.2, 0.1, 2.9, 0.4, 1.1, 0.0];

        // Act
        let messy = endtidal_interpolation(trace.view(), &[6, 1, 4, 4, 1]).unwrap();
        let clean = endtidal_interpolation(trace.view(), &[1, 4, 6]).unwrap();

        // Assert
        assert_eq!(messy, clean);
    }

    #[test]
    fn envelope_extrapolates_linearly_at_both_ends() {
        let trace = array![9.0, 1.0, 9.0, 3.0, 9.0];
        let out = endtidal_interpolation(trace.view(), &[1, 3]).unwrap();
        // Slope (3 - 1) / 2 = 1 through (1, 1) and (3, 3).
        assert_relative_eq!(out[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(out[2], 2.0, epsilon = 1e-12);
        assert_relative_eq!(out[4], 4.0, epsilon = 1e-12);
    }

    #[test]
    fn envelope_rejects_single_peak_and_out_of_range_peak() {
        let trace = array![1.0, 2.0, 3.0];
        assert_eq!(
            endtidal_interpolation(trace.view(), &[1, 1]),
            Err(SignalError::InsufficientPeaks { found: 1 })
        );
        assert_eq!(
            endtidal_interpolation(trace.view(), &[0, 3]),
            Err(SignalError::PeakOutOfRange { index: 3, len: 3 })
        );
    }
}
