//! signal::hrf — canonical haemodynamic response function.
//!
//! Purpose
//! -------
//! Synthesize the canonical double-gamma HRF sampled at an arbitrary
//! frequency, for convolving PetCO2 traces into PetCO2hrf.
//!
//! Key behaviors
//! -------------
//! - Evaluates `(Γpdf(t; 6, 1) − Γpdf(t; 16, 1) / 6) / dt` on a grid that
//!   oversamples the target rate 16×, then keeps every 16th grid point, so
//!   the output is sampled at `freq` over `0..=32` seconds.
//! - Replaces exact zeros with a strictly positive floor
//!   `max(1e-9 · min{h > 10ε}, 10ε)` and normalises the peak to exactly 1.
//!
//! Invariants & assumptions
//! ------------------------
//! - Output length is `int(32 / RT + 1)` with `RT = 1 / freq`: 1281 at
//!   40 Hz, 3201 at 100 Hz, 161 at 5 Hz.
//! - `max(hrf) == 1.0` exactly; no sample is exactly 0.
//! - The peak sits at ~5 s, so its index scales linearly with `freq`.
//!
//! Conventions
//! -----------
//! - Gamma densities use shape/rate parameterisation via
//!   `statrs::distribution::Gamma`; scale 1 ⇒ rate 1.

use ndarray::Array1;
use statrs::distribution::{Continuous, Gamma};

use crate::signal::{errors::SignalResult, validation::validate_frequency};

/// Oversampling factor of the evaluation grid relative to the target rate.
const FMRI_T: f64 = 16.0;
/// Response support in seconds.
const LENGTH_S: f64 = 32.0;
/// Onset delay in seconds.
const ONSET_S: f64 = 0.0;
/// Shape of the positive lobe.
const PEAK_SHAPE: f64 = 6.0;
/// Shape of the undershoot.
const UNDERSHOOT_SHAPE: f64 = 16.0;
/// Peak-to-undershoot amplitude ratio.
const UNDERSHOOT_RATIO: f64 = 6.0;
/// Shared gamma scale (seconds).
const DISPERSION: f64 = 1.0;

/// Canonical HRF sampled at `freq` Hz, peak-normalised to 1.
///
/// Errors
/// ------
/// - `SignalError::InvalidFrequency` for a non-positive or non-finite `freq`.
/// - `SignalError::GammaParam` if statrs rejects the gamma parameters
///   (cannot happen with the fixed constants above).
pub fn create_hrf(freq: f64) -> SignalResult<Array1<f64>> {
    validate_frequency(freq)?;

    let rt = 1.0 / freq;
    let dt = rt / FMRI_T;
    let onset = ONSET_S / dt;

    let peak = Gamma::new(PEAK_SHAPE / DISPERSION, 1.0 / DISPERSION)?;
    let undershoot = Gamma::new(UNDERSHOOT_SHAPE / DISPERSION, 1.0 / DISPERSION)?;

    let n = (LENGTH_S / rt + 1.0) as usize;
    let mut hrf = Array1::from_iter((0..n).map(|k| {
        let u = (k as f64) * FMRI_T - onset;
        let t = u * dt;
        (peak.pdf(t) - undershoot.pdf(t) / UNDERSHOOT_RATIO) / dt
    }));

    let floor_eps = 10.0 * f64::EPSILON;
    let smallest = hrf.iter().copied().filter(|&h| h > floor_eps).fold(f64::INFINITY, f64::min);
    let min_hrf = if smallest.is_finite() { (1e-9 * smallest).max(floor_eps) } else { floor_eps };
    hrf.mapv_inplace(|h| if h == 0.0 { min_hrf } else { h });

    let max = hrf.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    hrf.mapv_inplace(|h| h / max);
    Ok(hrf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argmax(values: &Array1<f64>) -> usize {
        let mut best = 0;
        for (i, &v) in values.iter().enumerate() {
            if v > values[best] {
                best = i;
            }
        }
        best
    }

    #[test]
    // Purpose
    // -------
    // Pin the HRF length for the default and a few custom rates.
    //
    // Given
    // -----
    // - freq = 40, 100 and 5 Hz.
    //
    // Expect
    // ------
    // - Lengths 1281, 3201 and 161.
    fn create_hrf_length_follows_support_and_rate() {
        // Arrange / Act
        let default = create_hrf(40.0).unwrap();
        let fast = create_hrf(100.0).unwrap();
        let slow = create_hrf(5.0).unwrap();

        // Assert
        assert_eq!(default.len(), 1281);
        assert_eq!(fast.len(), 3201);
        assert_eq!(slow.len(), 161);
    }

    #[test]
    fn create_hrf_peak_is_exactly_one_and_nothing_is_zero() {
        let hrf = create_hrf(40.0).unwrap();
        let max = hrf.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(max, 1.0);
        assert!(hrf.iter().all(|&h| h != 0.0));
        assert!(hrf[0] > 0.0, "onset sample must be floored to a positive value");
    }

    #[test]
    // Purpose
    // -------
    // The peak lands at 5 s, so its index scales with the frequency.
    //
    // Given
    // -----
    // - freq = 1 Hz and 5 Hz.
    //
    // Expect
    // ------
    // - Peak indices 5 and 25 (ratio 5).
    fn create_hrf_peak_index_scales_with_frequency() {
        // Arrange / Act
        let one = create_hrf(1.0).unwrap();
        let five = create_hrf(5.0).unwrap();

        // Assert
        assert_eq!(argmax(&one), 5);
        assert_eq!(argmax(&five), 25);
    }

    #[test]
    fn create_hrf_rejects_invalid_frequency() {
        assert!(create_hrf(0.0).is_err());
        assert!(create_hrf(f64::INFINITY).is_err());
    }
}
