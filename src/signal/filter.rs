//! signal::filter — zero-phase Butterworth band-pass.
//!
//! Purpose
//! -------
//! Band-limit functional or physiological timeseries sampled once per `tr`
//! seconds, typically to the slow 0.02–0.04 Hz range where CO2-driven BOLD
//! fluctuations live.
//!
//! Key behaviors
//! -------------
//! - Cut-offs are given in Hz and normalised by the Nyquist frequency
//!   `1 / (2 · tr)` before design.
//! - The filter is designed as second-order sections and applied forward
//!   and backward, so the output has no phase shift and the magnitude
//!   response is squared.
//! - [`filter_along`] applies the same design to every lane of a matrix.
//!
//! Invariants & assumptions
//! ------------------------
//! - Output length equals input length.
//! - Inputs must be longer than the edge padding of the forward-backward
//!   pass, `3 · (2 · sections + 1)` samples.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use sci_rs::signal::filter::{
    design::{DigitalFilter, FilterBandType, FilterOutputType, Sos, butter_dyn},
    sosfiltfilt_dyn,
};

use crate::signal::{
    errors::{SignalError, SignalResult},
    validation::{validate_frequency, validate_series},
};

/// Butterworth band-pass settings. Cut-offs in Hz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandPass {
    pub lowcut: f64,
    pub highcut: f64,
    pub order: usize,
}

impl Default for BandPass {
    fn default() -> Self {
        BandPass { lowcut: 0.02, highcut: 0.04, order: 9 }
    }
}

impl BandPass {
    pub fn new(lowcut: f64, highcut: f64, order: usize) -> Self {
        BandPass { lowcut, highcut, order }
    }

    /// Second-order sections for a signal sampled every `tr` seconds.
    ///
    /// Errors
    /// ------
    /// - `SignalError::InvalidFrequency` when `1 / tr` is not a valid rate.
    /// - `SignalError::InvalidFilterOrder` for `order == 0`.
    /// - `SignalError::InvalidBand` unless `0 < lowcut < highcut < nyquist`.
    /// - `SignalError::FilterDesign` if the design yields no sections.
    pub fn sections(&self, tr: f64) -> SignalResult<Vec<Sos<f64>>> {
        let fs = 1.0 / tr;
        validate_frequency(fs)?;
        if self.order == 0 {
            return Err(SignalError::InvalidFilterOrder { order: self.order });
        }
        let nyquist = fs / 2.0;
        let valid = self.lowcut.is_finite()
            && self.highcut.is_finite()
            && self.lowcut > 0.0
            && self.lowcut < self.highcut
            && self.highcut < nyquist;
        if !valid {
            return Err(SignalError::InvalidBand {
                lowcut: self.lowcut,
                highcut: self.highcut,
                nyquist,
            });
        }

        let design = butter_dyn(
            self.order,
            vec![self.lowcut / nyquist, self.highcut / nyquist],
            Some(FilterBandType::Bandpass),
            Some(false),
            Some(FilterOutputType::Sos),
            None,
        );
        let DigitalFilter::Sos(sections) = design else {
            return Err(SignalError::FilterDesign {
                reason: "expected second-order sections".to_string(),
            });
        };
        if sections.sos.is_empty() {
            return Err(SignalError::FilterDesign { reason: "no sections designed".to_string() });
        }
        Ok(sections.sos)
    }
}

/// Minimum lane length accepted by the forward-backward pass.
fn min_len(sections: &[Sos<f64>]) -> usize {
    3 * (2 * sections.len() + 1) + 1
}

fn apply(lane: ArrayView1<'_, f64>, sections: &[Sos<f64>]) -> SignalResult<Array1<f64>> {
    validate_series(lane, min_len(sections))?;
    Ok(Array1::from(sosfiltfilt_dyn(lane.iter(), sections)))
}

/// Band-pass `data`, sampled every `tr` seconds, forward and backward.
///
/// Errors
/// ------
/// - Every design error of [`BandPass::sections`].
/// - `SignalError::EmptySeries`, `SignalError::TooShort` or
///   `SignalError::NonFiniteData` for unusable input.
pub fn filter_signal(data: ArrayView1<'_, f64>, tr: f64, band: &BandPass) -> SignalResult<Array1<f64>> {
    let sections = band.sections(tr)?;
    apply(data, &sections)
}

/// Band-pass every lane of `data` along `axis` with one shared design.
pub fn filter_along(
    data: ArrayView2<'_, f64>, tr: f64, band: &BandPass, axis: Axis,
) -> SignalResult<Array2<f64>> {
    let sections = band.sections(tr)?;
    let mut out = Array2::zeros(data.raw_dim());
    for (lane, mut target) in data.lanes(axis).into_iter().zip(out.lanes_mut(axis)) {
        target.assign(&apply(lane, &sections)?);
    }
    Ok(out)
}
