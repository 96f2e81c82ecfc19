//! signal::normalize — per-timeseries centring and percentage change.
//!
//! Both helpers treat the last axis as time and work lane by lane, so a
//! single trace and a bank of traces (one per row) go through the same code.

use ndarray::{Array, ArrayBase, Axis, Data, Dimension};

fn last_axis<D: Dimension>(dim: &D) -> Option<Axis> {
    dim.ndim().checked_sub(1).map(Axis)
}

/// Subtract each timeseries' own mean along the last axis.
///
/// Empty lanes are left empty; a 0-d input is returned unchanged.
pub fn demean<S, D>(ts: &ArrayBase<S, D>) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let mut out = ts.to_owned();
    let Some(axis) = last_axis(&out.raw_dim()) else {
        return out;
    };
    for mut lane in out.lanes_mut(axis) {
        if let Some(mean) = lane.mean() {
            lane.mapv_inplace(|v| v - mean);
        }
    }
    out
}

/// Signal percentage change along the last axis.
///
/// Each timeseries becomes `(ts − mean) / mean`; timeseries with a zero
/// mean are divided by 1 instead. Any NaN in the result is replaced by 0.
pub fn spc<S, D>(ts: &ArrayBase<S, D>) -> Array<f64, D>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let mut out = ts.to_owned();
    let Some(axis) = last_axis(&out.raw_dim()) else {
        return out;
    };
    for mut lane in out.lanes_mut(axis) {
        let Some(mean) = lane.mean() else {
            continue;
        };
        let denom = if mean == 0.0 { 1.0 } else { mean };
        lane.mapv_inplace(|v| {
            let r = (v - mean) / denom;
            if r.is_nan() { 0.0 } else { r }
        });
    }
    out
}
