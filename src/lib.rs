//! cvr_regressors — CVR regressor synthesis and lag alignment for fMRI.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the regressor pipeline to Python via the `_cvr_regressors`
//! extension module. A raw physiological trace (typically exhaled CO2) is
//! turned into an end-tidal envelope, convolved with a haemodynamic
//! response, aligned with the functional signal by cross-correlation and
//! expanded into a bank of finely lagged regressors.
//!
//! Key behaviors
//! -------------
//! - [`signal`]: resampling, end-tidal interpolation, response kernels,
//!   convolution and normalisation.
//! - [`stats`]: normalised cross-correlation over a range of shifts.
//! - [`io`]: whitespace text matrices in and out, plot requests and
//!   artifact naming.
//! - [`regressors`]: the two pipeline entry points, `compute_petco2hrf`
//!   and `create_physio_regressor`.
//! - [`diagnostics`]: info/warning messages routed to `log` or collected
//!   for inspection.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; the items guarded by
//!   `python-bindings` perform only FFI glue, input conversion and error
//!   mapping.
//! - Python callers always get the built-in response kernels, a text
//!   writer, no plots and `log`-backed diagnostics.
//!
//! Conventions
//! -----------
//! - Python functions live under `_cvr_regressors.signal` and
//!   `_cvr_regressors.regressors` and are registered in `sys.modules` as
//!   `cvr_regressors.signal` / `cvr_regressors.regressors`.
//! - Errors from core Rust code are propagated as rich error types
//!   internally and converted to `PyErr` values at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on [`regressors`] and [`signal`]
//!   directly and ignore the PyO3 items.
//!
//! Testing notes
//! -------------
//! - Unit tests sit next to each module; the end-to-end scenario is in
//!   `tests/integration_cvr_pipeline.rs`.

pub mod diagnostics;
pub mod io;
pub mod regressors;
pub mod signal;
pub mod stats;
pub mod utils;

#[cfg(feature = "python-bindings")]
use std::path::PathBuf;

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyArray1, PyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    diagnostics::LogSink,
    io::{NoPlots, TextWriter},
    regressors::{
        PetCO2Options, PhysioOptions, PhysioRegressors, PipelineContext, TrialStructure,
    },
    signal::{ConvolveMode, StandardResponses},
    utils::{PyResponseFunction, extract_f64_array, extract_peaks},
};

/// PhysioRegressors — Python-facing result of `create_physio_regressor`.
///
/// Fields
/// ------
/// - `inner`: [`PhysioRegressors`]
///   The simple regressor, the optional lag bank and the bulk shift.
///
/// Notes
/// -----
/// - Getters copy into fresh numpy arrays on every access.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "cvr_regressors.regressors", name = "PhysioRegressors")]
pub struct PyPhysioRegressors {
    inner: PhysioRegressors,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyPhysioRegressors {
    #[getter]
    pub fn simple<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.simple.clone().into_pyarray(py)
    }

    /// Lag bank with one row per lag, or `None` when it was skipped.
    #[getter]
    pub fn lagged<'py>(&self, py: Python<'py>) -> Option<Bound<'py, PyArray2<f64>>> {
        self.inner.lagged.as_ref().map(|bank| bank.regressors.clone().into_pyarray(py))
    }

    #[getter]
    pub fn lags_seconds(&self) -> Option<Vec<f64>> {
        self.inner
            .lagged
            .as_ref()
            .map(|bank| (0..bank.n_lags()).map(|row| bank.lag_seconds(row)).collect())
    }

    #[getter]
    pub fn bulk_shift(&self) -> usize {
        self.inner.bulk_shift.shift
    }

    #[getter]
    pub fn bulk_shift_seconds(&self) -> f64 {
        self.inner.bulk_shift.seconds
    }

    /// Cross-correlation curve of the bulk-shift search, if one ran.
    #[getter]
    pub fn xcorr<'py>(&self, py: Python<'py>) -> Option<Bound<'py, PyArray1<f64>>> {
        self.inner.bulk_shift.xcorr.as_ref().map(|x| x.curve.clone().into_pyarray(py))
    }
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (freq = 40.0))]
fn create_hrf<'py>(py: Python<'py>, freq: f64) -> PyResult<Bound<'py, PyArray1<f64>>> {
    Ok(signal::create_hrf(freq)?.into_pyarray(py))
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
fn resample_signal_samples<'py>(
    py: Python<'py>, ts: &Bound<'py, PyAny>, samples: usize,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let ts = extract_f64_array(py, ts)?;
    Ok(signal::resample_signal_samples(ts.as_array(), samples)?.into_pyarray(py))
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
fn resample_signal_freqs<'py>(
    py: Python<'py>, ts: &Bound<'py, PyAny>, freq1: f64, freq2: f64,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let ts = extract_f64_array(py, ts)?;
    Ok(signal::resample_signal_freqs(ts.as_array(), freq1, freq2)?.into_pyarray(py))
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
fn endtidal_interpolation<'py>(
    py: Python<'py>, trace: &Bound<'py, PyAny>, peaks: &Bound<'py, PyAny>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let trace = extract_f64_array(py, trace)?;
    let peaks = extract_peaks(peaks)?;
    Ok(signal::endtidal_interpolation(trace.as_array(), &peaks)?.into_pyarray(py))
}

/// Convolve `signal` with `response_function` and rescale into the input
/// range; returns the input unchanged when `response_function` is `None`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (
    signal,
    freq,
    response_function = PyResponseFunction(signal::ResponseFunction::Hrf),
    mode = "full",
))]
fn convolve_signal<'py>(
    py: Python<'py>, signal: &Bound<'py, PyAny>, freq: f64, response_function: PyResponseFunction,
    mode: &str,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let data = extract_f64_array(py, signal)?;
    let mode: ConvolveMode = mode.parse()?;
    let responses = StandardResponses::default();
    let mut sink = LogSink;
    let out = signal::convolve_signal(
        data.as_array().into_dyn(),
        freq,
        &response_function.0,
        mode,
        Some(&responses),
        &mut sink,
    )?;
    Ok(out.into_inner().into_pyarray(py))
}

#[cfg(feature = "python-bindings")]
#[pyfunction]
fn spc<'py>(py: Python<'py>, ts: &Bound<'py, PyAny>) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let ts = extract_f64_array(py, ts)?;
    Ok(signal::spc(&ts.as_array()).into_pyarray(py))
}

/// Zero-phase Butterworth band-pass of a series sampled every `tr` seconds.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (data, tr, lowcut = 0.02, highcut = 0.04, order = 9))]
fn filter_signal<'py>(
    py: Python<'py>, data: &Bound<'py, PyAny>, tr: f64, lowcut: f64, highcut: f64, order: usize,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let data = extract_f64_array(py, data)?;
    let band = signal::BandPass::new(lowcut, highcut, order);
    Ok(signal::filter_signal(data.as_array(), tr, &band)?.into_pyarray(py))
}

/// Build PetCO2hrf from a raw trace, writing artifacts under `outprefix`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (
    co2,
    pidx,
    freq,
    outprefix,
    comp_endtidal = true,
    response_function = PyResponseFunction(signal::ResponseFunction::Hrf),
    mode = "full",
))]
#[allow(clippy::too_many_arguments)]
fn compute_petco2hrf<'py>(
    py: Python<'py>, co2: &Bound<'py, PyAny>, pidx: &Bound<'py, PyAny>, freq: f64,
    outprefix: PathBuf, comp_endtidal: bool, response_function: PyResponseFunction, mode: &str,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let co2 = extract_f64_array(py, co2)?;
    let peaks = extract_peaks(pidx)?;
    let opts = PetCO2Options { comp_endtidal, response: response_function.0, mode: mode.parse()? };

    let responses = StandardResponses::default();
    let (mut writer, mut plotter, mut sink) = (TextWriter, NoPlots, LogSink);
    let mut ctx =
        PipelineContext::new(&mut writer, &mut plotter, &mut sink).with_responses(&responses);

    let out = regressors::compute_petco2hrf(
        co2.as_array().into_dyn(),
        &peaks,
        freq,
        &outprefix,
        &opts,
        &mut ctx,
    )?;
    Ok(out.into_pyarray(py))
}

/// Align PetCO2hrf with the functional average and build the lag bank.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (
    func_avg,
    petco2hrf,
    tr,
    freq,
    outprefix,
    lag_max = None,
    lag_min = None,
    trial_len = None,
    n_trials = None,
    ext = ".1D",
    lagged_regression = true,
    legacy = false,
    abs_xcorr = false,
    skip_xcorr = false,
))]
#[allow(clippy::too_many_arguments)]
fn create_physio_regressor<'py>(
    py: Python<'py>, func_avg: &Bound<'py, PyAny>, petco2hrf: &Bound<'py, PyAny>, tr: f64,
    freq: f64, outprefix: PathBuf, lag_max: Option<f64>, lag_min: Option<f64>,
    trial_len: Option<f64>, n_trials: Option<usize>, ext: &str, lagged_regression: bool,
    legacy: bool, abs_xcorr: bool, skip_xcorr: bool,
) -> PyResult<PyPhysioRegressors> {
    let func_avg = extract_f64_array(py, func_avg)?;
    let petco2hrf = extract_f64_array(py, petco2hrf)?;
    let opts = PhysioOptions {
        lag_max,
        lag_min,
        trial: TrialStructure::new(trial_len, n_trials),
        ext: ext.to_string(),
        lagged_regression,
        legacy,
        abs_xcorr,
        skip_xcorr,
    };

    let (mut writer, mut plotter, mut sink) = (TextWriter, NoPlots, LogSink);
    let mut ctx = PipelineContext::new(&mut writer, &mut plotter, &mut sink);

    let inner = regressors::create_physio_regressor(
        func_avg.as_array().into_dyn(),
        petco2hrf.as_array(),
        tr,
        freq,
        &outprefix,
        &opts,
        &mut ctx,
    )?;
    Ok(PyPhysioRegressors { inner })
}

/// _cvr_regressors — PyO3 module initializer for the Python extension.
///
/// Key behaviors
/// -------------
/// - Create the `signal` and `regressors` submodules and attach them to
///   `_cvr_regressors`.
/// - Register both in `sys.modules` so dotted imports work from Python.
///
/// Errors
/// ------
/// - `PyErr`
///   If creating submodules or manipulating `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _cvr_regressors<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let signal_mod = PyModule::new(_py, "signal")?;
    let regressors_mod = PyModule::new(_py, "regressors")?;
    signal_module(_py, m, &signal_mod)?;
    regressors_module(_py, m, &regressors_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("cvr_regressors.signal", signal_mod)?;

    _py.import("sys")?
        .getattr("modules")?
        .set_item("cvr_regressors.regressors", regressors_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn signal_module<'py>(
    _py: Python, cvr_regressors: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(create_hrf, m)?)?;
    m.add_function(wrap_pyfunction!(resample_signal_samples, m)?)?;
    m.add_function(wrap_pyfunction!(resample_signal_freqs, m)?)?;
    m.add_function(wrap_pyfunction!(endtidal_interpolation, m)?)?;
    m.add_function(wrap_pyfunction!(convolve_signal, m)?)?;
    m.add_function(wrap_pyfunction!(spc, m)?)?;
    m.add_function(wrap_pyfunction!(filter_signal, m)?)?;
    cvr_regressors.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn regressors_module<'py>(
    _py: Python, cvr_regressors: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<PyPhysioRegressors>()?;
    m.add_function(wrap_pyfunction!(compute_petco2hrf, m)?)?;
    m.add_function(wrap_pyfunction!(create_physio_regressor, m)?)?;
    cvr_regressors.add_submodule(m)?;
    Ok(())
}
