//! utils — conversions between Python objects and the crate's input types.
//!
//! Only compiled with the `python-bindings` feature. Arrays are accepted as
//! contiguous float64 numpy arrays, pandas Series (via `to_numpy`) or plain
//! sequences; response functions as the strings, paths, sequences or
//! `None` that the Python API documents.

#[cfg(feature = "python-bindings")]
use std::path::PathBuf;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

#[cfg(feature = "python-bindings")]
use crate::signal::ResponseFunction;

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Peak indices from any sequence of non-negative integers.
#[cfg(feature = "python-bindings")]
pub fn extract_peaks(raw: &Bound<'_, PyAny>) -> PyResult<Vec<usize>> {
    raw.extract::<Vec<usize>>().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err("peak indices must be a sequence of non-negative integers")
    })
}

/// Response-function argument as accepted from Python.
///
/// `None` skips convolution, a string is parsed by
/// [`ResponseFunction::parse`], an `os.PathLike` is a kernel file, and any
/// other numeric sequence is taken as literal kernel samples.
#[cfg(feature = "python-bindings")]
pub struct PyResponseFunction(pub ResponseFunction);

#[cfg(feature = "python-bindings")]
impl<'py> FromPyObject<'py> for PyResponseFunction {
    fn extract_bound(ob: &Bound<'py, PyAny>) -> PyResult<Self> {
        if ob.is_none() {
            return Ok(PyResponseFunction(ResponseFunction::None));
        }
        if let Ok(spec) = ob.extract::<String>() {
            return Ok(PyResponseFunction(ResponseFunction::parse(&spec)?));
        }
        if ob.hasattr("__fspath__")? {
            let path: PathBuf = ob.extract()?;
            return Ok(PyResponseFunction(ResponseFunction::Path(path)));
        }
        let values: Vec<f64> = ob.extract().map_err(|_| {
            PyValueError::new_err("Provided function is not a numeric ndarray-like variable.")
        })?;
        Ok(PyResponseFunction(ResponseFunction::Literal(values)))
    }
}
