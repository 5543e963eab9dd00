//! utils — conversion helpers for the PyO3 bindings.
//!
//! Everything here is compiled only with the `python-bindings` feature and
//! turns Python arguments (arrays, strings, optional scalars) into the
//! validated Rust option types used by the core modules.

#[cfg(feature = "python-bindings")]
use std::str::FromStr;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    inference::{hac::HACOptions, kernel::KernelType},
    scoring::LossKind,
    statistical_tests::{BootstrapCentering, DMOptions, PooledRate, TestError},
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

/// Accept a 1-D ndarray, a pandas Series, or any float sequence.
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

/// Copy an array-like argument into an owned vector, naming it in errors.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_vec<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>, name: &str,
) -> PyResult<Vec<f64>> {
    let arr = extract_f64_array(py, raw_data)?;
    let slice = arr.as_slice().map_err(|_| {
        PyValueError::new_err(format!("{name} must be a 1-D contiguous float64 array or sequence"))
    })?;
    Ok(slice.to_vec())
}

#[cfg(feature = "python-bindings")]
pub fn extract_hac_options(
    kernel: Option<&str>, bandwidth: Option<usize>, center: Option<bool>,
    small_sample_correction: Option<bool>,
) -> PyResult<HACOptions> {
    let kernel_str = kernel.unwrap_or("bartlett").to_lowercase();
    let kernel_type = match kernel_str.as_str() {
        "iid" => KernelType::IID,
        "bartlett" | "newey_west" => KernelType::Bartlett,
        "parzen" => KernelType::Parzen,
        "quadratic_spectral" | "quadraticspectral" | "qs" => KernelType::QuadraticSpectral,
        other => {
            return Err(PyValueError::new_err(format!(
                "invalid HAC kernel {:?} (expected 'iid', 'bartlett', 'parzen', or 'quadratic_spectral')",
                other
            )));
        }
    };

    let center_val = center.unwrap_or(false);
    let ssc_val = small_sample_correction.unwrap_or(true);

    Ok(HACOptions::new(bandwidth, kernel_type, center_val, ssc_val))
}

/// Build validated [`DMOptions`] from the keyword arguments of
/// `DieboldMariano(...)`.
#[cfg(feature = "python-bindings")]
pub fn extract_dm_options(
    loss: Option<&str>, horizon: usize, bootstrap_reps: usize, confidence_level: f64,
    seed: Option<u64>, min_obs: Option<usize>, keep_distribution: bool, centering: Option<&str>,
    hac: HACOptions,
) -> PyResult<DMOptions> {
    let loss = match loss {
        Some(name) => LossKind::from_str(name).map_err(TestError::from)?,
        None => LossKind::Squared,
    };
    let centering = match centering.map(str::to_lowercase).as_deref() {
        None | Some("null") | Some("null_imposed") => BootstrapCentering::NullImposed,
        Some("none") | Some("uncentered") => BootstrapCentering::Uncentered,
        Some(other) => {
            return Err(PyValueError::new_err(format!(
                "invalid centering {:?} (expected 'null' or 'uncentered')",
                other
            )));
        }
    };

    let mut opts = DMOptions::new(loss, horizon, bootstrap_reps, confidence_level)?
        .with_hac(hac)
        .with_distribution(keep_distribution)
        .with_centering(centering);
    if let Some(seed) = seed {
        opts = opts.with_seed(seed);
    }
    if let Some(min_obs) = min_obs {
        opts = opts.with_min_obs(min_obs);
    }
    Ok(opts)
}

/// Map the `pooled_rate` keyword of `VaRBacktest(...)` to a [`PooledRate`].
#[cfg(feature = "python-bindings")]
pub fn extract_pooled_rate(pooled_rate: Option<&str>) -> PyResult<PooledRate> {
    match pooled_rate.map(str::to_lowercase).as_deref() {
        None | Some("violations") | Some("violation_rate") => Ok(PooledRate::ViolationRate),
        Some("transitions") => Ok(PooledRate::Transitions),
        Some(other) => Err(PyValueError::new_err(format!(
            "invalid pooled_rate {:?} (expected 'violations' or 'transitions')",
            other
        ))),
    }
}
