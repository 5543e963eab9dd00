//! forecast_eval — statistical evaluation of forecasts with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the forecast-evaluation routines to Python via the `_forecast_eval`
//! extension module. The crate answers two questions about forecasts:
//! is model A significantly more accurate than model B (Diebold–Mariano with a
//! moving-block bootstrap), and is a Value-at-Risk series correctly calibrated
//! (Kupiec and Christoffersen backtests). It also scores Normal predictive
//! distributions with the closed-form CRPS.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`scoring`, `inference`,
//!   `statistical_tests`, `evaluation`) as the public crate surface.
//! - Define `#[pyclass]` wrappers and the `#[pymodule]` initializer for the
//!   `_forecast_eval` Python extension.
//! - Create and register Python submodules (`statistical_tests`, `scoring`)
//!   under `forecast_eval` so that dot-notation imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work is implemented in the inner Rust modules; this file
//!   performs only FFI glue, input conversion, and error mapping.
//! - Every call is a pure function of its inputs; there is no global state.
//!   Bootstrap randomness is reproducible through an explicit seed.
//!
//! Conventions
//! -----------
//! - Python-exposed classes live under `_forecast_eval.<submodule>` and are
//!   typically wrapped by thin pure-Python facades.
//! - Errors from core Rust code are propagated as rich error types internally
//!   and converted to `PyErr` values (`ValueError`) at the PyO3 boundary.
//! - The library never prints; diagnostics go through `tracing` and are only
//!   visible when the caller installs a subscriber.
//!
//! Downstream usage
//! ----------------
//! ```rust
//! use forecast_eval::prelude::*;
//!
//! let e1: Vec<f64> = (0..60).map(|t| ((t as f64) * 0.4).sin()).collect();
//! let e2: Vec<f64> = e1.iter().map(|e| 0.5 * e).collect();
//! let opts = DMOptions::default().with_seed(7);
//! let dm = DMTestResult::diebold_mariano(&e1, &e2, &opts)?;
//! assert!(dm.statistic > 0.0);
//! # Ok::<(), TestError>(())
//! ```
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules and
//!   by integration tests under `tests/` on simulated forecast errors.

pub mod evaluation;
pub mod inference;
pub mod numerical_stability;
pub mod scoring;
pub mod special;
pub mod statistical_tests;
pub mod utils;

/// Single-line import of the main surface.
pub mod prelude {
    pub use crate::evaluation::{ForecastEvaluation, normal_var};
    pub use crate::inference::{HACOptions, KernelType};
    pub use crate::scoring::{LossKind, crps_normal};
    pub use crate::statistical_tests::prelude::*;
}

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    statistical_tests::{DMTestResult, VaRBacktestResult},
    utils::{extract_dm_options, extract_f64_vec, extract_hac_options, extract_pooled_rate},
};

/// DieboldMariano — Python-facing wrapper for the DM test.
///
/// Purpose
/// -------
/// Run [`DMTestResult::diebold_mariano`] from Python keyword arguments and
/// expose the outcome as read-only properties.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `DieboldMariano(errors1, errors2, loss="squared", horizon=1,
/// bootstrap_reps=10000, confidence_level=0.95, seed=None, ...)`:
/// - `errors1`, `errors2`: array-likes of equal length.
/// - `loss`: `"squared"`, `"absolute"`, or `"absolute_percentage"` (aliases
///   `mse`, `mae`, `mape` accepted); unknown names raise `ValueError`.
/// - `kernel`, `bandwidth`, `center`, `small_sample_correction`: HAC
///   settings, see [`HACOptions`](crate::inference::HACOptions).
/// - `min_obs`, `keep_distribution`, `centering`: see
///   [`DMOptions`](crate::statistical_tests::DMOptions).
///
/// Notes
/// -----
/// - The bootstrap runs with the GIL released.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "forecast_eval.statistical_tests")]
pub struct DieboldMariano {
    inner: DMTestResult,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl DieboldMariano {
    #[new]
    #[pyo3(
        signature = (
            errors1,
            errors2,
            loss = None,
            horizon = 1,
            bootstrap_reps = 10_000,
            confidence_level = 0.95,
            seed = None,
            min_obs = None,
            keep_distribution = false,
            centering = None,
            kernel = None,
            bandwidth = None,
            center = None,
            small_sample_correction = None,
        ),
        text_signature = "(errors1, errors2, /, loss='squared', horizon=1, bootstrap_reps=10000, \
                          confidence_level=0.95, seed=None, min_obs=30, keep_distribution=False, \
                          centering='null', kernel='bartlett', bandwidth=None, center=False, \
                          small_sample_correction=True)"
    )]
    pub fn diebold_mariano<'py>(
        py: Python<'py>, errors1: &Bound<'py, PyAny>, errors2: &Bound<'py, PyAny>,
        loss: Option<&str>, horizon: usize, bootstrap_reps: usize, confidence_level: f64,
        seed: Option<u64>, min_obs: Option<usize>, keep_distribution: bool,
        centering: Option<&str>, kernel: Option<&str>, bandwidth: Option<usize>,
        center: Option<bool>, small_sample_correction: Option<bool>,
    ) -> PyResult<Self> {
        let e1 = extract_f64_vec(py, errors1, "errors1")?;
        let e2 = extract_f64_vec(py, errors2, "errors2")?;
        let hac = extract_hac_options(kernel, bandwidth, center, small_sample_correction)?;
        let opts = extract_dm_options(
            loss,
            horizon,
            bootstrap_reps,
            confidence_level,
            seed,
            min_obs,
            keep_distribution,
            centering,
            hac,
        )?;
        let inner = py.allow_threads(|| DMTestResult::diebold_mariano(&e1, &e2, &opts))?;
        Ok(DieboldMariano { inner })
    }

    #[getter]
    pub fn statistic(&self) -> f64 {
        self.inner.statistic
    }

    #[getter]
    pub fn pvalue(&self) -> f64 {
        self.inner.p_value
    }

    /// Moving-block-bootstrap p-value; the one to report.
    #[getter]
    pub fn bootstrap_pvalue(&self) -> f64 {
        self.inner.bootstrap_p_value
    }

    #[getter]
    pub fn block_size(&self) -> usize {
        self.inner.block_size
    }

    #[getter]
    pub fn n_bootstrap(&self) -> usize {
        self.inner.n_bootstrap
    }

    #[getter]
    pub fn n_obs(&self) -> usize {
        self.inner.n_obs
    }

    #[getter]
    pub fn mean_loss_differential(&self) -> f64 {
        self.inner.mean_loss_differential
    }

    #[getter]
    pub fn long_run_variance(&self) -> f64 {
        self.inner.long_run_variance
    }

    #[getter]
    pub fn hln_statistic(&self) -> f64 {
        self.inner.hln_statistic
    }

    #[getter]
    pub fn hln_pvalue(&self) -> f64 {
        self.inner.hln_p_value
    }

    #[getter]
    pub fn seed(&self) -> u64 {
        self.inner.seed
    }

    #[getter]
    pub fn bootstrap_interval(&self) -> (f64, f64) {
        self.inner.bootstrap_interval
    }

    #[getter]
    pub fn bootstrap_distribution(&self) -> Option<Vec<f64>> {
        self.inner.bootstrap_distribution.clone()
    }

    pub fn rejects_null(&self) -> bool {
        self.inner.rejects_null()
    }
}

/// VaRBacktest — Python-facing wrapper for the Kupiec/Christoffersen tests.
///
/// Constructed via `VaRBacktest(returns, var, alpha=0.05, pooled_rate=None)`;
/// `pooled_rate` is `'violations'` (default, `x/T`) or `'transitions'`.
/// Every field of [`VaRBacktestResult`] is exposed as a property and the
/// transition counts as a `(n00, n01, n10, n11)` tuple.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "forecast_eval.statistical_tests")]
pub struct VaRBacktest {
    inner: VaRBacktestResult,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl VaRBacktest {
    #[new]
    #[pyo3(
        signature = (returns, var, alpha = 0.05, pooled_rate = None),
        text_signature = "(returns, var, /, alpha=0.05, pooled_rate=None)"
    )]
    pub fn backtest<'py>(
        py: Python<'py>, returns: &Bound<'py, PyAny>, var: &Bound<'py, PyAny>, alpha: f64,
        pooled_rate: Option<&str>,
    ) -> PyResult<Self> {
        let ret = extract_f64_vec(py, returns, "returns")?;
        let var = extract_f64_vec(py, var, "var")?;
        let pooled = extract_pooled_rate(pooled_rate)?;
        let inner = VaRBacktestResult::backtest_with(&ret, &var, alpha, pooled)?;
        Ok(VaRBacktest { inner })
    }

    #[getter]
    pub fn n_obs(&self) -> usize {
        self.inner.n_obs
    }

    #[getter]
    pub fn violations(&self) -> usize {
        self.inner.violations
    }

    #[getter]
    pub fn violation_rate(&self) -> f64 {
        self.inner.violation_rate
    }

    #[getter]
    pub fn alpha(&self) -> f64 {
        self.inner.alpha
    }

    #[getter]
    pub fn kupiec_lr(&self) -> f64 {
        self.inner.kupiec_lr
    }

    #[getter]
    pub fn kupiec_pvalue(&self) -> f64 {
        self.inner.kupiec_p_value
    }

    #[getter]
    pub fn independence_lr(&self) -> f64 {
        self.inner.independence_lr
    }

    #[getter]
    pub fn independence_pvalue(&self) -> f64 {
        self.inner.independence_p_value
    }

    #[getter]
    pub fn conditional_coverage_lr(&self) -> f64 {
        self.inner.conditional_coverage_lr
    }

    #[getter]
    pub fn conditional_coverage_pvalue(&self) -> f64 {
        self.inner.conditional_coverage_p_value
    }

    #[getter]
    pub fn transitions(&self) -> (usize, usize, usize, usize) {
        let t = self.inner.transitions;
        (t.n00, t.n01, t.n10, t.n11)
    }
}

/// Mean CRPS of Normal predictive distributions (`NaN` if nothing is usable).
#[cfg(feature = "python-bindings")]
#[pyfunction(name = "crps_normal")]
#[pyo3(text_signature = "(y, mu, sigma, /)")]
fn py_crps_normal<'py>(
    py: Python<'py>, y: &Bound<'py, PyAny>, mu: &Bound<'py, PyAny>, sigma: &Bound<'py, PyAny>,
) -> PyResult<f64> {
    let y = extract_f64_vec(py, y, "y")?;
    let mu = extract_f64_vec(py, mu, "mu")?;
    let sigma = extract_f64_vec(py, sigma, "sigma")?;
    Ok(crate::scoring::crps_normal(&y, &mu, &sigma)?)
}

/// _forecast_eval — PyO3 module initializer for the Python extension.
///
/// Purpose
/// -------
/// Define the `_forecast_eval` Python module and register its
/// `statistical_tests` and `scoring` submodules, both as attributes and in
/// `sys.modules`, so they are importable via dotted paths from Python.
///
/// Errors
/// ------
/// - `PyErr`
///   If creating submodules or manipulating `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _forecast_eval<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let statistical_tests_mod = PyModule::new(_py, "statistical_tests")?;
    let scoring_mod = PyModule::new(_py, "scoring")?;
    statistical_tests(_py, m, &statistical_tests_mod)?;
    scoring(_py, m, &scoring_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    let modules = _py.import("sys")?.getattr("modules")?;
    modules.set_item("forecast_eval.statistical_tests", statistical_tests_mod)?;
    modules.set_item("forecast_eval.scoring", scoring_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn statistical_tests<'py>(
    _py: Python, forecast_eval: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<DieboldMariano>()?;
    m.add_class::<VaRBacktest>()?;
    forecast_eval.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn scoring<'py>(
    _py: Python, forecast_eval: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_crps_normal, m)?)?;
    forecast_eval.add_submodule(m)?;
    Ok(())
}
