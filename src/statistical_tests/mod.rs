//! statistical_tests — forecast-comparison and VaR-backtesting tests.
//!
//! Purpose
//! -------
//! Collect the hypothesis tests used to evaluate forecasts together with
//! their shared validation and error handling, including Python bridges
//! for PyO3-based bindings.
//!
//! Key behaviors
//! -------------
//! - [`DMTestResult::diebold_mariano`]: equal predictive accuracy of two
//!   models, with an asymptotic and a moving-block-bootstrap p-value.
//! - [`VaRBacktestResult::backtest`]: Kupiec unconditional coverage,
//!   Christoffersen independence, and conditional coverage of a VaR series.
//! - Centralize input guards in [`validation`] so alignment, probability
//!   ranges, and finiteness masking behave identically across tests.
//! - Provide [`TestError`] / [`TestResult`], with `From` conversions from
//!   the scoring and inference layers and a `PyErr` bridge when the
//!   `python-bindings` feature is enabled.
//!
//! Invariants & assumptions
//! ------------------------
//! - Precondition violations return `Err`; degenerate-but-valid data
//!   (zero variance, no violations, nothing left after masking in the VaR
//!   backtest) produce sentinel values instead.
//! - Every call is a pure function of its inputs (and the seed, for the
//!   bootstrap); no state is shared between calls.
//!
//! Downstream usage
//! ----------------
//! - Typical Rust code imports the main surface as:
//!
//!   ```rust
//!   use forecast_eval::statistical_tests::{DMOptions, DMTestResult, VaRBacktestResult};
//!
//!   let e1 = vec![0.5; 40];
//!   let e2 = vec![0.25; 40];
//!   let dm = DMTestResult::diebold_mariano(&e1, &e2, &DMOptions::default().with_seed(1))?;
//!   let bt = VaRBacktestResult::backtest(&[-3.0, 1.0, 0.5], &[-2.0; 3], 0.05)?;
//!   # assert!(dm.statistic > 0.0 && bt.violations == 1);
//!   # Ok::<(), forecast_eval::statistical_tests::TestError>(())
//!   ```
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; simulated model comparisons and
//!   coverage studies live under `tests/`.

pub mod diebold_mariano;
pub mod errors;
pub mod validation;
pub mod var_backtest;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::diebold_mariano::{BootstrapCentering, DMOptions, DMTestResult};
pub use self::errors::{TestError, TestResult};
pub use self::var_backtest::{
    PooledRate, TransitionCounts, VaRBacktestResult, independence_lr, kupiec_lr,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use forecast_eval::statistical_tests::prelude::*;
//
// to import the main statistical-testing surface in a single line.

pub mod prelude {
    pub use super::diebold_mariano::{BootstrapCentering, DMOptions, DMTestResult};
    pub use super::errors::{TestError, TestResult};
    pub use super::var_backtest::{PooledRate, VaRBacktestResult};
}
