//! statistical_tests::errors — shared error types and Python bridges.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias for the forecast-comparison and
//! VaR-backtesting routines, together with a conversion layer to Python
//! exceptions for the PyO3 bindings.
//!
//! Key behaviors
//! -------------
//! - Define [`TestResult`] and [`TestError`] as the canonical result and
//!   error types for the Diebold–Mariano test, the VaR backtests, and their
//!   validation helpers.
//! - Wrap [`ScoringError`] and [`InferenceError`] so `?` composes across
//!   subtrees.
//! - Implement `From<TestError> for PyErr` (feature `python-bindings`),
//!   mapping everything to `ValueError` with the `Display` text.
//!
//! Invariants & assumptions
//! ------------------------
//! - Only *precondition violations* become a `TestError`: misaligned
//!   inputs, out-of-range tuning constants, too few usable observations.
//! - Degenerate numeric situations (zero variance, no violations, empty
//!   transition states) are never errors; they surface as sentinel values
//!   in the result bundles.
//!
//! Conventions
//! -----------
//! - Messages are phrased in terms of domain constraints
//!   ("alpha must lie in (0, 1)") rather than implementation details.

use crate::{inference::errors::InferenceError, scoring::errors::ScoringError};

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type TestResult<T> = Result<T, TestError>;

/// TestError — precondition violations in the statistical tests.
///
/// Variants
/// --------
/// - `LengthMismatch { expected, found }`
///   Two series that must be aligned period-by-period differ in length.
/// - `InsufficientData { n, min }`
///   Fewer usable observations than the test requires.
/// - `InvalidAlpha(alpha)`
///   VaR tail probability outside the open interval (0, 1).
/// - `InvalidBootstrapReps(reps)`
///   Zero bootstrap replications requested.
/// - `InvalidConfidenceLevel(level)`
///   Confidence level outside (0, 1).
/// - `InvalidHorizon(h)`
///   Forecast horizon of zero.
/// - `Scoring(ScoringError)` / `Inference(InferenceError)`
///   Errors bubbled up from the lower layers.
#[derive(Debug, Clone, PartialEq)]
pub enum TestError {
    //------ Input validation errors ------
    LengthMismatch { expected: usize, found: usize },
    InsufficientData { n: usize, min: usize },
    InvalidAlpha(f64),
    InvalidBootstrapReps(usize),
    InvalidConfidenceLevel(f64),
    InvalidHorizon(usize),

    //------ Lower layers ------
    Scoring(ScoringError),
    Inference(InferenceError),
}

impl std::error::Error for TestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TestError::Scoring(err) => Some(err),
            TestError::Inference(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestError::LengthMismatch { expected, found } => write!(
                f,
                "Series lengths differ: expected {expected}, found {found}. \
                 Inputs must be aligned period by period."
            ),
            TestError::InsufficientData { n, min } => {
                write!(f, "Need at least {min} usable observations, found {n}.")
            }
            TestError::InvalidAlpha(alpha) => {
                write!(f, "Invalid alpha value: {alpha}. Must lie in (0, 1).")
            }
            TestError::InvalidBootstrapReps(reps) => {
                write!(f, "Invalid bootstrap replication count: {reps}. Must be positive.")
            }
            TestError::InvalidConfidenceLevel(level) => {
                write!(f, "Invalid confidence level: {level}. Must lie in (0, 1).")
            }
            TestError::InvalidHorizon(h) => {
                write!(f, "Invalid forecast horizon: {h}. Must be at least 1.")
            }
            TestError::Scoring(err) => write!(f, "{err}"),
            TestError::Inference(err) => write!(f, "{err}"),
        }
    }
}

impl From<ScoringError> for TestError {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::LengthMismatch { expected, found } => {
                TestError::LengthMismatch { expected, found }
            }
            other => TestError::Scoring(other),
        }
    }
}

impl From<InferenceError> for TestError {
    fn from(err: InferenceError) -> Self {
        TestError::Inference(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<TestError> for PyErr {
    fn from(err: TestError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
