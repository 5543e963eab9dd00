//! inference::errors — error type for resampling and variance helpers.
//!
//! The long-run variance estimator and block-size heuristic are total
//! functions (degenerate input is absorbed by numeric floors and caps), so
//! the only failures in this subtree come from constructing a moving block
//! bootstrap with an impossible configuration.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Error conditions raised by the inference layer.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    // ---- Moving block bootstrap ----
    /// Cannot resample an empty series.
    EmptySeries,

    /// Block length outside `1 ≤ b ≤ n`.
    InvalidBlockSize { block_size: usize, n: usize },
}

pub type InferenceResult<T> = Result<T, InferenceError>;

impl std::error::Error for InferenceError {}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InferenceError::EmptySeries => {
                write!(f, "Inference Error: cannot bootstrap an empty series")
            }
            InferenceError::InvalidBlockSize { block_size, n } => write!(
                f,
                "Inference Error: block size {} must satisfy 1 ≤ b ≤ n (n = {})",
                block_size, n
            ),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<InferenceError> for PyErr {
    fn from(err: InferenceError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Verify that `InvalidBlockSize` reports both the block size and n.
    //
    // Given
    // -----
    // - block_size = 12, n = 7.
    //
    // Expect
    // ------
    // - The message contains "12" and "7".
    fn invalid_block_size_display_includes_payload() {
        let msg = InferenceError::InvalidBlockSize { block_size: 12, n: 7 }.to_string();
        assert!(msg.contains("12") && msg.contains('7'), "got: {msg}");
        assert!(!InferenceError::EmptySeries.to_string().trim().is_empty());
    }
}
