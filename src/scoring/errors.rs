//! scoring::errors — error type for loss and scoring-rule helpers.
//!
//! Scoring functions are pure maps from forecasts to per-period losses, so
//! the only failures are malformed calls: unequal input lengths and
//! unrecognized loss-kind names. Degenerate numeric inputs (non-finite
//! values, non-positive σ) are masked or propagate as `NaN` and never show
//! up here.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type ScoringResult<T> = Result<T, ScoringError>;

/// ScoringError — invalid calls into the scoring layer.
///
/// Variants
/// --------
/// - `LengthMismatch { expected, found }`
///   Two inputs that must be aligned period-by-period differ in length.
/// - `UnknownLossKind(name)`
///   A loss-kind selector string matched none of the supported names.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoringError {
    LengthMismatch { expected: usize, found: usize },
    UnknownLossKind(String),
}

impl std::error::Error for ScoringError {}

impl std::fmt::Display for ScoringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringError::LengthMismatch { expected, found } => write!(
                f,
                "Scoring Error: input lengths differ (expected {expected}, found {found})"
            ),
            ScoringError::UnknownLossKind(name) => write!(
                f,
                "Scoring Error: unknown loss kind {name:?} \
                 (expected 'squared', 'absolute', or 'absolute_percentage')"
            ),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<ScoringError> for PyErr {
    fn from(err: ScoringError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Verify that both variants embed their payloads in `Display`.
    //
    // Given
    // -----
    // - A length mismatch (10 vs 7) and an unknown kind "huber".
    //
    // Expect
    // ------
    // - The messages mention 10, 7, and "huber" respectively.
    fn scoring_error_display_includes_payload() {
        let mismatch = ScoringError::LengthMismatch { expected: 10, found: 7 }.to_string();
        let unknown = ScoringError::UnknownLossKind("huber".to_string()).to_string();

        assert!(mismatch.contains("10") && mismatch.contains('7'), "got: {mismatch}");
        assert!(unknown.contains("huber"), "got: {unknown}");
    }
}
