//! statistical_tests::validation — shared input guards for test statistics.
//!
//! Purpose
//! -------
//! Centralize the precondition checks and masking shared by the
//! Diebold–Mariano test and the VaR backtests, so that alignment, tail
//! probabilities, and finiteness are handled the same way everywhere.
//!
//! Key behaviors
//! -------------
//! - [`validate_aligned`]: equal lengths or `TestError::LengthMismatch`.
//! - [`validate_alpha`] / [`validate_confidence_level`]: open-interval
//!   checks on probabilities (NaN is rejected).
//! - [`mask_finite_pairs`]: keep only periods where both series are finite.
//!
//! Conventions
//! -----------
//! - Masking never reorders observations; it only drops periods.
//! - Checks are cheap and allocation-free except for the masked copies.

use crate::statistical_tests::errors::{TestError, TestResult};

/// Require two period-aligned series to have the same length.
pub fn validate_aligned(left: &[f64], right: &[f64]) -> TestResult<()> {
    if left.len() != right.len() {
        return Err(TestError::LengthMismatch { expected: left.len(), found: right.len() });
    }
    Ok(())
}

/// Require a VaR tail probability strictly inside (0, 1).
pub fn validate_alpha(alpha: f64) -> TestResult<()> {
    if alpha > 0.0 && alpha < 1.0 { Ok(()) } else { Err(TestError::InvalidAlpha(alpha)) }
}

/// Require a confidence level strictly inside (0, 1).
pub fn validate_confidence_level(level: f64) -> TestResult<()> {
    if level > 0.0 && level < 1.0 {
        Ok(())
    } else {
        Err(TestError::InvalidConfidenceLevel(level))
    }
}

/// Keep the periods where both `left[t]` and `right[t]` are finite.
///
/// Returns
/// -------
/// `(Vec<f64>, Vec<f64>)`
///   The masked series, still aligned and in their original order.
///
/// Notes
/// -----
/// - Assumes the inputs have already passed [`validate_aligned`]; extra
///   elements of the longer slice would be ignored by the pairing.
pub fn mask_finite_pairs(left: &[f64], right: &[f64]) -> (Vec<f64>, Vec<f64>) {
    left.iter().zip(right).filter(|(a, b)| a.is_finite() && b.is_finite()).unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover every branch of the validation helpers and the
    // order-preserving behavior of `mask_finite_pairs`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Ensure misaligned inputs are rejected with both lengths reported.
    //
    // Given
    // -----
    // - Series of length 3 and 2, and two series of length 2.
    //
    // Expect
    // ------
    // - LengthMismatch { expected: 3, found: 2 }; Ok for equal lengths.
    fn validate_aligned_rejects_unequal_lengths() {
        assert_eq!(
            validate_aligned(&[1.0, 2.0, 3.0], &[1.0, 2.0]),
            Err(TestError::LengthMismatch { expected: 3, found: 2 })
        );
        assert!(validate_aligned(&[1.0, 2.0], &[0.0, 0.0]).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Check the open-interval probability guards, including NaN.
    //
    // Given
    // -----
    // - alpha ∈ {0, 1, −0.1, NaN, 0.05}; level ∈ {1, 0.95}.
    //
    // Expect
    // ------
    // - Only 0.05 and 0.95 are accepted.
    fn probability_guards_use_open_interval() {
        for bad in [0.0, 1.0, -0.1, f64::NAN] {
            assert!(matches!(validate_alpha(bad), Err(TestError::InvalidAlpha(_))), "{bad}");
        }
        assert!(validate_alpha(0.05).is_ok());
        assert!(validate_confidence_level(1.0).is_err());
        assert!(validate_confidence_level(0.95).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Verify pairwise masking keeps order and drops any period with a
    // non-finite value in either series.
    //
    // Given
    // -----
    // - left = [1, NaN, 3, 4], right = [5, 6, ∞, 8].
    //
    // Expect
    // ------
    // - ([1, 4], [5, 8]).
    fn mask_finite_pairs_drops_non_finite_periods() {
        let (left, right) =
            mask_finite_pairs(&[1.0, f64::NAN, 3.0, 4.0], &[5.0, 6.0, f64::INFINITY, 8.0]);
        assert_eq!(left, vec![1.0, 4.0]);
        assert_eq!(right, vec![5.0, 8.0]);
    }
}
