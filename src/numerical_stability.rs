//! Numerical guards shared by the scoring, inference, and test modules.
//!
//! Every degenerate-numeric case in this crate is absorbed by one of the
//! constants below rather than surfaced as an error:
//!
//! - [`LRV_FLOOR`]: strictly positive lower bound on any long-run variance,
//!   so `√T·d̄ / √LRV` is always defined.
//! - [`LOG_FLOOR`]: smallest argument passed to `ln` in likelihood-ratio
//!   construction, so zero transition rates never produce `ln(0)`.
//! - [`RHO_CAP`]: ceiling on the lag-1 autocorrelation proxy used by the
//!   block-size heuristic, keeping `(1+ρ)/(1−ρ)` finite.
//! - [`APE_EPSILON`]: denominator guard of the bounded absolute-error loss.

/// Lower bound applied to every HAC long-run variance estimate.
pub const LRV_FLOOR: f64 = 1e-10;

/// Minimum argument for logarithms inside likelihood ratios.
pub const LOG_FLOOR: f64 = f64::EPSILON;

/// Cap on the AR(1) autocorrelation proxy in block-size selection.
pub const RHO_CAP: f64 = 0.99;

/// Guard in `|e| / (|e| + ε)`.
pub const APE_EPSILON: f64 = 1e-8;

/// `count · ln(max(p, LOG_FLOOR))`, with `0 · ln(·) = 0`.
///
/// Likelihood terms with a zero count contribute nothing regardless of the
/// probability, which keeps `0 · ln(0)` out of the sums.
#[inline]
pub fn weighted_ln(count: f64, p: f64) -> f64 {
    if count == 0.0 { 0.0 } else { count * p.max(LOG_FLOOR).ln() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Check that `weighted_ln` neutralizes zero counts and floors zero
    // probabilities instead of returning -∞.
    //
    // Given
    // -----
    // - count = 0 with p = 0, and count = 3 with p = 0.
    //
    // Expect
    // ------
    // - The first term is exactly 0.
    // - The second term is finite and equals 3 · ln(LOG_FLOOR).
    fn weighted_ln_handles_zero_count_and_zero_probability() {
        // Act
        let empty = weighted_ln(0.0, 0.0);
        let floored = weighted_ln(3.0, 0.0);

        // Assert
        assert_eq!(empty, 0.0);
        assert!(floored.is_finite());
        assert_eq!(floored, 3.0 * LOG_FLOOR.ln());
    }
}
