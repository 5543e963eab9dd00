//! scoring::crps — closed-form CRPS for Normal predictive distributions.
//!
//! For a Normal predictive `N(μ, σ²)` and outcome `y`, with
//! `z = (y − μ)/σ`,
//!
//! ```text
//! CRPS(N(μ, σ²), y) = σ · ( z·(2Φ(z) − 1) + 2φ(z) − 1/√π ).
//! ```
//!
//! Lower is better; the score is in the units of `y`. Observations with a
//! non-finite `y`, `μ` or `σ`, or with `σ ≤ 0`, are masked out before
//! averaging. If nothing survives the mask the mean is `NaN`; this is a
//! reportable outcome, not an error.
use crate::{
    scoring::errors::{ScoringError, ScoringResult},
    special::{norm_cdf, norm_pdf},
};
use std::f64::consts::PI;
use tracing::warn;

/// CRPS of a single Normal forecast, or `NaN` when the inputs are unusable.
#[inline]
pub fn crps_normal_single(y: f64, mu: f64, sigma: f64) -> f64 {
    if !is_usable(y, mu, sigma) {
        return f64::NAN;
    }
    let z = (y - mu) / sigma;
    sigma * (z * (2.0 * norm_cdf(z) - 1.0) + 2.0 * norm_pdf(z) - 1.0 / PI.sqrt())
}

/// Per-observation CRPS; masked observations are `NaN` in the output.
///
/// Errors
/// ------
/// - `ScoringError::LengthMismatch` if `mu` or `sigma` differ in length
///   from `y`.
pub fn crps_normal_series(y: &[f64], mu: &[f64], sigma: &[f64]) -> ScoringResult<Vec<f64>> {
    check_aligned(y, mu, sigma)?;
    Ok(y.iter()
        .zip(mu)
        .zip(sigma)
        .map(|((&y_t, &mu_t), &sigma_t)| crps_normal_single(y_t, mu_t, sigma_t))
        .collect())
}

/// Mean CRPS of a sequence of Normal forecasts.
///
/// Parameters
/// ----------
/// - `y`: `&[f64]`
///   Realized outcomes.
/// - `mu`: `&[f64]`
///   Forecast means, aligned with `y`.
/// - `sigma`: `&[f64]`
///   Forecast standard deviations, aligned with `y`.
///
/// Returns
/// -------
/// `ScoringResult<f64>`
///   Mean CRPS over the observations where all three inputs are finite and
///   `σ > 0`; `Ok(NaN)` when no observation survives.
///
/// Errors
/// ------
/// - `ScoringError::LengthMismatch` for unaligned inputs.
///
/// Examples
/// --------
/// ```rust
/// # use forecast_eval::scoring::crps_normal;
/// let y = [0.0, 1.0, f64::NAN];
/// let mu = [0.0, 1.0, 0.0];
/// let sigma = [1.0, 1.0, 1.0];
/// let score = crps_normal(&y, &mu, &sigma).unwrap();
/// assert!((score - 0.233_694_98).abs() < 1e-7);
/// ```
pub fn crps_normal(y: &[f64], mu: &[f64], sigma: &[f64]) -> ScoringResult<f64> {
    check_aligned(y, mu, sigma)?;

    let (sum, count) = y
        .iter()
        .zip(mu)
        .zip(sigma)
        .filter(|&((&y_t, &mu_t), &sigma_t)| is_usable(y_t, mu_t, sigma_t))
        .fold((0.0, 0usize), |(sum, count), ((&y_t, &mu_t), &sigma_t)| {
            (sum + crps_normal_single(y_t, mu_t, sigma_t), count + 1)
        });

    if count == 0 {
        warn!(n = y.len(), "crps_normal: no usable observations after masking");
        return Ok(f64::NAN);
    }
    Ok(sum / count as f64)
}

// ---- Helper methods ----

#[inline]
fn is_usable(y: f64, mu: f64, sigma: f64) -> bool {
    y.is_finite() && mu.is_finite() && sigma.is_finite() && sigma > 0.0
}

fn check_aligned(y: &[f64], mu: &[f64], sigma: &[f64]) -> ScoringResult<()> {
    for other in [mu.len(), sigma.len()] {
        if other != y.len() {
            return Err(ScoringError::LengthMismatch { expected: y.len(), found: other });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The z = 0 closed form σ·(2/√(2π) − 1/√π).
    // - Masking of non-finite inputs and non-positive σ.
    // - NaN on an empty surviving set and length checking.
    // - Agreement with a numerical integral of (F(x) − 1{x ≥ y})².
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Check the exact z = 0 constant for several σ.
    //
    // Given
    // -----
    // - y = μ and σ ∈ {0.1, 1, 7.5}.
    //
    // Expect
    // ------
    // - crps_normal(y, y, σ) = σ·(2/√(2π) − 1/√π).
    fn crps_at_zero_error_equals_closed_form_constant() {
        for sigma in [0.1, 1.0, 7.5] {
            // Arrange
            let expected = sigma * (2.0 / (2.0 * PI).sqrt() - 1.0 / PI.sqrt());

            // Act
            let score = crps_normal(&[3.2, -1.0], &[3.2, -1.0], &[sigma, sigma]).unwrap();

            // Assert
            assert_relative_eq!(score, expected, max_relative = 1e-14);
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure unusable observations are dropped from the average rather
    // than poisoning it.
    //
    // Given
    // -----
    // - Four observations, of which one has NaN y, one σ = 0, one σ < 0.
    //
    // Expect
    // ------
    // - The mean equals the CRPS of the single usable observation.
    fn crps_masks_non_finite_and_non_positive_sigma() {
        let y = [f64::NAN, 1.0, 2.0, 0.5];
        let mu = [0.0, 0.0, 0.0, 0.0];
        let sigma = [1.0, 0.0, -1.0, 2.0];

        let score = crps_normal(&y, &mu, &sigma).unwrap();

        assert_eq!(score, crps_normal_single(0.5, 0.0, 2.0));
        let series = crps_normal_series(&y, &mu, &sigma).unwrap();
        assert!(series[0].is_nan() && series[1].is_nan() && series[2].is_nan());
        assert!(series[3].is_finite());
    }

    #[test]
    // Purpose
    // -------
    // Verify the NaN contract for an empty surviving set and the error
    // for misaligned inputs.
    //
    // Given
    // -----
    // - Inputs whose σ are all zero; empty inputs; σ one element short.
    //
    // Expect
    // ------
    // - Ok(NaN) for the first two; LengthMismatch for the last.
    fn crps_empty_mask_is_nan_and_misaligned_is_error() {
        assert!(crps_normal(&[1.0, 2.0], &[0.0, 0.0], &[0.0, 0.0]).unwrap().is_nan());
        assert!(crps_normal(&[], &[], &[]).unwrap().is_nan());
        assert_eq!(
            crps_normal(&[1.0, 2.0], &[0.0, 0.0], &[1.0]),
            Err(ScoringError::LengthMismatch { expected: 2, found: 1 })
        );
    }

    #[test]
    // Purpose
    // -------
    // Cross-check the closed form against the integral definition
    // CRPS = ∫ (F(x) − 1{x ≥ y})² dx using a fine trapezoid rule.
    //
    // Given
    // -----
    // - μ = 0.3, σ = 1.7, y = −1.1.
    //
    // Expect
    // ------
    // - Closed form and numerical integral agree to 1e-6.
    fn crps_matches_numerical_integral() {
        // Arrange
        let (mu, sigma, y) = (0.3, 1.7, -1.1);
        let cdf = |x: f64| norm_cdf((x - mu) / sigma);
        fn trapezoid(f: impl Fn(f64) -> f64, a: f64, b: f64, steps: usize) -> f64 {
            let h = (b - a) / steps as f64;
            let mut acc = 0.5 * (f(a) + f(b));
            for i in 1..steps {
                acc += f(a + i as f64 * h);
            }
            acc * h
        }

        // Act: split at y so both integrands are smooth.
        let below = trapezoid(|x: f64| cdf(x).powi(2), mu - 12.0 * sigma, y, 200_000);
        let above = trapezoid(|x: f64| (1.0 - cdf(x)).powi(2), y, mu + 12.0 * sigma, 200_000);

        // Assert
        assert_abs_diff_eq!(crps_normal_single(y, mu, sigma), below + above, epsilon = 1e-6);
    }
}
