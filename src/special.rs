//! special — Normal and χ² helpers built on `statrs`.
//!
//! The standard Normal CDF and quantile are evaluated through the
//! complementary error function so that tail probabilities such as
//! `2·(1 − Φ(|z|))` keep full relative precision for large `|z|`. Survival
//! functions for χ² and Student-t map the sentinel statistics used in this
//! crate (`+∞`, `NaN`, non-positive) onto fixed p-values before reaching
//! `statrs`.
use statrs::{
    distribution::{ChiSquared, ContinuousCDF, StudentsT},
    function::erf::{erfc, erfc_inv},
};
use std::f64::consts::{PI, SQRT_2};

/// Standard Normal density φ(z).
#[inline]
pub fn norm_pdf(z: f64) -> f64 {
    (-0.5 * z * z).exp() / (2.0 * PI).sqrt()
}

/// Standard Normal CDF Φ(z) = ½·erfc(−z/√2).
#[inline]
pub fn norm_cdf(z: f64) -> f64 {
    0.5 * erfc(-z / SQRT_2)
}

/// Standard Normal quantile Φ⁻¹(p) for `p ∈ (0, 1)`; `NaN` outside.
pub fn norm_ppf(p: f64) -> f64 {
    if !(p > 0.0 && p < 1.0) {
        return f64::NAN;
    }
    -SQRT_2 * erfc_inv(2.0 * p)
}

/// Two-sided Normal p-value `2·(1 − Φ(|z|))`, computed as `erfc(|z|/√2)`.
#[inline]
pub fn norm_two_sided_p(z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }
    erfc(z.abs() / SQRT_2).min(1.0)
}

/// Upper-tail probability of a χ²(`dof`) variable.
///
/// - `NaN` → `NaN`
/// - `+∞` → `0`
/// - `stat ≤ 0` → `1`
pub fn chi2_sf(stat: f64, dof: f64) -> f64 {
    if stat.is_nan() {
        return f64::NAN;
    }
    if stat == f64::INFINITY {
        return 0.0;
    }
    if stat <= 0.0 {
        return 1.0;
    }
    match ChiSquared::new(dof) {
        Ok(dist) => dist.sf(stat),
        Err(_) => f64::NAN,
    }
}

/// Two-sided Student-t p-value `2·P(T > |t|)` with `dof` degrees of freedom.
pub fn students_t_two_sided_p(t: f64, dof: f64) -> f64 {
    if t.is_nan() || !(dof > 0.0) {
        return f64::NAN;
    }
    if t.is_infinite() {
        return 0.0;
    }
    match StudentsT::new(0.0, 1.0, dof) {
        Ok(dist) => (2.0 * dist.sf(t.abs())).min(1.0),
        Err(_) => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Reference values of Φ, φ, and Φ⁻¹.
    // - Sentinel handling in the χ² and Student-t survival helpers.
    //
    // They intentionally DO NOT cover:
    // - The accuracy of `statrs` itself beyond a few textbook quantiles.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify Φ, φ, and Φ⁻¹ against textbook values.
    //
    // Given
    // -----
    // - z = 0 and z = 1.959963984540054 (the 97.5% quantile).
    //
    // Expect
    // ------
    // - Φ(0) = 0.5, φ(0) = 1/√(2π), Φ(1.96) ≈ 0.975, Φ⁻¹(0.975) ≈ 1.96.
    fn normal_helpers_match_reference_values() {
        let z975 = 1.959963984540054;

        assert_abs_diff_eq!(norm_cdf(0.0), 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(norm_pdf(0.0), 1.0 / (2.0 * PI).sqrt(), epsilon = 1e-15);
        assert_abs_diff_eq!(norm_cdf(z975), 0.975, epsilon = 1e-12);
        assert_abs_diff_eq!(norm_ppf(0.975), z975, epsilon = 1e-9);
        assert_abs_diff_eq!(norm_ppf(0.05), -1.6448536269514729, epsilon = 1e-9);
        assert!(norm_ppf(0.0).is_nan());
        assert!(norm_ppf(1.0).is_nan());
    }

    #[test]
    // Purpose
    // -------
    // Ensure the two-sided Normal p-value equals one at zero and matches
    // the 5% critical value.
    //
    // Given
    // -----
    // - z = 0, z = ±1.96.
    //
    // Expect
    // ------
    // - p(0) = 1, p(±1.96) ≈ 0.05, symmetric in the sign of z.
    fn norm_two_sided_p_is_one_at_zero_and_symmetric() {
        assert_eq!(norm_two_sided_p(0.0), 1.0);
        assert_abs_diff_eq!(norm_two_sided_p(1.959963984540054), 0.05, epsilon = 1e-10);
        assert_eq!(norm_two_sided_p(2.5), norm_two_sided_p(-2.5));
    }

    #[test]
    // Purpose
    // -------
    // Check the sentinel mapping and one reference value of `chi2_sf`.
    //
    // Given
    // -----
    // - stat ∈ {+∞, 0, NaN, 3.841458820694124} with dof = 1.
    //
    // Expect
    // ------
    // - +∞ → 0, 0 → 1, NaN → NaN, 3.8415 → 0.05.
    fn chi2_sf_maps_sentinels_and_matches_critical_value() {
        assert_eq!(chi2_sf(f64::INFINITY, 1.0), 0.0);
        assert_eq!(chi2_sf(0.0, 1.0), 1.0);
        assert!(chi2_sf(f64::NAN, 1.0).is_nan());
        assert_abs_diff_eq!(chi2_sf(3.841458820694124, 1.0), 0.05, epsilon = 1e-9);
        assert_abs_diff_eq!(chi2_sf(5.991464547107979, 2.0), 0.05, epsilon = 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // Verify the Student-t two-sided p-value at zero and for large dof.
    //
    // Given
    // -----
    // - t = 0 with dof = 10; t = 1.96 with dof = 1e6.
    //
    // Expect
    // ------
    // - p(0) = 1; with very large dof the value approaches the Normal 0.05.
    fn students_t_two_sided_p_behaves_like_normal_for_large_dof() {
        assert_abs_diff_eq!(students_t_two_sided_p(0.0, 10.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(students_t_two_sided_p(1.959963984540054, 1e6), 0.05, epsilon = 1e-4);
        assert!(students_t_two_sided_p(1.0, 0.0).is_nan());
    }
}
