//! inference::hac — Newey–West long-run variance of a scalar sequence.
//!
//! Purpose
//! -------
//! Estimate the long-run variance `Var(√n · x̄)` of a dependent scalar
//! sequence `x` of length `n`. The Diebold–Mariano test calls this once
//! for the observed loss differential and once for every bootstrap
//! pseudo-series, so it is kept at O(n·L) with no allocation on the
//! default path.
//!
//! ```text
//! LRV = γ₀ + 2 · ∑_{k=1}^{L} w_k · γ_k,
//! γ₀  = (1/n) ∑ (x_t − x̄)²,
//! γ_k = c_k · ∑_{t=k}^{n−1} x_t · x_{t−k},
//! w_k = kernel(k / (L+1)),
//! ```
//!
//! with `L = ⌊4·(n/100)^{2/9}⌋` unless a bandwidth is supplied, and
//! `c_k = 1/(n − k)` (small-sample correction on) or `1/n` (off).
//!
//! Key behaviors
//! -------------
//! - The lag terms `γ_k` are **raw** second moments of the series, not
//!   mean-centred autocovariances. This is the default and reproduces the
//!   historical estimator exactly. `HACOptions::center = true` switches the
//!   lag terms to the textbook centred form.
//! - The result is clamped to `LRV ≥ LRV_FLOOR` so that it can always be
//!   used as a denominator.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite; callers mask non-finite values beforehand.
//! - The effective bandwidth is truncated to `n − 1`.
//! - An empty input returns `LRV_FLOOR`.
//!
//! Testing notes
//! -------------
//! - Unit tests check the default estimator against a hand-computed value,
//!   the floor on degenerate input, agreement of centred and raw forms on
//!   mean-zero data, and the effect of the small-sample flag.
use crate::{
    inference::kernel::{KernelType, rule_of_thumb_bandwidth},
    numerical_stability::LRV_FLOOR,
};
use ndarray::{Array1, ArrayView1, s};
use std::cmp::min;

/// HACOptions — configuration for the long-run variance estimator.
///
/// Fields
/// ------
/// - `kernel`: [`KernelType`]
///   Taper family for the lag weights. Bartlett gives the Newey–West
///   weight `1 − k/(L+1)`.
/// - `bandwidth`: `Option<usize>`
///   Fixed lag truncation `L`; `None` selects the rule of thumb
///   `⌊4·(n/100)^{2/9}⌋`. Either way the effective value is `min(L, n−1)`.
/// - `center`: `bool`
///   Demean the series before forming the lag products.
/// - `small_sample_correction`: `bool`
///   Scale lag `k` products by `1/(n−k)` (a plain mean over the overlapping
///   pairs) instead of `1/n`.
///
/// Notes
/// -----
/// - `HACOptions::default()` is Bartlett, rule-of-thumb bandwidth, raw lag
///   moments, small-sample correction on: the estimator used by the
///   Diebold–Mariano test unless told otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct HACOptions {
    /// Kernel type for the lag weights.
    pub kernel: KernelType,
    /// Fixed bandwidth; rule of thumb when `None`.
    pub bandwidth: Option<usize>,
    /// Center the series before forming lag products.
    pub center: bool,
    /// Average lag products over `n − k` pairs instead of dividing by `n`.
    pub small_sample_correction: bool,
}

impl HACOptions {
    /// Construct a `HACOptions` value from explicit settings.
    ///
    /// This constructor does not validate; any bandwidth is accepted and
    /// truncated to `n − 1` at compute time.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use forecast_eval::inference::{HACOptions, KernelType};
    /// let opts = HACOptions::new(Some(5), KernelType::Parzen, true, true);
    /// assert_eq!(opts.bandwidth, Some(5));
    /// ```
    pub fn new(
        bandwidth: Option<usize>, kernel: KernelType, center: bool, small_sample_correction: bool,
    ) -> HACOptions {
        HACOptions { kernel, bandwidth, center, small_sample_correction }
    }

    /// Effective bandwidth for a series of length `n` (`0` when `n ≤ 1`).
    pub fn effective_bandwidth(&self, n: usize) -> usize {
        let requested = self.bandwidth.unwrap_or_else(|| rule_of_thumb_bandwidth(n));
        min(requested, n.saturating_sub(1))
    }
}

impl Default for HACOptions {
    fn default() -> Self {
        Self {
            kernel: KernelType::Bartlett,
            bandwidth: None,
            center: false,
            small_sample_correction: true,
        }
    }
}

/// Long-run variance of `x` under `hac_opts`, floored at `LRV_FLOOR`.
///
/// Parameters
/// ----------
/// - `x`: `&[f64]`
///   Finite scalar sequence (e.g. a loss differential or one bootstrap
///   pseudo-series).
/// - `hac_opts`: `&HACOptions`
///   Kernel, bandwidth, centering and scaling policy.
///
/// Returns
/// -------
/// `f64`
///   The HAC long-run variance, always `≥ LRV_FLOOR`.
///
/// Panics
/// ------
/// - Never panics; empty input returns `LRV_FLOOR`.
///
/// Examples
/// --------
/// ```rust
/// # use forecast_eval::inference::{HACOptions, long_run_variance};
/// // Constant series: zero variance, but raw lag moments equal 1.
/// let x = vec![1.0; 200];
/// let lrv = long_run_variance(&x, &HACOptions::default());
/// // L = 4, weights 0.8, 0.6, 0.4, 0.2 → 2·(0.8+0.6+0.4+0.2) = 4.
/// assert!((lrv - 4.0).abs() < 1e-12);
/// ```
pub fn long_run_variance(x: &[f64], hac_opts: &HACOptions) -> f64 {
    let n = x.len();
    if n == 0 {
        return LRV_FLOOR;
    }
    let n_f = n as f64;
    let mean = x.iter().sum::<f64>() / n_f;
    let gamma0 = x.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / n_f;

    let centered: Option<Array1<f64>> =
        hac_opts.center.then(|| x.iter().map(|&v| v - mean).collect());
    let series: ArrayView1<'_, f64> = match &centered {
        Some(c) => c.view(),
        None => ArrayView1::from(x),
    };

    let bandwidth = hac_opts.effective_bandwidth(n);
    let mut lrv = gamma0;
    for lag in 1..=bandwidth {
        let scale = if hac_opts.small_sample_correction { 1.0 / (n - lag) as f64 } else { 1.0 / n_f };
        let gamma = series.slice(s![..n - lag]).dot(&series.slice(s![lag..])) * scale;
        let weight = hac_opts.kernel.weight(lag as f64 / (bandwidth + 1) as f64);
        lrv += 2.0 * weight * gamma;
    }
    lrv.max(LRV_FLOOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The default (raw-moment, Bartlett, rule-of-thumb) estimator against
    //   a direct re-implementation of the formula.
    // - The LRV floor on degenerate input.
    // - Centering, the IID kernel, and the small-sample flag.
    //
    // They intentionally DO NOT cover:
    // - Consistency of the estimator; that is a property of the method.
    // -------------------------------------------------------------------------

    fn reference_lrv(x: &[f64]) -> f64 {
        let n = x.len();
        let mean = x.iter().sum::<f64>() / n as f64;
        let var = x.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
        let max_lag = ((4.0 * (n as f64 / 100.0).powf(2.0 / 9.0)).floor() as usize).min(n - 1);
        let mut lrv = var;
        for lag in 1..=max_lag {
            let mut acc = 0.0;
            for t in 0..n - lag {
                acc += x[t] * x[t + lag];
            }
            let gamma = acc / (n - lag) as f64;
            lrv += 2.0 * (1.0 - lag as f64 / (max_lag + 1) as f64) * gamma;
        }
        lrv.max(1e-10)
    }

    #[test]
    // Purpose
    // -------
    // Compare the default estimator to a loop-based reference of the
    // documented formula on a non-trivial series.
    //
    // Given
    // -----
    // - A deterministic series of length 150 mixing a trend and a cycle.
    //
    // Expect
    // ------
    // - `long_run_variance` matches the reference to 1e-12.
    fn long_run_variance_default_matches_reference_formula() {
        // Arrange
        let x: Vec<f64> =
            (0..150).map(|t| (t as f64 * 0.37).sin() + 0.01 * t as f64 - 0.5).collect();

        // Act
        let lrv = long_run_variance(&x, &HACOptions::default());

        // Assert
        assert_abs_diff_eq!(lrv, reference_lrv(&x), epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Ensure degenerate inputs are absorbed by the floor.
    //
    // Given
    // -----
    // - An empty series, a constant zero series, and an alternating ±1
    //   series with an IID kernel (γ₀ = 1, lag terms ignored).
    //
    // Expect
    // ------
    // - LRV_FLOOR, LRV_FLOOR, and exactly 1.
    fn long_run_variance_floor_and_iid_kernel() {
        let iid = HACOptions::new(None, KernelType::IID, false, true);
        let alternating: Vec<f64> = (0..50).map(|t| if t % 2 == 0 { 1.0 } else { -1.0 }).collect();

        assert_eq!(long_run_variance(&[], &HACOptions::default()), LRV_FLOOR);
        assert_eq!(long_run_variance(&[0.0; 40], &HACOptions::default()), LRV_FLOOR);
        assert_abs_diff_eq!(long_run_variance(&alternating, &iid), 1.0, epsilon = 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Verify that centering is a no-op on exactly mean-zero data and
    // changes the estimate on data with a non-zero mean.
    //
    // Given
    // -----
    // - A symmetric mean-zero series and the same series shifted by 2.
    //
    // Expect
    // ------
    // - Raw and centred estimates agree on the mean-zero series.
    // - On the shifted series the centred estimate equals the mean-zero
    //   estimate while the raw one is larger.
    fn long_run_variance_centering_behaviour() {
        // Arrange
        let base: Vec<f64> = [0.5, -1.0, 1.5, -0.25, 0.75, -1.5]
            .iter()
            .flat_map(|&v| [v, -v])
            .collect();
        let shifted: Vec<f64> = base.iter().map(|v| v + 2.0).collect();
        let raw = HACOptions::default();
        let centered = HACOptions { center: true, ..HACOptions::default() };

        // Act & Assert
        assert_abs_diff_eq!(
            long_run_variance(&base, &raw),
            long_run_variance(&base, &centered),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            long_run_variance(&shifted, &centered),
            long_run_variance(&base, &centered),
            epsilon = 1e-12
        );
        assert!(long_run_variance(&shifted, &raw) > long_run_variance(&shifted, &centered));
    }

    #[test]
    // Purpose
    // -------
    // Check the bandwidth override and the small-sample scaling.
    //
    // Given
    // -----
    // - A constant series of ones, length 10, bandwidth fixed at 1.
    //
    // Expect
    // ------
    // - With correction: γ₁ = 1, w₁ = 0.5 → LRV = 1.
    // - Without: γ₁ = 9/10 → LRV = 0.9.
    // - A bandwidth larger than n − 1 is truncated to n − 1.
    fn long_run_variance_bandwidth_and_small_sample_flag() {
        let ones = vec![1.0; 10];
        let with = HACOptions::new(Some(1), KernelType::Bartlett, false, true);
        let without = HACOptions::new(Some(1), KernelType::Bartlett, false, false);

        assert_abs_diff_eq!(long_run_variance(&ones, &with), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(long_run_variance(&ones, &without), 0.9, epsilon = 1e-15);
        let wide = HACOptions::new(Some(50), KernelType::Bartlett, false, true);
        assert_eq!(wide.effective_bandwidth(10), 9);
        assert_eq!(HACOptions::default().effective_bandwidth(1), 0);
    }
}
