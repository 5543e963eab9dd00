//! evaluation — one-call scorecard for Normal predictive distributions.
//!
//! Purpose
//! -------
//! Combine the point-forecast losses, the CRPS, and the VaR backtest for a
//! model that issues a Normal predictive distribution `N(mu_t, sigma_t²)`
//! per period. This is the usual end-of-pipeline report for a volatility or
//! return model: how close the means are, how sharp and calibrated the full
//! distribution is, and whether the implied tail quantile is violated at the
//! nominal rate.
//!
//! Key behaviors
//! -------------
//! - [`normal_var`] maps `(mu_t, sigma_t)` to the `alpha` quantile
//!   `mu_t + sigma_t·Φ⁻¹(alpha)`.
//! - [`ForecastEvaluation::normal`] computes MSE and MAE of `y − mu`, the
//!   mean CRPS, and a [`VaRBacktestResult`] on the implied VaR series.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are aligned by period; periods with non-finite values (or a
//!   non-positive `sigma` for the distributional parts) are masked, never
//!   raised.
//! - Scores with nothing left to average are `NaN`.
use crate::{
    scoring::{LossKind, crps_normal, loss},
    special::norm_ppf,
    statistical_tests::{
        errors::{TestError, TestResult},
        validation::{mask_finite_pairs, validate_aligned, validate_alpha},
        var_backtest::VaRBacktestResult,
    },
};

/// VaR series implied by Normal predictive distributions.
///
/// Returns `mu_t + sigma_t·Φ⁻¹(alpha)` per period, and `NaN` where `mu_t`
/// or `sigma_t` is non-finite or `sigma_t ≤ 0`.
///
/// Errors
/// ------
/// - `TestError::InvalidAlpha` unless `0 < alpha < 1`.
/// - `TestError::LengthMismatch` if `mu` and `sigma` differ in length.
///
/// Examples
/// --------
/// ```rust
/// # use forecast_eval::evaluation::normal_var;
/// let var = normal_var(&[0.0, 1.0], &[1.0, -1.0], 0.5).unwrap();
/// assert!(var[0].abs() < 1e-12);
/// assert!(var[1].is_nan());
/// ```
pub fn normal_var(mu: &[f64], sigma: &[f64], alpha: f64) -> TestResult<Vec<f64>> {
    validate_alpha(alpha)?;
    validate_aligned(mu, sigma)?;
    let z = norm_ppf(alpha);
    Ok(mu
        .iter()
        .zip(sigma)
        .map(|(&m, &s)| {
            if m.is_finite() && s.is_finite() && s > 0.0 { m + s * z } else { f64::NAN }
        })
        .collect())
}

/// ForecastEvaluation — scorecard of a Normal predictive model.
///
/// Fields
/// ------
/// - `n_obs`: periods with finite `y` and `mu` (the point-forecast sample).
/// - `mse`, `mae`: mean squared and absolute error of `y − mu`.
/// - `crps`: mean closed-form CRPS over usable periods.
/// - `var_backtest`: coverage tests of the implied `alpha` VaR series.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEvaluation {
    pub n_obs: usize,
    pub mse: f64,
    pub mae: f64,
    pub crps: f64,
    pub var_backtest: VaRBacktestResult,
}

impl ForecastEvaluation {
    /// Score Normal predictive distributions against realizations.
    ///
    /// Parameters
    /// ----------
    /// - `y`: `&[f64]`
    ///   Realized values.
    /// - `mu`, `sigma`: `&[f64]`
    ///   Predictive means and standard deviations, aligned with `y`.
    /// - `alpha`: `f64`
    ///   Tail probability of the VaR derived from the predictive.
    ///
    /// Errors
    /// ------
    /// - `TestError::LengthMismatch` if the three series differ in length.
    /// - `TestError::InvalidAlpha` unless `0 < alpha < 1`.
    pub fn normal(y: &[f64], mu: &[f64], sigma: &[f64], alpha: f64) -> TestResult<Self> {
        validate_aligned(y, mu)?;
        let var = normal_var(mu, sigma, alpha)?;
        let crps = crps_normal(y, mu, sigma).map_err(TestError::from)?;

        let (y_obs, mu_obs) = mask_finite_pairs(y, mu);
        let errors: Vec<f64> = y_obs.iter().zip(&mu_obs).map(|(a, b)| a - b).collect();
        let var_backtest = VaRBacktestResult::backtest(y, &var, alpha)?;

        Ok(ForecastEvaluation {
            n_obs: errors.len(),
            mse: mean_or_nan(&loss(&errors, LossKind::Squared)),
            mae: mean_or_nan(&loss(&errors, LossKind::Absolute)),
            crps,
            var_backtest,
        })
    }
}

fn mean_or_nan(x: &[f64]) -> f64 {
    if x.is_empty() { f64::NAN } else { x.iter().sum::<f64>() / x.len() as f64 }
}
