//! inference::block_size — AR(1)-proxy block length for the moving block
//! bootstrap.
//!
//! A closed-form, single-pass heuristic rather than an optimizer:
//!
//! 1. `ρ = corr(d[0..T−1], d[1..T])`, the lag-1 autocorrelation proxy.
//! 2. The AR(1)-implied long-run variance is `var_d·(1+ρ)/(1−ρ)`, so the
//!    ratio to the plain variance is `λ² = (1+ρ)/(1−ρ)`.
//! 3. `b = round(1.3 · T^{1/3} · λ)`, clamped to `[1, max(1, ⌊T/2⌋)]`.
//!
//! Stronger positive dependence gives longer blocks; negative dependence
//! shortens them down to one. It trades statistical optimality for speed
//! and determinism. `ρ` is capped at `RHO_CAP`; `ρ ≥ 1` is treated as the
//! degenerate case and returns the largest admissible block.
use crate::numerical_stability::RHO_CAP;
use tracing::warn;

/// Lag-1 Pearson autocorrelation of `d`.
///
/// Returns `0` when `T < 2`, when either window has zero variance, or when
/// the estimate is not finite.
pub fn lag1_autocorrelation(d: &[f64]) -> f64 {
    let n = d.len();
    if n < 2 {
        return 0.0;
    }
    let (lead, lag) = (&d[1..], &d[..n - 1]);
    let m = (n - 1) as f64;
    let mean_lead = lead.iter().sum::<f64>() / m;
    let mean_lag = lag.iter().sum::<f64>() / m;

    let (mut cov, mut var_lead, mut var_lag) = (0.0, 0.0, 0.0);
    for (&a, &b) in lead.iter().zip(lag) {
        let (da, db) = (a - mean_lead, b - mean_lag);
        cov += da * db;
        var_lead += da * da;
        var_lag += db * db;
    }
    if var_lead <= 0.0 || var_lag <= 0.0 {
        return 0.0;
    }
    let rho = cov / (var_lead * var_lag).sqrt();
    if rho.is_finite() { rho.clamp(-1.0, 1.0) } else { 0.0 }
}

/// Largest admissible block for a series of length `n`: `max(1, ⌊n/2⌋)`.
#[inline]
pub fn max_block_size(n: usize) -> usize {
    (n / 2).max(1)
}

/// Select a moving-block-bootstrap block length for the series `d`.
///
/// Parameters
/// ----------
/// - `d`: `&[f64]`
///   Finite series to be resampled (the loss differential).
///
/// Returns
/// -------
/// `usize`
///   Block length in `[1, max(1, ⌊T/2⌋)]`.
///
/// Examples
/// --------
/// ```rust
/// # use forecast_eval::inference::select_block_size;
/// // Constant series: ρ = 0, λ = 1, round(1.3·200^{1/3}) = 8.
/// assert_eq!(select_block_size(&vec![1.0; 200]), 8);
/// ```
pub fn select_block_size(d: &[f64]) -> usize {
    let n = d.len();
    let cap = max_block_size(n);
    let rho = lag1_autocorrelation(d);
    if rho >= 1.0 {
        return cap;
    }
    let rho = if rho > RHO_CAP {
        warn!(rho, cap = RHO_CAP, "lag-1 autocorrelation capped in block-size selection");
        RHO_CAP
    } else {
        rho
    };

    let lambda = ((1.0 + rho) / (1.0 - rho)).sqrt();
    let raw = (1.3 * (n as f64).cbrt() * lambda).round();
    if !raw.is_finite() || raw < 1.0 {
        return 1;
    }
    (raw as usize).min(cap)
}
