//! statistical_tests::var_backtest — Kupiec and Christoffersen VaR backtests.
//!
//! Purpose
//! -------
//! Assess whether a Value-at-Risk forecast series is well calibrated
//! against realized returns. A violation occurs when the return falls
//! strictly below the VaR threshold. Three likelihood-ratio tests are run
//! on the violation sequence:
//!
//! - Kupiec unconditional coverage: is the violation rate equal to `alpha`?
//! - Christoffersen independence: are violations serially independent
//!   (first-order Markov alternative)?
//! - Conditional coverage: both at once, `LR_cc = LR_uc + LR_ind`.
//!
//! Key behaviors
//! -------------
//! - Mask to periods where both return and VaR are finite, then build the
//!   violation indicators and the four transition counts.
//! - `x = 0` or `x = T` make the Kupiec alternative degenerate; the LR is
//!   `+∞` with p-value 0.
//! - An empty transition state (`N0 = 0` or `N1 = 0`) gives `LR_ind = 0`.
//! - Every log argument in the independence likelihoods is floored at
//!   `LOG_FLOOR`, and a zero count contributes nothing.
//! - No usable observations ⇒ a bundle of `NaN` statistics with zero
//!   counts, not an error.
//!
//! Invariants & assumptions
//! ------------------------
//! - `alpha ∈ (0, 1)`; anything else (NaN included) is rejected up front.
//! - Returns and VaR are aligned period by period and use the same sign
//!   convention (VaR is a return quantile, typically negative).
//! - All LR statistics are `≥ 0` (tiny negative rounding is clamped).
//!
//! Conventions
//! -----------
//! - p-values use the χ² survival function with 1 d.o.f. (`uc`, `ind`) and
//!   2 d.o.f. (`cc`).
//! - The restricted independence likelihood uses the violation rate
//!   `π̂ = x/T` by default. [`PooledRate::Transitions`] swaps in the
//!   transition-level MLE `(n01 + n11)/(N0 + N1)`.
use crate::{
    numerical_stability::weighted_ln,
    special::chi2_sf,
    statistical_tests::{
        errors::TestResult,
        validation::{mask_finite_pairs, validate_aligned, validate_alpha},
    },
};
use tracing::{debug, warn};

/// First-order transition counts of a violation sequence.
///
/// `nij` counts consecutive pairs `(I_{t−1}, I_t) = (i, j)`; the four counts
/// sum to `T − 1` for `T ≥ 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransitionCounts {
    pub n00: usize,
    pub n01: usize,
    pub n10: usize,
    pub n11: usize,
}

impl TransitionCounts {
    pub fn from_violations(violations: &[bool]) -> Self {
        let mut counts = TransitionCounts::default();
        for pair in violations.windows(2) {
            match (pair[0], pair[1]) {
                (false, false) => counts.n00 += 1,
                (false, true) => counts.n01 += 1,
                (true, false) => counts.n10 += 1,
                (true, true) => counts.n11 += 1,
            }
        }
        counts
    }

    /// Transitions out of the no-violation state, `N0 = n00 + n01`.
    pub fn from_calm(&self) -> usize {
        self.n00 + self.n01
    }

    /// Transitions out of the violation state, `N1 = n10 + n11`.
    pub fn from_violation(&self) -> usize {
        self.n10 + self.n11
    }
}

/// Violation rate used by the restricted (independent) likelihood of the
/// Christoffersen test.
///
/// Variants
/// --------
/// - `ViolationRate`
///   `π̂ = x/T` over all usable periods.
/// - `Transitions`
///   `(n01 + n11)/(N0 + N1)`, the MLE over the `T − 1` transitions. It
///   drops the first period and can differ from `x/T` by one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PooledRate {
    #[default]
    ViolationRate,
    Transitions,
}

impl PooledRate {
    /// Pooled rate for `x` violations in `n` periods with transitions `counts`.
    ///
    /// `NaN` when the chosen denominator is zero.
    pub fn rate(self, x: usize, n: usize, counts: &TransitionCounts) -> f64 {
        match self {
            PooledRate::ViolationRate => x as f64 / n as f64,
            PooledRate::Transitions => {
                (counts.n01 + counts.n11) as f64
                    / (counts.from_calm() + counts.from_violation()) as f64
            }
        }
    }
}

/// VaRBacktestResult — coverage and independence diagnostics.
///
/// Fields
/// ------
/// - `n_obs`, `violations`, `violation_rate`
///   Usable periods `T`, violation count `x`, and `x/T` (`NaN` if `T = 0`).
/// - `alpha`
///   Nominal tail probability of the VaR forecasts.
/// - `kupiec_lr`, `kupiec_p_value`
///   Unconditional coverage LR and its χ²(1) p-value.
/// - `independence_lr`, `independence_p_value`
///   Christoffersen independence LR and its χ²(1) p-value.
/// - `conditional_coverage_lr`, `conditional_coverage_p_value`
///   `LR_uc + LR_ind` and its χ²(2) p-value.
/// - `transitions`
///   The counts behind the independence test.
#[derive(Debug, Clone, PartialEq)]
pub struct VaRBacktestResult {
    pub n_obs: usize,
    pub violations: usize,
    pub violation_rate: f64,
    pub alpha: f64,
    pub kupiec_lr: f64,
    pub kupiec_p_value: f64,
    pub independence_lr: f64,
    pub independence_p_value: f64,
    pub conditional_coverage_lr: f64,
    pub conditional_coverage_p_value: f64,
    pub transitions: TransitionCounts,
}

impl VaRBacktestResult {
    /// Backtest a VaR series against realized returns.
    ///
    /// Parameters
    /// ----------
    /// - `returns`: `&[f64]`
    ///   Realized returns.
    /// - `var`: `&[f64]`
    ///   VaR forecasts for the same periods, as return thresholds.
    /// - `alpha`: `f64`
    ///   Nominal violation probability in (0, 1).
    ///
    /// Returns
    /// -------
    /// `TestResult<VaRBacktestResult>`
    ///   All three tests on the masked violation sequence; the `NaN` bundle
    ///   when no period has both values finite.
    ///
    /// Errors
    /// ------
    /// - `TestError::InvalidAlpha` unless `0 < alpha < 1`.
    /// - `TestError::LengthMismatch` if the series lengths differ.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use forecast_eval::statistical_tests::VaRBacktestResult;
    /// let returns: Vec<f64> = (0..100).map(|t| if t % 10 == 0 { -3.0 } else { 0.5 }).collect();
    /// let var = vec![-2.0; 100];
    /// let res = VaRBacktestResult::backtest(&returns, &var, 0.1).unwrap();
    /// assert_eq!(res.violations, 10);
    /// assert!(res.kupiec_p_value > 0.99);
    /// ```
    pub fn backtest(returns: &[f64], var: &[f64], alpha: f64) -> TestResult<Self> {
        Self::backtest_with(returns, var, alpha, PooledRate::default())
    }

    /// [`backtest`](Self::backtest) with an explicit pooled rate for the
    /// independence test.
    pub fn backtest_with(
        returns: &[f64], var: &[f64], alpha: f64, pooled: PooledRate,
    ) -> TestResult<Self> {
        validate_alpha(alpha)?;
        validate_aligned(returns, var)?;
        let (ret, var) = mask_finite_pairs(returns, var);
        let violations: Vec<bool> = ret.iter().zip(&var).map(|(r, v)| r < v).collect();
        Self::from_violations_with(&violations, alpha, pooled)
    }

    /// Run the three tests on a precomputed violation sequence.
    ///
    /// Errors
    /// ------
    /// - `TestError::InvalidAlpha` unless `0 < alpha < 1`.
    pub fn from_violations(violations: &[bool], alpha: f64) -> TestResult<Self> {
        Self::from_violations_with(violations, alpha, PooledRate::default())
    }

    pub fn from_violations_with(
        violations: &[bool], alpha: f64, pooled: PooledRate,
    ) -> TestResult<Self> {
        validate_alpha(alpha)?;
        let n = violations.len();
        if n == 0 {
            warn!(alpha, "no usable observations for the VaR backtest");
            return Ok(Self::empty(alpha));
        }

        let x = violations.iter().filter(|&&v| v).count();
        let transitions = TransitionCounts::from_violations(violations);
        let kupiec_lr = kupiec_lr(x, n, alpha);
        let independence_lr = independence_lr(&transitions, pooled.rate(x, n, &transitions));
        let conditional_coverage_lr = kupiec_lr + independence_lr;
        debug!(n_obs = n, violations = x, kupiec_lr, independence_lr, "VaR backtest statistics");

        Ok(VaRBacktestResult {
            n_obs: n,
            violations: x,
            violation_rate: x as f64 / n as f64,
            alpha,
            kupiec_lr,
            kupiec_p_value: chi2_sf(kupiec_lr, 1.0),
            independence_lr,
            independence_p_value: chi2_sf(independence_lr, 1.0),
            conditional_coverage_lr,
            conditional_coverage_p_value: chi2_sf(conditional_coverage_lr, 2.0),
            transitions,
        })
    }

    fn empty(alpha: f64) -> Self {
        VaRBacktestResult {
            n_obs: 0,
            violations: 0,
            violation_rate: f64::NAN,
            alpha,
            kupiec_lr: f64::NAN,
            kupiec_p_value: f64::NAN,
            independence_lr: f64::NAN,
            independence_p_value: f64::NAN,
            conditional_coverage_lr: f64::NAN,
            conditional_coverage_p_value: f64::NAN,
            transitions: TransitionCounts::default(),
        }
    }
}

/// Kupiec proportion-of-failures LR for `x` violations in `n` periods.
///
/// `+∞` when `x = 0` or `x = n`, where the unrestricted likelihood is
/// degenerate; otherwise `−2(logL0 − logL1) ≥ 0`.
pub fn kupiec_lr(x: usize, n: usize, alpha: f64) -> f64 {
    if x == 0 || x == n {
        return f64::INFINITY;
    }
    let (hits, misses) = (x as f64, (n - x) as f64);
    let pi_hat = hits / n as f64;
    let log_l0 = weighted_ln(misses, 1.0 - alpha) + weighted_ln(hits, alpha);
    let log_l1 = weighted_ln(misses, 1.0 - pi_hat) + weighted_ln(hits, pi_hat);
    (-2.0 * (log_l0 - log_l1)).max(0.0)
}

/// Christoffersen independence LR from the transition counts.
///
/// `pooled_rate` is the violation probability under independence (see
/// [`PooledRate`]). `logL1` is maximized over both state-dependent rates,
/// so the LR is non-negative for any pooled rate up to rounding. `0` when
/// either conditioning state is never visited.
pub fn independence_lr(counts: &TransitionCounts, pooled_rate: f64) -> f64 {
    let (n0, n1) = (counts.from_calm(), counts.from_violation());
    if n0 == 0 || n1 == 0 {
        return 0.0;
    }
    let [n00, n01, n10, n11] = [counts.n00, counts.n01, counts.n10, counts.n11].map(|c| c as f64);
    let pi01 = n01 / n0 as f64;
    let pi11 = n11 / n1 as f64;

    let log_l0 =
        weighted_ln(n00 + n10, 1.0 - pooled_rate) + weighted_ln(n01 + n11, pooled_rate);
    let log_l1 = weighted_ln(n00, 1.0 - pi01)
        + weighted_ln(n01, pi01)
        + weighted_ln(n10, 1.0 - pi11)
        + weighted_ln(n11, pi11);
    (-2.0 * (log_l0 - log_l1)).max(0.0)
}
