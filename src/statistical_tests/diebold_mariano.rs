//! statistical_tests::diebold_mariano — DM test with moving-block bootstrap.
//!
//! Purpose
//! -------
//! Compare the predictive accuracy of two forecasting models from their
//! aligned forecast-error series. The null hypothesis is equal expected
//! loss, `E[d_t] = 0` with `d_t = L(e1_t) − L(e2_t)`. Two p-values are
//! reported: the asymptotic Normal one and a moving-block-bootstrap one,
//! which is authoritative for the short, serially dependent, heavy-tailed
//! loss differentials met in practice.
//!
//! Key behaviors
//! -------------
//! - Mask non-finite periods pairwise, form the loss differential, and pick
//!   one block size for the whole run via
//!   [`select_block_size`](crate::inference::select_block_size).
//! - Asymptotic path: `DM = √T·d̄/√LRV(d)` with the HAC long-run variance
//!   and `p = 2·(1 − Φ(|DM|))`, plus the Harvey–Leybourne–Newbold
//!   small-sample correction for the forecast horizon.
//! - Bootstrap path: every replicate resamples `d`, recomputes its own mean
//!   **and its own LRV**, and yields one DM statistic. With the default
//!   [`BootstrapCentering::NullImposed`] the replicate mean is recentred on
//!   `d̄`, so the replicate distribution approximates the null.
//! - Replicates are independent `StdRng` streams seeded from
//!   `replicate_seed(base, i)`; with the `parallel` feature they run on
//!   rayon and produce the same numbers as the sequential loop.
//!
//! Invariants & assumptions
//! ------------------------
//! - Error series must have equal length; mismatch is an error, never a
//!   silent truncation.
//! - After masking at least `max(min_obs, 2)` observations must remain.
//! - Degenerate differentials (constant, all zero) never fail: the LRV
//!   floor keeps every statistic finite.
//!
//! Conventions
//! -----------
//! - Positive statistics mean model 1 has the larger loss.
//! - `bootstrap_p_value = #{|DM*_b| ≥ |DM|} / reps`, so it lies in `[0, 1]`
//!   and is exactly 1 when the observed statistic is 0.
//!
//! Testing notes
//! -------------
//! - Unit tests below cover option validation, the closed-form asymptotic
//!   path on a constant differential, swap symmetry, seed determinism,
//!   masking, and the HLN correction. Integration tests under `tests/`
//!   exercise simulated model comparisons.
use crate::{
    inference::{
        HACOptions, MovingBlockBootstrap, long_run_variance, replicate_seed, select_block_size,
    },
    scoring::{LossKind, loss_differential},
    special::{norm_two_sided_p, students_t_two_sided_p},
    statistical_tests::{
        errors::{TestError, TestResult},
        validation::{mask_finite_pairs, validate_aligned, validate_confidence_level},
    },
};
use rand::{SeedableRng, rngs::StdRng};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default number of bootstrap replications.
pub const DEFAULT_BOOTSTRAP_REPS: usize = 10_000;

/// Default minimum number of usable observations.
pub const DEFAULT_MIN_OBS: usize = 30;

/// How bootstrap replicate statistics are centred.
///
/// Variants
/// --------
/// - `NullImposed`
///   `DM*_b = √T·(mean(d*_b) − d̄)/√LRV(d*_b)`. The replicate distribution
///   is centred on zero, approximating the null of equal accuracy.
/// - `Uncentered`
///   `DM*_b = √T·mean(d*_b)/√LRV(d*_b)`. The replicate distribution is
///   centred on the observed statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BootstrapCentering {
    #[default]
    NullImposed,
    Uncentered,
}

/// DMOptions — configuration for [`DMTestResult::diebold_mariano`].
///
/// Fields
/// ------
/// - `loss`: [`LossKind`]
///   Per-period loss applied to both error series.
/// - `horizon`: `usize`
///   Forecast horizon `h ≥ 1`; drives the HLN correction only.
/// - `bootstrap_reps`: `usize`
///   Number of moving-block-bootstrap replicates (`≥ 1`).
/// - `confidence_level`: `f64`
///   Level in (0, 1) used for the percentile interval and
///   [`DMTestResult::rejects_null`].
/// - `seed`: `Option<u64>`
///   Base seed for the replicate RNG streams; a fresh seed is drawn per
///   call when `None`.
/// - `hac`: [`HACOptions`]
///   Long-run variance estimator, shared by the observed and replicate
///   statistics.
/// - `min_obs`: `usize`
///   Minimum number of usable observations after masking.
/// - `keep_distribution`: `bool`
///   Store the replicate statistics in the result.
/// - `centering`: [`BootstrapCentering`]
///   Replicate centring rule.
///
/// Notes
/// -----
/// - Fields are public for struct-update syntax; every entry point calls
///   [`DMOptions::validate`] before doing any work.
#[derive(Debug, Clone, PartialEq)]
pub struct DMOptions {
    pub loss: LossKind,
    pub horizon: usize,
    pub bootstrap_reps: usize,
    pub confidence_level: f64,
    pub seed: Option<u64>,
    pub hac: HACOptions,
    pub min_obs: usize,
    pub keep_distribution: bool,
    pub centering: BootstrapCentering,
}

impl DMOptions {
    /// Create validated options; the remaining fields take their defaults.
    ///
    /// Errors
    /// ------
    /// - `TestError::InvalidHorizon` if `horizon == 0`.
    /// - `TestError::InvalidBootstrapReps` if `bootstrap_reps == 0`.
    /// - `TestError::InvalidConfidenceLevel` unless `0 < level < 1`.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use forecast_eval::scoring::LossKind;
    /// # use forecast_eval::statistical_tests::DMOptions;
    /// let opts = DMOptions::new(LossKind::Absolute, 1, 999, 0.9).unwrap().with_seed(7);
    /// assert_eq!(opts.seed, Some(7));
    /// assert!(DMOptions::new(LossKind::Squared, 0, 999, 0.9).is_err());
    /// ```
    pub fn new(
        loss: LossKind, horizon: usize, bootstrap_reps: usize, confidence_level: f64,
    ) -> TestResult<Self> {
        let opts = DMOptions { loss, horizon, bootstrap_reps, confidence_level, ..Self::default() };
        opts.validate()?;
        Ok(opts)
    }

    /// Check the documented ranges of every field.
    pub fn validate(&self) -> TestResult<()> {
        if self.horizon == 0 {
            return Err(TestError::InvalidHorizon(self.horizon));
        }
        if self.bootstrap_reps == 0 {
            return Err(TestError::InvalidBootstrapReps(self.bootstrap_reps));
        }
        validate_confidence_level(self.confidence_level)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_hac(mut self, hac: HACOptions) -> Self {
        self.hac = hac;
        self
    }

    pub fn with_min_obs(mut self, min_obs: usize) -> Self {
        self.min_obs = min_obs;
        self
    }

    pub fn with_distribution(mut self, keep: bool) -> Self {
        self.keep_distribution = keep;
        self
    }

    pub fn with_centering(mut self, centering: BootstrapCentering) -> Self {
        self.centering = centering;
        self
    }
}

impl Default for DMOptions {
    fn default() -> Self {
        DMOptions {
            loss: LossKind::default(),
            horizon: 1,
            bootstrap_reps: DEFAULT_BOOTSTRAP_REPS,
            confidence_level: 0.95,
            seed: None,
            hac: HACOptions::default(),
            min_obs: DEFAULT_MIN_OBS,
            keep_distribution: false,
            centering: BootstrapCentering::default(),
        }
    }
}

/// DMTestResult — outcome of a Diebold–Mariano comparison.
///
/// Fields
/// ------
/// - `statistic`, `p_value`
///   Asymptotic DM statistic and its two-sided Normal p-value.
/// - `bootstrap_p_value`
///   Share of replicates with `|DM*_b| ≥ |DM|`; the authoritative p-value.
/// - `block_size`, `n_bootstrap`, `n_obs`
///   Block length used by every replicate, number of replicates, and the
///   number of usable observations after masking.
/// - `mean_loss_differential`, `long_run_variance`
///   `d̄` and the HAC estimate behind `statistic`.
/// - `hln_statistic`, `hln_p_value`
///   Harvey–Leybourne–Newbold corrected statistic and its Student-t
///   (`T − 1` d.o.f.) p-value; `NaN` when the horizon is too long for `T`.
/// - `horizon`, `confidence_level`, `seed`
///   Echo of the settings actually used (`seed` is the base seed, drawn
///   fresh when the options carried none).
/// - `bootstrap_interval`
///   `((1−c)/2, (1+c)/2)` percentiles of the replicate statistics.
/// - `bootstrap_distribution`
///   Replicate statistics in replicate order, when requested.
#[derive(Debug, Clone, PartialEq)]
pub struct DMTestResult {
    pub statistic: f64,
    pub p_value: f64,
    pub bootstrap_p_value: f64,
    pub block_size: usize,
    pub n_bootstrap: usize,
    pub n_obs: usize,
    pub mean_loss_differential: f64,
    pub long_run_variance: f64,
    pub hln_statistic: f64,
    pub hln_p_value: f64,
    pub horizon: usize,
    pub confidence_level: f64,
    pub seed: u64,
    pub bootstrap_interval: (f64, f64),
    pub bootstrap_distribution: Option<Vec<f64>>,
}

impl DMTestResult {
    /// Run the Diebold–Mariano test with a moving-block-bootstrap p-value.
    ///
    /// Parameters
    /// ----------
    /// - `errors1`, `errors2`: `&[f64]`
    ///   Forecast errors of model 1 and model 2, aligned by period.
    ///   Periods where either value is non-finite are dropped.
    /// - `opts`: `&DMOptions`
    ///   Loss, horizon, replication count, confidence level, seed, and HAC
    ///   settings.
    ///
    /// Returns
    /// -------
    /// `TestResult<DMTestResult>`
    ///   The asymptotic and bootstrap outcomes.
    ///
    /// Errors
    /// ------
    /// - `TestError::LengthMismatch` if the series lengths differ.
    /// - `TestError::InsufficientData` if fewer than `max(min_obs, 2)`
    ///   periods survive masking.
    /// - Option range errors from [`DMOptions::validate`].
    ///
    /// Notes
    /// -----
    /// - Swapping the inputs negates `statistic` and leaves both p-values
    ///   unchanged for a fixed seed.
    /// - Identical error series give `statistic = 0` and
    ///   `p_value = bootstrap_p_value = 1`.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use forecast_eval::statistical_tests::{DMOptions, DMTestResult};
    /// let e1: Vec<f64> = (0..100).map(|t| ((t as f64) * 0.7).sin()).collect();
    /// let opts = DMOptions::default().with_seed(1);
    /// let res = DMTestResult::diebold_mariano(&e1, &e1, &opts).unwrap();
    /// assert_eq!(res.statistic, 0.0);
    /// assert_eq!(res.bootstrap_p_value, 1.0);
    /// ```
    pub fn diebold_mariano(
        errors1: &[f64], errors2: &[f64], opts: &DMOptions,
    ) -> TestResult<DMTestResult> {
        opts.validate()?;
        validate_aligned(errors1, errors2)?;
        let (e1, e2) = mask_finite_pairs(errors1, errors2);
        let min_obs = opts.min_obs.max(2);
        if e1.len() < min_obs {
            return Err(TestError::InsufficientData { n: e1.len(), min: min_obs });
        }

        let d = loss_differential(&e1, &e2, opts.loss)?;
        let n = d.len();
        let block_size = select_block_size(&d);

        let mean_d = mean(&d);
        let lrv = long_run_variance(&d, &opts.hac);
        let statistic = dm_statistic(mean_d, lrv, n);
        let p_value = norm_two_sided_p(statistic);
        let (hln_statistic, hln_p_value) = hln_correction(statistic, n, opts.horizon);
        debug!(
            n_obs = n,
            block_size,
            bandwidth = opts.hac.effective_bandwidth(n),
            statistic,
            p_value,
            "diebold-mariano asymptotic statistic"
        );

        let sampler = MovingBlockBootstrap::new(&d, block_size)?;
        let seed = opts.seed.unwrap_or_else(rand::random::<u64>);
        let center = match opts.centering {
            BootstrapCentering::NullImposed => mean_d,
            BootstrapCentering::Uncentered => 0.0,
        };
        let replicates =
            bootstrap_statistics(&sampler, center, &opts.hac, opts.bootstrap_reps, seed);

        let observed = statistic.abs();
        let exceed = replicates.iter().filter(|s| s.abs() >= observed).count();
        let bootstrap_p_value = exceed as f64 / opts.bootstrap_reps as f64;
        let bootstrap_interval = percentile_interval(&replicates, opts.confidence_level);
        debug!(
            n_bootstrap = opts.bootstrap_reps,
            seed,
            bootstrap_p_value,
            lower = bootstrap_interval.0,
            upper = bootstrap_interval.1,
            "diebold-mariano bootstrap finished"
        );

        Ok(DMTestResult {
            statistic,
            p_value,
            bootstrap_p_value,
            block_size,
            n_bootstrap: opts.bootstrap_reps,
            n_obs: n,
            mean_loss_differential: mean_d,
            long_run_variance: lrv,
            hln_statistic,
            hln_p_value,
            horizon: opts.horizon,
            confidence_level: opts.confidence_level,
            seed,
            bootstrap_interval,
            bootstrap_distribution: opts.keep_distribution.then_some(replicates),
        })
    }

    /// `true` when the bootstrap p-value is below `1 − confidence_level`.
    pub fn rejects_null(&self) -> bool {
        self.bootstrap_p_value < 1.0 - self.confidence_level
    }
}

//
// ---------- Private helpers (compact docs) ----------
//

#[inline]
fn mean(x: &[f64]) -> f64 {
    x.iter().sum::<f64>() / x.len() as f64
}

/// `√n·mean/√lrv`, or `0` when the variance is not positive.
#[inline]
fn dm_statistic(mean: f64, lrv: f64, n: usize) -> f64 {
    if lrv > 0.0 { (n as f64).sqrt() * mean / lrv.sqrt() } else { 0.0 }
}

/// Harvey–Leybourne–Newbold statistic and Student-t(`n − 1`) p-value.
///
/// The correction factor `(n + 1 − 2h + h(h−1)/n)/n` turns non-positive
/// for horizons that are long relative to `n`; both outputs are `NaN` then.
fn hln_correction(statistic: f64, n: usize, horizon: usize) -> (f64, f64) {
    let (n, h) = (n as f64, horizon as f64);
    let factor = (n + 1.0 - 2.0 * h + h * (h - 1.0) / n) / n;
    if factor <= 0.0 {
        return (f64::NAN, f64::NAN);
    }
    let corrected = statistic * factor.sqrt();
    (corrected, students_t_two_sided_p(corrected, n - 1.0))
}

/// DM statistic of one replicate; `buf` is scratch space reused per thread.
fn replicate_statistic(
    sampler: &MovingBlockBootstrap<'_>, center: f64, hac: &HACOptions, seed: u64, index: usize,
    buf: &mut Vec<f64>,
) -> f64 {
    let mut rng = StdRng::seed_from_u64(replicate_seed(seed, index as u64));
    sampler.resample_into(&mut rng, buf);
    let lrv = long_run_variance(buf, hac);
    dm_statistic(mean(buf) - center, lrv, buf.len())
}

#[cfg(feature = "parallel")]
fn bootstrap_statistics(
    sampler: &MovingBlockBootstrap<'_>, center: f64, hac: &HACOptions, reps: usize, seed: u64,
) -> Vec<f64> {
    (0..reps)
        .into_par_iter()
        .map_init(Vec::new, |buf, i| replicate_statistic(sampler, center, hac, seed, i, buf))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn bootstrap_statistics(
    sampler: &MovingBlockBootstrap<'_>, center: f64, hac: &HACOptions, reps: usize, seed: u64,
) -> Vec<f64> {
    let mut buf = Vec::new();
    (0..reps).map(|i| replicate_statistic(sampler, center, hac, seed, i, &mut buf)).collect()
}

/// Central `level` percentile interval with linear interpolation.
fn percentile_interval(values: &[f64], level: f64) -> (f64, f64) {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let tail = (1.0 - level) / 2.0;
    (quantile_sorted(&sorted, tail), quantile_sorted(&sorted, 1.0 - tail))
}

/// Type-7 sample quantile of an ascending slice (`NaN` when empty).
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let Some(last) = sorted.len().checked_sub(1) else {
        return f64::NAN;
    };
    let pos = q.clamp(0.0, 1.0) * last as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo])
}
