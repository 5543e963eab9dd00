//! scoring::loss — per-period point-forecast losses and loss differentials.
//!
//! Purpose
//! -------
//! Reduce raw forecast errors `e_t` to scalar losses `L(e_t)` and build the
//! loss differential `d_t = L(e1_t) − L(e2_t)` that drives the
//! Diebold–Mariano test.
//!
//! Key behaviors
//! -------------
//! - [`LossKind`] enumerates the supported losses:
//!   - `Squared`: `e²`,
//!   - `Absolute`: `|e|`,
//!   - `AbsolutePercentage`: `|e| / (|e| + ε)` with `ε = APE_EPSILON`.
//! - [`loss`] maps a whole error series; [`loss_differential`] pairs two
//!   aligned series and rejects unequal lengths.
//!
//! Invariants & assumptions
//! ------------------------
//! - `AbsolutePercentage` is a bounded transform of `|e|` kept for
//!   compatibility with historical results. It is *not* a percentage of the
//!   underlying price and is not proportional to it.
//! - Non-finite errors propagate unchanged through the loss (NaN in, NaN
//!   out); masking is the caller's job.
//!
//! Conventions
//! -----------
//! - Loss-kind names parse strictly through [`std::str::FromStr`]; an
//!   unrecognized name is an error, never a silent fallback to squared loss.
use crate::{
    numerical_stability::APE_EPSILON,
    scoring::errors::{ScoringError, ScoringResult},
};
use std::str::FromStr;

/// Point-forecast loss applied to each forecast error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LossKind {
    #[default]
    Squared,
    Absolute,
    AbsolutePercentage,
}

impl LossKind {
    /// Evaluate the loss for a single forecast error.
    #[inline]
    pub fn apply(&self, error: f64) -> f64 {
        match self {
            LossKind::Squared => error * error,
            LossKind::Absolute => error.abs(),
            LossKind::AbsolutePercentage => {
                let abs_error = error.abs();
                abs_error / (abs_error + APE_EPSILON)
            }
        }
    }

    /// Canonical lower-case name, the inverse of [`LossKind::from_str`].
    pub fn name(&self) -> &'static str {
        match self {
            LossKind::Squared => "squared",
            LossKind::Absolute => "absolute",
            LossKind::AbsolutePercentage => "absolute_percentage",
        }
    }
}

impl std::fmt::Display for LossKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LossKind {
    type Err = ScoringError;

    /// Parse a loss-kind selector (case-insensitive).
    ///
    /// Accepted names
    /// --------------
    /// - `squared`, `se`, `mse`
    /// - `absolute`, `ae`, `mae`
    /// - `absolute_percentage`, `absolute-percentage`, `ape`, `mape`
    ///
    /// Errors
    /// ------
    /// - `ScoringError::UnknownLossKind` for anything else.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "squared" | "se" | "mse" => Ok(LossKind::Squared),
            "absolute" | "ae" | "mae" => Ok(LossKind::Absolute),
            "absolute_percentage" | "absolute-percentage" | "ape" | "mape" => {
                Ok(LossKind::AbsolutePercentage)
            }
            _ => Err(ScoringError::UnknownLossKind(s.to_string())),
        }
    }
}

/// Apply `kind` to every element of `errors`.
pub fn loss(errors: &[f64], kind: LossKind) -> Vec<f64> {
    errors.iter().map(|&e| kind.apply(e)).collect()
}

/// Build the loss differential `d_t = L(e1_t) − L(e2_t)`.
///
/// Parameters
/// ----------
/// - `errors1`, `errors2`: `&[f64]`
///   Forecast errors of the two competing models, aligned in time.
/// - `kind`: [`LossKind`]
///   Loss applied to both series.
///
/// Returns
/// -------
/// `ScoringResult<Vec<f64>>`
///   The differential, one value per period.
///
/// Errors
/// ------
/// - `ScoringError::LengthMismatch` if the series differ in length. There
///   is no truncation to the shorter series.
pub fn loss_differential(
    errors1: &[f64], errors2: &[f64], kind: LossKind,
) -> ScoringResult<Vec<f64>> {
    if errors1.len() != errors2.len() {
        return Err(ScoringError::LengthMismatch {
            expected: errors1.len(),
            found: errors2.len(),
        });
    }
    Ok(errors1.iter().zip(errors2).map(|(&e1, &e2)| kind.apply(e1) - kind.apply(e2)).collect())
}
