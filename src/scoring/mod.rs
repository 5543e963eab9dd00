//! scoring — per-period losses and proper scoring rules.
//!
//! Purpose
//! -------
//! Turn forecasts into scalar per-period quantities that the statistical
//! tests can consume: point-forecast losses for the Diebold–Mariano loss
//! differential and the closed-form CRPS for Normal predictive
//! distributions.
//!
//! Key behaviors
//! -------------
//! - [`LossKind`], [`loss`], and [`loss_differential`] for squared,
//!   absolute, and bounded absolute-percentage losses.
//! - [`crps_normal`] (mean over usable observations), plus the
//!   per-observation variants [`crps_normal_single`] and
//!   [`crps_normal_series`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Every function here is pure and stateless.
//! - Unaligned inputs are a [`ScoringError::LengthMismatch`]; unusable
//!   numeric inputs are masked (CRPS) or propagated (losses), never raised.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each function; the CRPS closed form is
//!   cross-checked against its integral definition.

pub mod crps;
pub mod errors;
pub mod loss;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::crps::{crps_normal, crps_normal_series, crps_normal_single};
pub use self::errors::{ScoringError, ScoringResult};
pub use self::loss::{LossKind, loss, loss_differential};
