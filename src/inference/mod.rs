//! inference — long-run variance, block-size selection, and resampling.
//!
//! Purpose
//! -------
//! Provide the statistical machinery shared by the forecast-comparison
//! tests: a Newey–West (HAC) long-run variance estimator for dependent
//! scalar sequences, the AR(1)-proxy block-length heuristic, and the
//! moving block bootstrap.
//!
//! Key behaviors
//! -------------
//! - [`long_run_variance`] with [`HACOptions`] / [`KernelType`]: raw-moment
//!   Bartlett estimator by default, floored at `LRV_FLOOR`.
//! - [`select_block_size`]: `round(1.3·T^{1/3}·λ)` with
//!   `λ = √((1+ρ)/(1−ρ))`, bounded to `[1, ⌊T/2⌋]`.
//! - [`MovingBlockBootstrap`] and [`replicate_seed`]: validated block
//!   resampling with per-replicate RNG streams.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite scalar sequences; masking happens upstream.
//! - Nothing here holds state between calls; every function is safe to run
//!   concurrently on shared read-only data.
//!
//! Conventions
//! -----------
//! - Bandwidths and block lengths are in observation units.
//! - Failures are reported through [`InferenceResult`]; degenerate numeric
//!   inputs are absorbed by floors and caps instead.
//!
//! Testing notes
//! -------------
//! - Unit tests sit beside each estimator; property tests cover the
//!   block-size bounds.

pub mod block_size;
pub mod bootstrap;
pub mod errors;
pub mod hac;
pub mod kernel;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::block_size::{lag1_autocorrelation, max_block_size, select_block_size};
pub use self::bootstrap::{MovingBlockBootstrap, replicate_seed};
pub use self::errors::{InferenceError, InferenceResult};
pub use self::hac::{HACOptions, long_run_variance};
pub use self::kernel::{KernelType, rule_of_thumb_bandwidth};

// ---- Optional convenience prelude for downstream crates ------------------

pub mod prelude {
    pub use super::bootstrap::MovingBlockBootstrap;
    pub use super::errors::{InferenceError, InferenceResult};
    pub use super::hac::{HACOptions, long_run_variance};
    pub use super::kernel::KernelType;
}
