//! inference::bootstrap — moving block bootstrap (MBB) for dependent series.
//!
//! Purpose
//! -------
//! Build pseudo-series of the same length as the original by concatenating
//! overlapping blocks drawn with replacement. Within-block dependence is
//! preserved while the global ordering is broken, which is what makes the
//! MBB valid for autocorrelated, non-Gaussian loss differentials.
//!
//! Key behaviors
//! -------------
//! - [`MovingBlockBootstrap`] validates `(data, block_size)` once and then
//!   resamples infallibly: `⌈T/b⌉` start indices uniform on `[0, T−b]`,
//!   windows of length `b` concatenated and truncated to exactly `T`.
//! - [`replicate_seed`] derives an independent RNG seed per replicate from
//!   a base seed and the replicate index, so replicates can run in any
//!   order (or in parallel) and still be reproducible.
//!
//! Invariants & assumptions
//! ------------------------
//! - `1 ≤ b ≤ T`; anything else is rejected at construction.
//! - The sampler holds no state besides a borrow of the data; all
//!   randomness comes from the `Rng` passed to each call.
use crate::inference::errors::{InferenceError, InferenceResult};
use rand::Rng;

/// Validated moving-block-bootstrap sampler over a borrowed series.
#[derive(Debug, Clone, Copy)]
pub struct MovingBlockBootstrap<'a> {
    data: &'a [f64],
    block_size: usize,
}

impl<'a> MovingBlockBootstrap<'a> {
    /// Create a sampler for `data` with blocks of length `block_size`.
    ///
    /// Errors
    /// ------
    /// - `InferenceError::EmptySeries` if `data` is empty.
    /// - `InferenceError::InvalidBlockSize` unless `1 ≤ block_size ≤ T`.
    pub fn new(data: &'a [f64], block_size: usize) -> InferenceResult<Self> {
        if data.is_empty() {
            return Err(InferenceError::EmptySeries);
        }
        if block_size == 0 || block_size > data.len() {
            return Err(InferenceError::InvalidBlockSize { block_size, n: data.len() });
        }
        Ok(MovingBlockBootstrap { data, block_size })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of blocks drawn per replicate, `⌈T/b⌉`.
    pub fn num_blocks(&self) -> usize {
        self.data.len().div_ceil(self.block_size)
    }

    /// Draw one pseudo-series into `out`, replacing its contents.
    ///
    /// `out` is cleared first and ends with exactly `T` elements; its
    /// capacity is reused across calls.
    pub fn resample_into<R: Rng>(&self, rng: &mut R, out: &mut Vec<f64>) {
        let n = self.data.len();
        let last_start = n - self.block_size;
        out.clear();
        out.reserve(n);
        for _ in 0..self.num_blocks() {
            let start = rng.gen_range(0..=last_start);
            let take = self.block_size.min(n - out.len());
            out.extend_from_slice(&self.data[start..start + take]);
        }
    }

    /// Draw one pseudo-series into a fresh vector.
    pub fn resample<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.data.len());
        self.resample_into(rng, &mut out);
        out
    }
}

/// SplitMix64 mix of a base seed and a replicate index.
///
/// The golden-gamma increment and the two multiply-xorshift rounds are the
/// standard SplitMix64 output step, evaluated at state `base ^ (i + 1)·γ`;
/// `seed_from_u64` then expands each mixed value into a full `StdRng` key.
///
/// Neighbouring indices map to well-separated seeds, so per-replicate
/// `StdRng::seed_from_u64(replicate_seed(base, i))` streams are
/// independent of one another and of the execution order.
#[inline]
pub fn replicate_seed(base: u64, index: u64) -> u64 {
    let mut z = base ^ index.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::HashSet;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Constructor validation.
    // - Length, block structure, and determinism of resampled series.
    // - Distinctness of per-replicate seeds.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Reject empty data and block sizes outside [1, T].
    //
    // Given
    // -----
    // - Empty data; block 0; block T + 1; block T.
    //
    // Expect
    // ------
    // - Errors for the first three; Ok for block = T.
    fn moving_block_bootstrap_validates_configuration() {
        let data = [1.0, 2.0, 3.0];

        assert_eq!(MovingBlockBootstrap::new(&[], 1).unwrap_err(), InferenceError::EmptySeries);
        assert_eq!(
            MovingBlockBootstrap::new(&data, 0).unwrap_err(),
            InferenceError::InvalidBlockSize { block_size: 0, n: 3 }
        );
        assert!(MovingBlockBootstrap::new(&data, 4).is_err());
        assert!(MovingBlockBootstrap::new(&data, 3).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Verify that a pseudo-series has length T and is made of contiguous
    // windows of the original series.
    //
    // Given
    // -----
    // - data = 0, 1, …, 22 (T = 23, distinct values), block size 5.
    //
    // Expect
    // ------
    // - ⌈23/5⌉ = 5 blocks, output length 23.
    // - Inside every block (positions 5k..5k+5) consecutive values differ
    //   by exactly 1.
    fn resample_preserves_length_and_block_contiguity() {
        // Arrange
        let data: Vec<f64> = (0..23).map(|t| t as f64).collect();
        let mbb = MovingBlockBootstrap::new(&data, 5).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        // Act
        let pseudo = mbb.resample(&mut rng);

        // Assert
        assert_eq!(mbb.num_blocks(), 5);
        assert_eq!(pseudo.len(), 23);
        for block in pseudo.chunks(5) {
            for pair in block.windows(2) {
                assert_eq!(pair[1] - pair[0], 1.0, "block not contiguous: {block:?}");
            }
            assert!(block[0] <= 18.0, "start index beyond T − b: {block:?}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure resampling is reproducible for a fixed seed and that the
    // buffer-reusing variant matches the allocating one.
    //
    // Given
    // -----
    // - The same data and two RNGs seeded identically.
    //
    // Expect
    // ------
    // - Identical pseudo-series from `resample` and `resample_into`.
    fn resample_is_deterministic_given_seed() {
        let data: Vec<f64> = (0..50).map(|t| (t as f64).sin()).collect();
        let mbb = MovingBlockBootstrap::new(&data, 4).unwrap();
        let mut buffer = vec![99.0; 3];

        let a = mbb.resample(&mut StdRng::seed_from_u64(11));
        mbb.resample_into(&mut StdRng::seed_from_u64(11), &mut buffer);

        assert_eq!(a, buffer);
    }

    #[test]
    // Purpose
    // -------
    // Check that replicate seeds do not collide for a run of indices and
    // differ across base seeds.
    //
    // Given
    // -----
    // - Base seeds 0 and 1, indices 0..10000.
    //
    // Expect
    // ------
    // - 20000 distinct seeds.
    fn replicate_seeds_are_distinct() {
        let seeds: HashSet<u64> = (0..2u64)
            .flat_map(|base| (0..10_000u64).map(move |i| replicate_seed(base, i)))
            .collect();
        assert_eq!(seeds.len(), 20_000);
    }

    #[test]
    // Purpose
    // -------
    // With base seed 0 the mix reproduces the published SplitMix64 output
    // sequence started from state 0.
    //
    // Given
    // -----
    // - Base seed 0, indices 0, 1, 2.
    //
    // Expect
    // ------
    // - 0xE220A8397B1DCDAF, 0x6E789E6AA1B965F4, 0x06C45D188009454F.
    fn replicate_seed_matches_splitmix64_sequence() {
        assert_eq!(replicate_seed(0, 0), 0xE220_A839_7B1D_CDAF);
        assert_eq!(replicate_seed(0, 1), 0x6E78_9E6A_A1B9_65F4);
        assert_eq!(replicate_seed(0, 2), 0x06C4_5D18_8009_454F);
    }
}
