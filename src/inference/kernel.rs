//! Kernel weights and the rule-of-thumb bandwidth for HAC estimation.
//!
//! This module provides:
//! - A `KernelType` enum with common HAC tapers (IID, Bartlett/Newey–West,
//!   Parzen, QS).
//! - Per-lag weights `w(x)` where `x = k/(L+1)`.
//! - The Newey–West rule-of-thumb bandwidth `L = ⌊4·(n/100)^{2/9}⌋`.
//!
//! Conventions:
//! - The taper argument is `x = k/(L+1)` so the weight at the largest lag
//!   `k = L` is still strictly positive for Bartlett.
//! - Bandwidths are in lag units of the series passed to the estimator.

/// HAC taper family.
///
/// - `IID`: no serial correlation; only `k=0` contributes (weight=1 at 0, else 0).
/// - `Bartlett`: triangular (Newey–West) kernel, `w = 1 − k/(L+1)`. Default.
/// - `Parzen`: smoother compact-support kernel with heavier down-weighting at high lags.
/// - `QuadraticSpectral`: infinite-support taper, truncated here at the bandwidth.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum KernelType {
    IID,
    #[default]
    Bartlett,
    Parzen,
    QuadraticSpectral,
}

impl KernelType {
    /// Evaluate the kernel weight at the taper argument `x = k/(L+1)`.
    ///
    /// For `IID`, returns 1.0 at `x=0` and 0.0 otherwise.
    pub fn weight(&self, x: f64) -> f64 {
        let abs_x = x.abs();
        match self {
            KernelType::IID => {
                if x == 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            KernelType::Bartlett => {
                if abs_x <= 1.0 {
                    1.0 - abs_x
                } else {
                    0.0
                }
            }
            KernelType::Parzen => {
                if abs_x <= 0.5 {
                    let abs_x_sq = abs_x * abs_x;
                    1.0 - 6.0 * abs_x_sq + 6.0 * abs_x * abs_x_sq
                } else if abs_x <= 1.0 {
                    2.0 * (1.0 - abs_x).powi(3)
                } else {
                    0.0
                }
            }
            KernelType::QuadraticSpectral => {
                if x == 0.0 {
                    1.0
                } else {
                    let pi_x = std::f64::consts::PI * x;
                    let arg = 6.0 * pi_x / 5.0;
                    (25.0 / (12.0 * pi_x.powi(2))) * (arg.sin() / arg - arg.cos())
                }
            }
        }
    }
}

/// Newey–West rule-of-thumb lag truncation `⌊4·(n/100)^{2/9}⌋`.
///
/// The result is not truncated to `n − 1`; the estimator does that.
#[inline]
pub fn rule_of_thumb_bandwidth(n: usize) -> usize {
    (4.0 * (n as f64 / 100.0).powf(2.0 / 9.0)).floor() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    // Purpose
    // -------
    // Verify the kernel weights at the origin, inside the support, and
    // outside it.
    //
    // Given
    // -----
    // - x ∈ {0, 0.25, 0.75, 1.5}.
    //
    // Expect
    // ------
    // - All kernels give 1 at 0; Bartlett is linear; Parzen switches
    //   branches at 0.5; compact kernels vanish beyond 1; IID is 0 off 0.
    fn kernel_weights_match_definitions() {
        for kernel in [
            KernelType::IID,
            KernelType::Bartlett,
            KernelType::Parzen,
            KernelType::QuadraticSpectral,
        ] {
            assert_eq!(kernel.weight(0.0), 1.0, "{kernel:?} at 0");
        }
        assert_eq!(KernelType::IID.weight(0.25), 0.0);
        assert_abs_diff_eq!(KernelType::Bartlett.weight(0.25), 0.75, epsilon = 1e-15);
        assert_abs_diff_eq!(KernelType::Parzen.weight(0.25), 0.71875, epsilon = 1e-15);
        assert_abs_diff_eq!(KernelType::Parzen.weight(0.75), 0.03125, epsilon = 1e-15);
        assert_eq!(KernelType::Bartlett.weight(1.5), 0.0);
        assert_eq!(KernelType::Parzen.weight(1.5), 0.0);
        assert!(KernelType::QuadraticSpectral.weight(0.25) < 1.0);
    }

    #[test]
    // Purpose
    // -------
    // Check the rule-of-thumb bandwidth on a few sample sizes.
    //
    // Given
    // -----
    // - n ∈ {1, 50, 100, 200, 1000}.
    //
    // Expect
    // ------
    // - L = 1 for n = 1, 3 for 50, 4 for 100 and 200, 6 for 1000.
    fn rule_of_thumb_bandwidth_matches_formula() {
        assert_eq!(rule_of_thumb_bandwidth(1), 1);
        assert_eq!(rule_of_thumb_bandwidth(50), 3);
        assert_eq!(rule_of_thumb_bandwidth(100), 4);
        assert_eq!(rule_of_thumb_bandwidth(200), 4);
        assert_eq!(rule_of_thumb_bandwidth(1000), 6);
    }
}
