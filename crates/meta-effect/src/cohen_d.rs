//! Cohen's d effect size from summary statistics
//!
//! Cohen's d expresses the difference between two group means in units of
//! the root mean square of the two standard deviations. It is appropriate when
//! both groups have similar standard deviations and similar sizes.

use crate::{EffectSizeMethod, GroupSummary, StandardizedEffectSize};
use meta_core::{math::round_to, Result};

/// Cohen's d effect size estimator
///
/// d = (μ₂ - μ₁) / σ_pooled, with σ_pooled = √((σ₁² + σ₂²) / 2)
#[derive(Debug, Clone, Copy, Default)]
pub struct CohenD;

impl CohenD {
    /// Create a new Cohen's d estimator
    pub fn new() -> Self {
        Self
    }

    /// Unweighted pooled standard deviation
    pub fn pooled_sd(sd1: f64, sd2: f64) -> f64 {
        ((sd1 * sd1 + sd2 * sd2) / 2.0).sqrt()
    }
}

impl StandardizedEffectSize for CohenD {
    fn method(&self) -> EffectSizeMethod {
        EffectSizeMethod::CohensD
    }

    fn standardized_difference(
        &self,
        group1: &GroupSummary,
        group2: &GroupSummary,
    ) -> Result<f64> {
        let pooled = Self::pooled_sd(group1.sd, group2.sd);
        Ok(round_to((group2.mean - group1.mean) / pooled, 5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_pooled_sd() {
        assert_abs_diff_eq!(CohenD::pooled_sd(1.0, 1.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(CohenD::pooled_sd(3.0, 4.0), 12.5f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_cohen_d() {
        let control = GroupSummary::new(3.0, 1.0, 10);
        let treatment = GroupSummary::new(5.0, 3.0, 10);

        let d = CohenD::new()
            .standardized_difference(&control, &treatment)
            .unwrap();
        // 2 / sqrt(5) = 0.894427...
        assert_eq!(d, 0.89443);
    }

    #[test]
    fn test_sign_follows_difference() {
        let a = GroupSummary::new(10.0, 2.0, 5);
        let b = GroupSummary::new(8.0, 2.0, 5);

        assert!(CohenD.standardized_difference(&a, &b).unwrap() < 0.0);
        assert!(CohenD.standardized_difference(&b, &a).unwrap() > 0.0);
        assert_eq!(CohenD.standardized_difference(&a, &a).unwrap(), 0.0);
    }

    #[test]
    fn test_exact_tie_rounds_to_even() {
        let a = GroupSummary::new(0.0, 64.0, 20);
        let b = GroupSummary::new(1.0, 64.0, 20);

        // 1/64 = 0.015625 sits exactly halfway between 0.01562 and 0.01563
        assert_eq!(CohenD.standardized_difference(&a, &b).unwrap(), 0.01562);
    }
}
