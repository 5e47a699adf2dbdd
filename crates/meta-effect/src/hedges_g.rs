//! Hedges' g effect size
//!
//! Hedges' g standardizes the mean difference by the pooled standard deviation
//! weighted by each group's degrees of freedom, which makes it the better
//! choice when the groups differ in size. For small studies (N < 50) a bias
//! correction factor is applied.

use crate::{EffectSizeMethod, GroupSummary, StandardizedEffectSize};
use meta_core::{math::round_to, Error, Result};

/// Total sample size below which the bias correction is applied
pub const SMALL_SAMPLE_THRESHOLD: usize = 50;

/// Hedges' g effect size estimator
///
/// g = (μ₂ - μ₁) / s_w, with s_w = √(((n₁-1)σ₁² + (n₂-1)σ₂²) / (n₁+n₂-2))
///
/// When N = n₁ + n₂ < 50 the estimate is multiplied by
/// J = ((N-3)/(N-2.25)) × √((N-2)/N).
#[derive(Debug, Clone, Copy, Default)]
pub struct HedgesG;

impl HedgesG {
    /// Create a new Hedges' g estimator
    pub fn new() -> Self {
        Self
    }

    /// Degrees-of-freedom weighted pooled standard deviation
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] when a group is empty or both groups together
    /// leave no degree of freedom.
    pub fn weighted_pooled_sd(group1: &GroupSummary, group2: &GroupSummary) -> Result<f64> {
        if group1.size == 0 || group2.size == 0 {
            return Err(Error::InvalidInput(
                "Hedges' g needs at least one subject per group".to_string(),
            ));
        }
        let df = (group1.size + group2.size).checked_sub(2).filter(|&df| df > 0);
        let df = df.ok_or_else(|| {
            Error::InvalidInput("Hedges' g needs at least one degree of freedom".to_string())
        })?;

        let ss1 = (group1.size - 1) as f64 * group1.sd * group1.sd;
        let ss2 = (group2.size - 1) as f64 * group2.sd * group2.sd;
        Ok(((ss1 + ss2) / df as f64).sqrt())
    }

    /// Small-sample bias correction factor J for a total sample size
    pub fn bias_correction_factor(total_n: usize) -> f64 {
        let n = total_n as f64;
        ((n - 3.0) / (n - 2.25)) * ((n - 2.0) / n).sqrt()
    }
}

impl StandardizedEffectSize for HedgesG {
    fn method(&self) -> EffectSizeMethod {
        EffectSizeMethod::HedgesG
    }

    fn applies_correction(&self, n1: usize, n2: usize) -> bool {
        n1 + n2 < SMALL_SAMPLE_THRESHOLD
    }

    fn standardized_difference(
        &self,
        group1: &GroupSummary,
        group2: &GroupSummary,
    ) -> Result<f64> {
        let sd = Self::weighted_pooled_sd(group1, group2)?;
        let g = round_to((group2.mean - group1.mean) / sd, 5);

        if self.applies_correction(group1.size, group2.size) {
            let j = Self::bias_correction_factor(group1.size + group2.size);
            Ok(round_to(g * j, 5))
        } else {
            Ok(g)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CohenD;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn test_bias_correction_factor() {
        let j_small = HedgesG::bias_correction_factor(10);
        assert!(j_small < 1.0);
        assert!(j_small > 0.8);

        let j_tiny = HedgesG::bias_correction_factor(5);
        assert_abs_diff_eq!(j_tiny, 0.563_343_032_175_624_3, epsilon = 1e-12);

        // Increases towards one as N grows
        let j_49 = HedgesG::bias_correction_factor(49);
        assert_abs_diff_eq!(j_49, 0.963_667_262_394_035_2, epsilon = 1e-12);
        assert!(j_49 > HedgesG::bias_correction_factor(48));
        assert!(j_49 < 1.0);
    }

    #[test]
    fn test_small_sample_correction() {
        let group1 = GroupSummary::new(4.0, 1.0, 3);
        let group2 = GroupSummary::new(3.0, 1.414, 2);

        let g = HedgesG::new().standardized_difference(&group1, &group2).unwrap();
        assert_eq!(g, -0.48791);
        assert!(HedgesG.applies_correction(3, 2));
    }

    #[test]
    fn test_large_sample_uncorrected() {
        let group1 = GroupSummary::new(10.0, 2.0, 25);
        let group2 = GroupSummary::new(11.0, 2.0, 25);

        assert!(!HedgesG.applies_correction(25, 25));
        let g = HedgesG.standardized_difference(&group1, &group2).unwrap();
        assert_eq!(g, 0.5);
    }

    #[test]
    fn test_equal_sizes_match_cohen() {
        // With n1 == n2 the weighted SD equals Cohen's pooled SD
        let group1 = GroupSummary::new(10.0, 2.0, 30);
        let group2 = GroupSummary::new(12.0, 3.0, 30);

        let g = HedgesG.standardized_difference(&group1, &group2).unwrap();
        let d = CohenD.standardized_difference(&group1, &group2).unwrap();
        assert_abs_diff_eq!(g, d, epsilon = 1e-5);
    }

    #[test]
    fn test_no_degrees_of_freedom() {
        let group = GroupSummary::new(1.0, 1.0, 1);
        assert!(HedgesG::weighted_pooled_sd(&group, &group).is_err());
    }

    #[test]
    fn test_empty_group_rejected() {
        let empty = GroupSummary::new(1.0, 1.0, 0);
        let large = GroupSummary::new(2.0, 1.0, 10);

        assert!(matches!(
            HedgesG::weighted_pooled_sd(&empty, &large),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            HedgesG::weighted_pooled_sd(&large, &empty),
            Err(Error::InvalidInput(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_correction_shrinks_magnitude(
            mean_diff in -10.0f64..10.0,
            sd in 0.5f64..5.0,
            n1 in 2usize..24,
            n2 in 2usize..24,
        ) {
            let j = HedgesG::bias_correction_factor(n1 + n2);
            prop_assert!(j > 0.0 && j < 1.0);

            let group1 = GroupSummary::new(0.0, sd, n1);
            let group2 = GroupSummary::new(mean_diff, sd, n2);
            let corrected = HedgesG.standardized_difference(&group1, &group2).unwrap();
            let sd_w = HedgesG::weighted_pooled_sd(&group1, &group2).unwrap();
            let uncorrected = round_to(mean_diff / sd_w, 5);
            prop_assert!(corrected.abs() <= uncorrected.abs());
            if uncorrected.abs() > 1e-3 {
                prop_assert!(corrected.abs() < uncorrected.abs());
            }
        }
    }
}
