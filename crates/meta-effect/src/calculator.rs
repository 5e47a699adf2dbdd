//! Effect size, sampling variance and confidence interval for one study

use crate::{
    CohenD, EffectSizeMethod, EffectSizeResult, GlassDelta, GroupSummary, HedgesG,
    StandardizedEffectSize,
};
use meta_core::{Error, Result, Z_95};
use tracing::trace;

/// Converts two-group summary statistics into an [`EffectSizeResult`]
///
/// The sampling variance uses the large-sample approximation
/// `(n₁+n₂)/(n₁n₂) + d²/(2(n₁+n₂))` for every method, Glass' delta included.
#[derive(Debug, Clone, Copy, Default)]
pub struct EffectSizeCalculator {
    method: EffectSizeMethod,
}

impl EffectSizeCalculator {
    /// Create a calculator for the given method
    pub fn new(method: EffectSizeMethod) -> Self {
        Self { method }
    }

    /// The method used by this calculator
    pub fn method(&self) -> EffectSizeMethod {
        self.method
    }

    fn estimator(&self) -> &'static dyn StandardizedEffectSize {
        match self.method {
            EffectSizeMethod::CohensD => &CohenD,
            EffectSizeMethod::GlassDelta => &GlassDelta,
            EffectSizeMethod::HedgesG => &HedgesG,
        }
    }

    /// Large-sample sampling variance of a standardized mean difference
    pub fn sampling_variance(d: f64, n1: usize, n2: usize) -> f64 {
        let n1 = n1 as f64;
        let n2 = n2 as f64;
        (n1 + n2) / (n1 * n2) + (d * d) / (2.0 * (n1 + n2))
    }

    /// Compute the effect size of `group2` relative to `group1`
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] when a standard deviation is not positive or a
    /// group is smaller than the method allows (1, or 2 for Hedges' g).
    pub fn compute(&self, group1: &GroupSummary, group2: &GroupSummary) -> Result<EffectSizeResult> {
        let estimator = self.estimator();
        let min_size = estimator.minimum_group_size();
        group1.validate("group 1", min_size)?;
        group2.validate("group 2", min_size)?;

        let d = estimator.standardized_difference(group1, group2)?;
        if !d.is_finite() {
            return Err(Error::non_finite("effect size"));
        }

        let variance = Self::sampling_variance(d, group1.size, group2.size);
        if !(variance.is_finite() && variance > 0.0) {
            return Err(Error::InvalidInput(format!(
                "effect size variance must be positive, got {variance}"
            )));
        }
        let margin = Z_95 * variance.sqrt();

        trace!(method = %self.method, d, variance, "computed study effect size");

        Ok(EffectSizeResult {
            d,
            variance,
            weight: 1.0 / variance,
            ci_lower: d - margin,
            ci_upper: d + margin,
            method: self.method,
            corrected: estimator.applies_correction(group1.size, group2.size),
            sample_sizes: (group1.size, group2.size),
        })
    }
}

/// Compute a study effect size with the given method
pub fn compute_effect_size(
    group1: &GroupSummary,
    group2: &GroupSummary,
    method: EffectSizeMethod,
) -> Result<EffectSizeResult> {
    EffectSizeCalculator::new(method).compute(group1, group2)
}
