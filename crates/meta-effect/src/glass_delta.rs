//! Glass's delta effect size
//!
//! Glass's delta is similar to Cohen's d but uses only the control group's
//! standard deviation as the denominator, making it useful when the groups
//! have clearly different spreads. Group 2 is the control group, matching the
//! clinical/control column order of study records.

use crate::{EffectSizeMethod, GroupSummary, StandardizedEffectSize};
use meta_core::{math::round_to, Result};

/// Glass's delta effect size estimator
///
/// Δ = (μ₂ - μ₁) / σ₂
#[derive(Debug, Clone, Copy, Default)]
pub struct GlassDelta;

impl GlassDelta {
    /// Create a new Glass's delta estimator
    pub fn new() -> Self {
        Self
    }
}

impl StandardizedEffectSize for GlassDelta {
    fn method(&self) -> EffectSizeMethod {
        EffectSizeMethod::GlassDelta
    }

    fn standardized_difference(
        &self,
        clinical: &GroupSummary,
        control: &GroupSummary,
    ) -> Result<f64> {
        Ok(round_to((control.mean - clinical.mean) / control.sd, 5))
    }
}
