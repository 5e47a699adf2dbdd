//! Core traits for effect size estimation

use crate::types::{EffectSizeMethod, GroupSummary};
use meta_core::Result;

/// Estimator of a standardized mean difference from group summaries
///
/// Implementations only standardize the difference `mean2 - mean1`; input
/// validation, the sampling variance and the confidence interval are shared
/// and live in [`crate::EffectSizeCalculator`].
pub trait StandardizedEffectSize {
    /// The method this estimator implements
    fn method(&self) -> EffectSizeMethod;

    /// Smallest group size the estimator accepts
    fn minimum_group_size(&self) -> usize {
        self.method().minimum_group_size()
    }

    /// Whether a small-sample bias correction applies for these sizes
    fn applies_correction(&self, _n1: usize, _n2: usize) -> bool {
        false
    }

    /// Compute the standardized difference, rounded to 5 decimals
    ///
    /// Both groups have already been validated against
    /// [`minimum_group_size`](Self::minimum_group_size).
    fn standardized_difference(&self, group1: &GroupSummary, group2: &GroupSummary)
        -> Result<f64>;
}
