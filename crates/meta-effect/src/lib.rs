//! Standardized effect sizes from study summary statistics
//!
//! This crate turns the summary statistics a published study reports for two
//! groups (mean, standard deviation and size of each) into a standardized
//! mean difference, its sampling variance, an inverse-variance weight and a
//! 95% confidence interval. These per-study results are the inputs of the
//! random-effects pooling in `meta-pooling`.
//!
//! # Supported Effect Sizes
//!
//! - **Cohen's d**: difference over the root mean square of both SDs
//! - **Glass's delta**: difference over the control group (group 2) SD
//! - **Hedges' g**: difference over the df-weighted pooled SD, with the
//!   small-sample correction for N < 50
//!
//! All three report `group2 - group1`, so a positive effect means group 2
//! scored higher.
//!
//! # Example
//!
//! ```rust
//! use meta_effect::{EffectSizeCalculator, EffectSizeMethod, GroupSummary};
//!
//! let patients = GroupSummary::new(4.0, 1.0, 3);
//! let controls = GroupSummary::new(3.0, 1.414, 2);
//!
//! let result = EffectSizeCalculator::new(EffectSizeMethod::HedgesG)
//!     .compute(&patients, &controls)
//!     .unwrap();
//! assert_eq!(result.d, -0.48791);
//! assert!(result.ci_lower <= result.d && result.d <= result.ci_upper);
//! ```

mod calculator;
mod cohen_d;
mod glass_delta;
mod hedges_g;
mod traits;
mod types;

// Re-exports
pub use calculator::{compute_effect_size, EffectSizeCalculator};
pub use cohen_d::CohenD;
pub use glass_delta::GlassDelta;
pub use hedges_g::{HedgesG, SMALL_SAMPLE_THRESHOLD};
pub use traits::StandardizedEffectSize;
pub use types::{EffectSizeMethod, EffectSizeResult, GroupSummary};

// Convenience constructors
pub fn cohen_d() -> EffectSizeCalculator {
    EffectSizeCalculator::new(EffectSizeMethod::CohensD)
}

pub fn glass_delta() -> EffectSizeCalculator {
    EffectSizeCalculator::new(EffectSizeMethod::GlassDelta)
}

pub fn hedges_g() -> EffectSizeCalculator {
    EffectSizeCalculator::new(EffectSizeMethod::HedgesG)
}
