//! Types for effect size representation

use meta_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Summary statistics of one group in a two-group comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Sample mean
    pub mean: f64,
    /// Sample standard deviation
    pub sd: f64,
    /// Number of subjects
    pub size: usize,
}

impl GroupSummary {
    /// Create a new group summary
    pub fn new(mean: f64, sd: f64, size: usize) -> Self {
        Self { mean, sd, size }
    }

    /// Check the summary against the requirements of an effect size method
    pub(crate) fn validate(&self, label: &str, min_size: usize) -> Result<()> {
        if !self.mean.is_finite() {
            return Err(Error::InvalidInput(format!("{label} mean must be finite")));
        }
        if !(self.sd.is_finite() && self.sd > 0.0) {
            return Err(Error::InvalidInput(format!(
                "{label} standard deviation must be positive, got {}",
                self.sd
            )));
        }
        if self.size < min_size {
            return Err(Error::InvalidInput(format!(
                "{label} size must be at least {min_size}, got {}",
                self.size
            )));
        }
        Ok(())
    }
}

/// Standardization convention for the mean difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectSizeMethod {
    /// Mean difference over the root mean square of both SDs
    CohensD,
    /// Mean difference over the control group (group 2) SD
    GlassDelta,
    /// Mean difference over the df-weighted pooled SD, bias corrected below N = 50
    #[default]
    HedgesG,
}

impl EffectSizeMethod {
    /// Get the name of the method
    pub fn name(&self) -> &'static str {
        match self {
            Self::CohensD => "Cohen's d",
            Self::GlassDelta => "Glass' delta",
            Self::HedgesG => "Hedges' g",
        }
    }

    /// Smallest group size for which the method is defined
    pub fn minimum_group_size(&self) -> usize {
        match self {
            Self::CohensD | Self::GlassDelta => 1,
            Self::HedgesG => 2,
        }
    }
}

impl fmt::Display for EffectSizeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for EffectSizeMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s
            .trim()
            .to_ascii_lowercase()
            .replace('\'', "")
            .replace([' ', '-'], "_");
        match normalized.as_str() {
            "cohen_d" | "cohens_d" | "cohen" => Ok(Self::CohensD),
            "glass_delta" | "glass" => Ok(Self::GlassDelta),
            "hedges_g" | "hedge_g" | "hedges" => Ok(Self::HedgesG),
            other => Err(Error::InvalidParameter(format!(
                "unknown effect size method '{other}'"
            ))),
        }
    }
}

/// A per-study effect size with its sampling variance and 95% CI
///
/// `d` is rounded to 5 decimals; `variance`, `weight` and the CI bounds are
/// derived from the rounded `d` and are not rounded themselves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectSizeResult {
    /// Effect size point estimate
    pub d: f64,
    /// Large-sample sampling variance of `d`
    pub variance: f64,
    /// Inverse-variance weight `1 / variance`
    pub weight: f64,
    /// Lower bound of the 95% confidence interval
    pub ci_lower: f64,
    /// Upper bound of the 95% confidence interval
    pub ci_upper: f64,
    /// Method used to standardize the difference
    pub method: EffectSizeMethod,
    /// Whether the small-sample bias correction was applied
    pub corrected: bool,
    /// Sample sizes (group1, group2)
    pub sample_sizes: (usize, usize),
}

impl EffectSizeResult {
    /// Check if a value lies inside the 95% confidence interval
    pub fn ci_contains(&self, value: f64) -> bool {
        value >= self.ci_lower && value <= self.ci_upper
    }

    /// Total number of subjects across both groups
    pub fn total_size(&self) -> usize {
        self.sample_sizes.0 + self.sample_sizes.1
    }
}

impl fmt::Display for EffectSizeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.corrected {
            format!("Corrected {} (n < 50)", self.method)
        } else {
            self.method.to_string()
        };
        write!(
            f,
            "{}: {:.2} ({:.2}; {:.2})",
            label, self.d, self.ci_lower, self.ci_upper
        )
    }
}
