//! Fail-safe N: how many null studies it takes to lose significance
//!
//! Null-effect studies (d = 0) carrying the mean fixed-effect weight of the
//! real studies are appended one at a time until the pooled p-value reaches
//! the significance level. Each appended study enters with its weight used
//! directly as its random-effects weight; T² is not re-estimated.

use crate::{PooledEstimate, PoolingInputs};
use meta_core::{math, Error, Result};
use tracing::{debug, instrument, trace};

use crate::random_effects::Significance;

/// Working state of the fail-safe loop
///
/// Holds the running sums Σ Wᵢ*Yᵢ and Σ Wᵢ* of the real studies extended with
/// the appended null studies. It is built from copies of the pooled inputs
/// and never touches them. Appending a null study adds nothing to the
/// weighted sum and the null weight to the weight sum, which is exactly
/// what re-summing the extended columns left to right would produce.
#[derive(Debug, Clone, PartialEq)]
pub struct FailSafeAccumulator {
    weighted_effect_sum: f64,
    weight_sum: f64,
    null_weight: f64,
    studies: usize,
    appended: usize,
}

impl FailSafeAccumulator {
    /// Start from the real studies' effects and random-effects weights
    pub fn new(effects: &[f64], random_weights: &[f64], null_weight: f64) -> Result<Self> {
        if effects.len() != random_weights.len() {
            return Err(Error::size_mismatch(
                effects.len(),
                random_weights.len(),
                "random-effects weights",
            ));
        }
        Ok(Self {
            weighted_effect_sum: math::dot(random_weights, effects),
            weight_sum: math::sum(random_weights),
            null_weight,
            studies: effects.len(),
            appended: 0,
        })
    }

    /// Append one null-effect study
    pub fn push_null_study(&mut self) {
        self.weight_sum += self.null_weight;
        self.studies += 1;
        self.appended += 1;
    }

    /// Number of null studies appended so far
    pub fn appended(&self) -> usize {
        self.appended
    }

    /// Real plus appended studies
    pub fn study_count(&self) -> usize {
        self.studies
    }

    /// Pooled effect of the extended study set
    pub fn m_star(&self) -> f64 {
        self.weighted_effect_sum / self.weight_sum
    }

    /// Two-sided p-value of the extended study set
    pub fn p_value(&self) -> Result<f64> {
        Significance::from_sums(self.weighted_effect_sum, self.weight_sum).map(|s| s.p_value)
    }
}

/// Computes the fail-safe N of a pooled estimate
#[derive(Debug, Clone, Copy)]
pub struct FailSafeNCalculator {
    significance_level: f64,
    max_iterations: usize,
}

impl Default for FailSafeNCalculator {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            max_iterations: 100_000,
        }
    }
}

impl FailSafeNCalculator {
    /// Create a calculator with a significance level and an iteration cap
    pub fn new(significance_level: f64, max_iterations: usize) -> Result<Self> {
        if !(significance_level > 0.0 && significance_level < 1.0) {
            return Err(Error::InvalidParameter(format!(
                "significance level must be in (0, 1), got {significance_level}"
            )));
        }
        if max_iterations == 0 {
            return Err(Error::InvalidParameter(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            significance_level,
            max_iterations,
        })
    }

    /// Significance boundary
    pub fn significance_level(&self) -> f64 {
        self.significance_level
    }

    /// Upper bound on appended studies
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Number of null studies needed to push the p-value to the boundary
    ///
    /// Returns 0 when the pooled estimate is already non-significant,
    /// including a pooled effect of exactly zero.
    ///
    /// # Errors
    ///
    /// [`Error::NonConvergent`] when `mean_weight` is not positive and finite
    /// (appending such studies cannot dilute the effect) or when the cap is
    /// reached before the p-value crosses the boundary.
    #[instrument(skip(self, inputs, pooled), fields(k = inputs.len()))]
    pub fn fail_safe_n(
        &self,
        inputs: &PoolingInputs,
        pooled: &PooledEstimate,
        mean_weight: f64,
    ) -> Result<usize> {
        let mut acc = FailSafeAccumulator::new(&inputs.effects, &pooled.random_weights, mean_weight)?;
        let mut p_value = acc.p_value()?;

        if p_value >= self.significance_level {
            debug!(p_value, "pooled effect already non-significant");
            return Ok(0);
        }
        if !(mean_weight.is_finite() && mean_weight > 0.0) {
            return Err(Error::NonConvergent {
                iterations: 0,
                p_value,
            });
        }

        while p_value < self.significance_level {
            if acc.appended() >= self.max_iterations {
                return Err(Error::NonConvergent {
                    iterations: acc.appended(),
                    p_value,
                });
            }
            acc.push_null_study();
            p_value = acc.p_value()?;
            trace!(count = acc.appended(), p_value, "appended null study");
        }

        debug!(fail_safe_n = acc.appended(), p_value, "fail-safe N reached");
        Ok(acc.appended())
    }

    /// Fail-safe N using the mean fixed-effect weight of `inputs`
    pub fn fail_safe_n_default_weight(
        &self,
        inputs: &PoolingInputs,
        pooled: &PooledEstimate,
    ) -> Result<usize> {
        let mean_weight = inputs
            .mean_weight()
            .ok_or_else(|| Error::insufficient_studies(1, 0))?;
        self.fail_safe_n(inputs, pooled, mean_weight)
    }
}
