//! DerSimonian–Laird random-effects pooling
//!
//! Given per-study effects Yᵢ, fixed-effect weights Wᵢ = 1/Vᵢ and variances
//! Vᵢ, the between-study variance is estimated as
//!
//! ```text
//! Q  = Σ WᵢYᵢ² − (Σ WᵢYᵢ)² / Σ Wᵢ
//! C  = Σ Wᵢ − Σ Wᵢ² / Σ Wᵢ
//! T² = (Q − (k − 1)) / C
//! ```
//!
//! and each study is reweighted with Wᵢ* = 1/(Vᵢ + T²). The pooled effect is
//! M* = Σ Wᵢ*Yᵢ / Σ Wᵢ* with variance 1/Σ Wᵢ*, tested with a two-sided z
//! test.

use crate::PoolingInputs;
use meta_core::{
    math::{self, format_decimal, normal, round_to},
    Error, Result, Z_95,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// How a negative heterogeneity estimate is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TauSquaredPolicy {
    /// Clamp T² at zero, the standard meta-analytic practice
    #[default]
    Truncated,
    /// Use T² as computed, even when negative
    Unbounded,
}

impl TauSquaredPolicy {
    fn apply(self, raw: f64) -> f64 {
        match self {
            Self::Truncated => raw.max(0.0),
            Self::Unbounded => raw,
        }
    }
}

/// Result of a random-effects pooling run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PooledEstimate {
    /// Pooled effect M*
    pub m_star: f64,
    /// Heterogeneity T² as used for the random-effects weights
    pub tau_squared: f64,
    /// Heterogeneity T² before the policy was applied
    pub tau_squared_raw: f64,
    /// Cochran's Q
    pub q: f64,
    /// Scaling factor C
    pub c: f64,
    /// Number of pooled studies
    pub k: usize,
    /// Standard error of M*
    pub standard_error: f64,
    /// z statistic M* / SE
    pub z: f64,
    /// Two-sided p-value of the z test
    pub p_value: f64,
    /// Lower 95% CI bound, rounded to 3 decimals
    pub ci_lower: f64,
    /// Upper 95% CI bound, rounded to 3 decimals
    pub ci_upper: f64,
    /// Random-effects weights Wᵢ*, in input order
    pub random_weights: Vec<f64>,
}

impl PooledEstimate {
    /// Variance of the pooled effect
    pub fn variance(&self) -> f64 {
        self.standard_error * self.standard_error
    }

    /// Check significance at level `alpha`
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }

    /// Human readable p-value
    pub fn p_value_text(&self) -> String {
        if self.p_value > 0.001 {
            format!("p.value = {}", format_decimal(round_to(self.p_value, 5)))
        } else {
            "p value < 0.001".to_string()
        }
    }

    /// Human readable 95% confidence interval
    pub fn ci_text(&self) -> String {
        format!(
            "95% CI = [{}; {}]",
            format_decimal(self.ci_lower),
            format_decimal(self.ci_upper)
        )
    }
}

/// z test of a weighted mean from its running sums
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Significance {
    pub m_star: f64,
    pub standard_error: f64,
    pub z: f64,
    pub p_value: f64,
}

impl Significance {
    /// `weighted_sum` is Σ Wᵢ*Yᵢ and `weight_sum` is Σ Wᵢ*
    pub(crate) fn from_sums(weighted_sum: f64, weight_sum: f64) -> Result<Self> {
        if !(weight_sum.is_finite() && weight_sum > 0.0) {
            return Err(Error::DegenerateInput(format!(
                "sum of random-effects weights must be positive, got {weight_sum}"
            )));
        }
        let m_star = weighted_sum / weight_sum;
        let standard_error = (1.0 / weight_sum).sqrt();
        let z = m_star / standard_error;
        let p_value = normal::two_sided_p_value(z)?;

        Ok(Self {
            m_star,
            standard_error,
            z,
            p_value,
        })
    }
}

/// DerSimonian–Laird random-effects estimator
///
/// Stateless: every call is a pure function of its inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomEffectsEstimator {
    policy: TauSquaredPolicy,
}

impl RandomEffectsEstimator {
    /// Create an estimator with the given heterogeneity policy
    pub fn new(policy: TauSquaredPolicy) -> Self {
        Self { policy }
    }

    /// The heterogeneity policy
    pub fn policy(&self) -> TauSquaredPolicy {
        self.policy
    }

    /// Pool `k` studies
    ///
    /// # Errors
    ///
    /// [`Error::DegenerateInput`] when `k < 2`, when the sequences do not all
    /// have length `k`, when a weight or variance is not positive, or when
    /// an unbounded negative T² makes some Vᵢ + T² non-positive.
    #[instrument(skip(self, effects, weights, variances), fields(policy = ?self.policy))]
    pub fn estimate(
        &self,
        effects: &[f64],
        weights: &[f64],
        variances: &[f64],
        k: usize,
    ) -> Result<PooledEstimate> {
        validate(effects, weights, variances, k)?;

        let sum_w = math::sum(weights);
        let sum_wy = math::dot(weights, effects);
        let sum_wy2 = weights
            .iter()
            .zip(effects)
            .fold(0.0, |acc, (&w, &y)| acc + w * (y * y));
        let sum_w2 = math::dot(weights, weights);

        let df = (k - 1) as f64;
        let q = sum_wy2 - (sum_wy * sum_wy) / sum_w;
        let c = sum_w - sum_w2 / sum_w;
        let tau_squared_raw = (q - df) / c;
        let tau_squared = self.policy.apply(tau_squared_raw);

        debug!(q, c, tau_squared_raw, tau_squared, "heterogeneity estimated");

        let random_weights = variances
            .iter()
            .map(|&v| {
                let total = v + tau_squared;
                if total > 0.0 {
                    Ok(1.0 / total)
                } else {
                    Err(Error::DegenerateInput(format!(
                        "variance {v} plus T² {tau_squared} is not positive"
                    )))
                }
            })
            .collect::<Result<Vec<f64>>>()?;

        let sig = Significance::from_sums(
            math::dot(&random_weights, effects),
            math::sum(&random_weights),
        )?;

        debug!(m_star = sig.m_star, p_value = sig.p_value, "pooled estimate");

        Ok(PooledEstimate {
            m_star: sig.m_star,
            tau_squared,
            tau_squared_raw,
            q,
            c,
            k,
            standard_error: sig.standard_error,
            z: sig.z,
            p_value: sig.p_value,
            ci_lower: round_to(sig.m_star - Z_95 * sig.standard_error, 3),
            ci_upper: round_to(sig.m_star + Z_95 * sig.standard_error, 3),
            random_weights,
        })
    }

    /// Pool every study in `inputs`
    pub fn estimate_inputs(&self, inputs: &PoolingInputs) -> Result<PooledEstimate> {
        self.estimate(&inputs.effects, &inputs.weights, &inputs.variances, inputs.len())
    }
}

fn validate(effects: &[f64], weights: &[f64], variances: &[f64], k: usize) -> Result<()> {
    if k < 2 {
        return Err(Error::insufficient_studies(2, k));
    }
    for (name, column) in [("effects", effects), ("weights", weights), ("variances", variances)] {
        if column.len() != k {
            return Err(Error::size_mismatch(k, column.len(), name));
        }
        if column.iter().any(|v| !v.is_finite()) {
            return Err(Error::DegenerateInput(format!("{name} must be finite")));
        }
    }
    if weights.iter().chain(variances).any(|&v| v <= 0.0) {
        return Err(Error::DegenerateInput(
            "weights and variances must be positive".to_string(),
        ));
    }
    Ok(())
}
