//! Pipeline configuration

use crate::{Error, Result};
use meta_effect::EffectSizeMethod;
use meta_pooling::{FailSafeNCalculator, TauSquaredPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Settings of a [`MetaAnalysis`](crate::MetaAnalysis) run
///
/// Every field has a default, so a JSON document only needs the fields it
/// changes:
///
/// ```rust
/// use meta_analysis::{EffectSizeMethod, MetaAnalysisConfig};
///
/// let config = MetaAnalysisConfig::from_json_str(r#"{ "method": "cohens_d" }"#).unwrap();
/// assert_eq!(config.method, EffectSizeMethod::CohensD);
/// assert_eq!(config.significance_level, 0.05);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaAnalysisConfig {
    /// Effect size computed for each study
    pub method: EffectSizeMethod,
    /// Handling of a negative between-study variance estimate
    pub tau_squared: TauSquaredPolicy,
    /// Boundary of the fail-safe N search
    pub significance_level: f64,
    /// Cap on null studies appended by the fail-safe N search
    pub max_fail_safe_iterations: usize,
    /// Authors whose measures are consolidated; detected from the records when absent
    pub duplicate_authors: Option<BTreeSet<String>>,
}

impl Default for MetaAnalysisConfig {
    fn default() -> Self {
        let fail_safe = FailSafeNCalculator::default();
        Self {
            method: EffectSizeMethod::default(),
            tau_squared: TauSquaredPolicy::default(),
            significance_level: fail_safe.significance_level(),
            max_fail_safe_iterations: fail_safe.max_iterations(),
            duplicate_authors: None,
        }
    }
}

impl MetaAnalysisConfig {
    pub fn with_method(mut self, method: EffectSizeMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_tau_squared(mut self, policy: TauSquaredPolicy) -> Self {
        self.tau_squared = policy;
        self
    }

    pub fn with_significance_level(mut self, alpha: f64) -> Self {
        self.significance_level = alpha;
        self
    }

    pub fn with_max_fail_safe_iterations(mut self, max_iterations: usize) -> Self {
        self.max_fail_safe_iterations = max_iterations;
        self
    }

    /// Use an explicit duplicate-author list instead of detecting it
    pub fn with_duplicate_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.duplicate_authors = Some(
            authors
                .into_iter()
                .map(|a| a.into().trim().to_string())
                .collect(),
        );
        self
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.fail_safe_calculator().map(|_| ())
    }

    pub(crate) fn fail_safe_calculator(&self) -> Result<FailSafeNCalculator> {
        FailSafeNCalculator::new(self.significance_level, self.max_fail_safe_iterations)
            .map_err(|e| Error::InvalidConfig(e.to_string()))
    }
}
