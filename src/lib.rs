//! Random-effects meta-analysis of two-group mean comparisons
//!
//! This crate ties the workspace together. Each study reports the mean,
//! standard deviation and size of a clinical group and a control group; the
//! [`MetaAnalysis`] pipeline turns those records into:
//!
//! - a per-study standardized effect size (Cohen's d, Glass' delta or
//!   Hedges' g) with its variance, weight and 95% confidence interval
//! - one consolidated row for every study reporting several measures
//! - a DerSimonian–Laird random-effects pooled estimate with its p-value
//! - the fail-safe N, the number of null studies that would erase significance
//!
//! # Example
//!
//! ```rust
//! use meta_analysis::{GroupSummary, MetaAnalysis, MetaAnalysisConfig, StudyRecord};
//!
//! let records = vec![
//!     StudyRecord::new("A", GroupSummary::new(4.0, 1.0, 3), GroupSummary::new(3.0, 1.414, 2)),
//!     StudyRecord::new("B", GroupSummary::new(5.0, 2.0, 10), GroupSummary::new(5.0, 2.0, 10)),
//! ];
//!
//! let report = MetaAnalysis::new(MetaAnalysisConfig::default())
//!     .unwrap()
//!     .run(&records)
//!     .unwrap();
//!
//! assert_eq!(report.fail_safe_n, 0);
//! assert_eq!(
//!     report.to_string(),
//!     "Nb studies = 2 | Tau squared = 0.0 | p.value = 0.81869 | 95% CI = [-0.882; 0.697] | Fail Safe N = 0"
//! );
//! ```

mod config;
mod error;
pub mod io;
mod report;

pub use config::MetaAnalysisConfig;
pub use error::{Error, Result};
pub use report::MetaAnalysisReport;

pub use meta_core::math;
pub use meta_effect::{
    compute_effect_size, EffectSizeCalculator, EffectSizeMethod, EffectSizeResult, GroupSummary,
};
pub use meta_pooling::{
    authors_with_multiple_measures, AggregatedStudyTable, FailSafeNCalculator, PooledEstimate,
    PoolingInputs, RandomEffectsEstimator, StudyAggregator, StudyRecord, StudyRole, StudyRow,
    TauSquaredPolicy,
};

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::io::Read;
use tracing::{debug, instrument};

/// End-to-end pipeline from study records to a [`MetaAnalysisReport`]
#[derive(Debug, Clone)]
pub struct MetaAnalysis {
    config: MetaAnalysisConfig,
    aggregator: StudyAggregator,
    estimator: RandomEffectsEstimator,
    fail_safe: FailSafeNCalculator,
}

impl MetaAnalysis {
    /// Build a pipeline from a validated configuration
    pub fn new(config: MetaAnalysisConfig) -> Result<Self> {
        let fail_safe = config.fail_safe_calculator()?;
        Ok(Self {
            aggregator: StudyAggregator::new(config.method),
            estimator: RandomEffectsEstimator::new(config.tau_squared),
            fail_safe,
            config,
        })
    }

    pub fn config(&self) -> &MetaAnalysisConfig {
        &self.config
    }

    /// Run the analysis on in-memory records
    ///
    /// # Errors
    ///
    /// Fails when fewer than two studies remain after consolidation, when
    /// a complete record holds invalid values, when the unbounded T² policy
    /// makes a random-effects weight non-positive, or when the fail-safe N
    /// search does not converge.
    #[instrument(skip_all, fields(records = records.len(), method = %self.config.method))]
    pub fn run(&self, records: &[StudyRecord]) -> Result<MetaAnalysisReport> {
        let duplicates: Cow<'_, BTreeSet<String>> = match &self.config.duplicate_authors {
            Some(authors) => Cow::Borrowed(authors),
            None => Cow::Owned(authors_with_multiple_measures(records)),
        };
        debug!(duplicates = duplicates.len(), "multi-measure authors");

        let table = self.aggregator.aggregate(records, &duplicates)?;
        let inputs = table.pooling_inputs();
        let pooled = self.estimator.estimate_inputs(&inputs)?;
        let fail_safe_n = self.fail_safe.fail_safe_n_default_weight(&inputs, &pooled)?;

        debug!(k = pooled.k, m_star = pooled.m_star, fail_safe_n, "meta-analysis complete");
        Ok(MetaAnalysisReport {
            method: self.config.method,
            table,
            pooled,
            fail_safe_n,
        })
    }

    /// Read records from CSV and run the analysis
    pub fn run_csv<R: Read>(&self, reader: R) -> Result<MetaAnalysisReport> {
        let records = io::read_records(reader)?;
        self.run(&records)
    }
}

impl Default for MetaAnalysis {
    fn default() -> Self {
        let config = MetaAnalysisConfig::default();
        Self {
            aggregator: StudyAggregator::new(config.method),
            estimator: RandomEffectsEstimator::new(config.tau_squared),
            fail_safe: FailSafeNCalculator::default(),
            config,
        }
    }
}
