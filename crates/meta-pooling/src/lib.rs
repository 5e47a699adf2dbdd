//! Random-effects pooling of study effect sizes
//!
//! This crate takes raw [`StudyRecord`]s through the aggregation stages of a
//! meta-analysis:
//!
//! 1. [`StudyAggregator`] computes each record's effect size and folds the
//!    sub-measures of multi-measure studies into one aggregate row, giving an
//!    [`AggregatedStudyTable`].
//! 2. [`RandomEffectsEstimator`] pools the eligible rows with the
//!    DerSimonian–Laird estimator into a [`PooledEstimate`].
//! 3. [`FailSafeNCalculator`] counts how many null studies would erase the
//!    significance of the pooled effect.
//!
//! # Example
//!
//! ```rust
//! use meta_effect::{EffectSizeMethod, GroupSummary};
//! use meta_pooling::{
//!     authors_with_multiple_measures, FailSafeNCalculator, RandomEffectsEstimator,
//!     StudyAggregator, StudyRecord,
//! };
//!
//! let records = vec![
//!     StudyRecord::new("A", GroupSummary::new(20.0, 4.0, 30), GroupSummary::new(24.0, 4.0, 30)),
//!     StudyRecord::new("B", GroupSummary::new(18.0, 5.0, 25), GroupSummary::new(23.0, 5.0, 28)),
//!     StudyRecord::new("C", GroupSummary::new(21.0, 3.0, 40), GroupSummary::new(23.5, 3.5, 42)),
//! ];
//! let duplicates = authors_with_multiple_measures(&records);
//!
//! let table = StudyAggregator::new(EffectSizeMethod::HedgesG)
//!     .aggregate(&records, &duplicates)
//!     .unwrap();
//! let inputs = table.pooling_inputs();
//! let pooled = RandomEffectsEstimator::default().estimate_inputs(&inputs).unwrap();
//! assert!(pooled.m_star > 0.0);
//!
//! let n = FailSafeNCalculator::default()
//!     .fail_safe_n_default_weight(&inputs, &pooled)
//!     .unwrap();
//! assert!(n > 0);
//! ```

mod aggregate;
mod fail_safe;
mod random_effects;
mod record;
mod types;

pub use aggregate::{authors_with_multiple_measures, StudyAggregator};
pub use fail_safe::{FailSafeAccumulator, FailSafeNCalculator};
pub use random_effects::{PooledEstimate, RandomEffectsEstimator, TauSquaredPolicy};
pub use record::StudyRecord;
pub use types::{AggregatedStudyTable, PoolingInputs, StudyRole, StudyRow};
