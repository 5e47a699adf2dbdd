//! Study table and pooling input types

use meta_core::{math, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a row in the aggregated study table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StudyRole {
    /// One measure as reported by a study
    Primary,
    /// Mean of all sub-measures of a multi-measure study
    Aggregate,
}

impl fmt::Display for StudyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Primary => "Primary",
            Self::Aggregate => "Aggregate",
        };
        write!(f, "{}", s)
    }
}

/// One row of the aggregated study table
///
/// Sizes are `f64` because aggregate rows carry the mean size of their
/// sub-measures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyRow {
    pub author: String,
    pub d: f64,
    pub variance: f64,
    pub weight: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub group1_size: f64,
    pub group2_size: f64,
    pub auxiliary_score: Option<f64>,
    pub role: StudyRole,
    /// Whether the row feeds the pooled estimate
    pub pooled: bool,
}

impl StudyRow {
    /// Total number of subjects represented by the row
    pub fn total_size(&self) -> f64 {
        self.group1_size + self.group2_size
    }
}

/// Per-study rows sorted ascending by weight
///
/// Every author with several sub-measures has exactly one
/// [`StudyRole::Aggregate`] row, which is the one used for pooling. Its
/// [`StudyRole::Primary`] sub-rows are kept for display only.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregatedStudyTable {
    rows: Vec<StudyRow>,
}

impl AggregatedStudyTable {
    /// Build a table, sorting the rows ascending by weight
    ///
    /// The sort is stable so rows with equal weight keep their input order.
    pub fn new(mut rows: Vec<StudyRow>) -> Self {
        rows.sort_by(|a, b| a.weight.total_cmp(&b.weight));
        Self { rows }
    }

    /// All rows, display order
    pub fn rows(&self) -> &[StudyRow] {
        &self.rows
    }

    /// Rows that feed the pooled estimate
    pub fn pooled_rows(&self) -> impl Iterator<Item = &StudyRow> {
        self.rows.iter().filter(|row| row.pooled)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of studies that feed the pooled estimate
    pub fn study_count(&self) -> usize {
        self.pooled_rows().count()
    }

    /// Copy the pooling-eligible columns out of the table
    pub fn pooling_inputs(&self) -> PoolingInputs {
        let mut inputs = PoolingInputs::default();
        for row in self.pooled_rows() {
            inputs.effects.push(row.d);
            inputs.weights.push(row.weight);
            inputs.variances.push(row.variance);
        }
        inputs
    }
}

impl<'a> IntoIterator for &'a AggregatedStudyTable {
    type Item = &'a StudyRow;
    type IntoIter = std::slice::Iter<'a, StudyRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Equal-length effect, fixed-effect weight and variance columns
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PoolingInputs {
    pub effects: Vec<f64>,
    pub weights: Vec<f64>,
    pub variances: Vec<f64>,
}

impl PoolingInputs {
    /// Create pooling inputs, checking that the columns have equal length
    pub fn new(effects: Vec<f64>, weights: Vec<f64>, variances: Vec<f64>) -> Result<Self> {
        if weights.len() != effects.len() {
            return Err(Error::size_mismatch(effects.len(), weights.len(), "weights"));
        }
        if variances.len() != effects.len() {
            return Err(Error::size_mismatch(effects.len(), variances.len(), "variances"));
        }
        Ok(Self {
            effects,
            weights,
            variances,
        })
    }

    /// Number of studies
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Check if there are no studies
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Mean fixed-effect weight of the studies
    pub fn mean_weight(&self) -> Option<f64> {
        math::mean(&self.weights)
    }

    /// Sum of fixed-effect weights
    pub fn total_weight(&self) -> f64 {
        math::sum(&self.weights)
    }
}
