//! Raw per-study input records

use meta_core::{Error, Result};
use meta_effect::GroupSummary;
use serde::{Deserialize, Serialize};

/// One row of study summary statistics as supplied by a loader
///
/// Group 1 is the clinical group and group 2 the control group. Numeric
/// fields are optional because source tables are routinely incomplete; a
/// record only takes part in the analysis when all six required fields are
/// present and finite (see [`is_complete`](Self::is_complete)).
///
/// The serde derives give the JSON shape, keyed by field name. Source tables
/// with their own column names are mapped by the loader.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StudyRecord {
    /// Author identity; several records may share it (one per sub-measure)
    pub authors: String,
    pub group1_mean: Option<f64>,
    pub group2_mean: Option<f64>,
    pub group1_sd: Option<f64>,
    pub group2_sd: Option<f64>,
    pub group1_size: Option<f64>,
    pub group2_size: Option<f64>,
    /// Optional auxiliary score carried through for reporting
    #[serde(default)]
    pub auxiliary_score: Option<f64>,
}

impl StudyRecord {
    /// Create a complete record from both groups' summaries
    pub fn new(authors: impl Into<String>, group1: GroupSummary, group2: GroupSummary) -> Self {
        Self {
            authors: authors.into(),
            group1_mean: Some(group1.mean),
            group2_mean: Some(group2.mean),
            group1_sd: Some(group1.sd),
            group2_sd: Some(group2.sd),
            group1_size: Some(group1.size as f64),
            group2_size: Some(group2.size as f64),
            auxiliary_score: None,
        }
    }

    /// Attach an auxiliary score
    pub fn with_auxiliary_score(mut self, score: f64) -> Self {
        self.auxiliary_score = Some(score);
        self
    }

    /// Identity used to group sub-measures of the same study
    pub fn identity(&self) -> &str {
        self.authors.trim()
    }

    /// All six required numeric fields are present and finite
    pub fn is_complete(&self) -> bool {
        [
            self.group1_mean,
            self.group2_mean,
            self.group1_sd,
            self.group2_sd,
            self.group1_size,
            self.group2_size,
        ]
        .into_iter()
        .all(|v| v.is_some_and(f64::is_finite))
    }

    /// Group summaries of a complete record, `None` when incomplete
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] when a size is negative or not a whole number.
    pub fn group_summaries(&self) -> Result<Option<(GroupSummary, GroupSummary)>> {
        match (
            self.group1_mean,
            self.group1_sd,
            self.group1_size,
            self.group2_mean,
            self.group2_sd,
            self.group2_size,
        ) {
            (Some(m1), Some(s1), Some(n1), Some(m2), Some(s2), Some(n2)) if self.is_complete() => {
                let group1 = GroupSummary::new(m1, s1, self.subject_count(n1, "group 1")?);
                let group2 = GroupSummary::new(m2, s2, self.subject_count(n2, "group 2")?);
                Ok(Some((group1, group2)))
            }
            _ => Ok(None),
        }
    }

    fn subject_count(&self, size: f64, label: &str) -> Result<usize> {
        if size < 0.0 || size.fract() != 0.0 {
            return Err(Error::InvalidInput(format!(
                "{label} size of '{}' must be a whole number, got {size}",
                self.identity()
            )));
        }
        Ok(size as usize)
    }
}
