//! Consolidation of per-measure rows into one pooled row per study
//!
//! Some studies report several measures for the same groups. Pooling each of
//! them as an independent study would count that study several times, so for
//! every author listed as having multiple measures an extra aggregate row is
//! synthesized as the arithmetic mean of the sub-measure rows. Only that
//! aggregate row is pooled; the sub-measure rows stay in the table for
//! display.

use crate::{AggregatedStudyTable, StudyRecord, StudyRole, StudyRow};
use meta_core::{math, Result};
use meta_effect::{EffectSizeCalculator, EffectSizeMethod};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

/// Authors that appear on at least two complete records
pub fn authors_with_multiple_measures(records: &[StudyRecord]) -> BTreeSet<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records.iter().filter(|r| r.is_complete()) {
        *counts.entry(record.identity()).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|&(_, count)| count >= 2)
        .map(|(author, _)| author.to_string())
        .collect()
}

/// Builds the [`AggregatedStudyTable`] from raw study records
#[derive(Debug, Clone, Copy, Default)]
pub struct StudyAggregator {
    calculator: EffectSizeCalculator,
}

impl StudyAggregator {
    /// Create an aggregator computing effect sizes with `method`
    pub fn new(method: EffectSizeMethod) -> Self {
        Self {
            calculator: EffectSizeCalculator::new(method),
        }
    }

    /// The effect size method used for each record
    pub fn method(&self) -> EffectSizeMethod {
        self.calculator.method()
    }

    /// Compute per-record effect sizes and consolidate multi-measure authors
    ///
    /// Records missing any required numeric field are dropped. Authors in
    /// `duplicate_authors` get one aggregate row each (when they have at
    /// least one complete record); their primary rows are excluded from
    /// pooling.
    ///
    /// # Errors
    ///
    /// Propagates [`meta_core::Error::InvalidInput`] from the effect size
    /// computation of a complete record.
    #[instrument(skip_all, fields(records = records.len(), method = %self.method()))]
    pub fn aggregate(
        &self,
        records: &[StudyRecord],
        duplicate_authors: &BTreeSet<String>,
    ) -> Result<AggregatedStudyTable> {
        let mut rows = Vec::with_capacity(records.len() + duplicate_authors.len());

        for record in records {
            let Some((group1, group2)) = record.group_summaries()? else {
                debug!(author = record.identity(), "dropping incomplete record");
                continue;
            };
            let effect = self.calculator.compute(&group1, &group2)?;

            rows.push(StudyRow {
                author: record.identity().to_string(),
                d: effect.d,
                variance: effect.variance,
                weight: effect.weight,
                ci_lower: effect.ci_lower,
                ci_upper: effect.ci_upper,
                group1_size: group1.size as f64,
                group2_size: group2.size as f64,
                auxiliary_score: record.auxiliary_score.filter(|s| s.is_finite()),
                role: StudyRole::Primary,
                pooled: !duplicate_authors.contains(record.identity()),
            });
        }

        let mut aggregates = Vec::with_capacity(duplicate_authors.len());
        for author in duplicate_authors {
            let measures: Vec<&StudyRow> = rows.iter().filter(|r| &r.author == author).collect();
            if let Some(aggregate) = mean_row(author, &measures) {
                debug!(author = %author, measures = measures.len(), d = aggregate.d, "synthesized aggregate row");
                aggregates.push(aggregate);
            }
        }
        rows.extend(aggregates);

        Ok(AggregatedStudyTable::new(rows))
    }
}

/// Column-wise mean of an author's sub-measure rows
fn mean_row(author: &str, measures: &[&StudyRow]) -> Option<StudyRow> {
    let column = |f: fn(&StudyRow) -> f64| -> Option<f64> {
        let values: Vec<f64> = measures.iter().map(|r| f(r)).collect();
        math::mean(&values)
    };
    let scores: Vec<f64> = measures.iter().filter_map(|r| r.auxiliary_score).collect();

    Some(StudyRow {
        author: author.to_string(),
        d: column(|r| r.d)?,
        variance: column(|r| r.variance)?,
        weight: column(|r| r.weight)?,
        ci_lower: column(|r| r.ci_lower)?,
        ci_upper: column(|r| r.ci_upper)?,
        group1_size: column(|r| r.group1_size)?,
        group2_size: column(|r| r.group2_size)?,
        auxiliary_score: math::mean(&scores),
        role: StudyRole::Aggregate,
        pooled: true,
    })
}
