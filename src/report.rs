//! Result of a full meta-analysis run

use meta_core::math::{format_decimal, round_to};
use meta_effect::EffectSizeMethod;
use meta_pooling::{AggregatedStudyTable, PooledEstimate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Study table, pooled estimate and fail-safe N of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaAnalysisReport {
    pub method: EffectSizeMethod,
    pub table: AggregatedStudyTable,
    pub pooled: PooledEstimate,
    pub fail_safe_n: usize,
}

impl MetaAnalysisReport {
    /// Number of pooled studies
    pub fn study_count(&self) -> usize {
        self.pooled.k
    }

    /// Share of the total fixed-effect weight carried by each pooled row, in percent
    ///
    /// Rows come in table order, so ascending by weight.
    pub fn weight_shares(&self) -> Vec<(&str, f64)> {
        let total: f64 = self.table.pooled_rows().map(|r| r.weight).sum();
        self.table
            .pooled_rows()
            .map(|r| (r.author.as_str(), 100.0 * r.weight / total))
            .collect()
    }
}

impl fmt::Display for MetaAnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Nb studies = {} | Tau squared = {} | {} | {} | Fail Safe N = {}",
            self.pooled.k,
            format_decimal(round_to(self.pooled.tau_squared, 3)),
            self.pooled.p_value_text(),
            self.pooled.ci_text(),
            self.fail_safe_n
        )
    }
}
