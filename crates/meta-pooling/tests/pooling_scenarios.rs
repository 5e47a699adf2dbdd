//! End-to-end scenarios from records to fail-safe N

use approx::assert_abs_diff_eq;
use meta_core::Error;
use meta_effect::{EffectSizeMethod, GroupSummary};
use meta_pooling::{
    authors_with_multiple_measures, FailSafeAccumulator, FailSafeNCalculator,
    RandomEffectsEstimator, StudyAggregator, StudyRecord, StudyRole, TauSquaredPolicy,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn two_study_records() -> Vec<StudyRecord> {
    vec![
        StudyRecord::new("A", GroupSummary::new(4.0, 1.0, 3), GroupSummary::new(3.0, 1.414, 2)),
        StudyRecord::new("B", GroupSummary::new(5.0, 2.0, 10), GroupSummary::new(5.0, 2.0, 10)),
    ]
}

#[test]
fn test_two_study_scenario() {
    let records = two_study_records();
    let table = StudyAggregator::new(EffectSizeMethod::HedgesG)
        .aggregate(&records, &BTreeSet::new())
        .unwrap();

    // Ascending weight: the tiny study A first
    assert_eq!(table.rows()[0].author, "A");
    assert_eq!(table.rows()[0].d, -0.48791);
    assert_abs_diff_eq!(table.rows()[0].weight, 1.166_671_984_551_369_3, epsilon = 1e-12);
    assert_eq!(table.rows()[1].author, "B");
    assert_eq!(table.rows()[1].d, 0.0);
    assert_abs_diff_eq!(table.rows()[1].weight, 5.0, epsilon = 1e-12);

    let inputs = table.pooling_inputs();
    let pooled = RandomEffectsEstimator::new(TauSquaredPolicy::Truncated)
        .estimate_inputs(&inputs)
        .unwrap();

    assert_eq!(pooled.k, 2);
    assert_abs_diff_eq!(pooled.q, 0.225_189_099_377_828_1, epsilon = 1e-12);
    assert_abs_diff_eq!(pooled.c, 1.891_898_883_991_388, epsilon = 1e-12);
    assert_abs_diff_eq!(pooled.tau_squared_raw, -0.409_541_391_021_666_7, epsilon = 1e-12);
    assert_eq!(pooled.tau_squared, 0.0);
    assert_abs_diff_eq!(pooled.m_star, -0.092_307_638_448_823_8, epsilon = 1e-12);
    assert_abs_diff_eq!(pooled.standard_error, 0.402_693_459_495_150_3, epsilon = 1e-12);
    assert_abs_diff_eq!(pooled.p_value, 0.818_693_598_362_243_9, epsilon = 1e-9);
    assert_eq!(pooled.ci_text(), "95% CI = [-0.882; 0.697]");
    assert_eq!(pooled.p_value_text(), "p.value = 0.81869");
    assert!(pooled.random_weights.iter().sum::<f64>() > 0.0);

    let n = FailSafeNCalculator::default()
        .fail_safe_n_default_weight(&inputs, &pooled)
        .unwrap();
    assert_eq!(n, 0);
}

#[test]
fn test_two_study_scenario_unbounded_tau() {
    // Study B's variance 0.2 plus T² of about -0.41 is negative
    let table = StudyAggregator::new(EffectSizeMethod::HedgesG)
        .aggregate(&two_study_records(), &BTreeSet::new())
        .unwrap();
    let result = RandomEffectsEstimator::new(TauSquaredPolicy::Unbounded)
        .estimate_inputs(&table.pooling_inputs());

    assert!(matches!(result, Err(Error::DegenerateInput(_))));
}

fn significant_records() -> Vec<StudyRecord> {
    vec![
        StudyRecord::new("Arnold 2009", GroupSummary::new(22.0, 4.0, 24), GroupSummary::new(26.5, 3.8, 26))
            .with_auxiliary_score(26.1),
        StudyRecord::new("Arnold 2009", GroupSummary::new(14.0, 3.0, 24), GroupSummary::new(16.0, 3.2, 26))
            .with_auxiliary_score(26.1),
        StudyRecord::new("Brun 2012", GroupSummary::new(40.0, 9.0, 35), GroupSummary::new(47.0, 8.0, 31)),
        StudyRecord::new("Chen 2015", GroupSummary::new(11.0, 2.5, 18), GroupSummary::new(12.5, 2.0, 20)),
        StudyRecord::new("Diaz 2018", GroupSummary::new(30.0, 6.0, 60), GroupSummary::new(33.0, 5.5, 58)),
    ]
}

#[test]
fn test_multi_measure_scenario() {
    let records = significant_records();
    let duplicates = authors_with_multiple_measures(&records);
    assert_eq!(duplicates.len(), 1);
    assert!(duplicates.contains("Arnold 2009"));

    let table = StudyAggregator::new(EffectSizeMethod::HedgesG)
        .aggregate(&records, &duplicates)
        .unwrap();
    assert_eq!(table.len(), 6);
    assert_eq!(table.study_count(), 4);

    let weights: Vec<f64> = table.rows().iter().map(|r| r.weight).collect();
    assert!(weights.windows(2).all(|w| w[0] <= w[1]));

    let aggregate = table
        .rows()
        .iter()
        .find(|r| r.role == StudyRole::Aggregate)
        .unwrap();
    let subs: Vec<_> = table
        .rows()
        .iter()
        .filter(|r| r.author == "Arnold 2009" && r.role == StudyRole::Primary)
        .collect();
    assert_eq!(subs.len(), 2);
    assert_eq!(aggregate.d, (subs[0].d + subs[1].d) / 2.0);
    assert_eq!(aggregate.auxiliary_score, Some(26.1));

    let inputs = table.pooling_inputs();
    let pooled = RandomEffectsEstimator::default().estimate_inputs(&inputs).unwrap();
    assert!(pooled.m_star > 0.0);
    assert!(pooled.is_significant(0.05));

    let n = FailSafeNCalculator::default()
        .fail_safe_n_default_weight(&inputs, &pooled)
        .unwrap();
    assert!(n > 0);
}

#[test]
fn test_rerun_is_identical() {
    let records = significant_records();
    let duplicates = authors_with_multiple_measures(&records);
    let aggregator = StudyAggregator::new(EffectSizeMethod::HedgesG);
    let estimator = RandomEffectsEstimator::default();

    let first_table = aggregator.aggregate(&records, &duplicates).unwrap();
    let second_table = aggregator.aggregate(&records, &duplicates).unwrap();
    assert_eq!(first_table, second_table);

    let first = estimator.estimate_inputs(&first_table.pooling_inputs()).unwrap();
    let second = estimator.estimate_inputs(&second_table.pooling_inputs()).unwrap();
    assert_eq!(first, second);
}

proptest! {
    // Property: appending null studies never lowers the pooled p-value
    #[test]
    fn prop_fail_safe_monotonic(
        studies in prop::collection::vec((0.05f64..2.0, 1.0f64..50.0), 2..12),
        null_weight in 0.5f64..50.0,
    ) {
        let effects: Vec<f64> = studies.iter().map(|s| s.0).collect();
        let weights: Vec<f64> = studies.iter().map(|s| s.1).collect();
        let mut acc = FailSafeAccumulator::new(&effects, &weights, null_weight).unwrap();

        let mut previous = acc.p_value().unwrap();
        for _ in 0..40 {
            acc.push_null_study();
            let p = acc.p_value().unwrap();
            prop_assert!(p >= previous - 1e-15);
            previous = p;
        }
    }

    // Property: the fail-safe count is the first crossing of the boundary
    #[test]
    fn prop_fail_safe_first_crossing(
        studies in prop::collection::vec((0.2f64..1.5, 5.0f64..40.0), 2..8),
    ) {
        let effects: Vec<f64> = studies.iter().map(|s| s.0).collect();
        let weights: Vec<f64> = studies.iter().map(|s| s.1).collect();
        let variances: Vec<f64> = weights.iter().map(|w| 1.0 / w).collect();
        let k = effects.len();

        let pooled = RandomEffectsEstimator::default()
            .estimate(&effects, &weights, &variances, k)
            .unwrap();
        let inputs = meta_pooling::PoolingInputs::new(effects, weights, variances).unwrap();
        let mean_weight = inputs.mean_weight().unwrap();
        let n = FailSafeNCalculator::default()
            .fail_safe_n(&inputs, &pooled, mean_weight)
            .unwrap();

        let mut acc = FailSafeAccumulator::new(&inputs.effects, &pooled.random_weights, mean_weight).unwrap();
        for _ in 0..n {
            prop_assert!(acc.p_value().unwrap() < 0.05);
            acc.push_null_study();
        }
        prop_assert!(acc.p_value().unwrap() >= 0.05);
    }
}
