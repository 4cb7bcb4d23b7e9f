//! Property tests for aggregation and ranking invariants.
//!
//! Uses proptest to verify:
//! 1. MODA values and overall values stay in [0, 1]
//! 2. Ranks are a permutation of 1..=n consistent with overall values,
//!    with failed estimations below every successful one
//! 3. Rank queries return 0 for anything not evaluated

mod common;

use std::sync::Arc;

use proptest::prelude::*;

use pdfmodeler_core::{RvParameters, RvType};
use pdfmodeler_runner::{ModelerConfig, PdfModeler};

use common::*;

// ── Strategies (proptest) ────────────────────────────────────────────

/// Normal estimates of varying quality, some of them failed.
fn arb_estimates() -> impl Strategy<Value = Vec<Option<(f64, f64)>>> {
    prop::collection::vec(
        prop::option::weighted(0.85, (-3.0..3.0_f64, 0.2..4.0_f64)),
        1..8,
    )
}

fn build(data: &[f64], estimates: &[Option<(f64, f64)>]) -> Vec<Arc<pdfmodeler_core::EstimationResult>> {
    estimates
        .iter()
        .enumerate()
        .map(|(i, est)| match est {
            Some((mean, sd)) => normal_with(&format!("E{i}"), *mean, *sd, data),
            None => failed(&format!("E{i}"), RvType::Normal, data),
        })
        .collect()
}

fn sample() -> Vec<f64> {
    normal_sample(&mut rng(99), 0.0, 1.0, 60)
}

// ── 1. Value Bounds ──────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn values_stay_in_unit_interval(estimates in arb_estimates()) {
        let data = sample();
        let modeler = PdfModeler::new(ModelerConfig::default()).unwrap();
        let results = modeler.evaluate(build(&data, &estimates)).unwrap();

        for row in results.values_table() {
            for &v in row {
                prop_assert!((0.0..=1.0).contains(&v), "value {} out of range", v);
            }
        }
        for &overall in results.overall_values() {
            prop_assert!((0.0..=1.0 + 1e-12).contains(&overall));
        }
    }
}

// ── 2. Rank Permutation ──────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn ranks_form_a_permutation(estimates in arb_estimates()) {
        let data = sample();
        let modeler = PdfModeler::new(ModelerConfig::default()).unwrap();
        let candidates = build(&data, &estimates);
        let results = modeler.evaluate(candidates.clone()).unwrap();
        let n = candidates.len();

        let mut ranks: Vec<usize> = candidates.iter().map(|c| results.rank_of(c)).collect();
        ranks.sort_unstable();
        prop_assert_eq!(ranks, (1..=n).collect::<Vec<_>>());

        let sorted = results.sorted_scoring_results();
        for pair in sorted.windows(2) {
            prop_assert!(pair[0].overall_value() >= pair[1].overall_value());
        }
        prop_assert_eq!(results.top_result().rank(), 1);
    }

    /// A failed estimate never outranks a successful one.
    #[test]
    fn failures_rank_below_successes(estimates in arb_estimates()) {
        let data = sample();
        let modeler = PdfModeler::new(ModelerConfig::default()).unwrap();
        let candidates = build(&data, &estimates);
        let results = modeler.evaluate(candidates.clone()).unwrap();

        let worst_success = candidates
            .iter()
            .filter(|c| c.is_success())
            .map(|c| results.rank_of(c))
            .max();
        let best_failure = candidates
            .iter()
            .filter(|c| !c.is_success())
            .map(|c| results.rank_of(c))
            .min();
        if let (Some(s), Some(f)) = (worst_success, best_failure) {
            prop_assert!(s < f);
        }
    }

    /// Same ordering when every metric narrows to the observed range.
    #[test]
    fn failures_rank_below_successes_with_adjustable_metrics(estimates in arb_estimates()) {
        let data = sample();
        let config =
            ModelerConfig::from_toml_str(r#"scoring_models = ["ks", "bic", "pp_sse"]"#).unwrap();
        let modeler = PdfModeler::new(config).unwrap();
        let candidates = build(&data, &estimates);
        let results = modeler.evaluate(candidates.clone()).unwrap();

        for success in candidates.iter().filter(|c| c.is_success()) {
            for failure in candidates.iter().filter(|c| !c.is_success()) {
                prop_assert!(results.rank_of(success) < results.rank_of(failure));
            }
        }
    }
}

// ── 3. Absent Lookups ────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn unevaluated_results_rank_zero(estimates in arb_estimates(), mean in -3.0..3.0_f64) {
        let data = sample();
        let modeler = PdfModeler::new(ModelerConfig::default()).unwrap();
        let results = modeler.evaluate(build(&data, &estimates)).unwrap();

        let outsider = Arc::new(pdfmodeler_core::EstimationResult::success(
            "Outsider",
            RvParameters::new(RvType::Normal, vec![mean, 1.0]).unwrap(),
            data.clone(),
        ));
        prop_assert_eq!(results.rank_of(&outsider), 0);
        prop_assert_eq!(results.rank_of_estimator("Outsider"), 0);
        prop_assert_eq!(results.rank_of_family(RvType::Gamma), 0);
    }
}
