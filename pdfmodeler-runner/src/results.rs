//! Output of a batch run and the ranking queries over it.

use std::sync::{Arc, OnceLock};

use pdfmodeler_core::{EstimationResult, RvType, Score};

use crate::config::ConfigFingerprint;
use crate::moda::AdditiveModaModel;
use crate::scoring_result::ScoringResult;

/// Everything a batch scoring run produced.
///
/// Ranks are 1-based; 0 means "not in this result set", so callers can
/// test `rank == 0` without confusing it with the best candidate.
#[derive(Debug)]
pub struct PdfModelingResults {
    estimation_results: Vec<Arc<EstimationResult>>,
    scoring_results: Vec<ScoringResult>,
    evaluation_model: AdditiveModaModel,
    config_fingerprint: ConfigFingerprint,
    /// Indices into `scoring_results`, best first. Sorted once on first use.
    sorted: OnceLock<Vec<usize>>,
}

impl PdfModelingResults {
    pub(crate) fn new(
        estimation_results: Vec<Arc<EstimationResult>>,
        scoring_results: Vec<ScoringResult>,
        evaluation_model: AdditiveModaModel,
        config_fingerprint: ConfigFingerprint,
    ) -> Self {
        Self {
            estimation_results,
            scoring_results,
            evaluation_model,
            config_fingerprint,
            sorted: OnceLock::new(),
        }
    }

    pub fn estimation_results(&self) -> &[Arc<EstimationResult>] {
        &self.estimation_results
    }

    /// Scoring results in input order.
    pub fn scoring_results(&self) -> &[ScoringResult] {
        &self.scoring_results
    }

    pub fn evaluation_model(&self) -> &AdditiveModaModel {
        &self.evaluation_model
    }

    pub fn config_fingerprint(&self) -> &str {
        &self.config_fingerprint
    }

    pub fn is_empty(&self) -> bool {
        self.scoring_results.is_empty()
    }

    fn sorted_indices(&self) -> &[usize] {
        self.sorted.get_or_init(|| {
            let mut order: Vec<usize> = (0..self.scoring_results.len()).collect();
            order.sort_by(|&a, &b| {
                self.scoring_results[a].cmp_by_preference(&self.scoring_results[b])
            });
            order
        })
    }

    /// Scoring results best first.
    pub fn sorted_scoring_results(&self) -> Vec<&ScoringResult> {
        self.sorted_indices()
            .iter()
            .map(|&i| &self.scoring_results[i])
            .collect()
    }

    /// The best-ranked scoring result.
    ///
    /// # Panics
    ///
    /// If no estimation result was scored. Use `try_top_result` when the
    /// result set may be empty.
    pub fn top_result(&self) -> &ScoringResult {
        match self.try_top_result() {
            Some(top) => top,
            None => panic!("top_result called on an empty modeling result"),
        }
    }

    pub fn try_top_result(&self) -> Option<&ScoringResult> {
        self.sorted_indices()
            .first()
            .map(|&i| &self.scoring_results[i])
    }

    /// 1-based position of the first sorted result matching `pred`, or 0.
    fn rank_where(&self, pred: impl Fn(&ScoringResult) -> bool) -> usize {
        self.sorted_indices()
            .iter()
            .position(|&i| pred(&self.scoring_results[i]))
            .map_or(0, |pos| pos + 1)
    }

    /// Rank of this exact estimation result (matched by identity), or 0.
    pub fn rank_of(&self, estimation_result: &Arc<EstimationResult>) -> usize {
        self.rank_where(|sr| Arc::ptr_eq(sr.estimation_result(), estimation_result))
    }

    /// Rank of the best result for a distribution family, or 0.
    pub fn rank_of_family(&self, rv_type: RvType) -> usize {
        self.rank_where(|sr| sr.rv_type() == rv_type)
    }

    /// Rank of the best result produced by an estimator, or 0.
    pub fn rank_of_estimator(&self, estimator: &str) -> usize {
        self.rank_where(|sr| sr.estimator() == estimator)
    }

    pub fn metric_names(&self) -> Vec<&str> {
        self.evaluation_model.metric_names()
    }

    /// Raw scores, one row per scoring result in input order.
    pub fn scores_table(&self) -> Vec<&[Score]> {
        self.scoring_results.iter().map(|sr| sr.scores()).collect()
    }

    /// MODA values, one row per scoring result in input order.
    pub fn values_table(&self) -> &[Vec<f64>] {
        self.evaluation_model.values_table()
    }

    pub fn overall_values(&self) -> &[f64] {
        self.evaluation_model.overall_values()
    }
}
