//! Per-candidate scoring outcome after aggregation.

use std::cmp::Ordering;
use std::sync::Arc;

use pdfmodeler_core::{EstimationResult, RvType, Score};

/// Scores for one estimation result plus its aggregated value and rank.
///
/// Built by the modeler after the MODA step; read-only afterwards.
#[derive(Debug, Clone)]
pub struct ScoringResult {
    estimation_result: Arc<EstimationResult>,
    scores: Vec<Score>,
    values: Vec<f64>,
    overall_value: f64,
    rank: usize,
}

impl ScoringResult {
    pub(crate) fn new(
        estimation_result: Arc<EstimationResult>,
        scores: Vec<Score>,
        values: Vec<f64>,
        overall_value: f64,
        rank: usize,
    ) -> Self {
        Self {
            estimation_result,
            scores,
            values,
            overall_value,
            rank,
        }
    }

    pub fn estimation_result(&self) -> &Arc<EstimationResult> {
        &self.estimation_result
    }

    pub fn rv_type(&self) -> RvType {
        self.estimation_result.rv_type()
    }

    pub fn estimator(&self) -> &str {
        self.estimation_result.estimator()
    }

    /// `estimator:Family`
    pub fn name(&self) -> String {
        self.estimation_result.label()
    }

    /// Scores in configured model order.
    pub fn scores(&self) -> &[Score] {
        &self.scores
    }

    pub fn score_for(&self, metric_name: &str) -> Option<&Score> {
        self.scores.iter().find(|s| s.metric().name() == metric_name)
    }

    /// Per-metric MODA values in [0, 1], aligned with `scores`.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn overall_value(&self) -> f64 {
        self.overall_value
    }

    /// 1-based; 1 is the best candidate.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Best first: higher overall value, then lower rank.
    pub fn cmp_by_preference(&self, other: &Self) -> Ordering {
        other
            .overall_value
            .total_cmp(&self.overall_value)
            .then(self.rank.cmp(&other.rank))
    }
}
