//! Goodness-of-fit scoring models.
//!
//! Each model owns one `Metric` and turns (data, fitted distribution) into a
//! `Score`. Models are total: empty data, non-finite intermediates and
//! degenerate parameter counts all come back as the metric's penalty score,
//! never as an error, so a batch of candidates can always be ranked.
//!
//! `score_estimation` is the one place that resolves an `EstimationResult`
//! into a distribution and picks the data to score against.

pub mod edf;
pub mod factory;
pub mod information;
pub mod ks;
pub mod pp;
pub mod qq;

use std::fmt;
use std::sync::Arc;

use crate::distribution::FittedDistribution;
use crate::domain::{Metric, MetricScoring, PenaltyReason, Score};
use crate::estimation::EstimationResult;

pub use edf::{AndersonDarlingScoringModel, CramerVonMisesScoringModel};
pub use factory::{
    create_scoring_model, create_suite, CriterionBounds, ScoringModelKind, ScoringSettings,
    DEFAULT_LOWER_LIMIT, DEFAULT_UPPER_LIMIT,
};
pub use information::{AicScoringModel, BicScoringModel};
pub use ks::KsScoringModel;
pub use pp::{PpCorrelationScoringModel, PpSseScoringModel};
pub use qq::{AdjustedQqCorrelationScoringModel, QqCorrelationScoringModel};

/// A goodness-of-fit criterion.
///
/// Implementations hold no per-evaluation state; `new_instance` hands out an
/// independent copy for use on another thread or candidate.
pub trait ScoringModel: Send + Sync + fmt::Debug {
    fn kind(&self) -> ScoringModelKind;

    fn metric(&self) -> &Arc<Metric>;

    /// Score `data` against `distribution`. Never fails.
    fn score(&self, data: &[f64], distribution: &dyn FittedDistribution) -> Score;

    fn new_instance(&self) -> Box<dyn ScoringModel>;

    fn name(&self) -> &str {
        self.metric().name()
    }
}

/// Score an estimation result with `model`.
///
/// Missing parameters, or parameters that do not yield a distribution, give
/// the metric's penalty score without running the model. Otherwise the model
/// sees the shifted data when present, else the original data.
pub fn score_estimation(model: &dyn ScoringModel, result: &EstimationResult) -> Score {
    let Some(parameters) = result.parameters() else {
        return model.metric().penalty(PenaltyReason::MissingParameters);
    };
    let distribution = match parameters.create_distribution() {
        Ok(d) => d,
        Err(e) => {
            return model
                .metric()
                .penalty(PenaltyReason::DistributionUnavailable(e.to_string()))
        }
    };
    model.score(result.scoring_data(), &distribution)
}
