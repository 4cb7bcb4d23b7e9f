//! Likelihood-based information criteria (BIC, AIC).
//!
//! Both penalize the fitted log-likelihood by the parameter count and share
//! the configurable criterion bounds. A non-finite log-likelihood (data
//! outside the support, singular fits) scores as the upper limit.

use std::sync::Arc;

use crate::distribution::FittedDistribution;
use crate::domain::{Direction, Metric, MetricError, MetricScoring, PenaltyReason, Score};

use super::factory::CriterionBounds;
use super::{ScoringModel, ScoringModelKind};

/// `BIC = -2·ll + k·ln(n)`
pub fn bic(log_likelihood: f64, k: usize, n: usize) -> f64 {
    -2.0 * log_likelihood + (k as f64) * (n as f64).ln()
}

/// `AIC = -2·ll + 2k`
pub fn aic(log_likelihood: f64, k: usize) -> f64 {
    -2.0 * log_likelihood + 2.0 * k as f64
}

fn criterion_metric(name: &str, bounds: &CriterionBounds) -> Result<Arc<Metric>, MetricError> {
    let metric = Metric::new(name, bounds.domain()?, Direction::SmallerIsBetter)
        .with_lower_limit_adjustment(true)
        .with_upper_limit_adjustment(true);
    Ok(Arc::new(metric))
}

/// Shared evaluation: log-likelihood, then `criterion(ll, k, n)`.
fn score_criterion_with(
    metric: &Arc<Metric>,
    data: &[f64],
    distribution: &dyn FittedDistribution,
    criterion: impl Fn(f64, usize, usize) -> f64,
) -> Score {
    if data.is_empty() {
        return metric.penalty(PenaltyReason::EmptyData);
    }
    let ll = distribution.sum_log_likelihood(data);
    if !ll.is_finite() {
        return metric.penalty(PenaltyReason::NonFinite);
    }
    let k = distribution.parameters().len();
    metric.score_criterion(criterion(ll, k, data.len()))
}

#[derive(Debug, Clone)]
pub struct BicScoringModel {
    metric: Arc<Metric>,
}

impl BicScoringModel {
    pub fn new(bounds: &CriterionBounds) -> Result<Self, MetricError> {
        Ok(Self {
            metric: criterion_metric("BIC", bounds)?,
        })
    }
}

impl ScoringModel for BicScoringModel {
    fn kind(&self) -> ScoringModelKind {
        ScoringModelKind::Bic
    }

    fn metric(&self) -> &Arc<Metric> {
        &self.metric
    }

    fn score(&self, data: &[f64], distribution: &dyn FittedDistribution) -> Score {
        score_criterion_with(&self.metric, data, distribution, bic)
    }

    fn new_instance(&self) -> Box<dyn ScoringModel> {
        Box::new(self.clone())
    }
}

#[derive(Debug, Clone)]
pub struct AicScoringModel {
    metric: Arc<Metric>,
}

impl AicScoringModel {
    pub fn new(bounds: &CriterionBounds) -> Result<Self, MetricError> {
        Ok(Self {
            metric: criterion_metric("AIC", bounds)?,
        })
    }
}

impl ScoringModel for AicScoringModel {
    fn kind(&self) -> ScoringModelKind {
        ScoringModelKind::Aic
    }

    fn metric(&self) -> &Arc<Metric> {
        &self.metric
    }

    fn score(&self, data: &[f64], distribution: &dyn FittedDistribution) -> Score {
        score_criterion_with(&self.metric, data, distribution, |ll, k, _| aic(ll, k))
    }

    fn new_instance(&self) -> Box<dyn ScoringModel> {
        Box::new(self.clone())
    }
}
