//! Quantile–quantile correlation and its adjusted-R² form.

use std::sync::Arc;

use crate::distribution::FittedDistribution;
use crate::domain::{Direction, Domain, Metric, MetricScoring, PenaltyReason, Score};
use crate::empirical::{order_statistics, pearson_correlation, EmpiricalProbabilityRule};

use super::{ScoringModel, ScoringModelKind};

/// Pearson correlation between the theoretical quantiles at the plotting
/// positions and the order statistics.
pub fn qq_correlation(
    sorted: &[f64],
    distribution: &dyn FittedDistribution,
    rule: EmpiricalProbabilityRule,
) -> f64 {
    let quantiles: Vec<f64> = rule
        .probabilities(sorted.len())
        .into_iter()
        .map(|p| distribution.inv_cdf(p))
        .collect();
    pearson_correlation(&quantiles, sorted)
}

/// `1 - (1 - r²)(n - 1)/(n - d)`. NaN when `n <= d`.
pub fn adjusted_r_squared(r: f64, n: usize, d: usize) -> f64 {
    if n <= d {
        return f64::NAN;
    }
    let (nf, df) = (n as f64, d as f64);
    1.0 - (1.0 - r * r) * (nf - 1.0) / (nf - df)
}

#[derive(Debug, Clone)]
pub struct QqCorrelationScoringModel {
    metric: Arc<Metric>,
    rule: EmpiricalProbabilityRule,
}

impl QqCorrelationScoringModel {
    pub fn new(rule: EmpiricalProbabilityRule) -> Self {
        let metric = Metric::new("QQ Correlation", Domain::unit(), Direction::BiggerIsBetter)
            .with_lower_limit_adjustment(true);
        Self {
            metric: Arc::new(metric),
            rule,
        }
    }

    pub fn rule(&self) -> EmpiricalProbabilityRule {
        self.rule
    }
}

impl ScoringModel for QqCorrelationScoringModel {
    fn kind(&self) -> ScoringModelKind {
        ScoringModelKind::QqCorrelation
    }

    fn metric(&self) -> &Arc<Metric> {
        &self.metric
    }

    fn score(&self, data: &[f64], distribution: &dyn FittedDistribution) -> Score {
        if data.is_empty() {
            return self.metric.penalty(PenaltyReason::EmptyData);
        }
        let sorted = order_statistics(data);
        let r = qq_correlation(&sorted, distribution, self.rule);
        // NaN (constant data, infinite quantiles) lands on 0 via the penalty.
        self.metric.score_value(r)
    }

    fn new_instance(&self) -> Box<dyn ScoringModel> {
        Box::new(self.clone())
    }
}

/// QQ correlation adjusted for the number of fitted parameters.
#[derive(Debug, Clone)]
pub struct AdjustedQqCorrelationScoringModel {
    metric: Arc<Metric>,
    rule: EmpiricalProbabilityRule,
}

impl AdjustedQqCorrelationScoringModel {
    pub fn new(rule: EmpiricalProbabilityRule) -> Self {
        let metric = Metric::new(
            "Adjusted QQ Correlation",
            Domain::unit(),
            Direction::BiggerIsBetter,
        );
        Self {
            metric: Arc::new(metric),
            rule,
        }
    }

    pub fn rule(&self) -> EmpiricalProbabilityRule {
        self.rule
    }
}

impl ScoringModel for AdjustedQqCorrelationScoringModel {
    fn kind(&self) -> ScoringModelKind {
        ScoringModelKind::AdjustedQqCorrelation
    }

    fn metric(&self) -> &Arc<Metric> {
        &self.metric
    }

    fn score(&self, data: &[f64], distribution: &dyn FittedDistribution) -> Score {
        if data.is_empty() {
            return self.metric.penalty(PenaltyReason::EmptyData);
        }
        let sorted = order_statistics(data);
        let r = qq_correlation(&sorted, distribution, self.rule);
        if r.is_nan() {
            return self.metric.penalty(PenaltyReason::NonFinite);
        }
        if r <= 0.0 {
            return self.metric.penalty(PenaltyReason::BadFit);
        }
        let d = distribution.parameters().len();
        if sorted.len() <= d {
            return self.metric.penalty(PenaltyReason::InsufficientData);
        }
        // Non-positive adjusted values clamp to 0.
        self.metric
            .score_value(adjusted_r_squared(r, sorted.len(), d))
    }

    fn new_instance(&self) -> Box<dyn ScoringModel> {
        Box::new(self.clone())
    }
}
