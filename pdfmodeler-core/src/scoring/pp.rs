//! Probability–probability plot criteria.

use std::sync::Arc;

use crate::distribution::FittedDistribution;
use crate::domain::{Direction, Domain, Metric, MetricScoring, PenaltyReason, Score};
use crate::empirical::{order_statistics, pearson_correlation, EmpiricalProbabilityRule};

use super::{ScoringModel, ScoringModelKind};

/// Fitted CDF at each order statistic. `None` if any value is not finite.
fn fitted_probabilities(sorted: &[f64], distribution: &dyn FittedDistribution) -> Option<Vec<f64>> {
    sorted
        .iter()
        .map(|&x| {
            let f = distribution.cdf(x);
            f.is_finite().then_some(f)
        })
        .collect()
}

/// `Σ (F(x_(i)) - p_i)²`
pub fn pp_sse(
    sorted: &[f64],
    distribution: &dyn FittedDistribution,
    rule: EmpiricalProbabilityRule,
) -> f64 {
    let Some(fitted) = fitted_probabilities(sorted, distribution) else {
        return f64::NAN;
    };
    fitted
        .iter()
        .zip(rule.probabilities(sorted.len()))
        .map(|(f, p)| (f - p).powi(2))
        .sum()
}

pub fn pp_correlation(
    sorted: &[f64],
    distribution: &dyn FittedDistribution,
    rule: EmpiricalProbabilityRule,
) -> f64 {
    let Some(fitted) = fitted_probabilities(sorted, distribution) else {
        return f64::NAN;
    };
    pearson_correlation(&fitted, &rule.probabilities(sorted.len()))
}

#[derive(Debug, Clone)]
pub struct PpSseScoringModel {
    metric: Arc<Metric>,
    rule: EmpiricalProbabilityRule,
}

impl PpSseScoringModel {
    pub fn new(rule: EmpiricalProbabilityRule) -> Self {
        let metric = Metric::new(
            "PP Squared Error",
            Domain::non_negative(),
            Direction::SmallerIsBetter,
        )
        .with_upper_limit_adjustment(true);
        Self {
            metric: Arc::new(metric),
            rule,
        }
    }
}

impl ScoringModel for PpSseScoringModel {
    fn kind(&self) -> ScoringModelKind {
        ScoringModelKind::PpSse
    }

    fn metric(&self) -> &Arc<Metric> {
        &self.metric
    }

    fn score(&self, data: &[f64], distribution: &dyn FittedDistribution) -> Score {
        if data.is_empty() {
            return self.metric.penalty(PenaltyReason::EmptyData);
        }
        let sorted = order_statistics(data);
        self.metric
            .score_value(pp_sse(&sorted, distribution, self.rule))
    }

    fn new_instance(&self) -> Box<dyn ScoringModel> {
        Box::new(self.clone())
    }
}

#[derive(Debug, Clone)]
pub struct PpCorrelationScoringModel {
    metric: Arc<Metric>,
    rule: EmpiricalProbabilityRule,
}

impl PpCorrelationScoringModel {
    pub fn new(rule: EmpiricalProbabilityRule) -> Self {
        let metric = Metric::new("PP Correlation", Domain::unit(), Direction::BiggerIsBetter)
            .with_lower_limit_adjustment(true);
        Self {
            metric: Arc::new(metric),
            rule,
        }
    }
}

impl ScoringModel for PpCorrelationScoringModel {
    fn kind(&self) -> ScoringModelKind {
        ScoringModelKind::PpCorrelation
    }

    fn metric(&self) -> &Arc<Metric> {
        &self.metric
    }

    fn score(&self, data: &[f64], distribution: &dyn FittedDistribution) -> Score {
        if data.is_empty() {
            return self.metric.penalty(PenaltyReason::EmptyData);
        }
        let sorted = order_statistics(data);
        self.metric
            .score_value(pp_correlation(&sorted, distribution, self.rule))
    }

    fn new_instance(&self) -> Box<dyn ScoringModel> {
        Box::new(self.clone())
    }
}
