//! Kolmogorov–Smirnov distance between the empirical step CDF and the fitted CDF.

use std::sync::Arc;

use crate::distribution::FittedDistribution;
use crate::domain::{Direction, Domain, Metric, MetricScoring, PenaltyReason, Score};
use crate::empirical::order_statistics;

use super::{ScoringModel, ScoringModelKind};

#[derive(Debug, Clone)]
pub struct KsScoringModel {
    metric: Arc<Metric>,
}

impl KsScoringModel {
    pub fn new() -> Self {
        let metric = Metric::new("KS", Domain::unit(), Direction::SmallerIsBetter)
            .with_upper_limit_adjustment(true);
        Self {
            metric: Arc::new(metric),
        }
    }
}

impl Default for KsScoringModel {
    fn default() -> Self {
        Self::new()
    }
}

/// `D = max_i max(i/n - F(x_(i)), F(x_(i)) - (i-1)/n)` over the order
/// statistics. NaN if any CDF value is not finite.
pub fn ks_statistic(sorted: &[f64], distribution: &dyn FittedDistribution) -> f64 {
    let n = sorted.len() as f64;
    let mut d: f64 = 0.0;
    for (i, &x) in sorted.iter().enumerate() {
        let f = distribution.cdf(x);
        if !f.is_finite() {
            return f64::NAN;
        }
        let d_plus = (i + 1) as f64 / n - f;
        let d_minus = f - i as f64 / n;
        d = d.max(d_plus).max(d_minus);
    }
    d
}

impl ScoringModel for KsScoringModel {
    fn kind(&self) -> ScoringModelKind {
        ScoringModelKind::Ks
    }

    fn metric(&self) -> &Arc<Metric> {
        &self.metric
    }

    fn score(&self, data: &[f64], distribution: &dyn FittedDistribution) -> Score {
        if data.is_empty() {
            return self.metric.penalty(PenaltyReason::EmptyData);
        }
        let sorted = order_statistics(data);
        self.metric.score_value(ks_statistic(&sorted, distribution))
    }

    fn new_instance(&self) -> Box<dyn ScoringModel> {
        Box::new(self.clone())
    }
}
