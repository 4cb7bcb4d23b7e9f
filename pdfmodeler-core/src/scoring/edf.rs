//! Quadratic EDF statistics: Anderson–Darling and Cramér–von Mises.

use std::sync::Arc;

use crate::distribution::FittedDistribution;
use crate::domain::{Direction, Domain, Metric, MetricScoring, PenaltyReason, Score};
use crate::empirical::order_statistics;

use super::{ScoringModel, ScoringModelKind};

fn edf_metric(name: &str) -> Arc<Metric> {
    Arc::new(
        Metric::new(name, Domain::non_negative(), Direction::SmallerIsBetter)
            .with_upper_limit_adjustment(true),
    )
}

/// `A² = -n - (1/n) Σ (2i-1) [ln F(x_(i)) + ln(1 - F(x_(n+1-i)))]`
///
/// Infinite when a point sits where the fitted CDF is exactly 0 or 1.
pub fn anderson_darling(sorted: &[f64], distribution: &dyn FittedDistribution) -> f64 {
    let n = sorted.len();
    let cdf: Vec<f64> = sorted.iter().map(|&x| distribution.cdf(x)).collect();
    let mut sum = 0.0;
    for i in 0..n {
        let lower = cdf[i].ln();
        let upper = (-cdf[n - 1 - i]).ln_1p();
        sum += (2 * i + 1) as f64 * (lower + upper);
    }
    -(n as f64) - sum / n as f64
}

/// `W² = 1/(12n) + Σ (F(x_(i)) - (2i-1)/(2n))²`
pub fn cramer_von_mises(sorted: &[f64], distribution: &dyn FittedDistribution) -> f64 {
    let n = sorted.len() as f64;
    let sum: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let expected = (2 * i + 1) as f64 / (2.0 * n);
            (distribution.cdf(x) - expected).powi(2)
        })
        .sum();
    1.0 / (12.0 * n) + sum
}

#[derive(Debug, Clone)]
pub struct AndersonDarlingScoringModel {
    metric: Arc<Metric>,
}

impl AndersonDarlingScoringModel {
    pub fn new() -> Self {
        Self {
            metric: edf_metric("Anderson-Darling"),
        }
    }
}

impl Default for AndersonDarlingScoringModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringModel for AndersonDarlingScoringModel {
    fn kind(&self) -> ScoringModelKind {
        ScoringModelKind::AndersonDarling
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
            .score_value(anderson_darling(&sorted, distribution))
    }

    fn new_instance(&self) -> Box<dyn ScoringModel> {
        Box::new(self.clone())
    }
}

#[derive(Debug, Clone)]
pub struct CramerVonMisesScoringModel {
    metric: Arc<Metric>,
}

impl CramerVonMisesScoringModel {
    pub fn new() -> Self {
        Self {
            metric: edf_metric("Cramer-von Mises"),
        }
    }
}

impl Default for CramerVonMisesScoringModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringModel for CramerVonMisesScoringModel {
    fn kind(&self) -> ScoringModelKind {
        ScoringModelKind::CramerVonMises
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
            .score_value(cramer_von_mises(&sorted, distribution))
    }

    fn new_instance(&self) -> Box<dyn ScoringModel> {
        Box::new(self.clone())
    }
}
