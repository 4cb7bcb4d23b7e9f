//! Additive MODA (multi-objective decision analysis): weighted aggregation
//! of heterogeneous scores into one overall value per alternative.
//!
//! For each metric the observed scores are mapped onto a common preference
//! scale by a linear value function over the metric's domain (0.0 = worst
//! bound, 1.0 = best bound), whatever the metric's native direction. The
//! overall value is the weighted sum of those per-metric values, with
//! weights normalized to sum to 1.
//!
//! Domain auto-adjustment: a metric that allows it has its adjustable
//! bounds narrowed to the range actually observed across the alternatives.
//! Only computed or clamped scores define the
//! observed range; penalty scores sit on the unfavourable bound and value
//! at 0. Invalid scores are ignored for ranges and also value at 0.
//!
//! Ranking: overall value descending. Equal overall values are ordered by
//! the number of penalty or invalid scores, fewest first, then by insertion
//! order. The worst computed fit values at 0 on every adjusted metric, the
//! same as a failed fit, and still ranks above it.
//!
//! The model is rebuilt wholesale by `define_alternatives`; there is no
//! incremental update.

use std::sync::Arc;

use thiserror::Error;

use pdfmodeler_core::{Domain, Metric, Score};

/// Errors from building a MODA model or defining its alternatives.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModaError {
    #[error("no metrics given")]
    NoMetrics,
    #[error("metric '{0}' appears more than once")]
    DuplicateMetric(String),
    #[error("{found} weights given for {expected} metrics")]
    WeightCount { expected: usize, found: usize },
    #[error("weight for '{metric}' must be finite and non-negative, got {weight}")]
    InvalidWeight { metric: String, weight: f64 },
    #[error("weights sum to zero")]
    ZeroWeights,
    #[error("alternative '{alternative}' has no score for metric '{metric}'")]
    MissingScore { alternative: String, metric: String },
}

/// One candidate: a label and its raw scores, in any order.
#[derive(Debug, Clone)]
pub struct Alternative {
    name: String,
    scores: Vec<Score>,
}

impl Alternative {
    pub fn new(name: impl Into<String>, scores: Vec<Score>) -> Self {
        Self {
            name: name.into(),
            scores,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scores(&self) -> &[Score] {
        &self.scores
    }

    /// The score recorded for `metric`, matched by name.
    pub fn score_for(&self, metric: &Metric) -> Option<&Score> {
        self.scores.iter().find(|s| s.metric().name() == metric.name())
    }
}

/// Additive value model over a fixed metric list.
#[derive(Debug, Clone)]
pub struct AdditiveModaModel {
    metrics: Vec<Arc<Metric>>,
    weights: Vec<f64>,
    alternatives: Vec<Alternative>,
    /// `[alternative][metric]`, aligned with `metrics`.
    scores: Vec<Vec<Score>>,
    domains: Vec<Domain>,
    /// `[alternative][metric]`, each in [0, 1].
    values: Vec<Vec<f64>>,
    overall: Vec<f64>,
    /// Alternative indices, best first.
    ranking: Vec<usize>,
}

impl AdditiveModaModel {
    /// A model with equal weights.
    pub fn new(metrics: Vec<Arc<Metric>>) -> Result<Self, ModaError> {
        let weights = vec![1.0; metrics.len()];
        Self::with_weights(metrics, weights)
    }

    /// A model with per-metric weights aligned with `metrics`. Weights are
    /// normalized to sum to 1.
    pub fn with_weights(metrics: Vec<Arc<Metric>>, weights: Vec<f64>) -> Result<Self, ModaError> {
        if metrics.is_empty() {
            return Err(ModaError::NoMetrics);
        }
        if weights.len() != metrics.len() {
            return Err(ModaError::WeightCount {
                expected: metrics.len(),
                found: weights.len(),
            });
        }
        for (i, metric) in metrics.iter().enumerate() {
            if metrics[..i].iter().any(|m| m.name() == metric.name()) {
                return Err(ModaError::DuplicateMetric(metric.name().to_string()));
            }
        }
        for (metric, &weight) in metrics.iter().zip(&weights) {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ModaError::InvalidWeight {
                    metric: metric.name().to_string(),
                    weight,
                });
            }
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(ModaError::ZeroWeights);
        }

        let domains = metrics.iter().map(|m| m.domain()).collect();
        Ok(Self {
            weights: weights.iter().map(|w| w / total).collect(),
            metrics,
            alternatives: Vec::new(),
            scores: Vec::new(),
            domains,
            values: Vec::new(),
            overall: Vec::new(),
            ranking: Vec::new(),
        })
    }

    /// Replace the alternative set and recompute normalization, values and
    /// ranking. On error the model is left unchanged.
    pub fn define_alternatives(&mut self, alternatives: Vec<Alternative>) -> Result<(), ModaError> {
        let scores = self.align_scores(&alternatives)?;

        let domains: Vec<Domain> = self
            .metrics
            .iter()
            .enumerate()
            .map(|(j, metric)| {
                let column: Vec<&Score> = scores.iter().map(|row| &row[j]).collect();
                adjusted_domain(metric, &column)
            })
            .collect();

        let values: Vec<Vec<f64>> = scores
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&self.metrics)
                    .zip(&domains)
                    .map(|((score, metric), &domain)| value_of(metric, domain, score))
                    .collect()
            })
            .collect();

        let overall: Vec<f64> = values
            .iter()
            .map(|row| row.iter().zip(&self.weights).map(|(v, w)| v * w).sum())
            .collect();

        let degraded: Vec<usize> = scores
            .iter()
            .map(|row| row.iter().filter(|s| is_degraded(s)).count())
            .collect();

        let mut ranking: Vec<usize> = (0..overall.len()).collect();
        // Stable: remaining ties keep insertion order.
        ranking.sort_by(|&a, &b| {
            overall[b]
                .total_cmp(&overall[a])
                .then(degraded[a].cmp(&degraded[b]))
        });

        self.alternatives = alternatives;
        self.scores = scores;
        self.domains = domains;
        self.values = values;
        self.overall = overall;
        self.ranking = ranking;
        Ok(())
    }

    fn align_scores(&self, alternatives: &[Alternative]) -> Result<Vec<Vec<Score>>, ModaError> {
        alternatives
            .iter()
            .map(|alt| {
                self.metrics
                    .iter()
                    .map(|metric| {
                        alt.score_for(metric)
                            .cloned()
                            .ok_or_else(|| ModaError::MissingScore {
                                alternative: alt.name().to_string(),
                                metric: metric.name().to_string(),
                            })
                    })
                    .collect()
            })
            .collect()
    }

    pub fn metrics(&self) -> &[Arc<Metric>] {
        &self.metrics
    }

    pub fn metric_names(&self) -> Vec<&str> {
        self.metrics.iter().map(|m| m.name()).collect()
    }

    /// Normalized weights, aligned with `metrics`.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    pub fn alternative_count(&self) -> usize {
        self.alternatives.len()
    }

    /// Raw scores, `[alternative][metric]`.
    pub fn scores_table(&self) -> &[Vec<Score>] {
        &self.scores
    }

    /// Per-metric values in [0, 1], `[alternative][metric]`.
    pub fn values_table(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub fn overall_values(&self) -> &[f64] {
        &self.overall
    }

    pub fn overall_value(&self, alternative: usize) -> Option<f64> {
        self.overall.get(alternative).copied()
    }

    /// Domains actually used for normalization, aligned with `metrics`.
    pub fn adjusted_domains(&self) -> &[Domain] {
        &self.domains
    }

    /// Alternative indices ordered best first.
    pub fn ranking(&self) -> &[usize] {
        &self.ranking
    }

    /// 1-based overall rank of an alternative.
    pub fn rank_of(&self, alternative: usize) -> Option<usize> {
        self.ranking
            .iter()
            .position(|&i| i == alternative)
            .map(|pos| pos + 1)
    }

    /// Per-metric 1-based ordinal ranks, `[alternative][metric]`. Ties keep
    /// insertion order.
    pub fn metric_ranks(&self) -> Vec<Vec<usize>> {
        let n = self.alternatives.len();
        let mut ranks = vec![vec![0; self.metrics.len()]; n];
        for j in 0..self.metrics.len() {
            let mut order: Vec<usize> = (0..n).collect();
            order.sort_by(|&a, &b| self.values[b][j].total_cmp(&self.values[a][j]));
            for (pos, &i) in order.iter().enumerate() {
                ranks[i][j] = pos + 1;
            }
        }
        ranks
    }
}

/// Narrow the adjustable bounds of `metric` to the observed range.
fn adjusted_domain(metric: &Metric, column: &[&Score]) -> Domain {
    let domain = metric.domain();
    if !metric.allow_lower_limit_adjustment() && !metric.allow_upper_limit_adjustment() {
        return domain;
    }
    let (min, max) = column
        .iter()
        .filter(|s| !is_degraded(s))
        .map(|s| s.value())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        // Nothing observed.
        return domain;
    }
    let lower = if metric.allow_lower_limit_adjustment() {
        min
    } else {
        domain.lower()
    };
    let upper = if metric.allow_upper_limit_adjustment() {
        max
    } else {
        domain.upper()
    };
    match Domain::new(lower, upper) {
        Ok(adjusted) => {
            tracing::debug!(
                metric = %metric.name(),
                lower,
                upper,
                "metric domain adjusted to observed range"
            );
            adjusted
        }
        Err(_) => {
            tracing::trace!(
                metric = %metric.name(),
                lower,
                upper,
                "observed range collapsed, keeping configured domain"
            );
            domain
        }
    }
}

/// Penalty or untrusted score.
fn is_degraded(score: &Score) -> bool {
    !score.is_valid() || score.is_penalty()
}

fn value_of(metric: &Metric, domain: Domain, score: &Score) -> f64 {
    if !score.is_valid() {
        return 0.0;
    }
    metric.value_on(domain, score.value())
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pdfmodeler_core::{Direction, MetricScoring};

    fn ks() -> Arc<Metric> {
        Arc::new(
            Metric::new("KS", Domain::unit(), Direction::SmallerIsBetter)
                .with_upper_limit_adjustment(true),
        )
    }

    fn qq() -> Arc<Metric> {
        Arc::new(
            Metric::new("QQ", Domain::unit(), Direction::BiggerIsBetter)
                .with_lower_limit_adjustment(true),
        )
    }

    fn fixed() -> Arc<Metric> {
        Arc::new(Metric::new("Fixed", Domain::unit(), Direction::BiggerIsBetter))
    }

    fn alt(name: &str, scores: &[(&Arc<Metric>, f64)]) -> Alternative {
        Alternative::new(
            name,
            scores
                .iter()
                .map(|(m, v)| (*m).score_value(*v))
                .collect(),
        )
    }

    #[test]
    fn weights_are_normalized() {
        let model = AdditiveModaModel::with_weights(vec![ks(), qq()], vec![3.0, 1.0]).unwrap();
        assert_eq!(model.weights(), &[0.75, 0.25]);
        let equal = AdditiveModaModel::new(vec![ks(), qq(), fixed()]).unwrap();
        let sum: f64 = equal.weights().iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn invalid_weights_are_rejected() {
        assert_eq!(
            AdditiveModaModel::with_weights(vec![ks()], vec![1.0, 2.0]).unwrap_err(),
            ModaError::WeightCount {
                expected: 1,
                found: 2
            }
        );
        assert!(matches!(
            AdditiveModaModel::with_weights(vec![ks()], vec![-1.0]).unwrap_err(),
            ModaError::InvalidWeight { .. }
        ));
        assert_eq!(
            AdditiveModaModel::with_weights(vec![ks(), qq()], vec![0.0, 0.0]).unwrap_err(),
            ModaError::ZeroWeights
        );
        assert_eq!(
            AdditiveModaModel::new(vec![]).unwrap_err(),
            ModaError::NoMetrics
        );
        assert!(matches!(
            AdditiveModaModel::new(vec![ks(), ks()]).unwrap_err(),
            ModaError::DuplicateMetric(_)
        ));
    }

    #[test]
    fn direction_is_respected() {
        let (k, q) = (ks(), qq());
        let mut model = AdditiveModaModel::new(vec![k.clone(), q.clone()]).unwrap();
        model
            .define_alternatives(vec![
                alt("worse", &[(&k, 0.3), (&q, 0.80)]),
                alt("better", &[(&k, 0.1), (&q, 0.95)]),
            ])
            .unwrap();
        assert_eq!(model.ranking(), &[1, 0]);
        assert_eq!(model.rank_of(1), Some(1));
        assert_eq!(model.rank_of(0), Some(2));
        assert_eq!(model.rank_of(7), None);
    }

    #[test]
    fn adjustment_narrows_to_observed_range() {
        let (k, q, f) = (ks(), qq(), fixed());
        let mut model = AdditiveModaModel::new(vec![k.clone(), q.clone(), f.clone()]).unwrap();
        model
            .define_alternatives(vec![
                alt("a", &[(&k, 0.05), (&q, 0.90), (&f, 0.5)]),
                alt("b", &[(&k, 0.20), (&q, 0.99), (&f, 0.5)]),
            ])
            .unwrap();
        let domains = model.adjusted_domains();
        // KS: lower fixed, upper to observed max.
        assert_eq!((domains[0].lower(), domains[0].upper()), (0.0, 0.20));
        // QQ: lower to observed min, upper fixed.
        assert_eq!((domains[1].lower(), domains[1].upper()), (0.90, 1.0));
        // No adjustment allowed.
        assert_eq!((domains[2].lower(), domains[2].upper()), (0.0, 1.0));

        let values = model.values_table();
        assert!((values[0][0] - 0.75).abs() < 1e-12);
        assert!(values[1][0].abs() < 1e-12);
        assert!(values[0][1].abs() < 1e-12);
        assert!((values[1][1] - 0.9).abs() < 1e-12);
        assert_eq!(values[0][2], 0.5);
    }

    #[test]
    fn penalties_do_not_stretch_observed_range() {
        let sse = Arc::new(
            Metric::new("SSE", Domain::non_negative(), Direction::SmallerIsBetter)
                .with_upper_limit_adjustment(true),
        );
        let mut model = AdditiveModaModel::new(vec![sse.clone()]).unwrap();
        model
            .define_alternatives(vec![
                alt("good", &[(&sse, 0.01)]),
                alt("fair", &[(&sse, 0.04)]),
                Alternative::new("failed", vec![sse.bad_score()]),
            ])
            .unwrap();
        assert_eq!(model.adjusted_domains()[0].upper(), 0.04);
        let values = model.values_table();
        assert!((values[0][0] - 0.75).abs() < 1e-12);
        assert_eq!(values[2][0], 0.0);
        assert_eq!(model.ranking(), &[0, 1, 2]);
    }

    #[test]
    fn collapsed_range_keeps_configured_domain() {
        let (k, q) = (ks(), qq());
        let mut model = AdditiveModaModel::new(vec![k.clone(), q.clone()]).unwrap();
        model
            .define_alternatives(vec![
                alt("a", &[(&k, 0.0), (&q, 1.0)]),
                alt("b", &[(&k, 0.0), (&q, 1.0)]),
            ])
            .unwrap();
        assert_eq!(model.adjusted_domains()[0].upper(), 1.0);
        assert_eq!(model.adjusted_domains()[1].lower(), 0.0);
        assert_eq!(model.overall_values(), &[1.0, 1.0]);
    }

    #[test]
    fn invalid_scores_value_at_zero_and_are_ignored_for_ranges() {
        let k = ks();
        let mut model = AdditiveModaModel::new(vec![k.clone()]).unwrap();
        let trusted = Score::new(k.clone(), 0.3);
        model
            .define_alternatives(vec![
                Alternative::new("untrusted", vec![Score::invalid(k.clone())]),
                Alternative::new("trusted", vec![trusted]),
                alt("best", &[(&k, 0.1)]),
            ])
            .unwrap();
        assert_eq!(model.adjusted_domains()[0].upper(), 0.3);
        assert_eq!(model.values_table()[0][0], 0.0);
        assert_eq!(model.ranking()[0], 2);
    }

    #[test]
    fn failed_alternative_ranks_below_worst_computed_fit() {
        let k = ks();
        let sse = Arc::new(
            Metric::new("SSE", Domain::non_negative(), Direction::SmallerIsBetter)
                .with_upper_limit_adjustment(true),
        );
        let mut model = AdditiveModaModel::new(vec![k.clone(), sse.clone()]).unwrap();
        model
            .define_alternatives(vec![
                Alternative::new("failed", vec![k.bad_score(), sse.bad_score()]),
                alt("good", &[(&k, 0.05), (&sse, 0.01)]),
                alt("poor", &[(&k, 0.30), (&sse, 0.40)]),
            ])
            .unwrap();

        // Both sit at the bottom of every adjusted domain.
        assert_eq!(model.overall_value(0), Some(0.0));
        assert_eq!(model.overall_value(2), Some(0.0));
        assert_eq!(model.ranking(), &[1, 2, 0]);
        assert_eq!(model.rank_of(0), Some(3));
    }

    #[test]
    fn fewer_penalties_win_a_tie() {
        let k = ks();
        let sse = Arc::new(
            Metric::new("SSE", Domain::non_negative(), Direction::SmallerIsBetter)
                .with_upper_limit_adjustment(true),
        );
        let mut model = AdditiveModaModel::new(vec![k.clone(), sse.clone()]).unwrap();
        model
            .define_alternatives(vec![
                Alternative::new("half_failed", vec![k.score_value(0.30), sse.bad_score()]),
                alt("good", &[(&k, 0.05), (&sse, 0.01)]),
                alt("poor", &[(&k, 0.30), (&sse, 0.40)]),
            ])
            .unwrap();
        assert_eq!(model.overall_value(0), model.overall_value(2));
        assert_eq!(model.ranking(), &[1, 2, 0]);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let k = ks();
        let mut model = AdditiveModaModel::new(vec![k.clone()]).unwrap();
        model
            .define_alternatives(vec![
                alt("first", &[(&k, 0.2)]),
                alt("second", &[(&k, 0.2)]),
                alt("best", &[(&k, 0.1)]),
            ])
            .unwrap();
        assert_eq!(model.ranking(), &[2, 0, 1]);
    }

    #[test]
    fn missing_score_leaves_model_unchanged() {
        let (k, q) = (ks(), qq());
        let mut model = AdditiveModaModel::new(vec![k.clone(), q.clone()]).unwrap();
        model
            .define_alternatives(vec![alt("a", &[(&k, 0.1), (&q, 0.9)])])
            .unwrap();
        let err = model
            .define_alternatives(vec![alt("b", &[(&k, 0.1)])])
            .unwrap_err();
        assert_eq!(
            err,
            ModaError::MissingScore {
                alternative: "b".into(),
                metric: "QQ".into()
            }
        );
        assert_eq!(model.alternative_count(), 1);
        assert_eq!(model.alternatives()[0].name(), "a");
    }

    #[test]
    fn metric_ranks_are_per_column() {
        let (k, q) = (ks(), qq());
        let mut model = AdditiveModaModel::new(vec![k.clone(), q.clone()]).unwrap();
        model
            .define_alternatives(vec![
                alt("a", &[(&k, 0.05), (&q, 0.90)]),
                alt("b", &[(&k, 0.10), (&q, 0.99)]),
                alt("c", &[(&k, 0.20), (&q, 0.95)]),
            ])
            .unwrap();
        assert_eq!(
            model.metric_ranks(),
            vec![vec![1, 3], vec![2, 1], vec![3, 2]]
        );
    }

    #[test]
    fn redefining_recomputes_normalization() {
        let k = ks();
        let mut model = AdditiveModaModel::new(vec![k.clone()]).unwrap();
        model
            .define_alternatives(vec![alt("a", &[(&k, 0.1)]), alt("b", &[(&k, 0.2)])])
            .unwrap();
        assert_eq!(model.adjusted_domains()[0].upper(), 0.2);
        model
            .define_alternatives(vec![alt("a", &[(&k, 0.1)]), alt("c", &[(&k, 0.4)])])
            .unwrap();
        assert_eq!(model.adjusted_domains()[0].upper(), 0.4);
        assert!((model.values_table()[0][0] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn scores_matched_by_metric_name_in_any_order() {
        let (k, q) = (ks(), qq());
        let mut model = AdditiveModaModel::new(vec![k.clone(), q.clone()]).unwrap();
        model
            .define_alternatives(vec![alt("a", &[(&q, 0.9), (&k, 0.1)])])
            .unwrap();
        let row = &model.scores_table()[0];
        assert_eq!(row[0].metric().name(), "KS");
        assert_eq!(row[1].metric().name(), "QQ");
    }
}
