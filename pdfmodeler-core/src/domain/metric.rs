//! Metric: one scoring criterion with a bounded domain and a preference direction.
//!
//! A metric's domain is the valid range of every score built against it.
//! Values outside the domain are clamped to the nearest bound (or penalized,
//! for information criteria).

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use super::score::{PenaltyReason, Score, ScoreOutcome};

/// Errors raised while constructing a metric domain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricError {
    #[error("domain bounds must be finite, got [{lower}, {upper}]")]
    NonFiniteBound { lower: f64, upper: f64 },
    #[error("domain lower bound {lower} must be strictly less than upper bound {upper}")]
    EmptyDomain { lower: f64, upper: f64 },
}

/// Closed interval `[lower, upper]` with `lower < upper`.
///
/// `f64::MAX` counts as finite and is used for metrics without a natural
/// upper limit (sums of squares, test statistics).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Domain {
    lower: f64,
    upper: f64,
}

impl Domain {
    pub fn new(lower: f64, upper: f64) -> Result<Self, MetricError> {
        if !(lower.is_finite() && upper.is_finite()) {
            return Err(MetricError::NonFiniteBound { lower, upper });
        }
        if lower >= upper {
            return Err(MetricError::EmptyDomain { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// `[0, 1]`, the domain of correlations and probabilities.
    pub const fn unit() -> Self {
        Self {
            lower: 0.0,
            upper: 1.0,
        }
    }

    /// `[0, f64::MAX]`, for non-negative statistics without a natural ceiling.
    pub const fn non_negative() -> Self {
        Self {
            lower: 0.0,
            upper: f64::MAX,
        }
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.lower && x <= self.upper
    }

    /// Nearest point of the domain. NaN is passed through unchanged.
    pub fn clamp(&self, x: f64) -> f64 {
        if x < self.lower {
            self.lower
        } else if x > self.upper {
            self.upper
        } else {
            x
        }
    }
}

/// Preference direction of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    BiggerIsBetter,
    SmallerIsBetter,
}

impl Direction {
    /// Returns true if `a` is strictly preferred over `b`.
    pub fn is_better(&self, a: f64, b: f64) -> bool {
        match self {
            Self::BiggerIsBetter => a > b,
            Self::SmallerIsBetter => a < b,
        }
    }
}

/// A scoring criterion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    name: String,
    domain: Domain,
    direction: Direction,
    allow_lower_limit_adjustment: bool,
    allow_upper_limit_adjustment: bool,
}

impl Metric {
    /// New metric with both domain bounds fixed.
    pub fn new(name: impl Into<String>, domain: Domain, direction: Direction) -> Self {
        Self {
            name: name.into(),
            domain,
            direction,
            allow_lower_limit_adjustment: false,
            allow_upper_limit_adjustment: false,
        }
    }

    pub fn with_lower_limit_adjustment(mut self, allow: bool) -> Self {
        self.allow_lower_limit_adjustment = allow;
        self
    }

    pub fn with_upper_limit_adjustment(mut self, allow: bool) -> Self {
        self.allow_upper_limit_adjustment = allow;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn allow_lower_limit_adjustment(&self) -> bool {
        self.allow_lower_limit_adjustment
    }

    pub fn allow_upper_limit_adjustment(&self) -> bool {
        self.allow_upper_limit_adjustment
    }

    /// The domain bound on the unfavourable side.
    pub fn bad_value(&self) -> f64 {
        match self.direction {
            Direction::BiggerIsBetter => self.domain.lower,
            Direction::SmallerIsBetter => self.domain.upper,
        }
    }

    /// The domain bound on the favourable side.
    pub fn best_value(&self) -> f64 {
        match self.direction {
            Direction::BiggerIsBetter => self.domain.upper,
            Direction::SmallerIsBetter => self.domain.lower,
        }
    }

    /// Linear value of `x` on `domain`: 0 at the worst bound, 1 at the best.
    pub fn value_on(&self, domain: Domain, x: f64) -> f64 {
        if x.is_nan() {
            return 0.0;
        }
        let v = match self.direction {
            Direction::BiggerIsBetter => (x - domain.lower) / domain.width(),
            Direction::SmallerIsBetter => (domain.upper - x) / domain.width(),
        };
        v.clamp(0.0, 1.0)
    }
}

/// Score constructors. These live on `Arc<Metric>` because scores share
/// their metric instead of owning a copy.
pub trait MetricScoring {
    /// The worst-possible score for this metric, flagged valid.
    fn bad_score(&self) -> Score;

    /// Penalty score carrying the reason for the degradation.
    fn penalty(&self, reason: PenaltyReason) -> Score;

    /// Score a computed statistic: non-finite values are penalized and
    /// out-of-domain values clamped to the nearest bound.
    fn score_value(&self, value: f64) -> Score;

    /// Score an information criterion: non-finite values and values beyond
    /// the favourable bound are penalized; values beyond the unfavourable
    /// bound are clamped to it.
    fn score_criterion(&self, value: f64) -> Score;
}

impl MetricScoring for Arc<Metric> {
    fn bad_score(&self) -> Score {
        Score::from_parts(
            Arc::clone(self),
            self.bad_value(),
            true,
            ScoreOutcome::Penalty(PenaltyReason::BadFit),
        )
    }

    fn penalty(&self, reason: PenaltyReason) -> Score {
        tracing::debug!(metric = %self.name, reason = %reason, "penalty score");
        Score::from_parts(
            Arc::clone(self),
            self.bad_value(),
            true,
            ScoreOutcome::Penalty(reason),
        )
    }

    fn score_value(&self, value: f64) -> Score {
        if !value.is_finite() {
            return self.penalty(PenaltyReason::NonFinite);
        }
        if self.domain.contains(value) {
            return Score::from_parts(Arc::clone(self), value, true, ScoreOutcome::Computed);
        }
        let clamped = self.domain.clamp(value);
        tracing::debug!(metric = %self.name, value, clamped, "score outside domain, clamped");
        Score::from_parts(
            Arc::clone(self),
            clamped,
            true,
            ScoreOutcome::Clamped { raw: value },
        )
    }

    fn score_criterion(&self, value: f64) -> Score {
        if !value.is_finite() {
            return self.penalty(PenaltyReason::NonFinite);
        }
        if self.domain.contains(value) {
            return Score::from_parts(Arc::clone(self), value, true, ScoreOutcome::Computed);
        }
        if self.direction.is_better(value, self.best_value()) {
            // Beyond the favourable limit only happens for degenerate fits.
            return self.penalty(PenaltyReason::OutOfDomain);
        }
        tracing::debug!(metric = %self.name, value, "criterion beyond unfavourable limit, clamped");
        Score::from_parts(
            Arc::clone(self),
            self.bad_value(),
            true,
            ScoreOutcome::Clamped { raw: value },
        )
    }
}
