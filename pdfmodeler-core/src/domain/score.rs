//! Score: an immutable (metric, value, validity) triple.

use std::fmt;
use std::sync::Arc;

use super::metric::Metric;

/// Why a score was degraded to its metric's worst bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PenaltyReason {
    /// Worst score requested directly.
    BadFit,
    EmptyData,
    /// The estimation step produced no parameters.
    MissingParameters,
    /// Parameters exist but no distribution could be built from them.
    DistributionUnavailable(String),
    NonFinite,
    /// Fewer observations than the statistic needs.
    InsufficientData,
    /// Statistic fell beyond the favourable domain bound.
    OutOfDomain,
}

impl fmt::Display for PenaltyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadFit => write!(f, "bad fit"),
            Self::EmptyData => write!(f, "empty data"),
            Self::MissingParameters => write!(f, "missing parameters"),
            Self::DistributionUnavailable(msg) => write!(f, "distribution unavailable: {msg}"),
            Self::NonFinite => write!(f, "non-finite statistic"),
            Self::InsufficientData => write!(f, "insufficient data"),
            Self::OutOfDomain => write!(f, "outside favourable domain bound"),
        }
    }
}

/// How a score's value came about.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreOutcome {
    Computed,
    /// Computed value fell outside the domain and was moved to the nearest bound.
    Clamped { raw: f64 },
    Penalty(PenaltyReason),
}

/// Result of evaluating one metric against one candidate fit.
#[derive(Debug, Clone)]
pub struct Score {
    metric: Arc<Metric>,
    value: f64,
    valid: bool,
    outcome: ScoreOutcome,
}

impl Score {
    pub(crate) fn from_parts(
        metric: Arc<Metric>,
        value: f64,
        valid: bool,
        outcome: ScoreOutcome,
    ) -> Self {
        Self {
            metric,
            value,
            valid,
            outcome,
        }
    }

    /// A score supplied from outside the scoring models. The value is
    /// clamped into the metric's domain; NaN becomes the worst bound.
    pub fn new(metric: Arc<Metric>, value: f64) -> Self {
        let domain = metric.domain();
        if value.is_nan() {
            let bad = metric.bad_value();
            return Self::from_parts(
                metric,
                bad,
                true,
                ScoreOutcome::Penalty(PenaltyReason::NonFinite),
            );
        }
        let clamped = domain.clamp(value);
        let outcome = if clamped == value {
            ScoreOutcome::Computed
        } else {
            ScoreOutcome::Clamped { raw: value }
        };
        Self::from_parts(metric, clamped, true, outcome)
    }

    /// A score that must not be trusted as a differentiator. Aggregation
    /// excludes it from observed ranges and values it as the worst outcome.
    pub fn invalid(metric: Arc<Metric>) -> Self {
        let bad = metric.bad_value();
        Self::from_parts(metric, bad, false, ScoreOutcome::Penalty(PenaltyReason::BadFit))
    }

    pub fn metric(&self) -> &Arc<Metric> {
        &self.metric
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn outcome(&self) -> &ScoreOutcome {
        &self.outcome
    }

    pub fn is_penalty(&self) -> bool {
        matches!(self.outcome, ScoreOutcome::Penalty(_))
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.metric.name(), self.value)?;
        if !self.valid {
            write!(f, " (invalid)")?;
        }
        Ok(())
    }
}
