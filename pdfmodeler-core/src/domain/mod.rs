//! Scoring primitives: metrics and the scores built against them.

pub mod metric;
pub mod score;

pub use metric::{Direction, Domain, Metric, MetricError, MetricScoring};
pub use score::{PenaltyReason, Score, ScoreOutcome};
