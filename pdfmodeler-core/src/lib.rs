//! PDF Modeler Core: metrics, scores, fitted distributions and goodness-of-fit scoring.
//!
//! This crate contains the single-candidate half of best-fit selection:
//! - Metric and score primitives with explicit penalty and clamp outcomes
//! - The fitted-distribution capability (CDF, inverse CDF, PDF, parameters)
//!   backed by `statrs`
//! - Estimation results as produced by an upstream fitting procedure
//! - Scoring models (KS, BIC, AIC, QQ/PP criteria, Anderson–Darling,
//!   Cramér–von Mises) and the factory that builds them from settings
//!
//! Batch aggregation and ranking live in `pdfmodeler-runner`.

pub mod distribution;
pub mod domain;
pub mod empirical;
pub mod estimation;
pub mod scoring;

pub use distribution::{
    DistributionError, FittedDistribution, RvParameters, RvType, StatrsDistribution,
};
pub use domain::{
    Direction, Domain, Metric, MetricError, MetricScoring, PenaltyReason, Score, ScoreOutcome,
};
pub use empirical::EmpiricalProbabilityRule;
pub use estimation::{EstimationResult, ShiftedData};
pub use scoring::{
    create_scoring_model, create_suite, score_estimation, CriterionBounds, ScoringModel,
    ScoringModelKind, ScoringSettings,
};
