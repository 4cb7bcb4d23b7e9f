//! Factory: converts a `ScoringModelKind` plus `ScoringSettings` into a
//! runtime `ScoringModel`.

use serde::{Deserialize, Serialize};

use crate::domain::{Domain, MetricError};
use crate::empirical::EmpiricalProbabilityRule;

use super::edf::{AndersonDarlingScoringModel, CramerVonMisesScoringModel};
use super::information::{AicScoringModel, BicScoringModel};
use super::ks::KsScoringModel;
use super::pp::{PpCorrelationScoringModel, PpSseScoringModel};
use super::qq::{AdjustedQqCorrelationScoringModel, QqCorrelationScoringModel};
use super::ScoringModel;

/// Default lower limit for information-criterion metrics.
pub const DEFAULT_LOWER_LIMIT: f64 = -1.0e7;

/// Default upper limit for information-criterion metrics.
pub const DEFAULT_UPPER_LIMIT: f64 = 1.0e7;

/// Which scoring model to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringModelKind {
    Ks,
    Bic,
    Aic,
    QqCorrelation,
    AdjustedQqCorrelation,
    PpSse,
    PpCorrelation,
    AndersonDarling,
    CramerVonMises,
}

impl ScoringModelKind {
    pub const ALL: [ScoringModelKind; 9] = [
        Self::Ks,
        Self::Bic,
        Self::Aic,
        Self::QqCorrelation,
        Self::AdjustedQqCorrelation,
        Self::PpSse,
        Self::PpCorrelation,
        Self::AndersonDarling,
        Self::CramerVonMises,
    ];

    /// The suite run when nothing else is configured.
    pub const DEFAULT_SUITE: [ScoringModelKind; 5] = [
        Self::Ks,
        Self::Bic,
        Self::QqCorrelation,
        Self::AdjustedQqCorrelation,
        Self::PpSse,
    ];

    /// Stable identifier, matching the serde name.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Ks => "ks",
            Self::Bic => "bic",
            Self::Aic => "aic",
            Self::QqCorrelation => "qq_correlation",
            Self::AdjustedQqCorrelation => "adjusted_qq_correlation",
            Self::PpSse => "pp_sse",
            Self::PpCorrelation => "pp_correlation",
            Self::AndersonDarling => "anderson_darling",
            Self::CramerVonMises => "cramer_von_mises",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }
}

/// Domain limits for the information-criterion metrics (BIC, AIC).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriterionBounds {
    pub lower_limit: f64,
    pub upper_limit: f64,
}

impl Default for CriterionBounds {
    fn default() -> Self {
        Self {
            lower_limit: DEFAULT_LOWER_LIMIT,
            upper_limit: DEFAULT_UPPER_LIMIT,
        }
    }
}

impl CriterionBounds {
    pub fn domain(&self) -> Result<Domain, MetricError> {
        Domain::new(self.lower_limit, self.upper_limit)
    }
}

/// Settings shared by every model in a suite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub empirical_rule: EmpiricalProbabilityRule,
    #[serde(default)]
    pub criterion_bounds: CriterionBounds,
}

/// Create one scoring model.
pub fn create_scoring_model(
    kind: ScoringModelKind,
    settings: &ScoringSettings,
) -> Result<Box<dyn ScoringModel>, MetricError> {
    let rule = settings.empirical_rule;
    let model: Box<dyn ScoringModel> = match kind {
        ScoringModelKind::Ks => Box::new(KsScoringModel::new()),
        ScoringModelKind::Bic => Box::new(BicScoringModel::new(&settings.criterion_bounds)?),
        ScoringModelKind::Aic => Box::new(AicScoringModel::new(&settings.criterion_bounds)?),
        ScoringModelKind::QqCorrelation => Box::new(QqCorrelationScoringModel::new(rule)),
        ScoringModelKind::AdjustedQqCorrelation => {
            Box::new(AdjustedQqCorrelationScoringModel::new(rule))
        }
        ScoringModelKind::PpSse => Box::new(PpSseScoringModel::new(rule)),
        ScoringModelKind::PpCorrelation => Box::new(PpCorrelationScoringModel::new(rule)),
        ScoringModelKind::AndersonDarling => Box::new(AndersonDarlingScoringModel::new()),
        ScoringModelKind::CramerVonMises => Box::new(CramerVonMisesScoringModel::new()),
    };
    Ok(model)
}

/// Create a model for every kind, in order.
pub fn create_suite(
    kinds: &[ScoringModelKind],
    settings: &ScoringSettings,
) -> Result<Vec<Box<dyn ScoringModel>>, MetricError> {
    kinds
        .iter()
        .map(|&kind| create_scoring_model(kind, settings))
        .collect()
}
