//! Serializable modeler configuration.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pdfmodeler_core::scoring::{CriterionBounds, ScoringModelKind, ScoringSettings};
use pdfmodeler_core::{EmpiricalProbabilityRule, MetricError};

/// Content hash of a configuration, hex-encoded.
pub type ConfigFingerprint = String;

/// Errors from loading or validating a `ModelerConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("no scoring models configured")]
    NoModels,
    #[error("scoring model '{0}' listed more than once")]
    DuplicateModel(String),
    #[error("invalid criterion bounds: {0}")]
    Bounds(#[from] MetricError),
    #[error("weight given for '{0}', which is not a configured scoring model")]
    UnknownWeight(String),
    #[error("weight for '{model}' must be finite and non-negative, got {weight}")]
    InvalidWeight { model: String, weight: f64 },
    #[error("all scoring-model weights are zero")]
    ZeroWeights,
}

fn default_scoring_models() -> Vec<ScoringModelKind> {
    ScoringModelKind::DEFAULT_SUITE.to_vec()
}

fn default_parallel() -> bool {
    true
}

/// Everything a batch scoring run needs besides the estimation results.
///
/// Every field has a default, so an empty TOML document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelerConfig {
    /// Scoring models to run, in column order.
    #[serde(default = "default_scoring_models")]
    pub scoring_models: Vec<ScoringModelKind>,

    /// Plotting-position policy for the order-statistic models.
    #[serde(default)]
    pub empirical_rule: EmpiricalProbabilityRule,

    /// Domain of the information-criterion metrics.
    #[serde(default)]
    pub criterion_bounds: CriterionBounds,

    /// MODA weight per model id. Models without an entry weigh 1.0.
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,

    /// Score alternatives on the rayon pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for ModelerConfig {
    fn default() -> Self {
        Self {
            scoring_models: default_scoring_models(),
            empirical_rule: EmpiricalProbabilityRule::default(),
            criterion_bounds: CriterionBounds::default(),
            weights: BTreeMap::new(),
            parallel: default_parallel(),
        }
    }
}

impl ModelerConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scoring_models.is_empty() {
            return Err(ConfigError::NoModels);
        }
        let mut seen = BTreeSet::new();
        for kind in &self.scoring_models {
            if !seen.insert(*kind) {
                return Err(ConfigError::DuplicateModel(kind.id().to_string()));
            }
        }
        self.criterion_bounds.domain()?;

        for (id, &weight) in &self.weights {
            match ScoringModelKind::from_id(id) {
                Some(kind) if seen.contains(&kind) => {}
                _ => return Err(ConfigError::UnknownWeight(id.clone())),
            }
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    model: id.clone(),
                    weight,
                });
            }
        }
        if self.model_weights().iter().all(|&w| w == 0.0) {
            return Err(ConfigError::ZeroWeights);
        }
        Ok(())
    }

    /// Raw (unnormalized) weights aligned with `scoring_models`.
    pub fn model_weights(&self) -> Vec<f64> {
        self.scoring_models
            .iter()
            .map(|kind| self.weights.get(kind.id()).copied().unwrap_or(1.0))
            .collect()
    }

    pub fn settings(&self) -> ScoringSettings {
        ScoringSettings {
            empirical_rule: self.empirical_rule,
            criterion_bounds: self.criterion_bounds,
        }
    }

    /// BLAKE3 digest of the canonical JSON form.
    ///
    /// Two configs that score identically share a fingerprint; `parallel`
    /// is excluded since it does not affect results.
    pub fn fingerprint(&self) -> Result<ConfigFingerprint, ConfigError> {
        let canonical = Self {
            parallel: true,
            ..self.clone()
        };
        let json = serde_json::to_string(&canonical)?;
        let hash = blake3::hash(json.as_bytes());
        Ok(hash.to_hex().to_string())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
