//! Batch modeler: scores every estimation result with the configured suite,
//! aggregates with additive MODA and packages the ranked results.
//!
//! Scoring is embarrassingly parallel across estimation results and runs on
//! the rayon pool unless disabled; each worker scores with its own
//! `new_instance()` copies of the models. Aggregation runs after the join.

use std::sync::Arc;

use rayon::prelude::*;
use thiserror::Error;

use pdfmodeler_core::scoring::{create_suite, score_estimation, ScoringModel};
use pdfmodeler_core::{EstimationResult, MetricError, Score};

use crate::config::{ConfigError, ConfigFingerprint, ModelerConfig};
use crate::moda::{AdditiveModaModel, Alternative, ModaError};
use crate::results::PdfModelingResults;
use crate::scoring_result::ScoringResult;

/// Errors from building a modeler or aggregating a batch.
#[derive(Debug, Error)]
pub enum ModelingError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("scoring model error: {0}")]
    Metric(#[from] MetricError),
    #[error("aggregation error: {0}")]
    Moda(#[from] ModaError),
}

/// A configured scoring suite plus its MODA weights.
#[derive(Debug)]
pub struct PdfModeler {
    config: ModelerConfig,
    models: Vec<Box<dyn ScoringModel>>,
    fingerprint: ConfigFingerprint,
    parallel: bool,
}

impl PdfModeler {
    pub fn new(config: ModelerConfig) -> Result<Self, ModelingError> {
        config.validate()?;
        let models = create_suite(&config.scoring_models, &config.settings())?;
        let fingerprint = config.fingerprint()?;
        Ok(Self {
            parallel: config.parallel,
            config,
            models,
            fingerprint,
        })
    }

    /// Enables or disables parallel scoring.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn config(&self) -> &ModelerConfig {
        &self.config
    }

    pub fn models(&self) -> &[Box<dyn ScoringModel>] {
        &self.models
    }

    fn fresh_suite(&self) -> Vec<Box<dyn ScoringModel>> {
        self.models.iter().map(|m| m.new_instance()).collect()
    }

    /// Score one estimation result with every configured model, in order.
    pub fn score_estimation_result(&self, result: &EstimationResult) -> Vec<Score> {
        score_with(&self.fresh_suite(), result)
    }

    /// Score, aggregate and rank a batch of estimation results.
    ///
    /// Never fails on data quality: failed estimations and numerically
    /// pathological fits take part in the ranking with penalty scores.
    pub fn evaluate(
        &self,
        estimation_results: Vec<Arc<EstimationResult>>,
    ) -> Result<PdfModelingResults, ModelingError> {
        let score_rows: Vec<Vec<Score>> = if self.parallel {
            estimation_results
                .par_iter()
                .map_init(|| self.fresh_suite(), |suite, er| score_with(suite, er))
                .collect()
        } else {
            let suite = self.fresh_suite();
            estimation_results
                .iter()
                .map(|er| score_with(&suite, er))
                .collect()
        };

        let metrics = self.models.iter().map(|m| Arc::clone(m.metric())).collect();
        let mut moda = AdditiveModaModel::with_weights(metrics, self.config.model_weights())?;
        let alternatives = estimation_results
            .iter()
            .zip(&score_rows)
            .map(|(er, scores)| Alternative::new(er.label(), scores.clone()))
            .collect();
        moda.define_alternatives(alternatives)?;

        let scoring_results: Vec<ScoringResult> = estimation_results
            .iter()
            .zip(score_rows)
            .enumerate()
            .map(|(i, (er, scores))| {
                ScoringResult::new(
                    Arc::clone(er),
                    scores,
                    moda.values_table()[i].clone(),
                    moda.overall_values()[i],
                    moda.rank_of(i).unwrap_or(0),
                )
            })
            .collect();

        let results = PdfModelingResults::new(
            estimation_results,
            scoring_results,
            moda,
            self.fingerprint.clone(),
        );
        let top = results
            .try_top_result()
            .map(ScoringResult::name)
            .unwrap_or_default();
        tracing::info!(
            alternatives = results.scoring_results().len(),
            metrics = self.models.len(),
            top = %top,
            "modeling run complete"
        );
        Ok(results)
    }
}

fn score_with(suite: &[Box<dyn ScoringModel>], result: &EstimationResult) -> Vec<Score> {
    suite
        .iter()
        .map(|model| score_estimation(model.as_ref(), result))
        .collect()
}

// ─── Tests ───────────────────────────────────────────────────────────
