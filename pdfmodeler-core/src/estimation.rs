//! Estimation results: fitted parameters plus the data they were fitted on.
//!
//! Produced by an estimation step before scoring; read-only afterwards.

use serde::{Deserialize, Serialize};

use crate::distribution::{RvParameters, RvType};

/// Data translated by a constant so a family with restricted support could
/// be fitted. Scoring happens in the shifted space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftedData {
    pub shift: f64,
    pub data: Vec<f64>,
}

impl ShiftedData {
    /// Shift `original` by `shift` (each value becomes `x - shift`).
    pub fn from_original(original: &[f64], shift: f64) -> Self {
        Self {
            shift,
            data: original.iter().map(|x| x - shift).collect(),
        }
    }
}

/// Output of one estimator applied to one family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimationResult {
    estimator: String,
    rv_type: RvType,
    parameters: Option<RvParameters>,
    original_data: Vec<f64>,
    shifted_data: Option<ShiftedData>,
    message: Option<String>,
}

impl EstimationResult {
    /// A successful estimate. The family is taken from the parameters.
    pub fn success(
        estimator: impl Into<String>,
        parameters: RvParameters,
        original_data: Vec<f64>,
    ) -> Self {
        Self {
            estimator: estimator.into(),
            rv_type: parameters.rv_type(),
            parameters: Some(parameters),
            original_data,
            shifted_data: None,
            message: None,
        }
    }

    /// An estimator that ran but produced no parameters.
    pub fn failure(
        estimator: impl Into<String>,
        rv_type: RvType,
        original_data: Vec<f64>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            estimator: estimator.into(),
            rv_type,
            parameters: None,
            original_data,
            shifted_data: None,
            message: Some(message.into()),
        }
    }

    pub fn with_shifted_data(mut self, shifted: ShiftedData) -> Self {
        self.shifted_data = Some(shifted);
        self
    }

    pub fn estimator(&self) -> &str {
        &self.estimator
    }

    pub fn rv_type(&self) -> RvType {
        self.rv_type
    }

    pub fn parameters(&self) -> Option<&RvParameters> {
        self.parameters.as_ref()
    }

    pub fn original_data(&self) -> &[f64] {
        &self.original_data
    }

    pub fn shifted_data(&self) -> Option<&ShiftedData> {
        self.shifted_data.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.parameters.is_some()
    }

    /// The data the parameters were estimated on: shifted when present.
    pub fn scoring_data(&self) -> &[f64] {
        match &self.shifted_data {
            Some(shifted) => &shifted.data,
            None => &self.original_data,
        }
    }

    /// Display label, e.g. `"MLE:Gamma"`.
    pub fn label(&self) -> String {
        format!("{}:{}", self.estimator, self.rv_type)
    }
}
