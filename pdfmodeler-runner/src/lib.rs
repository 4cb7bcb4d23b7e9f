//! PDF Modeler Runner: batch scoring, additive MODA aggregation, best-fit ranking.
//!
//! This crate builds on `pdfmodeler-core` to provide:
//! - TOML configuration with validation and a content fingerprint
//! - Parallel scoring of many estimation results with one scoring suite
//! - Additive MODA aggregation with domain auto-adjustment
//! - `PdfModelingResults`: sorted results, top result and rank queries

pub mod config;
pub mod moda;
pub mod results;
pub mod runner;
pub mod scoring_result;

pub use config::{ConfigError, ConfigFingerprint, ModelerConfig};
pub use moda::{AdditiveModaModel, Alternative, ModaError};
pub use results::PdfModelingResults;
pub use runner::{ModelingError, PdfModeler};
pub use scoring_result::ScoringResult;
