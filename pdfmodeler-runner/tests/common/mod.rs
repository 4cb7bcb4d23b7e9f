//! Shared test fixtures: seeded samples and closed-form MLE fits standing in
//! for an upstream estimation stage.

#![allow(dead_code)]

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Exp, Normal};

use pdfmodeler_core::{EstimationResult, RvParameters, RvType};

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn normal_sample(rng: &mut StdRng, mean: f64, sd: f64, n: usize) -> Vec<f64> {
    let dist = Normal::new(mean, sd).unwrap();
    (0..n).map(|_| dist.sample(rng)).collect()
}

pub fn exponential_sample(rng: &mut StdRng, rate: f64, n: usize) -> Vec<f64> {
    let dist = Exp::new(rate).unwrap();
    (0..n).map(|_| dist.sample(rng)).collect()
}

fn mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population (MLE) standard deviation.
fn std_dev(data: &[f64]) -> f64 {
    let m = mean(data);
    (data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / data.len() as f64).sqrt()
}

fn min_max(data: &[f64]) -> (f64, f64) {
    data.iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        })
}

fn success(rv_type: RvType, values: Vec<f64>, data: &[f64]) -> Arc<EstimationResult> {
    let params = RvParameters::new(rv_type, values).unwrap();
    Arc::new(EstimationResult::success("MLE", params, data.to_vec()))
}

pub fn fit_normal(data: &[f64]) -> Arc<EstimationResult> {
    success(RvType::Normal, vec![mean(data), std_dev(data)], data)
}

pub fn fit_uniform(data: &[f64]) -> Arc<EstimationResult> {
    let (lo, hi) = min_max(data);
    success(RvType::Uniform, vec![lo, hi], data)
}

pub fn fit_exponential(data: &[f64]) -> Arc<EstimationResult> {
    success(RvType::Exponential, vec![1.0 / mean(data)], data)
}

pub fn fit_log_normal(data: &[f64]) -> Arc<EstimationResult> {
    let logs: Vec<f64> = data.iter().map(|x| x.ln()).collect();
    success(RvType::LogNormal, vec![mean(&logs), std_dev(&logs)], data)
}

/// Triangular with the mode pinned to the sample minimum.
pub fn fit_triangular(data: &[f64]) -> Arc<EstimationResult> {
    let (lo, hi) = min_max(data);
    success(RvType::Triangular, vec![lo, hi, lo], data)
}

pub fn failed(estimator: &str, rv_type: RvType, data: &[f64]) -> Arc<EstimationResult> {
    Arc::new(EstimationResult::failure(
        estimator,
        rv_type,
        data.to_vec(),
        "did not converge",
    ))
}

pub fn normal_with(estimator: &str, mean: f64, sd: f64, data: &[f64]) -> Arc<EstimationResult> {
    let params = RvParameters::new(RvType::Normal, vec![mean, sd]).unwrap();
    Arc::new(EstimationResult::success(estimator, params, data.to_vec()))
}
