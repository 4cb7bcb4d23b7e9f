//! Empirical plotting positions and order statistics.

use serde::{Deserialize, Serialize};

/// Convention for the cumulative probability assigned to the i-th of `n`
/// ranked observations (`i` is 1-based).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmpiricalProbabilityRule {
    /// `i / n`
    Base,
    /// `(i - 0.5) / n`
    #[default]
    Continuity1,
    /// `(i - 0.375) / (n + 0.25)`
    Continuity2,
    /// `i / (n + 1)`
    Weibull,
}

impl EmpiricalProbabilityRule {
    pub fn probability(&self, i: usize, n: usize) -> f64 {
        let (i, n) = (i as f64, n as f64);
        match self {
            Self::Base => i / n,
            Self::Continuity1 => (i - 0.5) / n,
            Self::Continuity2 => (i - 0.375) / (n + 0.25),
            Self::Weibull => i / (n + 1.0),
        }
    }

    /// Plotting positions for ranks `1..=n`.
    pub fn probabilities(&self, n: usize) -> Vec<f64> {
        (1..=n).map(|i| self.probability(i, n)).collect()
    }
}

/// Data sorted ascending. NaNs sort last.
pub fn order_statistics(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Pearson correlation of two equal-length samples.
///
/// NaN when fewer than two points, lengths differ, either sample has zero
/// variance, or any input is non-finite.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    if n < 2 || n != y.len() {
        return f64::NAN;
    }
    let nf = n as f64;
    let mean_x = x.iter().sum::<f64>() / nf;
    let mean_y = y.iter().sum::<f64>() / nf;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return f64::NAN;
    }
    sxy / (sxx.sqrt() * syy.sqrt())
}
