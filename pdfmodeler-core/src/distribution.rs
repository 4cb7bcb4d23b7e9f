//! Fitted-distribution capability and the statrs-backed families that provide it.
//!
//! Scoring only ever talks to `FittedDistribution`: a CDF, a density, a
//! quantile function, the parameter list and a log-likelihood. `RvParameters`
//! is what an estimation step hands over; `create_distribution` turns it into
//! something scoreable, or reports why it cannot.

use std::f64::consts::SQRT_2;
use std::fmt;

use serde::{Deserialize, Serialize};
use statrs::distribution::{
    Continuous, ContinuousCDF, Exp, Gamma, LogNormal, Normal, Triangular, Uniform, Weibull,
};
use statrs::function::erf::erf_inv;
use thiserror::Error;

/// Errors from materializing a distribution out of fitted parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistributionError {
    #[error("{rv_type} expects {expected} parameters, got {found}")]
    ParameterCount {
        rv_type: RvType,
        expected: usize,
        found: usize,
    },
    #[error("invalid {rv_type} parameters {values:?}: {reason}")]
    InvalidParameters {
        rv_type: RvType,
        values: Vec<f64>,
        reason: String,
    },
}

/// A continuous distribution with fitted parameters.
pub trait FittedDistribution: Send + Sync + fmt::Debug {
    fn cdf(&self, x: f64) -> f64;

    fn pdf(&self, x: f64) -> f64;

    /// Quantile function. `p <= 0` and `p >= 1` return the support bounds,
    /// which may be infinite.
    fn inv_cdf(&self, p: f64) -> f64;

    /// Fitted parameters in the family's canonical order.
    fn parameters(&self) -> &[f64];

    fn sum_log_likelihood(&self, data: &[f64]) -> f64 {
        data.iter().map(|&x| self.pdf(x).ln()).sum()
    }
}

/// Distribution family identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RvType {
    Normal,
    LogNormal,
    Exponential,
    Gamma,
    Weibull,
    Uniform,
    Triangular,
}

impl RvType {
    pub const ALL: [RvType; 7] = [
        Self::Normal,
        Self::LogNormal,
        Self::Exponential,
        Self::Gamma,
        Self::Weibull,
        Self::Uniform,
        Self::Triangular,
    ];

    pub fn parameter_names(&self) -> &'static [&'static str] {
        match self {
            Self::Normal => &["mean", "std_dev"],
            Self::LogNormal => &["location", "scale"],
            Self::Exponential => &["rate"],
            Self::Gamma => &["shape", "rate"],
            Self::Weibull => &["shape", "scale"],
            Self::Uniform => &["min", "max"],
            Self::Triangular => &["min", "max", "mode"],
        }
    }

    pub fn parameter_count(&self) -> usize {
        self.parameter_names().len()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::LogNormal => "LogNormal",
            Self::Exponential => "Exponential",
            Self::Gamma => "Gamma",
            Self::Weibull => "Weibull",
            Self::Uniform => "Uniform",
            Self::Triangular => "Triangular",
        }
    }
}

impl fmt::Display for RvType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters produced by an estimation step for one family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RvParameters {
    rv_type: RvType,
    values: Vec<f64>,
}

impl RvParameters {
    /// Checks the parameter count only; value validity is checked by
    /// `create_distribution`.
    pub fn new(rv_type: RvType, values: Vec<f64>) -> Result<Self, DistributionError> {
        let expected = rv_type.parameter_count();
        if values.len() != expected {
            return Err(DistributionError::ParameterCount {
                rv_type,
                expected,
                found: values.len(),
            });
        }
        Ok(Self { rv_type, values })
    }

    pub fn rv_type(&self) -> RvType {
        self.rv_type
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn create_distribution(&self) -> Result<StatrsDistribution, DistributionError> {
        StatrsDistribution::new(self)
    }
}

#[derive(Debug, Clone)]
enum Family {
    Normal(Normal),
    LogNormal(LogNormal),
    Exponential(Exp),
    Gamma(Gamma),
    Weibull(Weibull),
    Uniform(Uniform),
    Triangular(Triangular),
}

/// A `FittedDistribution` backed by a statrs distribution.
#[derive(Debug, Clone)]
pub struct StatrsDistribution {
    family: Family,
    params: Vec<f64>,
}

impl StatrsDistribution {
    pub fn new(parameters: &RvParameters) -> Result<Self, DistributionError> {
        let p = parameters.values();
        let rv_type = parameters.rv_type();
        // Deserialized parameters skip the check in `RvParameters::new`.
        let expected = rv_type.parameter_count();
        if p.len() != expected {
            return Err(DistributionError::ParameterCount {
                rv_type,
                expected,
                found: p.len(),
            });
        }
        let invalid = |reason: String| DistributionError::InvalidParameters {
            rv_type,
            values: p.to_vec(),
            reason,
        };
        if p.iter().any(|v| !v.is_finite()) {
            return Err(invalid("non-finite parameter".into()));
        }
        let family = match rv_type {
            RvType::Normal => {
                Family::Normal(Normal::new(p[0], p[1]).map_err(|e| invalid(e.to_string()))?)
            }
            RvType::LogNormal => {
                Family::LogNormal(LogNormal::new(p[0], p[1]).map_err(|e| invalid(e.to_string()))?)
            }
            RvType::Exponential => {
                Family::Exponential(Exp::new(p[0]).map_err(|e| invalid(e.to_string()))?)
            }
            RvType::Gamma => {
                Family::Gamma(Gamma::new(p[0], p[1]).map_err(|e| invalid(e.to_string()))?)
            }
            RvType::Weibull => {
                Family::Weibull(Weibull::new(p[0], p[1]).map_err(|e| invalid(e.to_string()))?)
            }
            RvType::Uniform => {
                Family::Uniform(Uniform::new(p[0], p[1]).map_err(|e| invalid(e.to_string()))?)
            }
            RvType::Triangular => Family::Triangular(
                Triangular::new(p[0], p[1], p[2]).map_err(|e| invalid(e.to_string()))?,
            ),
        };
        Ok(Self {
            family,
            params: p.to_vec(),
        })
    }

    pub fn rv_type(&self) -> RvType {
        match self.family {
            Family::Normal(_) => RvType::Normal,
            Family::LogNormal(_) => RvType::LogNormal,
            Family::Exponential(_) => RvType::Exponential,
            Family::Gamma(_) => RvType::Gamma,
            Family::Weibull(_) => RvType::Weibull,
            Family::Uniform(_) => RvType::Uniform,
            Family::Triangular(_) => RvType::Triangular,
        }
    }

    fn support(&self) -> (f64, f64) {
        let p = &self.params;
        match self.family {
            Family::Normal(_) => (f64::NEG_INFINITY, f64::INFINITY),
            Family::LogNormal(_)
            | Family::Exponential(_)
            | Family::Gamma(_)
            | Family::Weibull(_) => (0.0, f64::INFINITY),
            Family::Uniform(_) | Family::Triangular(_) => (p[0], p[1]),
        }
    }
}

impl FittedDistribution for StatrsDistribution {
    fn cdf(&self, x: f64) -> f64 {
        match &self.family {
            Family::Normal(d) => d.cdf(x),
            Family::LogNormal(d) => d.cdf(x),
            Family::Exponential(d) => d.cdf(x),
            Family::Gamma(d) => d.cdf(x),
            Family::Weibull(d) => d.cdf(x),
            Family::Uniform(d) => d.cdf(x),
            Family::Triangular(d) => d.cdf(x),
        }
    }

    fn pdf(&self, x: f64) -> f64 {
        match &self.family {
            Family::Normal(d) => d.pdf(x),
            Family::LogNormal(d) => d.pdf(x),
            Family::Exponential(d) => d.pdf(x),
            Family::Gamma(d) => d.pdf(x),
            Family::Weibull(d) => d.pdf(x),
            Family::Uniform(d) => d.pdf(x),
            Family::Triangular(d) => d.pdf(x),
        }
    }

    fn inv_cdf(&self, p: f64) -> f64 {
        if p.is_nan() {
            return f64::NAN;
        }
        let (lower, upper) = self.support();
        if p <= 0.0 {
            return lower;
        }
        if p >= 1.0 {
            return upper;
        }
        let v = &self.params;
        match &self.family {
            Family::Normal(_) => v[0] + v[1] * std_normal_quantile(p),
            Family::LogNormal(_) => (v[0] + v[1] * std_normal_quantile(p)).exp(),
            Family::Exponential(_) => -(-p).ln_1p() / v[0],
            Family::Weibull(_) => v[1] * (-(-p).ln_1p()).powf(1.0 / v[0]),
            Family::Uniform(_) => v[0] + p * (v[1] - v[0]),
            Family::Triangular(_) => {
                let (min, max, mode) = (v[0], v[1], v[2]);
                let width = max - min;
                if p < (mode - min) / width {
                    min + (p * width * (mode - min)).sqrt()
                } else {
                    max - ((1.0 - p) * width * (max - mode)).sqrt()
                }
            }
            Family::Gamma(d) => {
                let (shape, rate) = (v[0], v[1]);
                let guess = (shape + 10.0 * shape.sqrt()) / rate;
                bisect_quantile(|x| d.cdf(x), p, 0.0, guess.max(1.0 / rate))
            }
        }
    }

    fn parameters(&self) -> &[f64] {
        &self.params
    }

    fn sum_log_likelihood(&self, data: &[f64]) -> f64 {
        data.iter()
            .map(|&x| match &self.family {
                Family::Normal(d) => d.ln_pdf(x),
                Family::LogNormal(d) => d.ln_pdf(x),
                Family::Exponential(d) => d.ln_pdf(x),
                Family::Gamma(d) => d.ln_pdf(x),
                Family::Weibull(d) => d.ln_pdf(x),
                Family::Uniform(d) => d.ln_pdf(x),
                Family::Triangular(d) => d.ln_pdf(x),
            })
            .sum()
    }
}

/// Standard normal quantile for `p` in (0, 1).
fn std_normal_quantile(p: f64) -> f64 {
    SQRT_2 * erf_inv(2.0 * p - 1.0)
}

/// Quantile of a continuous, non-decreasing CDF by bisection. `hi` is
/// doubled until it brackets `p`.
fn bisect_quantile<F: Fn(f64) -> f64>(cdf: F, p: f64, mut lo: f64, mut hi: f64) -> f64 {
    const MAX_EXPANSIONS: usize = 1024;
    const MAX_ITERS: usize = 200;

    let mut expansions = 0;
    while cdf(hi) < p {
        lo = hi;
        hi *= 2.0;
        expansions += 1;
        if expansions > MAX_EXPANSIONS || !hi.is_finite() {
            return f64::INFINITY;
        }
    }
    for _ in 0..MAX_ITERS {
        let mid = 0.5 * (lo + hi);
        if cdf(mid) >= p {
            hi = mid;
        } else {
            lo = mid;
        }
        if (hi - lo) <= 1e-14 * hi.abs().max(1.0) {
            break;
        }
    }
    0.5 * (lo + hi)
}
