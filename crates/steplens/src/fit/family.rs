//! Candidate distribution families and their parameter estimators.
//!
//! - Gamma: method of moments over the population variance
//! - Normal: maximum likelihood
//! - Poisson: maximum likelihood, integer support

use super::special::{erfc, regularized_gamma_p, regularized_gamma_q};
use crate::aggregator::is_constant;
use crate::utils::error::FitError;
use serde::{Deserialize, Serialize};
use std::f64::consts::SQRT_2;
use std::fmt;
use std::str::FromStr;

/// A candidate distribution family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Gamma,
    Normal,
    Poisson,
}

impl Family {
    /// Declaration order, also the tie-break order for ranking
    pub const ALL: [Family; 3] = [Family::Gamma, Family::Normal, Family::Poisson];

    pub fn name(&self) -> &'static str {
        match self {
            Family::Gamma => "gamma",
            Family::Normal => "normal",
            Family::Poisson => "poisson",
        }
    }

    /// Whether the family has integer support
    pub fn is_discrete(&self) -> bool {
        matches!(self, Family::Poisson)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Family {
    type Err = FitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gamma" => Ok(Family::Gamma),
            "normal" | "gaussian" => Ok(Family::Normal),
            "poisson" => Ok(Family::Poisson),
            other => Err(FitError::DistributionFitFailure {
                family: other.to_string(),
                reason: "unknown family".to_string(),
            }),
        }
    }
}

/// A family with concrete parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum Distribution {
    Gamma { shape: f64, scale: f64 },
    Normal { mean: f64, std_dev: f64 },
    Poisson { lambda: f64 },
}

impl Distribution {
    /// Estimate parameters of `family` from `sample`
    ///
    /// # Errors
    /// * `FitError::EmptySample` - `sample` is empty
    /// * `FitError::DistributionFitFailure` - The sample is outside the
    ///   family's support or degenerate (zero variance, zero mean)
    pub fn fit(family: Family, sample: &[f64]) -> Result<Self, FitError> {
        if sample.is_empty() {
            return Err(FitError::EmptySample);
        }
        if sample.iter().any(|v| !v.is_finite()) {
            return Err(failure(family, "sample contains non-finite values"));
        }

        let n = sample.len() as f64;
        let mean = sample.iter().sum::<f64>() / n;
        let variance = sample.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let has_negative = sample.iter().any(|v| *v < 0.0);
        let zero_variance = variance <= 0.0 || is_constant(sample);

        match family {
            Family::Gamma => {
                if has_negative {
                    return Err(failure(family, "sample contains negative values"));
                }
                if mean <= 0.0 {
                    return Err(failure(family, "sample mean is zero"));
                }
                if zero_variance {
                    return Err(failure(family, "sample has zero variance"));
                }
                Ok(Distribution::Gamma {
                    shape: mean * mean / variance,
                    scale: variance / mean,
                })
            }
            Family::Normal => {
                if zero_variance {
                    return Err(failure(family, "sample has zero variance"));
                }
                Ok(Distribution::Normal {
                    mean,
                    std_dev: variance.sqrt(),
                })
            }
            Family::Poisson => {
                if has_negative {
                    return Err(failure(family, "sample contains negative values"));
                }
                if mean <= 0.0 {
                    return Err(failure(family, "sample mean is zero"));
                }
                Ok(Distribution::Poisson { lambda: mean })
            }
        }
    }

    pub fn family(&self) -> Family {
        match self {
            Distribution::Gamma { .. } => Family::Gamma,
            Distribution::Normal { .. } => Family::Normal,
            Distribution::Poisson { .. } => Family::Poisson,
        }
    }

    /// `P(X <= x)`
    pub fn cdf(&self, x: f64) -> f64 {
        match *self {
            Distribution::Gamma { shape, scale } => {
                if x <= 0.0 {
                    0.0
                } else {
                    regularized_gamma_p(shape, x / scale)
                }
            }
            Distribution::Normal { mean, std_dev } => 0.5 * erfc(-(x - mean) / (std_dev * SQRT_2)),
            Distribution::Poisson { lambda } => {
                if x < 0.0 {
                    0.0
                } else {
                    // P(X <= k) = Q(k + 1, λ)
                    regularized_gamma_q(x.floor() + 1.0, lambda)
                }
            }
        }
    }

    /// `P(X > x)`, computed from the upper tail directly
    pub fn complementary_cdf(&self, x: f64) -> f64 {
        match *self {
            Distribution::Gamma { shape, scale } => {
                if x <= 0.0 {
                    1.0
                } else {
                    regularized_gamma_q(shape, x / scale)
                }
            }
            Distribution::Normal { mean, std_dev } => 0.5 * erfc((x - mean) / (std_dev * SQRT_2)),
            Distribution::Poisson { lambda } => {
                if x < 0.0 {
                    1.0
                } else {
                    regularized_gamma_p(x.floor() + 1.0, lambda)
                }
            }
        }
    }

    /// `P(X < x)`, the left limit of the CDF
    ///
    /// Equal to `cdf` for continuous families.
    pub fn cdf_left(&self, x: f64) -> f64 {
        match self {
            Distribution::Poisson { .. } => {
                if x <= 0.0 {
                    0.0
                } else {
                    self.cdf(x.ceil() - 1.0)
                }
            }
            _ => self.cdf(x),
        }
    }

    pub fn mean(&self) -> f64 {
        match *self {
            Distribution::Gamma { shape, scale } => shape * scale,
            Distribution::Normal { mean, .. } => mean,
            Distribution::Poisson { lambda } => lambda,
        }
    }

    pub fn variance(&self) -> f64 {
        match *self {
            Distribution::Gamma { shape, scale } => shape * scale * scale,
            Distribution::Normal { std_dev, .. } => std_dev * std_dev,
            Distribution::Poisson { lambda } => lambda,
        }
    }

    /// Get human-readable parameter string
    pub fn describe(&self) -> String {
        match self {
            Distribution::Gamma { shape, scale } => {
                format!("gamma(shape={:.4}, scale={:.4})", shape, scale)
            }
            Distribution::Normal { mean, std_dev } => {
                format!("normal(mean={:.4}, sd={:.4})", mean, std_dev)
            }
            Distribution::Poisson { lambda } => format!("poisson(lambda={:.4})", lambda),
        }
    }
}

fn failure(family: Family, reason: &str) -> FitError {
    FitError::DistributionFitFailure {
        family: family.to_string(),
        reason: reason.to_string(),
    }
}
