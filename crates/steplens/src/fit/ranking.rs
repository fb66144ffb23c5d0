//! Fit every candidate family and rank by goodness of fit.

use super::family::{Distribution, Family};
use super::goodness::ks_statistic;
use super::sampling;
use crate::utils::error::FitError;
use log::{debug, warn};
use serde::Serialize;

/// A fitted candidate with its score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FittedDistribution {
    /// Family and estimated parameters
    pub distribution: Distribution,

    /// Kolmogorov–Smirnov statistic against the fitted sample
    pub ks_statistic: f64,

    /// 1 = best fit
    pub rank: usize,
}

impl FittedDistribution {
    pub fn family(&self) -> Family {
        self.distribution.family()
    }

    pub fn cdf(&self, x: f64) -> f64 {
        self.distribution.cdf(x)
    }

    pub fn complementary_cdf(&self, x: f64) -> f64 {
        self.distribution.complementary_cdf(x)
    }

    pub fn mean(&self) -> f64 {
        self.distribution.mean()
    }

    pub fn variance(&self) -> f64 {
        self.distribution.variance()
    }

    /// Draw `n` variates; see [`sampling::sample`]
    pub fn sample(&self, n: usize, seed: Option<u64>) -> Vec<f64> {
        sampling::sample(&self.distribution, n, seed)
    }
}

/// Ranked candidates, best first
///
/// Always holds at least one fitted candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct FitRanking {
    ranked: Vec<FittedDistribution>,
    failures: Vec<FitError>,
    sample_size: usize,
}

impl FitRanking {
    /// The rank 1 candidate
    pub fn best(&self) -> &FittedDistribution {
        &self.ranked[0]
    }

    pub fn ranked(&self) -> &[FittedDistribution] {
        &self.ranked
    }

    /// Candidates that could not be fitted
    pub fn failures(&self) -> &[FitError] {
        &self.failures
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn get(&self, family: Family) -> Option<&FittedDistribution> {
        self.ranked.iter().find(|f| f.family() == family)
    }

    /// Ranked family names, best first
    pub fn order(&self) -> Vec<Family> {
        self.ranked.iter().map(FittedDistribution::family).collect()
    }
}

/// Fit each family in `families` to `sample` and rank by KS statistic
///
/// Ranking is a stable ascending sort on D, so equal scores keep the order
/// of `families`. Repeated families are fitted once. A family that cannot
/// be fitted is logged and recorded in `FitRanking::failures`.
///
/// # Arguments
/// * `sample` - Observations, in any order
/// * `families` - Candidates in tie-break order
///
/// # Errors
/// * `FitError::NoCandidates` - `families` is empty
/// * `FitError::EmptySample` - `sample` is empty
/// * `FitError::AllCandidatesFailed` - No family could be fitted
pub fn rank_candidates(sample: &[f64], families: &[Family]) -> Result<FitRanking, FitError> {
    if families.is_empty() {
        return Err(FitError::NoCandidates);
    }
    if sample.is_empty() {
        return Err(FitError::EmptySample);
    }

    let mut sorted = sample.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut seen: Vec<Family> = Vec::with_capacity(families.len());
    let mut ranked = Vec::new();
    let mut failures = Vec::new();

    for &family in families {
        if seen.contains(&family) {
            continue;
        }
        seen.push(family);

        match Distribution::fit(family, &sorted) {
            Ok(distribution) => {
                let d = ks_statistic(&sorted, &distribution);
                debug!("{} -> D = {:.6}", distribution.describe(), d);
                ranked.push(FittedDistribution {
                    distribution,
                    ks_statistic: d,
                    rank: 0,
                });
            }
            Err(e) => {
                warn!("Skipping candidate {}: {}", family, e);
                failures.push(e);
            }
        }
    }

    if ranked.is_empty() {
        return Err(FitError::AllCandidatesFailed(seen.len()));
    }

    ranked.sort_by(|a, b| a.ks_statistic.total_cmp(&b.ks_statistic));
    for (i, fitted) in ranked.iter_mut().enumerate() {
        fitted.rank = i + 1;
    }

    Ok(FitRanking {
        ranked,
        failures,
        sample_size: sample.len(),
    })
}
