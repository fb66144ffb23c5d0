//! Descriptive statistics over numeric samples.
//!
//! Every reduction fails on an empty sample instead of returning a
//! placeholder value, so an empty group can never masquerade as a mean of 0.

use crate::utils::error::StatsError;
use serde::{Deserialize, Serialize};

/// Arithmetic mean
///
/// # Errors
/// * `StatsError::EmptyAggregateInput` - `values` is empty
pub fn mean(values: &[f64]) -> Result<f64, StatsError> {
    ensure_non_empty(values, "mean")?;
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Number of values
///
/// # Errors
/// * `StatsError::EmptyAggregateInput` - `values` is empty
pub fn count(values: &[f64]) -> Result<usize, StatsError> {
    ensure_non_empty(values, "count")?;
    Ok(values.len())
}

/// Largest value
pub fn max(values: &[f64]) -> Result<f64, StatsError> {
    ensure_non_empty(values, "max")?;
    Ok(values.iter().copied().fold(f64::NEG_INFINITY, f64::max))
}

/// Smallest value
pub fn min(values: &[f64]) -> Result<f64, StatsError> {
    ensure_non_empty(values, "min")?;
    Ok(values.iter().copied().fold(f64::INFINITY, f64::min))
}

/// Population standard deviation
pub fn std_dev(values: &[f64]) -> Result<f64, StatsError> {
    Ok(variance(values)?.sqrt())
}

/// Population variance
pub fn variance(values: &[f64]) -> Result<f64, StatsError> {
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Ok(sum_sq / values.len() as f64)
}

/// True when every value equals the first (empty and single-value samples
/// included)
///
/// Rounding in a mean can leave a tiny non-zero variance for a constant
/// sample, so constancy is checked on the values themselves.
pub fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|pair| pair[0] == pair[1])
}

/// Nearest-rank percentile
///
/// Sorts ascending and returns the value at index `floor(n * p / 100)`.
/// No interpolation between ranks. `p = 100` would index one past the end,
/// so the index is clamped to the last element (the maximum).
///
/// # Arguments
/// * `values` - Sample, in any order
/// * `p` - Percentile within `[0, 100]`
///
/// # Errors
/// * `StatsError::InvalidPercentile` - `p` is NaN or outside `[0, 100]`
/// * `StatsError::EmptyAggregateInput` - `values` is empty
///
/// # Example
/// ```ignore
/// let p90 = percentile(&[3.0, 1.0, 2.0, 5.0, 4.0], 90.0)?; // 5.0
/// ```
pub fn percentile(values: &[f64], p: f64) -> Result<f64, StatsError> {
    validate_percentile(p)?;
    ensure_non_empty(values, "percentile")?;

    let sorted = sorted_copy(values);
    Ok(nearest_rank(&sorted, p))
}

/// Several nearest-rank percentiles with a single sort
pub fn percentiles(values: &[f64], ps: &[f64]) -> Result<Vec<PercentileValue>, StatsError> {
    for &p in ps {
        validate_percentile(p)?;
    }
    ensure_non_empty(values, "percentile")?;

    let sorted = sorted_copy(values);
    Ok(ps
        .iter()
        .map(|&p| PercentileValue {
            percentile: p,
            value: nearest_rank(&sorted, p),
        })
        .collect())
}

/// One percentile result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileValue {
    /// Requested percentile (0..=100)
    pub percentile: f64,

    /// Sample value at that rank
    pub value: f64,
}

/// Summary statistics for a duration sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationSummary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub percentiles: Vec<PercentileValue>,
}

impl DurationSummary {
    /// Look up a computed percentile
    pub fn percentile(&self, p: f64) -> Option<f64> {
        self.percentiles
            .iter()
            .find(|pv| pv.percentile == p)
            .map(|pv| pv.value)
    }

    /// Get human-readable summary
    ///
    /// **Public** - for logging and debugging
    pub fn summary(&self) -> String {
        let mut out = format!(
            "n={} | mean {:.2}s | sd {:.2}s | min {:.2}s | max {:.2}s",
            self.count, self.mean, self.std_dev, self.min, self.max
        );
        for pv in &self.percentiles {
            out.push_str(&format!(" | p{} {:.2}s", pv.percentile, pv.value));
        }
        out
    }
}

/// Compute a full summary
///
/// # Errors
/// * `StatsError::EmptyAggregateInput` - `values` is empty
/// * `StatsError::InvalidPercentile` - A requested percentile is out of range
pub fn summarize(values: &[f64], ps: &[f64]) -> Result<DurationSummary, StatsError> {
    Ok(DurationSummary {
        count: count(values)?,
        mean: mean(values)?,
        std_dev: std_dev(values)?,
        min: min(values)?,
        max: max(values)?,
        percentiles: percentiles(values, ps)?,
    })
}

fn ensure_non_empty(values: &[f64], context: &str) -> Result<(), StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyAggregateInput {
            context: context.to_string(),
        });
    }
    Ok(())
}

fn validate_percentile(p: f64) -> Result<(), StatsError> {
    if !(0.0..=100.0).contains(&p) {
        return Err(StatsError::InvalidPercentile(p));
    }
    Ok(())
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// `sorted` must be non-empty and ascending
fn nearest_rank(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    let index = (n as f64 * p / 100.0).floor() as usize;
    sorted[index.min(n - 1)]
}
