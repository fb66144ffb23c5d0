//! Correlation coefficients between two aligned series.

use crate::aggregator::{is_constant, mean};
use crate::utils::error::StatsError;
use serde::Serialize;

/// Pearson and Spearman coefficients for one pair of series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorrelationSummary {
    /// Number of paired points
    pub points: usize,

    /// Linear correlation
    pub pearson: f64,

    /// Rank correlation (average ranks for ties)
    pub spearman: f64,
}

/// Both coefficients for `xs` against `ys`
///
/// # Errors
/// * `StatsError::LengthMismatch` - Series differ in length
/// * `StatsError::DegenerateCorrelation` - Fewer than two points, or a
///   series is constant
pub fn correlate(xs: &[f64], ys: &[f64]) -> Result<CorrelationSummary, StatsError> {
    Ok(CorrelationSummary {
        points: xs.len(),
        pearson: pearson(xs, ys)?,
        spearman: spearman(xs, ys)?,
    })
}

/// Pearson product-moment correlation
pub fn pearson(xs: &[f64], ys: &[f64]) -> Result<f64, StatsError> {
    check_pair(xs, ys)?;
    if is_constant(xs) || is_constant(ys) {
        return Err(StatsError::DegenerateCorrelation(
            "a series has zero variance".to_string(),
        ));
    }

    let mean_x = mean(xs)?;
    let mean_y = mean(ys)?;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return Err(StatsError::DegenerateCorrelation(
            "a series has zero variance".to_string(),
        ));
    }

    Ok((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Spearman rank correlation: Pearson over average ranks
pub fn spearman(xs: &[f64], ys: &[f64]) -> Result<f64, StatsError> {
    check_pair(xs, ys)?;
    pearson(&average_ranks(xs), &average_ranks(ys))
}

/// 1-based ranks; tied values share the mean of their positions
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i + 1;
        while j < order.len() && values[order[j]] == values[order[i]] {
            j += 1;
        }

        // positions i..j (0-based) share rank mean(i+1..=j)
        let rank = (i + j + 1) as f64 / 2.0;
        for &index in &order[i..j] {
            ranks[index] = rank;
        }
        i = j;
    }

    ranks
}

fn check_pair(xs: &[f64], ys: &[f64]) -> Result<(), StatsError> {
    if xs.len() != ys.len() {
        return Err(StatsError::LengthMismatch {
            left: xs.len(),
            right: ys.len(),
        });
    }
    if xs.len() < 2 {
        return Err(StatsError::DegenerateCorrelation(format!(
            "need at least two points, got {}",
            xs.len()
        )));
    }
    Ok(())
}
