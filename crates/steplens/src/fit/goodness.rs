//! Kolmogorov–Smirnov goodness of fit.

use super::family::Distribution;

/// Two-sided KS statistic `D = sup |F_n(x) - F(x)|`
///
/// `sorted` must be ascending. The supremum is reached at a sample point,
/// approached from either side, so each distinct value is scored against
/// both `F(x)` and `F(x-)`. The left limit matters for discrete families,
/// where the CDF jumps exactly at the sample values.
pub fn ks_statistic(sorted: &[f64], dist: &Distribution) -> f64 {
    let n = sorted.len() as f64;
    let mut d: f64 = 0.0;
    let mut i = 0;

    while i < sorted.len() {
        let x = sorted[i];
        let mut j = i;
        while j < sorted.len() && sorted[j] == x {
            j += 1;
        }

        let below = i as f64 / n;
        let at = j as f64 / n;
        d = d
            .max((at - dist.cdf(x)).abs())
            .max((below - dist.cdf_left(x)).abs());

        i = j;
    }

    d
}
