//! Distribution fitting for duration samples.
//!
//! This module handles:
//! - Estimating Gamma, Normal and Poisson parameters
//! - Ranking candidates by Kolmogorov–Smirnov distance
//! - CDF and upper-tail queries on the fitted distribution
//! - Seeded sampling from the fitted distribution

pub mod family;
pub mod goodness;
pub mod ranking;
pub mod sampling;
pub mod special;

// Re-export main types
pub use family::{Distribution, Family};
pub use goodness::ks_statistic;
pub use ranking::{rank_candidates, FitRanking, FittedDistribution};
pub use sampling::sample;
