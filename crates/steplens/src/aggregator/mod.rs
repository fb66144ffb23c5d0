//! Aggregation of timing tables into summary statistics.
//!
//! This module provides:
//! - Reductions over a sample (mean, count, max, nearest-rank percentiles)
//! - Grouped reductions keyed by step label or time bucket

pub mod grouped;
pub mod stats;

// Re-export main types and functions
pub use grouped::{
    grouped_count, grouped_max, grouped_mean, mean_duration_by_step, reduce_groups,
    GroupedAggregate,
};
pub use stats::{
    count, is_constant, max, mean, min, percentile, percentiles, std_dev, summarize, variance,
    DurationSummary, PercentileValue,
};
