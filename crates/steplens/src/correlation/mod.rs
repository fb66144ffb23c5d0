//! Time-of-day and elapsed-time correlation with duration.
//!
//! This module provides:
//! - Bucket series (row count and mean duration per key), aligned by key
//! - Hour-of-day and hours-since-origin bucketing
//! - Pearson and Spearman coefficients over buckets or rows

pub mod buckets;
pub mod coefficients;

// Re-export main types and functions
pub use buckets::{
    bucket_by, by_hour_of_day, by_hours_since_origin, feature_correlation, BucketPoint,
    BucketSeries,
};
pub use coefficients::{average_ranks, correlate, pearson, spearman, CorrelationSummary};
