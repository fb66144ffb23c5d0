//! Bucketed duration series.
//!
//! A bucket series pairs, for every key, the number of rows and their mean
//! duration. Both aggregates come from the same partition, so their keys
//! always match.

use super::coefficients::{correlate, CorrelationSummary};
use crate::aggregator::{mean, reduce_groups, GroupedAggregate};
use crate::table::{Column, Row, TimingTable};
use crate::utils::error::{StatsError, TableError};
use log::debug;
use serde::Serialize;
use std::hash::Hash;

/// Per-bucket row counts and mean durations
#[derive(Debug, Clone, PartialEq)]
pub struct BucketSeries<K: Eq + Hash> {
    pub mean_duration: GroupedAggregate<K, f64>,
    pub counts: GroupedAggregate<K, usize>,
}

/// One aligned bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketPoint<K> {
    pub key: K,
    pub count: usize,
    pub mean_duration: f64,
}

impl<K: Eq + Hash + Ord + Clone> BucketSeries<K> {
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Buckets in ascending key order
    pub fn aligned(&self) -> Vec<BucketPoint<K>> {
        self.counts
            .sorted()
            .into_iter()
            .filter_map(|(key, count)| {
                self.mean_duration
                    .value_of(key)
                    .map(|mean_duration| BucketPoint {
                        key: key.clone(),
                        count: *count,
                        mean_duration: *mean_duration,
                    })
            })
            .collect()
    }

    /// Correlation between bucket row count and bucket mean duration
    ///
    /// # Errors
    /// * `StatsError::DegenerateCorrelation` - Fewer than two buckets, or
    ///   every bucket has the same count or mean
    pub fn count_duration_correlation(&self) -> Result<CorrelationSummary, StatsError> {
        let points = self.aligned();
        let counts: Vec<f64> = points.iter().map(|p| p.count as f64).collect();
        let means: Vec<f64> = points.iter().map(|p| p.mean_duration).collect();
        correlate(&counts, &means)
    }
}

/// Bucket rows by `key_fn` and summarise each bucket
///
/// # Example
/// ```ignore
/// let by_step = bucket_by(&table, |row| row.step().to_string())?;
/// for point in by_step.aligned() {
///     println!("{}: {} rows, {:.2}s", point.key, point.count, point.mean_duration);
/// }
/// ```
pub fn bucket_by<K, F>(table: &TimingTable, key_fn: F) -> Result<BucketSeries<K>, StatsError>
where
    K: Eq + Hash + Clone,
    F: Fn(Row<'_>) -> K,
{
    let groups = table.group_by(key_fn);

    let counts = groups
        .iter()
        .map(|(key, part)| (key.clone(), part.len()))
        .collect();
    let mean_duration = reduce_groups(&groups, |part| mean(part.durations()))?;

    debug!("Bucketed {} rows into {} buckets", table.len(), groups.len());
    Ok(BucketSeries {
        mean_duration,
        counts,
    })
}

/// Buckets keyed by hour of day (0-23)
///
/// # Errors
/// * `StatsError::Table` - Time features have not been added
pub fn by_hour_of_day(table: &TimingTable) -> Result<BucketSeries<i64>, StatsError> {
    bucket_by_derived(table, Column::HourOfDay)
}

/// Buckets keyed by whole hours since the origin
///
/// # Errors
/// * `StatsError::Table` - Time features have not been added
pub fn by_hours_since_origin(table: &TimingTable) -> Result<BucketSeries<i64>, StatsError> {
    bucket_by_derived(table, Column::HoursSinceOrigin)
}

/// Row-level correlation between a numeric column and duration
///
/// # Errors
/// * `StatsError::Table` - `column` is missing or not numeric
/// * `StatsError::DegenerateCorrelation` - Too few rows or a constant column
pub fn feature_correlation(
    table: &TimingTable,
    column: Column,
) -> Result<CorrelationSummary, StatsError> {
    let feature = table.numeric_column(column)?;
    correlate(&feature, table.durations())
}

fn bucket_by_derived(
    table: &TimingTable,
    column: Column,
) -> Result<BucketSeries<i64>, StatsError> {
    if !table.has_column(column) {
        return Err(TableError::UnknownColumn(column.to_string()).into());
    }
    // Presence checked above, so every row has a value
    bucket_by(table, |row| row.derived(column).unwrap_or_default())
}
