//! Grouped reductions.
//!
//! Grouping and reducing are two separate steps: `TimingTable::group_by`
//! moves rows into partitions, `reduce_groups` applies a pure function to
//! each partition. The composed helpers below cover the common cases.

use super::stats::{max, mean};
use crate::table::{Column, Row, TimingTable};
use crate::utils::error::StatsError;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Mapping from group key to a per-group summary value
///
/// Iteration order is unspecified; use `sorted` when output order matters.
#[derive(Debug, Clone)]
pub struct GroupedAggregate<K, V> {
    values: HashMap<K, V>,
}

impl<K: Eq + Hash, V: PartialEq> PartialEq for GroupedAggregate<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl<K: Eq + Hash, V> Default for GroupedAggregate<K, V> {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for GroupedAggregate<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<K: Eq + Hash, V> GroupedAggregate<K, V> {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.values.contains_key(key)
    }

    /// Value for `key`
    ///
    /// # Errors
    /// * `StatsError::UnknownGroupKey` - No group has this key
    pub fn get<Q>(&self, key: &Q) -> Result<&V, StatsError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Display + ?Sized,
    {
        self.values
            .get(key)
            .ok_or_else(|| StatsError::UnknownGroupKey(key.to_string()))
    }

    /// Value for `key`, or `None` when absent
    pub fn value_of<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.values.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.values.iter()
    }

    /// Entries in ascending key order
    pub fn sorted(&self) -> Vec<(&K, &V)>
    where
        K: Ord,
    {
        let mut entries: Vec<(&K, &V)> = self.values.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl<K: Eq + Hash + Ord> GroupedAggregate<K, f64> {
    /// Key with the largest value; ties go to the smallest key
    pub fn top(&self) -> Option<(&K, f64)> {
        self.sorted()
            .into_iter()
            .fold(None, |best: Option<(&K, f64)>, (key, value)| match best {
                Some((_, best_value)) if best_value >= *value => best,
                _ => Some((key, *value)),
            })
    }
}

impl<K: Eq + Hash> GroupedAggregate<K, usize> {
    /// Sum of all group counts
    pub fn total(&self) -> usize {
        self.values.values().sum()
    }
}

/// Apply `reducer` to every partition
///
/// The first failing partition aborts the reduction; the partitions
/// themselves are left untouched so another reduction can be tried.
pub fn reduce_groups<K, V, E, F>(
    groups: &HashMap<K, TimingTable>,
    reducer: F,
) -> Result<GroupedAggregate<K, V>, E>
where
    K: Eq + Hash + Clone,
    F: Fn(&TimingTable) -> Result<V, E>,
{
    groups
        .iter()
        .map(|(key, part)| reducer(part).map(|value| (key.clone(), value)))
        .collect()
}

/// Mean of `column` per group
///
/// # Errors
/// * `StatsError::Table` - `column` is missing or not numeric
pub fn grouped_mean<K, F>(
    table: &TimingTable,
    key_fn: F,
    column: Column,
) -> Result<GroupedAggregate<K, f64>, StatsError>
where
    K: Eq + Hash + Clone,
    F: Fn(Row<'_>) -> K,
{
    let groups = table.group_by(key_fn);
    reduce_groups(&groups, |part| -> Result<f64, StatsError> {
        mean(&part.numeric_column(column)?)
    })
}

/// Maximum of `column` per group
pub fn grouped_max<K, F>(
    table: &TimingTable,
    key_fn: F,
    column: Column,
) -> Result<GroupedAggregate<K, f64>, StatsError>
where
    K: Eq + Hash + Clone,
    F: Fn(Row<'_>) -> K,
{
    let groups = table.group_by(key_fn);
    reduce_groups(&groups, |part| -> Result<f64, StatsError> {
        max(&part.numeric_column(column)?)
    })
}

/// Row count per group
pub fn grouped_count<K, F>(table: &TimingTable, key_fn: F) -> GroupedAggregate<K, usize>
where
    K: Eq + Hash,
    F: Fn(Row<'_>) -> K,
{
    table
        .group_by(key_fn)
        .into_iter()
        .map(|(key, part)| (key, part.len()))
        .collect()
}

/// Mean duration per step label
pub fn mean_duration_by_step(
    table: &TimingTable,
) -> Result<GroupedAggregate<String, f64>, StatsError> {
    grouped_mean(table, |row| row.step().to_string(), Column::Duration)
}
