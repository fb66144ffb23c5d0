//! Column-oriented table of timed steps.
//!
//! Built once from parsed records. Base columns (start, end, step, duration)
//! never change after `load`; derived integer columns can only be appended.
//! `filter` and `group_by` return new tables and leave the source untouched.

use super::column::{Column, Value};
use crate::parser::TimingRecord;
use crate::utils::error::TableError;
use chrono::{NaiveDateTime, Timelike};
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

const SECONDS_PER_HOUR: i64 = 3600;

/// Timing table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimingTable {
    starts: Vec<NaiveDateTime>,
    ends: Vec<NaiveDateTime>,
    steps: Vec<String>,
    durations: Vec<f64>,
    lines: Vec<usize>,
    derived: BTreeMap<Column, Vec<i64>>,
    origin: Option<NaiveDateTime>,
}

/// Borrowed view of one row
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a TimingTable,
    index: usize,
}

impl<'a> Row<'a> {
    /// Position within the owning table
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn start(&self) -> NaiveDateTime {
        self.table.starts[self.index]
    }

    pub fn end(&self) -> NaiveDateTime {
        self.table.ends[self.index]
    }

    pub fn step(&self) -> &'a str {
        &self.table.steps[self.index]
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.table.durations[self.index]
    }

    /// 1-based line in the source text
    pub fn line(&self) -> usize {
        self.table.lines[self.index]
    }

    /// Value of a derived column, if it has been added
    pub fn derived(&self, column: Column) -> Option<i64> {
        self.table
            .derived
            .get(&column)
            .map(|values| values[self.index])
    }

    pub fn hour_of_day(&self) -> Option<i64> {
        self.derived(Column::HourOfDay)
    }

    pub fn hours_since_origin(&self) -> Option<i64> {
        self.derived(Column::HoursSinceOrigin)
    }

    /// Cell value for any column
    pub fn value(&self, column: Column) -> Option<Value> {
        match column {
            Column::Start => Some(Value::Timestamp(self.start())),
            Column::End => Some(Value::Timestamp(self.end())),
            Column::Step => Some(Value::Text(self.step().to_string())),
            Column::Duration => Some(Value::Number(self.duration())),
            Column::HourOfDay | Column::HoursSinceOrigin => {
                self.derived(column).map(Value::Integer)
            }
        }
    }
}

impl TimingTable {
    /// Build a table from parsed records
    ///
    /// **Public** - main entry point for table construction
    ///
    /// # Arguments
    /// * `records` - Records in input order
    ///
    /// # Returns
    /// Table with the duration column computed for every row
    ///
    /// # Errors
    /// * `TableError::NegativeDuration` - First row whose end precedes its start
    pub fn load(records: &[TimingRecord]) -> Result<Self, TableError> {
        let mut table = Self::with_capacity(records.len());

        for (row, record) in records.iter().enumerate() {
            let duration = record_duration(row, record)?;
            table.push(record, duration);
        }

        debug!("Loaded timing table with {} rows", table.len());
        Ok(table)
    }

    /// Build a table, skipping and reporting rows with negative durations
    pub fn load_lenient(records: &[TimingRecord]) -> (Self, Vec<TableError>) {
        let mut table = Self::with_capacity(records.len());
        let mut rejected = Vec::new();

        for (row, record) in records.iter().enumerate() {
            match record_duration(row, record) {
                Ok(duration) => table.push(record, duration),
                Err(e) => {
                    warn!("Skipping {}", e);
                    rejected.push(e);
                }
            }
        }

        debug!(
            "Loaded timing table with {} rows ({} rejected)",
            table.len(),
            rejected.len()
        );
        (table, rejected)
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            starts: Vec::with_capacity(capacity),
            ends: Vec::with_capacity(capacity),
            steps: Vec::with_capacity(capacity),
            durations: Vec::with_capacity(capacity),
            lines: Vec::with_capacity(capacity),
            derived: BTreeMap::new(),
            origin: None,
        }
    }

    fn push(&mut self, record: &TimingRecord, duration: f64) {
        self.starts.push(record.start);
        self.ends.push(record.end);
        self.steps.push(record.step.clone());
        self.durations.push(duration);
        self.lines.push(record.line);
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        (index < self.len()).then_some(Row { table: self, index })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        (0..self.len()).map(move |index| Row { table: self, index })
    }

    /// Duration column as a slice, aligned to row order
    pub fn durations(&self) -> &[f64] {
        &self.durations
    }

    /// Distinct step labels in first-seen order
    pub fn steps(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for step in &self.steps {
            if !labels.contains(&step.as_str()) {
                labels.push(step);
            }
        }
        labels
    }

    /// Origin timestamp used for hours-since-origin, once time features exist
    pub fn origin(&self) -> Option<NaiveDateTime> {
        self.origin
    }

    pub fn has_column(&self, column: Column) -> bool {
        column.is_base() || self.derived.contains_key(&column)
    }

    /// Columns currently present, in schema order
    pub fn columns(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|c| self.has_column(*c))
            .collect()
    }

    /// Append a derived integer column
    ///
    /// # Errors
    /// * `TableError::NotDerivable` - `column` is a base column
    /// * `TableError::DuplicateColumn` - `column` was already added
    pub fn add_derived_column<F>(&mut self, column: Column, row_fn: F) -> Result<(), TableError>
    where
        F: Fn(Row<'_>) -> i64,
    {
        if column.is_base() {
            return Err(TableError::NotDerivable(column.to_string()));
        }
        if self.derived.contains_key(&column) {
            return Err(TableError::DuplicateColumn(column.to_string()));
        }

        let values: Vec<i64> = self.rows().map(row_fn).collect();
        self.derived.insert(column, values);

        debug!("Added derived column '{}'", column);
        Ok(())
    }

    /// Add hour-of-day and hours-since-origin
    ///
    /// The origin is the `start` of row `origin_row`. Rows that start before
    /// the origin get negative hours; they are counted and logged, not rejected.
    ///
    /// # Errors
    /// * `TableError::OriginOutOfRange` - Table has `origin_row` rows or fewer
    /// * `TableError::DuplicateColumn` - Time features were already added
    pub fn add_time_features(&mut self, origin_row: usize) -> Result<(), TableError> {
        let origin = *self
            .starts
            .get(origin_row)
            .ok_or(TableError::OriginOutOfRange {
                index: origin_row,
                len: self.len(),
            })?;

        self.add_derived_column(Column::HourOfDay, |row| i64::from(row.start().hour()))?;
        self.add_derived_column(Column::HoursSinceOrigin, |row| {
            hours_between(origin, row.start())
        })?;
        self.origin = Some(origin);

        let before_origin = self
            .rows()
            .filter(|row| row.hours_since_origin().unwrap_or(0) < 0)
            .count();
        if before_origin > 0 {
            warn!(
                "{} rows start before the origin ({}); input may be unsorted",
                before_origin, origin
            );
        }

        Ok(())
    }

    /// Rows matching `predicate`, in their original order
    pub fn filter<P>(&self, predicate: P) -> TimingTable
    where
        P: Fn(Row<'_>) -> bool,
    {
        let indices: Vec<usize> = self
            .rows()
            .filter(|row| predicate(*row))
            .map(|row| row.index)
            .collect();
        self.select(&indices)
    }

    /// Rows for a single step label
    pub fn filter_step(&self, step: &str) -> TimingTable {
        self.filter(|row| row.step() == step)
    }

    /// Partition rows by key, preserving row order within each partition
    pub fn group_by<K, F>(&self, key_fn: F) -> HashMap<K, TimingTable>
    where
        K: Eq + Hash,
        F: Fn(Row<'_>) -> K,
    {
        let mut partitions: HashMap<K, Vec<usize>> = HashMap::new();
        for row in self.rows() {
            partitions.entry(key_fn(row)).or_default().push(row.index);
        }

        partitions
            .into_iter()
            .map(|(key, indices)| (key, self.select(&indices)))
            .collect()
    }

    /// Partition rows by step label
    pub fn group_by_step(&self) -> HashMap<String, TimingTable> {
        self.group_by(|row| row.step().to_string())
    }

    /// Extract one column aligned to row order
    ///
    /// # Errors
    /// * `TableError::UnknownColumn` - Derived column has not been added
    pub fn column(&self, column: Column) -> Result<Vec<Value>, TableError> {
        if !self.has_column(column) {
            return Err(TableError::UnknownColumn(column.to_string()));
        }

        Ok(self
            .rows()
            .filter_map(|row| row.value(column))
            .collect())
    }

    /// Extract a numeric column as `f64`
    ///
    /// # Errors
    /// * `TableError::UnknownColumn` - Derived column has not been added
    /// * `TableError::NonNumericColumn` - Column holds timestamps or text
    pub fn numeric_column(&self, column: Column) -> Result<Vec<f64>, TableError> {
        match column {
            Column::Duration => Ok(self.durations.clone()),
            Column::Start | Column::End | Column::Step => {
                Err(TableError::NonNumericColumn(column.to_string()))
            }
            Column::HourOfDay | Column::HoursSinceOrigin => self
                .derived
                .get(&column)
                .map(|values| values.iter().map(|v| *v as f64).collect())
                .ok_or_else(|| TableError::UnknownColumn(column.to_string())),
        }
    }

    fn select(&self, indices: &[usize]) -> TimingTable {
        TimingTable {
            starts: indices.iter().map(|&i| self.starts[i]).collect(),
            ends: indices.iter().map(|&i| self.ends[i]).collect(),
            steps: indices.iter().map(|&i| self.steps[i].clone()).collect(),
            durations: indices.iter().map(|&i| self.durations[i]).collect(),
            lines: indices.iter().map(|&i| self.lines[i]).collect(),
            derived: self
                .derived
                .iter()
                .map(|(column, values)| (*column, indices.iter().map(|&i| values[i]).collect()))
                .collect(),
            origin: self.origin,
        }
    }
}

/// Duration of a record in fractional seconds
fn record_duration(row: usize, record: &TimingRecord) -> Result<f64, TableError> {
    (record.end - record.start)
        .to_std()
        .map(|elapsed| elapsed.as_secs_f64())
        .map_err(|_| TableError::NegativeDuration {
            row,
            line: record.line,
            start: record.start,
            end: record.end,
        })
}

/// Whole hours from `origin` to `at`, floored (negative before the origin)
fn hours_between(origin: NaiveDateTime, at: NaiveDateTime) -> i64 {
    (at - origin).num_seconds().div_euclid(SECONDS_PER_HOUR)
}
