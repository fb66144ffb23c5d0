//! Column schema for timing tables.
//!
//! Columns are a closed enum so a misspelled column is a compile error.
//! String names only enter through `Column::from_str` (CLI and config input).

use crate::utils::error::TableError;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A column of a `TimingTable`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Start,
    End,
    Step,
    Duration,
    HourOfDay,
    HoursSinceOrigin,
}

/// Storage type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Timestamp,
    Text,
    Float,
    Integer,
}

impl Column {
    /// Every column, base columns first
    pub const ALL: [Column; 6] = [
        Column::Start,
        Column::End,
        Column::Step,
        Column::Duration,
        Column::HourOfDay,
        Column::HoursSinceOrigin,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Column::Start => "start",
            Column::End => "end",
            Column::Step => "step",
            Column::Duration => "duration",
            Column::HourOfDay => "hour_of_day",
            Column::HoursSinceOrigin => "hours_since_origin",
        }
    }

    /// Base columns exist from `load` onward; the rest are derived on demand
    pub fn is_base(&self) -> bool {
        matches!(
            self,
            Column::Start | Column::End | Column::Step | Column::Duration
        )
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Start | Column::End => ColumnKind::Timestamp,
            Column::Step => ColumnKind::Text,
            Column::Duration => ColumnKind::Float,
            Column::HourOfDay | Column::HoursSinceOrigin => ColumnKind::Integer,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Column::Start => "step start time",
            Column::End => "step completion time",
            Column::Step => "step label",
            Column::Duration => "end - start in seconds (fractional)",
            Column::HourOfDay => "hour component of start (0-23)",
            Column::HoursSinceOrigin => "whole hours from the origin row's start (floored)",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Timestamp => "timestamp",
            ColumnKind::Text => "text",
            ColumnKind::Float => "float",
            ColumnKind::Integer => "integer",
        };
        f.write_str(name)
    }
}

impl FromStr for Column {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Column::Start),
            "end" => Ok(Column::End),
            "step" => Ok(Column::Step),
            "duration" => Ok(Column::Duration),
            "hour_of_day" | "hourofday" | "hour" => Ok(Column::HourOfDay),
            "hours_since_origin" | "hourssinceorigin" => Ok(Column::HoursSinceOrigin),
            _ => Err(TableError::UnknownColumn(s.to_string())),
        }
    }
}

/// A single cell
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Timestamp(NaiveDateTime),
    Text(String),
    Number(f64),
    Integer(i64),
}

impl Value {
    /// Numeric view of the cell, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            Value::Integer(v) => Some(*v as f64),
            Value::Timestamp(_) | Value::Text(_) => None,
        }
    }
}
