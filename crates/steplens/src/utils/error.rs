//! Error types for the entire library.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in commands and the CLI.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors that can occur while parsing raw timing text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Invalid header pattern: {0}")]
    InvalidPattern(String),
}

/// Errors that can occur while building or querying a timing table
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("Negative duration at row {row} (line {line}): end {end} is before start {start}")]
    NegativeDuration {
        row: usize,
        line: usize,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Column already exists: {0}")]
    DuplicateColumn(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Column is not numeric: {0}")]
    NonNumericColumn(String),

    #[error("Column cannot be derived (it is part of the base schema): {0}")]
    NotDerivable(String),

    #[error("Origin row {index} is out of range for a table of {len} rows")]
    OriginOutOfRange { index: usize, len: usize },
}

/// Errors that can occur during aggregation and correlation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Cannot compute {context} over an empty input")]
    EmptyAggregateInput { context: String },

    #[error("Percentile must be within [0, 100], got {0}")]
    InvalidPercentile(f64),

    #[error("Unknown group key: {0}")]
    UnknownGroupKey(String),

    #[error("Correlation is undefined: {0}")]
    DegenerateCorrelation(String),

    #[error("Series lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Errors that can occur while fitting distributions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    #[error("Failed to fit {family} distribution: {reason}")]
    DistributionFitFailure { family: String, reason: String },

    #[error("Cannot fit a distribution to an empty sample")]
    EmptySample,

    #[error("No candidate families were given")]
    NoCandidates,

    #[error("Every candidate family failed to fit ({0} tried)")]
    AllCandidatesFailed(usize),
}

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors that can occur while rendering a report
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write report: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
