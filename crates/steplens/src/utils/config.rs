//! Configuration and constants for the analysis pipeline.
//!
//! Every setting has a compiled-in default. An optional TOML file can
//! override any section, and CLI flags override the file.

use crate::fit::Family;
use crate::utils::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Batch header: canonical 8-4-4-4-12 UUID at line start, any case, ending
/// at a word boundary (`<uuid>ff` is not a header)
pub const BATCH_HEADER_PATTERN: &str =
    r"^(?i)([0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12})\b";

/// Timestamp layouts tried in order. The first two cover `en-NZ` output
/// (`16/10/2026 14:05:09` and `16/10/2026 2:05:09 pm`).
pub const DEFAULT_TIMESTAMP_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %I:%M:%S %p",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Row whose `start` is the origin for hours-since-origin (the second row)
pub const DEFAULT_ORIGIN_ROW: usize = 1;

/// Percentiles reported for every duration summary
pub const DEFAULT_PERCENTILES: &[f64] = &[50.0, 90.0, 95.0, 99.0];

/// Candidate families, in tie-break order
pub const DEFAULT_CANDIDATES: &[Family] = &[Family::Gamma, Family::Normal, Family::Poisson];

/// CDF query points (seconds) evaluated on the best fit
pub const DEFAULT_CDF_POINTS: &[f64] = &[100.0];

/// Complementary CDF query points (seconds) evaluated on the best fit
pub const DEFAULT_CCDF_POINTS: &[f64] = &[50.0];

/// Upper bound on variates drawn by `--sample`
pub const MAX_SAMPLE_SIZE: usize = 1_000_000;

/// Complete analysis configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct AnalysisConfig {
    /// Input parsing settings
    #[serde(default)]
    pub parser: ParserSettings,

    /// Table and aggregation settings
    #[serde(default)]
    pub analysis: AnalysisSettings,

    /// Distribution fitting settings
    #[serde(default)]
    pub fit: FitSettings,
}

/// Input parsing settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ParserSettings {
    /// chrono format strings, tried in order
    pub timestamp_formats: Vec<String>,

    /// Collect malformed rows instead of stopping at the first one
    pub lenient: bool,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            timestamp_formats: DEFAULT_TIMESTAMP_FORMATS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            lenient: false,
        }
    }
}

/// Table and aggregation settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Index of the row whose start time is the origin
    pub origin_row: usize,

    /// Percentiles to report (0..=100)
    pub percentiles: Vec<f64>,

    /// Step to fit; defaults to the step with the highest mean duration
    pub step: Option<String>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            origin_row: DEFAULT_ORIGIN_ROW,
            percentiles: DEFAULT_PERCENTILES.to_vec(),
            step: None,
        }
    }
}

/// Distribution fitting settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FitSettings {
    /// Candidate families in tie-break order
    pub candidates: Vec<Family>,

    /// Points at which to evaluate the best fit's CDF
    pub cdf_at: Vec<f64>,

    /// Points at which to evaluate the best fit's complementary CDF
    pub ccdf_at: Vec<f64>,

    /// Number of variates to draw from the best fit (0 = none)
    pub sample_size: usize,

    /// Seed for reproducible sampling
    pub seed: Option<u64>,
}

impl Default for FitSettings {
    fn default() -> Self {
        Self {
            candidates: DEFAULT_CANDIDATES.to_vec(),
            cdf_at: DEFAULT_CDF_POINTS.to_vec(),
            ccdf_at: DEFAULT_CCDF_POINTS.to_vec(),
            sample_size: 0,
            seed: None,
        }
    }
}

impl AnalysisConfig {
    /// Check values that serde cannot reject on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parser.timestamp_formats.is_empty() {
            return Err(ConfigError::Invalid(
                "parser.timestamp_formats must not be empty".to_string(),
            ));
        }

        if let Some(p) = self
            .analysis
            .percentiles
            .iter()
            .find(|p| !(0.0..=100.0).contains(*p))
        {
            return Err(ConfigError::Invalid(format!(
                "analysis.percentiles contains {} (must be within 0..=100)",
                p
            )));
        }

        if self.fit.candidates.is_empty() {
            return Err(ConfigError::Invalid(
                "fit.candidates must name at least one family".to_string(),
            ));
        }

        if self.fit.sample_size > MAX_SAMPLE_SIZE {
            return Err(ConfigError::Invalid(format!(
                "fit.sample_size is too large (max {})",
                MAX_SAMPLE_SIZE
            )));
        }

        Ok(())
    }
}

/// Load an analysis configuration from a TOML file
///
/// # Arguments
/// * `path` - Path to the TOML configuration file
///
/// # Errors
/// * `ConfigError::Io` - If file cannot be read
/// * `ConfigError::Parse` - If TOML is invalid
/// * `ConfigError::Invalid` - If a value is out of range
///
/// # Example
/// ```ignore
/// let config = load_config("steplens.toml")?;
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<AnalysisConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: AnalysisConfig = toml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}
