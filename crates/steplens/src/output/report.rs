//! Schema for analysis reports.
//!
//! Everything an analysis run produces, in one serializable tree. The JSON
//! writer and the terminal renderer both read from this structure.

use crate::aggregator::DurationSummary;
use crate::correlation::{BucketPoint, BucketSeries, CorrelationSummary};
use crate::fit::{Distribution, Family, FitRanking};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::StatsError;
use serde::Serialize;

/// Complete result of one analysis run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Schema version for the report format
    pub version: String,

    /// Timestamp when the report was generated (RFC 3339, UTC)
    pub generated_at: String,

    /// What was read and what was rejected
    pub input: InputSummary,

    /// Start time of the origin row
    pub origin: Option<String>,

    /// Durations across every step
    pub overall: DurationSummary,

    /// Durations per step, ordered by label
    pub steps: Vec<StepSummary>,

    /// Step with the highest mean duration
    pub slowest_step: Option<SlowestStep>,

    /// Distribution fit for the analysed step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<FitReport>,

    /// Row count and mean duration per hour of day
    pub hour_of_day: BucketReport,

    /// Row count and mean duration per hour since the origin
    pub hours_since_origin: BucketReport,
}

/// Input bookkeeping
#[derive(Debug, Clone, Default, Serialize)]
pub struct InputSummary {
    /// Input file as given on the command line
    pub source: String,

    /// Rows in the timing table
    pub row_count: usize,

    /// Distinct batch identifiers seen in header lines
    pub batch_count: usize,

    /// Header lines skipped
    pub header_count: usize,

    /// Rows dropped in lenient mode
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RejectedRow>,
}

/// A row dropped in lenient mode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRow {
    /// "parse" or "load"
    pub stage: String,

    /// Error message, including the source line
    pub message: String,
}

/// Summary for one step label
#[derive(Debug, Clone, Serialize)]
pub struct StepSummary {
    pub step: String,

    #[serde(flatten)]
    pub summary: DurationSummary,
}

/// The slowest step by mean duration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlowestStep {
    pub step: String,
    pub mean_duration: f64,
}

/// Ranked fits and queries on the best one
#[derive(Debug, Clone, Serialize)]
pub struct FitReport {
    /// Step whose durations were fitted
    pub step: String,

    /// Number of durations fitted
    pub sample_size: usize,

    /// Candidates, best first
    pub candidates: Vec<CandidateFit>,

    /// Candidates that could not be fitted
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,

    /// `P(X <= x)` on the best fit
    pub cdf: Vec<ProbabilityQuery>,

    /// `P(X > x)` on the best fit
    pub complementary_cdf: Vec<ProbabilityQuery>,

    /// Variates drawn from the best fit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<SampleReport>,
}

/// One ranked candidate
#[derive(Debug, Clone, Serialize)]
pub struct CandidateFit {
    pub rank: usize,
    pub family: Family,
    pub ks_statistic: f64,
    pub parameters: Distribution,
    pub mean: f64,
    pub variance: f64,
}

/// A probability evaluated at one point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProbabilityQuery {
    pub x: f64,
    pub probability: f64,
}

/// Drawn variates
#[derive(Debug, Clone, Serialize)]
pub struct SampleReport {
    pub seed: Option<u64>,
    pub values: Vec<f64>,
}

/// Aligned bucket series with its correlations
#[derive(Debug, Clone, Default, Serialize)]
pub struct BucketReport {
    pub buckets: Vec<BucketPoint<i64>>,

    /// Bucket row count against bucket mean duration
    pub count_vs_mean_duration: Option<CorrelationSummary>,

    /// Per-row feature value against duration
    pub feature_vs_duration: Option<CorrelationSummary>,

    /// Why a correlation is missing, if one is
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl AnalysisReport {
    /// Start a report with the version and timestamp filled in
    pub fn new(input: InputSummary, overall: DurationSummary) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            input,
            origin: None,
            overall,
            steps: Vec::new(),
            slowest_step: None,
            fit: None,
            hour_of_day: BucketReport::default(),
            hours_since_origin: BucketReport::default(),
        }
    }

    /// Summary for `step`, if present
    pub fn step(&self, step: &str) -> Option<&DurationSummary> {
        self.steps
            .iter()
            .find(|s| s.step == step)
            .map(|s| &s.summary)
    }
}

impl FitReport {
    /// Build from a ranking, evaluating the best fit at the query points
    pub fn from_ranking(
        step: &str,
        ranking: &FitRanking,
        cdf_at: &[f64],
        ccdf_at: &[f64],
    ) -> Self {
        let best = ranking.best();

        Self {
            step: step.to_string(),
            sample_size: ranking.sample_size(),
            candidates: ranking
                .ranked()
                .iter()
                .map(|fitted| CandidateFit {
                    rank: fitted.rank,
                    family: fitted.family(),
                    ks_statistic: fitted.ks_statistic,
                    parameters: fitted.distribution,
                    mean: fitted.mean(),
                    variance: fitted.variance(),
                })
                .collect(),
            failures: ranking.failures().iter().map(|e| e.to_string()).collect(),
            cdf: cdf_at
                .iter()
                .map(|&x| ProbabilityQuery {
                    x,
                    probability: best.cdf(x),
                })
                .collect(),
            complementary_cdf: ccdf_at
                .iter()
                .map(|&x| ProbabilityQuery {
                    x,
                    probability: best.complementary_cdf(x),
                })
                .collect(),
            sample: None,
        }
    }

    /// Ranked family order, best first
    pub fn order(&self) -> Vec<Family> {
        self.candidates.iter().map(|c| c.family).collect()
    }
}

impl BucketReport {
    /// Aligned buckets plus whichever correlations are defined
    pub fn from_series(
        series: &BucketSeries<i64>,
        feature: Result<CorrelationSummary, StatsError>,
    ) -> Self {
        let mut notes = Vec::new();

        let count_vs_mean_duration = match series.count_duration_correlation() {
            Ok(summary) => Some(summary),
            Err(e) => {
                notes.push(format!("count vs mean duration: {}", e));
                None
            }
        };
        let feature_vs_duration = match feature {
            Ok(summary) => Some(summary),
            Err(e) => {
                notes.push(format!("feature vs duration: {}", e));
                None
            }
        };

        Self {
            buckets: series.aligned(),
            count_vs_mean_duration,
            feature_vs_duration,
            notes,
        }
    }
}
