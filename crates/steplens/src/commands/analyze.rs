//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Reads and parses the timing log
//! 2. Builds the timing table and derives time features
//! 3. Summarises durations overall and per step
//! 4. Fits candidate distributions to one step's durations
//! 5. Buckets durations by hour of day and hours since origin
//! 6. Assembles the report

use crate::aggregator::{mean_duration_by_step, summarize};
use crate::commands::models::AnalyzeArgs;
use crate::correlation::{by_hour_of_day, by_hours_since_origin, feature_correlation};
use crate::fit::rank_candidates;
use crate::output::{
    render_terminal_summary, write_report, AnalysisReport, BucketReport, FitReport,
    InputSummary, RejectedRow, SampleReport, SlowestStep, StepSummary,
};
use crate::parser::{ParsePolicy, RecordParser};
use crate::table::{Column, TimingTable};
use crate::utils::config::{load_config, AnalysisConfig, MAX_SAMPLE_SIZE};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fs;
use std::io;
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Analyze command arguments
///
/// # Returns
/// The assembled report; printing is left to `print_report`
///
/// # Errors
/// * Unreadable input or config file
/// * Malformed rows or negative durations (unless lenient)
/// * Empty input or an unknown `--step`
///
/// # Example
/// ```ignore
/// let args = AnalyzeArgs {
///     input: PathBuf::from("timings.csv"),
///     seed: Some(42),
///     sample: Some(100),
///     ..Default::default()
/// };
///
/// let report = execute_analyze(&args)?;
/// print_report(&report, &args)?;
/// ```
pub fn execute_analyze(args: &AnalyzeArgs) -> Result<AnalysisReport> {
    let start_time = Instant::now();
    let config = resolve_config(args)?;

    info!("Step 1/6: Reading {}", args.input.display());
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read input file {}", args.input.display()))?;

    let parser = RecordParser::new()
        .with_formats(config.parser.timestamp_formats.iter().cloned())
        .with_policy(ParsePolicy::from_lenient(config.parser.lenient));
    let parsed = parser
        .parse(&text)
        .context("Failed to parse timing records")?;

    let mut rejected: Vec<RejectedRow> = parsed
        .rejected
        .iter()
        .map(|e| RejectedRow {
            stage: "parse".to_string(),
            message: e.to_string(),
        })
        .collect();

    info!("Step 2/6: Building timing table");
    let mut table = if config.parser.lenient {
        let (table, errors) = TimingTable::load_lenient(&parsed.records);
        rejected.extend(errors.iter().map(|e| RejectedRow {
            stage: "load".to_string(),
            message: e.to_string(),
        }));
        table
    } else {
        TimingTable::load(&parsed.records).context("Failed to build timing table")?
    };

    if table.is_empty() {
        anyhow::bail!("No timing records found in {}", args.input.display());
    }

    let (origin_row, origin_note) = resolve_origin_row(config.analysis.origin_row, table.len());
    table
        .add_time_features(origin_row)
        .context("Failed to derive time features")?;
    debug!(
        "Table has {} rows, columns: {:?}",
        table.len(),
        table.columns()
    );

    info!("Step 3/6: Summarising durations");
    let input = InputSummary {
        source: args.input.display().to_string(),
        row_count: table.len(),
        batch_count: parsed.batch_ids().len(),
        header_count: parsed.header_count,
        rejected,
    };
    let percentiles = &config.analysis.percentiles;
    let overall =
        summarize(table.durations(), percentiles).context("Failed to summarise durations")?;
    info!("All steps: {}", overall.summary());

    let mut report = AnalysisReport::new(input, overall);
    report.origin = table.origin().map(|o| o.to_string());
    report.steps = summarize_steps(&table, percentiles)?;

    let step_means = mean_duration_by_step(&table).context("Failed to compute step means")?;
    report.slowest_step = step_means.top().map(|(step, mean)| SlowestStep {
        step: step.clone(),
        mean_duration: mean,
    });
    if let Some(slowest) = &report.slowest_step {
        info!(
            "Slowest step: {} (mean {:.2}s)",
            slowest.step, slowest.mean_duration
        );
    }

    info!("Step 4/6: Fitting distributions");
    let fit_step = match &config.analysis.step {
        Some(step) => {
            step_means
                .get(step.as_str())
                .with_context(|| format!("Cannot fit step '{}'", step))?;
            Some(step.clone())
        }
        None => report.slowest_step.as_ref().map(|s| s.step.clone()),
    };
    if let Some(step) = fit_step {
        report.fit = fit_step_durations(&table, &step, &config);
    }

    info!("Step 5/6: Bucketing by hour of day and hours since origin");
    let hours = by_hour_of_day(&table).context("Failed to bucket by hour of day")?;
    report.hour_of_day =
        BucketReport::from_series(&hours, feature_correlation(&table, Column::HourOfDay));

    let elapsed =
        by_hours_since_origin(&table).context("Failed to bucket by hours since origin")?;
    report.hours_since_origin = BucketReport::from_series(
        &elapsed,
        feature_correlation(&table, Column::HoursSinceOrigin),
    );
    if let Some(note) = origin_note {
        report.hours_since_origin.notes.insert(0, note);
    }
    debug!(
        "{} hour-of-day buckets, {} hours-since-origin buckets",
        hours.len(),
        elapsed.len()
    );

    info!("Step 6/6: Assembling report");
    info!(
        "Analysis completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(report)
}

/// Print a report to stdout
///
/// **Public** - called from main.rs after `execute_analyze`
///
/// With `--json` the JSON goes to stdout and any terminal summary goes to
/// stderr, so stdout stays machine-readable.
pub fn print_report(report: &AnalysisReport, args: &AnalyzeArgs) -> Result<()> {
    if args.json {
        write_report(report, io::stdout().lock()).context("Failed to print JSON report")?;
        if args.summary {
            eprintln!("{}", render_terminal_summary(report));
        }
    } else {
        println!("{}", render_terminal_summary(report));
    }
    Ok(())
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
///
/// # Arguments
/// * `args` - Arguments to validate
///
/// # Returns
/// Ok if arguments are valid, Err with message if not
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if !args.input.is_file() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    if let Some(config) = &args.config {
        if !config.is_file() {
            anyhow::bail!("Config file not found: {}", config.display());
        }
    }

    if let Some(step) = &args.step {
        if step.trim().is_empty() {
            anyhow::bail!("Step label cannot be empty");
        }
    }

    if let Some(n) = args.sample {
        if n > MAX_SAMPLE_SIZE {
            anyhow::bail!("Sample size is too large (max {})", MAX_SAMPLE_SIZE);
        }
    }

    Ok(())
}

/// Config file (or defaults) with CLI overrides applied
///
/// **Private** - internal helper for execute_analyze
fn resolve_config(args: &AnalyzeArgs) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    if args.lenient {
        config.parser.lenient = true;
    }
    if let Some(step) = &args.step {
        config.analysis.step = Some(step.clone());
    }
    if let Some(origin_row) = args.origin_row {
        config.analysis.origin_row = origin_row;
    }
    if let Some(seed) = args.seed {
        config.fit.seed = Some(seed);
    }
    if let Some(n) = args.sample {
        config.fit.sample_size = n;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Origin row to use, falling back to the first row when the configured
/// one is past the end of the table
///
/// **Private** - internal helper for execute_analyze
fn resolve_origin_row(requested: usize, rows: usize) -> (usize, Option<String>) {
    if requested < rows {
        return (requested, None);
    }

    let note = format!(
        "origin row {} is out of range for {} rows; measured from row 0",
        requested, rows
    );
    warn!("{}", note);
    (0, Some(note))
}

/// Per-step summaries ordered by label
///
/// **Private** - internal helper for execute_analyze
fn summarize_steps(table: &TimingTable, percentiles: &[f64]) -> Result<Vec<StepSummary>> {
    let mut steps: Vec<&str> = table.steps();
    steps.sort_unstable();

    steps
        .into_iter()
        .map(|step| -> Result<StepSummary> {
            let part = table.filter_step(step);
            let summary = summarize(part.durations(), percentiles)
                .with_context(|| format!("Failed to summarise step '{}'", step))?;
            debug!("{}: {}", step, summary.summary());
            Ok(StepSummary {
                step: step.to_string(),
                summary,
            })
        })
        .collect()
}

/// Rank candidate fits for one step
///
/// A step that cannot be fitted is logged and left out of the report
/// rather than failing the whole run.
///
/// **Private** - internal helper for execute_analyze
fn fit_step_durations(
    table: &TimingTable,
    step: &str,
    config: &AnalysisConfig,
) -> Option<FitReport> {
    let durations = table.filter_step(step).durations().to_vec();

    let ranking = match rank_candidates(&durations, &config.fit.candidates) {
        Ok(ranking) => ranking,
        Err(e) => {
            warn!("Could not fit step '{}': {}", step, e);
            return None;
        }
    };

    let best = ranking.best();
    info!(
        "Best fit for {}: {} (D = {:.4})",
        step,
        best.distribution.describe(),
        best.ks_statistic
    );

    let mut report = FitReport::from_ranking(
        step,
        &ranking,
        &config.fit.cdf_at,
        &config.fit.ccdf_at,
    );
    if config.fit.sample_size > 0 {
        report.sample = Some(SampleReport {
            seed: config.fit.seed,
            values: best.sample(config.fit.sample_size, config.fit.seed),
        });
    }

    Some(report)
}
