//! Terminal rendering for analysis reports.

use super::report::{AnalysisReport, BucketReport, FitReport};
use crate::aggregator::DurationSummary;
use crate::correlation::CorrelationSummary;
use colored::*;

/// Buckets listed before the rest are elided
const MAX_BUCKET_ROWS: usize = 24;

const RULE: &str = "---------------------------------------------------\n";

/// Render a human-readable summary of a report for the terminal
pub fn render_terminal_summary(report: &AnalysisReport) -> String {
    let mut out = String::new();

    out.push_str(&render_header(report));
    out.push_str(&render_overall(&report.overall));
    out.push_str(&render_steps(report));
    if let Some(fit) = &report.fit {
        out.push_str(&render_fit(fit));
    }
    out.push_str(&render_buckets("Hour of day", &report.hour_of_day));
    out.push_str(&render_buckets("Hours since origin", &report.hours_since_origin));
    out.push_str(&render_rejected(report));

    out
}

fn render_header(report: &AnalysisReport) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&"Step Timing Summary".bold().to_string());
    out.push('\n');
    out.push_str(RULE);
    out.push_str(&format!("Input:   {}\n", report.input.source));
    out.push_str(&format!(
        "Rows:    {} ({} batches, {} header lines)\n",
        report.input.row_count, report.input.batch_count, report.input.header_count
    ));
    if let Some(origin) = &report.origin {
        out.push_str(&format!("Origin:  {}\n", origin));
    }
    out.push_str(RULE);
    out
}

fn render_overall(summary: &DurationSummary) -> String {
    format!("\n{}\n  {}\n", "All steps".bold(), summary.summary())
}

fn render_steps(report: &AnalysisReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{}\n", "By step".bold()));

    let slowest = report.slowest_step.as_ref().map(|s| s.step.as_str());
    for step in &report.steps {
        let line = format!(
            "  {:<12} n={:<6} mean {:>9.2}s  max {:>9.2}s",
            step.step, step.summary.count, step.summary.mean, step.summary.max
        );
        if Some(step.step.as_str()) == slowest {
            out.push_str(&format!("{}  {}\n", line.yellow(), "<- slowest".yellow()));
        } else {
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}

fn render_fit(fit: &FitReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\n{} ({}, n={})\n",
        "Distribution fit".bold(),
        fit.step,
        fit.sample_size
    ));

    for candidate in &fit.candidates {
        let line = format!(
            "  #{} {:<8} D = {:.4}  {}",
            candidate.rank,
            candidate.family,
            candidate.ks_statistic,
            candidate.parameters.describe()
        );
        if candidate.rank == 1 {
            out.push_str(&line.green().to_string());
        } else {
            out.push_str(&line);
        }
        out.push('\n');
    }
    for failure in &fit.failures {
        out.push_str(&format!("  {} {}\n", "skipped:".red(), failure));
    }

    for query in &fit.cdf {
        out.push_str(&format!(
            "  P(X <= {}) = {:.4}\n",
            query.x, query.probability
        ));
    }
    for query in &fit.complementary_cdf {
        out.push_str(&format!(
            "  P(X > {})  = {:.4}\n",
            query.x, query.probability
        ));
    }

    if let Some(sample) = &fit.sample {
        let preview: Vec<String> = sample
            .values
            .iter()
            .take(8)
            .map(|v| format!("{:.2}", v))
            .collect();
        let more = if sample.values.len() > preview.len() {
            ", ..."
        } else {
            ""
        };
        out.push_str(&format!(
            "  sample ({} draws): [{}{}]\n",
            sample.values.len(),
            preview.join(", "),
            more
        ));
    }
    out
}

fn render_buckets(title: &str, buckets: &BucketReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{}\n", title.bold()));

    if buckets.buckets.is_empty() {
        out.push_str("  (no buckets)\n");
        return out;
    }

    for point in buckets.buckets.iter().take(MAX_BUCKET_ROWS) {
        out.push_str(&format!(
            "  {:>6}  n={:<6} mean {:>9.2}s\n",
            point.key, point.count, point.mean_duration
        ));
    }
    if buckets.buckets.len() > MAX_BUCKET_ROWS {
        out.push_str(&format!(
            "  ... {} more\n",
            buckets.buckets.len() - MAX_BUCKET_ROWS
        ));
    }

    if let Some(summary) = &buckets.count_vs_mean_duration {
        out.push_str(&format!("  count vs mean: {}\n", format_correlation(summary)));
    }
    if let Some(summary) = &buckets.feature_vs_duration {
        out.push_str(&format!("  per row:       {}\n", format_correlation(summary)));
    }
    for note in &buckets.notes {
        out.push_str(&format!("  {}\n", note.dimmed()));
    }
    out
}

fn render_rejected(report: &AnalysisReport) -> String {
    let rejected = &report.input.rejected;
    if rejected.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "\n{}\n",
        format!("{} rows rejected", rejected.len()).red().bold()
    ));
    for row in rejected {
        out.push_str(&format!("  [{}] {}\n", row.stage, row.message));
    }
    out
}

fn format_correlation(summary: &CorrelationSummary) -> String {
    format!(
        "pearson {:+.3}, spearman {:+.3} ({} points)",
        summary.pearson, summary.spearman, summary.points
    )
}
