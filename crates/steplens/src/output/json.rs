//! JSON report output.
//!
//! Reports go to a writer (stdout from the CLI); nothing is written to disk.

use super::report::AnalysisReport;
use crate::utils::error::OutputError;
use log::debug;
use std::io::Write;

/// Write a report as pretty-printed JSON followed by a newline
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `report` - Report to serialize
/// * `writer` - Destination, usually `std::io::stdout().lock()`
///
/// # Errors
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::WriteFailed` - I/O error during write
///
/// # Example
/// ```ignore
/// let report = execute_analyze(args)?;
/// write_report(&report, std::io::stdout().lock())?;
/// ```
pub fn write_report<W: Write>(report: &AnalysisReport, mut writer: W) -> Result<(), OutputError> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    writer.flush()?;

    debug!("Report written ({} rows analysed)", report.input.row_count);
    Ok(())
}

/// Serialize a report to a pretty JSON string
///
/// **Public** - useful for tests and debugging
pub fn report_to_string(report: &AnalysisReport) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(report)?)
}
