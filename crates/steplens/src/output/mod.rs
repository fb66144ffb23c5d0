//! Report schema and renderers.
//!
//! This module handles:
//! - The serializable `AnalysisReport` tree
//! - Pretty JSON to any writer
//! - Colored terminal summaries

pub mod json;
pub mod report;
pub mod terminal;

// Re-export main types and functions
pub use json::{report_to_string, write_report};
pub use report::{
    AnalysisReport, BucketReport, CandidateFit, FitReport, InputSummary, ProbabilityQuery,
    RejectedRow, SampleReport, SlowestStep, StepSummary,
};
pub use terminal::render_terminal_summary;
