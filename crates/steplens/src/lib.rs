//! Steplens library
//!
//! Timing analysis for batch-processing step logs. This exposes the
//! internal modules for the CLI and for testing.

pub mod aggregator;
pub mod commands;
pub mod correlation;
pub mod fit;
pub mod output;
pub mod parser;
pub mod table;
pub mod utils;
