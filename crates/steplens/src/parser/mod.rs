//! Record parsing and schema definitions.
//!
//! This module handles:
//! - Detecting batch header lines (UUID at line start)
//! - Parsing `start,end,step` rows into typed records
//! - Fail-fast or lenient handling of malformed rows

pub mod records;
pub mod schema;

// Re-export main types
pub use records::{parse_records, parse_timestamp, LineKind, RecordParser};
pub use schema::{ParsePolicy, ParsedLog, TimingRecord};
