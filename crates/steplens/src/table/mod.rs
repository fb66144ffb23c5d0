//! In-memory timing table.
//!
//! This module turns parsed records into a column-oriented table:
//! - Base columns: start, end, step, duration
//! - Derived columns: hour of day, hours since origin
//! - Filter, group and column extraction without mutating the source

pub mod column;
pub mod timing_table;

// Re-export main types
pub use column::{Column, ColumnKind, Value};
pub use timing_table::{Row, TimingTable};
