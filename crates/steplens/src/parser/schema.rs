//! Parsed record types.

use crate::utils::error::ParseError;
use chrono::NaiveDateTime;
use std::collections::HashSet;

/// One timed step as read from the input
#[derive(Debug, Clone, PartialEq)]
pub struct TimingRecord {
    /// Batch identifier of the most recent header line, if any
    pub batch_id: Option<String>,

    /// Step start
    pub start: NaiveDateTime,

    /// Step completion
    pub end: NaiveDateTime,

    /// Step label (e.g. "Step 2")
    pub step: String,

    /// 1-based source line
    pub line: usize,
}

/// How malformed data lines are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    /// Abort on the first malformed row
    #[default]
    FailFast,

    /// Keep going and collect every malformed row
    Lenient,
}

impl ParsePolicy {
    pub fn from_lenient(lenient: bool) -> Self {
        if lenient {
            ParsePolicy::Lenient
        } else {
            ParsePolicy::FailFast
        }
    }
}

/// Result of parsing a whole input text
#[derive(Debug, Clone, Default)]
pub struct ParsedLog {
    /// Data rows, in input order
    pub records: Vec<TimingRecord>,

    /// Malformed rows (only populated under `ParsePolicy::Lenient`)
    pub rejected: Vec<ParseError>,

    /// Number of batch header lines seen
    pub header_count: usize,
}

impl ParsedLog {
    /// Distinct batch ids in first-seen order
    pub fn batch_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter_map(|r| r.batch_id.as_deref())
            .filter(|id| seen.insert(*id))
            .collect()
    }
}
