//! Line-oriented parser for batch timing logs.
//!
//! Input is a sequence of batch sections. Each section opens with a header
//! line carrying the batch UUID and is followed by `start,end,step` rows:
//!
//! ```text
//! 3f2b1c9e-8a4d-4c1e-9b7a-2d5e6f708192 nightly import
//! 16/10/2026 14:05:09,16/10/2026 14:05:21,Step 1
//! 16/10/2026 14:05:21,16/10/2026 14:05:43,Step 2
//! ```

use super::schema::{ParsePolicy, ParsedLog, TimingRecord};
use crate::utils::config::{BATCH_HEADER_PATTERN, DEFAULT_TIMESTAMP_FORMATS};
use crate::utils::error::ParseError;
use chrono::NaiveDateTime;
use log::{debug, warn};
use regex::Regex;

/// Classification of one input line
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    /// Blank line
    Blank,

    /// Batch header carrying the batch identifier
    Header(String),

    /// A parsed data row
    Record(TimingRecord),
}

/// Parser for raw timing text
#[derive(Debug, Clone)]
pub struct RecordParser {
    header: Regex,
    formats: Vec<String>,
    policy: ParsePolicy,
}

impl Default for RecordParser {
    fn default() -> Self {
        Self {
            header: default_header_regex(),
            formats: DEFAULT_TIMESTAMP_FORMATS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            policy: ParsePolicy::FailFast,
        }
    }
}

impl RecordParser {
    /// Create a parser with the default formats and fail-fast policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the timestamp formats (tried in order)
    pub fn with_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.formats = formats.into_iter().map(Into::into).collect();
        self
    }

    /// Set the malformed-row policy
    pub fn with_policy(mut self, policy: ParsePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Use a custom batch header pattern
    ///
    /// # Errors
    /// * `ParseError::InvalidPattern` - If the regex does not compile
    pub fn with_header_pattern(mut self, pattern: &str) -> Result<Self, ParseError> {
        self.header =
            Regex::new(pattern).map_err(|e| ParseError::InvalidPattern(e.to_string()))?;
        Ok(self)
    }

    pub fn policy(&self) -> ParsePolicy {
        self.policy
    }

    /// Parse a whole input text
    ///
    /// **Public** - main entry point for parsing
    ///
    /// # Arguments
    /// * `text` - Raw UTF-8 input
    ///
    /// # Returns
    /// Records in input order, plus rejected rows under the lenient policy
    ///
    /// # Errors
    /// * `ParseError::MalformedRecord` - First malformed row under `FailFast`
    pub fn parse(&self, text: &str) -> Result<ParsedLog, ParseError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut log = ParsedLog::default();
        let mut current_batch: Option<String> = None;

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;

            match self.parse_line(raw, line_no, current_batch.as_deref()) {
                Ok(LineKind::Blank) => {}
                Ok(LineKind::Header(id)) => {
                    debug!("Batch header on line {}: {}", line_no, id);
                    log.header_count += 1;
                    current_batch = Some(id);
                }
                Ok(LineKind::Record(record)) => log.records.push(record),
                Err(e) => match self.policy {
                    ParsePolicy::FailFast => return Err(e),
                    ParsePolicy::Lenient => {
                        warn!("Skipping {}", e);
                        log.rejected.push(e);
                    }
                },
            }
        }

        debug!(
            "Parsed {} records across {} batch headers ({} rejected)",
            log.records.len(),
            log.header_count,
            log.rejected.len()
        );

        Ok(log)
    }

    /// Classify and parse a single line
    ///
    /// # Arguments
    /// * `raw` - The line text, without terminator
    /// * `line_no` - 1-based line number, used in errors
    /// * `batch_id` - Batch the line belongs to, if a header was seen
    pub fn parse_line(
        &self,
        raw: &str,
        line_no: usize,
        batch_id: Option<&str>,
    ) -> Result<LineKind, ParseError> {
        let line = raw.trim();

        if line.is_empty() {
            return Ok(LineKind::Blank);
        }

        if let Some(caps) = self.header.captures(line) {
            let id = caps
                .get(1)
                .or_else(|| caps.get(0))
                .map(|m| m.as_str().to_ascii_lowercase())
                .unwrap_or_default();
            return Ok(LineKind::Header(id));
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let [start, end, step] = fields.as_slice() else {
            return Err(malformed(
                line_no,
                format!("expected 3 comma-separated fields, found {}", fields.len()),
            ));
        };

        if step.is_empty() {
            return Err(malformed(line_no, "step label is empty"));
        }

        let start = parse_timestamp(start, &self.formats)
            .ok_or_else(|| malformed(line_no, format!("unparsable start timestamp '{}'", start)))?;
        let end = parse_timestamp(end, &self.formats)
            .ok_or_else(|| malformed(line_no, format!("unparsable end timestamp '{}'", end)))?;

        Ok(LineKind::Record(TimingRecord {
            batch_id: batch_id.map(str::to_string),
            start,
            end,
            step: step.to_string(),
            line: line_no,
        }))
    }
}

/// Parse a timestamp with the first matching format
///
/// **Public** - also used by tests and fixtures
pub fn parse_timestamp<S: AsRef<str>>(value: &str, formats: &[S]) -> Option<NaiveDateTime> {
    formats
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format.as_ref()).ok())
}

/// Convenience: parse with the default parser
pub fn parse_records(text: &str) -> Result<ParsedLog, ParseError> {
    RecordParser::default().parse(text)
}

fn default_header_regex() -> Regex {
    // The pattern is a compile-time constant covered by tests.
    Regex::new(BATCH_HEADER_PATTERN).expect("BATCH_HEADER_PATTERN is a valid regex")
}

fn malformed(line: usize, reason: impl Into<String>) -> ParseError {
    ParseError::MalformedRecord {
        line,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(d: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, d)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_header_is_detected_case_insensitive() {
        let parser = RecordParser::new();
        let kind = parser
            .parse_line("3F2B1C9E-8A4D-4C1E-9B7A-2D5E6F708192 nightly run", 1, None)
            .unwrap();
        assert_eq!(
            kind,
            LineKind::Header("3f2b1c9e-8a4d-4c1e-9b7a-2d5e6f708192".to_string())
        );
    }

    #[test]
    fn test_short_uuid_is_not_a_header() {
        let parser = RecordParser::new();
        let result = parser.parse_line("3f2b1c9e-8a4d-4c1e-9b7a-2d5e6f70 x", 4, None);
        assert!(matches!(
            result,
            Err(ParseError::MalformedRecord { line: 4, .. })
        ));
    }

    #[test]
    fn test_parse_en_nz_line() {
        let parser = RecordParser::new();
        let kind = parser
            .parse_line("1/10/2026 9:00:00,1/10/2026 9:00:12,Step 1", 2, Some("b"))
            .unwrap();

        let LineKind::Record(record) = kind else {
            panic!("expected a record");
        };
        assert_eq!(record.start, ts(1, 9, 0, 0));
        assert_eq!(record.end, ts(1, 9, 0, 12));
        assert_eq!(record.step, "Step 1");
        assert_eq!(record.batch_id.as_deref(), Some("b"));
        assert_eq!(record.line, 2);
    }

    #[test]
    fn test_parse_twelve_hour_clock() {
        let parsed = parse_timestamp("16/10/2026 2:05:09 pm", DEFAULT_TIMESTAMP_FORMATS);
        assert_eq!(parsed, Some(ts(16, 14, 5, 9)));
    }

    #[test]
    fn test_parse_iso_with_fraction() {
        let parsed = parse_timestamp("2026-10-16T14:05:09.250", DEFAULT_TIMESTAMP_FORMATS).unwrap();
        assert_eq!(parsed.and_utc().timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_wrong_field_count() {
        let parser = RecordParser::new();
        assert!(parser.parse_line("a,b", 1, None).is_err());
        assert!(parser.parse_line("a,b,c,d", 1, None).is_err());
    }

    #[test]
    fn test_empty_step_label() {
        let parser = RecordParser::new();
        let result = parser.parse_line("1/10/2026 9:00:00,1/10/2026 9:00:12,  ", 1, None);
        assert!(result.is_err());
    }
}
