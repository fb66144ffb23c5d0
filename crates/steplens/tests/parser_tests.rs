use pretty_assertions::assert_eq;
use steplens::parser::{parse_records, ParsePolicy, RecordParser};
use steplens::utils::error::ParseError;

const TWO_BATCHES: &str = "\
3f2504e0-4f89-11d3-9a0c-0305e82c3301 batch started
16/10/2026 09:00:00,16/10/2026 09:00:05,Step 1
16/10/2026 09:00:05,16/10/2026 09:00:25,Step 2

7C9E6679-7425-40DE-944B-E07FC1F90AE7,,
16/10/2026 10:30:00,16/10/2026 10:30:07,Step 1
";

#[test]
fn test_headers_are_skipped_and_tag_records() {
    let log = parse_records(TWO_BATCHES).unwrap();

    assert_eq!(log.records.len(), 3);
    assert_eq!(log.header_count, 2);
    assert!(log.rejected.is_empty());

    assert_eq!(
        log.records[0].batch_id.as_deref(),
        Some("3f2504e0-4f89-11d3-9a0c-0305e82c3301")
    );
    // Header ids are normalised to lowercase
    assert_eq!(
        log.records[2].batch_id.as_deref(),
        Some("7c9e6679-7425-40de-944b-e07fc1f90ae7")
    );
    assert_eq!(
        log.batch_ids(),
        vec![
            "3f2504e0-4f89-11d3-9a0c-0305e82c3301",
            "7c9e6679-7425-40de-944b-e07fc1f90ae7"
        ]
    );
}

#[test]
fn test_records_keep_source_line_numbers() {
    let log = parse_records(TWO_BATCHES).unwrap();
    let lines: Vec<usize> = log.records.iter().map(|r| r.line).collect();
    assert_eq!(lines, vec![2, 3, 6]);
}

#[test]
fn test_rows_before_first_header_have_no_batch() {
    let log = parse_records("2026-10-16 08:00:00,2026-10-16 08:00:01,Warmup\n").unwrap();
    assert_eq!(log.records[0].batch_id, None);
    assert_eq!(log.records[0].step, "Warmup");
    assert!(log.batch_ids().is_empty());
}

#[test]
fn test_fail_fast_reports_first_bad_line() {
    let text = "\
16/10/2026 09:00:00,16/10/2026 09:00:05,Step 1
not a record
16/10/2026 09:00:05,yesterday,Step 2
";
    let err = parse_records(text).unwrap_err();
    match err {
        ParseError::MalformedRecord { line, .. } => assert_eq!(line, 2),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_lenient_collects_every_bad_line() {
    let text = "\
16/10/2026 09:00:00,16/10/2026 09:00:05,Step 1
not a record
16/10/2026 09:00:05,yesterday,Step 2
16/10/2026 09:00:05,16/10/2026 09:00:06,
16/10/2026 09:01:00,16/10/2026 09:01:30,Step 3
";
    let parser = RecordParser::new().with_policy(ParsePolicy::Lenient);
    let log = parser.parse(text).unwrap();

    assert_eq!(log.records.len(), 2);
    let bad_lines: Vec<usize> = log
        .rejected
        .iter()
        .map(|e| match e {
            ParseError::MalformedRecord { line, .. } => *line,
            ParseError::InvalidPattern(_) => 0,
        })
        .collect();
    assert_eq!(bad_lines, vec![2, 3, 4]);
}

#[test]
fn test_uuid_must_end_at_a_word_boundary() {
    let text = "\
3f2504e0-4f89-11d3-9a0c-0305e82c3301ff batch started
16/10/2026 09:00:00,16/10/2026 09:00:05,Step 1
";
    let parser = RecordParser::new().with_policy(ParsePolicy::Lenient);
    let log = parser.parse(text).unwrap();

    assert_eq!(log.header_count, 0);
    assert_eq!(log.records.len(), 1);
    assert!(matches!(
        log.rejected.as_slice(),
        [ParseError::MalformedRecord { line: 1, .. }]
    ));

    assert!(parse_records(text).is_err());
}

#[test]
fn test_twelve_hour_clock() {
    let log = parse_records("16/10/2026 11:59:58 PM,17/10/2026 12:00:03 AM,Step 9\n").unwrap();
    let record = &log.records[0];
    assert_eq!((record.end - record.start).num_seconds(), 5);
}

#[test]
fn test_custom_formats_replace_defaults() {
    let parser = RecordParser::new().with_formats(["%H:%M:%S %d.%m.%Y"]);

    assert!(parser
        .parse("09:00:00 16.10.2026,09:00:02 16.10.2026,Step 1\n")
        .is_ok());
    assert!(parser
        .parse("16/10/2026 09:00:00,16/10/2026 09:00:05,Step 1\n")
        .is_err());
}

#[test]
fn test_invalid_header_pattern() {
    let result = RecordParser::new().with_header_pattern("([unclosed");
    assert!(matches!(result, Err(ParseError::InvalidPattern(_))));
}
