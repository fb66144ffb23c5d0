use pretty_assertions::assert_eq;
use std::io::Write;
use std::path::PathBuf;
use steplens::commands::{execute_analyze, validate_args, AnalyzeArgs};
use steplens::fit::Family;
use tempfile::NamedTempFile;

const MULTI_BATCH_LOG: &str = "\
3f2504e0-4f89-11d3-9a0c-0305e82c3301 batch started
16/10/2026 09:00:00,16/10/2026 09:00:05,Step 1
16/10/2026 09:00:05,16/10/2026 09:00:25,Step 2
16/10/2026 09:00:25,16/10/2026 09:00:28,Step 3

7c9e6679-7425-40de-944b-e07fc1f90ae7 batch started
16/10/2026 10:30:00,16/10/2026 10:30:07,Step 1
16/10/2026 10:30:07,16/10/2026 10:30:37,Step 2
16/10/2026 10:30:37,16/10/2026 10:30:41,Step 3

0b8a1c55-2e7d-4d5b-9a61-5f1c3e9a7b20 batch started
16/10/2026 11:15:00,16/10/2026 11:15:06,Step 1
16/10/2026 11:15:06,16/10/2026 11:15:31,Step 2
16/10/2026 11:15:31,16/10/2026 11:15:33,Step 3
";

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn args_for(input: &NamedTempFile) -> AnalyzeArgs {
    AnalyzeArgs {
        input: input.path().to_path_buf(),
        ..Default::default()
    }
}

#[test]
fn test_validate_args_valid() {
    let input = write_temp(MULTI_BATCH_LOG);
    assert!(validate_args(&args_for(&input)).is_ok());
}

#[test]
fn test_validate_args_missing_input() {
    let args = AnalyzeArgs {
        input: PathBuf::from("/definitely/not/here.csv"),
        ..Default::default()
    };
    assert!(validate_args(&args).is_err());
}

#[test]
fn test_validate_args_empty_input() {
    assert!(validate_args(&AnalyzeArgs::default()).is_err());
}

#[test]
fn test_validate_args_missing_config() {
    let input = write_temp(MULTI_BATCH_LOG);
    let args = AnalyzeArgs {
        config: Some(PathBuf::from("/definitely/not/here.toml")),
        ..args_for(&input)
    };
    assert!(validate_args(&args).is_err());
}

#[test]
fn test_validate_args_sample_too_large() {
    let input = write_temp(MULTI_BATCH_LOG);
    let args = AnalyzeArgs {
        sample: Some(10_000_000),
        ..args_for(&input)
    };
    assert!(validate_args(&args).is_err());
}

#[test]
fn test_analyze_multi_batch_log() {
    let input = write_temp(MULTI_BATCH_LOG);
    let report = execute_analyze(&args_for(&input)).unwrap();

    assert_eq!(report.input.row_count, 9);
    assert_eq!(report.input.batch_count, 3);
    assert_eq!(report.input.header_count, 3);
    assert!(report.input.rejected.is_empty());

    // 5+20+3 + 7+30+4 + 6+25+2 = 102
    assert!((report.overall.mean - 102.0 / 9.0).abs() < 1e-12);
    assert_eq!(report.overall.max, 30.0);

    let step_names: Vec<&str> = report.steps.iter().map(|s| s.step.as_str()).collect();
    assert_eq!(step_names, vec!["Step 1", "Step 2", "Step 3"]);
    assert_eq!(report.step("Step 2").unwrap().mean, 25.0);
    assert_eq!(report.step("Step 1").unwrap().mean, 6.0);

    let slowest = report.slowest_step.as_ref().unwrap();
    assert_eq!(slowest.step, "Step 2");
    assert_eq!(slowest.mean_duration, 25.0);

    // Origin is the second row
    assert_eq!(report.origin.as_deref(), Some("2026-10-16 09:00:05"));
}

#[test]
fn test_analyze_fits_slowest_step() {
    let input = write_temp(MULTI_BATCH_LOG);
    let report = execute_analyze(&args_for(&input)).unwrap();

    let fit = report.fit.as_ref().unwrap();
    assert_eq!(fit.step, "Step 2");
    assert_eq!(fit.sample_size, 3);
    assert_eq!(fit.candidates.len(), 3);
    assert_eq!(fit.candidates[0].rank, 1);
    assert_eq!(fit.cdf.len(), 1);
    assert_eq!(fit.cdf[0].x, 100.0);
    assert_eq!(fit.complementary_cdf[0].x, 50.0);
    assert!(fit.sample.is_none());
}

#[test]
fn test_analyze_explicit_step_and_sample() {
    let input = write_temp(MULTI_BATCH_LOG);
    let args = AnalyzeArgs {
        step: Some("Step 1".to_string()),
        seed: Some(7),
        sample: Some(25),
        ..args_for(&input)
    };

    let first = execute_analyze(&args).unwrap();
    let second = execute_analyze(&args).unwrap();

    let fit = first.fit.as_ref().unwrap();
    assert_eq!(fit.step, "Step 1");

    let sample = fit.sample.as_ref().unwrap();
    assert_eq!(sample.seed, Some(7));
    assert_eq!(sample.values.len(), 25);
    assert_eq!(
        sample.values,
        second.fit.as_ref().unwrap().sample.as_ref().unwrap().values
    );
}

#[test]
fn test_analyze_unknown_step() {
    let input = write_temp(MULTI_BATCH_LOG);
    let args = AnalyzeArgs {
        step: Some("Step 42".to_string()),
        ..args_for(&input)
    };
    assert!(execute_analyze(&args).is_err());
}

#[test]
fn test_analyze_hour_buckets() {
    let input = write_temp(MULTI_BATCH_LOG);
    let report = execute_analyze(&args_for(&input)).unwrap();

    let hours: Vec<(i64, usize)> = report
        .hour_of_day
        .buckets
        .iter()
        .map(|p| (p.key, p.count))
        .collect();
    assert_eq!(hours, vec![(9, 3), (10, 3), (11, 3)]);

    // Every hour has three rows, so count vs mean is undefined
    assert!(report.hour_of_day.count_vs_mean_duration.is_none());
    assert_eq!(report.hour_of_day.notes.len(), 1);
    assert!(report.hour_of_day.feature_vs_duration.is_some());

    let elapsed: Vec<i64> = report
        .hours_since_origin
        .buckets
        .iter()
        .map(|p| p.key)
        .collect();
    assert_eq!(elapsed, vec![-1, 0, 1, 2]);
}

#[test]
fn test_fail_fast_on_negative_duration() {
    let log = format!(
        "{}16/10/2026 12:00:10,16/10/2026 12:00:00,Step 1\n",
        MULTI_BATCH_LOG
    );
    let input = write_temp(&log);
    assert!(execute_analyze(&args_for(&input)).is_err());
}

#[test]
fn test_lenient_reports_rejected_rows() {
    let log = format!(
        "{}16/10/2026 12:00:10,16/10/2026 12:00:00,Step 1\ngarbage line\n",
        MULTI_BATCH_LOG
    );
    let input = write_temp(&log);
    let args = AnalyzeArgs {
        lenient: true,
        ..args_for(&input)
    };

    let report = execute_analyze(&args).unwrap();
    assert_eq!(report.input.row_count, 9);

    let stages: Vec<&str> = report
        .input
        .rejected
        .iter()
        .map(|r| r.stage.as_str())
        .collect();
    assert_eq!(stages, vec!["parse", "load"]);
}

#[test]
fn test_config_file_overrides_defaults() {
    let input = write_temp(MULTI_BATCH_LOG);
    let config = write_temp(
        r#"
        [analysis]
        origin_row = 0
        percentiles = [50.0]

        [fit]
        candidates = ["normal"]
        cdf_at = [20.0, 30.0]
        "#,
    );
    let args = AnalyzeArgs {
        config: Some(config.path().to_path_buf()),
        ..args_for(&input)
    };

    let report = execute_analyze(&args).unwrap();
    assert_eq!(report.origin.as_deref(), Some("2026-10-16 09:00:00"));
    assert_eq!(report.overall.percentiles.len(), 1);

    let fit = report.fit.as_ref().unwrap();
    assert_eq!(fit.order(), vec![Family::Normal]);
    assert_eq!(fit.cdf.len(), 2);
}

#[test]
fn test_cli_flags_override_config_file() {
    let input = write_temp(MULTI_BATCH_LOG);
    let config = write_temp("[analysis]\norigin_row = 0\n");
    let args = AnalyzeArgs {
        config: Some(config.path().to_path_buf()),
        origin_row: Some(3),
        ..args_for(&input)
    };

    let report = execute_analyze(&args).unwrap();
    assert_eq!(report.origin.as_deref(), Some("2026-10-16 10:30:00"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let input = write_temp(MULTI_BATCH_LOG);
    let config = write_temp("[fit]\ncandidates = []\n");
    let args = AnalyzeArgs {
        config: Some(config.path().to_path_buf()),
        ..args_for(&input)
    };
    assert!(execute_analyze(&args).is_err());
}

#[test]
fn test_headers_only_log_is_an_error() {
    let input = write_temp("3f2504e0-4f89-11d3-9a0c-0305e82c3301\n\n");
    assert!(execute_analyze(&args_for(&input)).is_err());
}

#[test]
fn test_single_row_log_falls_back_to_first_origin() {
    let input = write_temp(
        "3f2504e0-4f89-11d3-9a0c-0305e82c3301\n16/10/2026 09:00:00,16/10/2026 09:00:05,Step 1\n",
    );
    let report = execute_analyze(&args_for(&input)).unwrap();

    assert_eq!(report.input.row_count, 1);
    assert_eq!(report.overall.mean, 5.0);
    assert_eq!(report.slowest_step.as_ref().unwrap().step, "Step 1");
    assert_eq!(report.origin.as_deref(), Some("2026-10-16 09:00:00"));

    let keys: Vec<i64> = report
        .hours_since_origin
        .buckets
        .iter()
        .map(|p| p.key)
        .collect();
    assert_eq!(keys, vec![0]);
    assert!(report.hours_since_origin.notes[0].contains("out of range"));
}

#[test]
fn test_origin_row_past_end_is_not_fatal() {
    let input = write_temp(MULTI_BATCH_LOG);
    let args = AnalyzeArgs {
        origin_row: Some(50),
        ..args_for(&input)
    };

    let report = execute_analyze(&args).unwrap();
    assert_eq!(report.origin.as_deref(), Some("2026-10-16 09:00:00"));
    assert!(report.fit.is_some());
    assert!(report.hours_since_origin.notes[0].contains("origin row 50"));
}
