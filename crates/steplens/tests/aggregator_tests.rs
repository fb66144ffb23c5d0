use chrono::NaiveDateTime;
use pretty_assertions::assert_eq;
use steplens::aggregator::{
    grouped_count, grouped_max, grouped_mean, mean, mean_duration_by_step, percentile,
    percentiles, reduce_groups, summarize, PercentileValue,
};
use steplens::parser::TimingRecord;
use steplens::table::{Column, TimingTable};
use steplens::utils::error::{StatsError, TableError};

fn ts(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn table() -> TimingTable {
    let rows = [
        ("2026-10-16 09:00:00", "2026-10-16 09:00:05", "Step 1"),
        ("2026-10-16 09:00:05", "2026-10-16 09:00:25", "Step 2"),
        ("2026-10-16 09:00:25", "2026-10-16 09:00:28", "Step 3"),
        ("2026-10-16 10:30:00", "2026-10-16 10:30:07", "Step 1"),
        ("2026-10-16 10:30:07", "2026-10-16 10:30:37", "Step 2"),
        ("2026-10-16 10:30:37", "2026-10-16 10:30:41", "Step 3"),
    ];
    let records: Vec<TimingRecord> = rows
        .iter()
        .enumerate()
        .map(|(i, (start, end, step))| TimingRecord {
            batch_id: None,
            start: ts(start),
            end: ts(end),
            step: step.to_string(),
            line: i + 1,
        })
        .collect();

    let mut table = TimingTable::load(&records).unwrap();
    table.add_time_features(1).unwrap();
    table
}

#[test]
fn test_global_mean() {
    let table = table();
    assert_eq!(mean(table.durations()).unwrap(), 11.5);
}

#[test]
fn test_mean_by_step_and_slowest() {
    let means = mean_duration_by_step(&table()).unwrap();

    assert_eq!(means.len(), 3);
    assert_eq!(means.get("Step 1"), Ok(&6.0));
    assert_eq!(means.get("Step 2"), Ok(&25.0));
    assert_eq!(means.get("Step 3"), Ok(&3.5));
    assert_eq!(means.top(), Some((&"Step 2".to_string(), 25.0)));
}

#[test]
fn test_unknown_group_key() {
    let means = mean_duration_by_step(&table()).unwrap();
    assert_eq!(
        means.get("Step 7"),
        Err(StatsError::UnknownGroupKey("Step 7".to_string()))
    );
}

#[test]
fn test_grouped_max_by_hour() {
    let by_hour = grouped_max(
        &table(),
        |row| row.hour_of_day().unwrap_or_default(),
        Column::Duration,
    )
    .unwrap();
    assert_eq!(by_hour.get(&9), Ok(&20.0));
    assert_eq!(by_hour.get(&10), Ok(&30.0));
}

#[test]
fn test_grouped_count_sums_to_table_length() {
    let table = table();
    let counts = grouped_count(&table, |row| row.step().to_string());
    assert_eq!(counts.total(), table.len());

    let sorted: Vec<(&String, &usize)> = counts.sorted();
    assert_eq!(sorted[0].0, "Step 1");
    assert_eq!(*sorted[0].1, 2);
}

#[test]
fn test_grouped_mean_of_non_numeric_column() {
    let plain = TimingTable::load(&[]).unwrap();
    // An empty table has no groups, so nothing is reduced
    assert!(grouped_mean(&plain, |row| row.line(), Column::HourOfDay)
        .unwrap()
        .is_empty());

    let result = grouped_mean(&table(), |row| row.step().to_string(), Column::Start);
    assert_eq!(
        result,
        Err(StatsError::Table(TableError::NonNumericColumn(
            "start".to_string()
        )))
    );
}

#[test]
fn test_reduce_groups_with_custom_reducer() {
    let table = table();
    let groups = table.group_by(|row| row.step().to_string());
    let spans = reduce_groups(&groups, |part| -> Result<f64, StatsError> {
        let max = steplens::aggregator::max(part.durations())?;
        let min = steplens::aggregator::min(part.durations())?;
        Ok(max - min)
    })
    .unwrap();

    assert_eq!(spans.get("Step 2"), Ok(&10.0));
    assert_eq!(spans.get("Step 3"), Ok(&1.0));
}

#[test]
fn test_percentile_extremes() {
    let values = [7.0, 3.0, 9.0, 1.0, 5.0];
    assert_eq!(percentile(&values, 0.0).unwrap(), 1.0);
    assert_eq!(percentile(&values, 100.0).unwrap(), 9.0);
}

#[test]
fn test_percentiles_share_one_sort() {
    let values: Vec<f64> = (1..=20).map(f64::from).collect();
    let result = percentiles(&values, &[50.0, 95.0]).unwrap();
    assert_eq!(
        result,
        vec![
            PercentileValue {
                percentile: 50.0,
                value: 11.0
            },
            PercentileValue {
                percentile: 95.0,
                value: 20.0
            },
        ]
    );
}

#[test]
fn test_summary_of_table_durations() {
    let summary = summarize(table().durations(), &[50.0, 90.0]).unwrap();

    assert_eq!(summary.count, 6);
    assert_eq!(summary.min, 3.0);
    assert_eq!(summary.max, 30.0);
    // sorted: 3 4 5 7 20 30 -> floor(6 * 0.5) = 3
    assert_eq!(summary.percentile(50.0), Some(7.0));
    assert_eq!(summary.percentile(90.0), Some(30.0));
}

#[test]
fn test_empty_inputs() {
    assert!(matches!(
        summarize(&[], &[50.0]),
        Err(StatsError::EmptyAggregateInput { .. })
    ));
}
