//! Tests for time bucketing and the connections line chart.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use netlog_ingest::NormalizedRecord;
use netlog_report::{
    BucketWidth, ChartOutput, ImageFormat, ReportError, plot_connections_over_time,
    resample_event_counts,
};
use tempfile::TempDir;

fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

fn event(datetime: Option<NaiveDateTime>) -> NormalizedRecord {
    NormalizedRecord {
        datetime,
        unified_protocol: "dns".to_string(),
        total_bytes: 0.0,
        event_count: 1,
    }
}

fn width(alias: &str) -> BucketWidth {
    alias.parse().unwrap()
}

#[test]
fn test_thirty_second_buckets_are_left_closed() {
    let records = vec![
        event(Some(at(0, 0, 35))),
        event(Some(at(0, 0, 5))),
        event(Some(at(0, 0, 20))),
    ];

    let series = resample_event_counts(&records, &width("30S"))
        .unwrap()
        .expect("buckets");

    assert_eq!(series.width, TimeDelta::seconds(30));
    let buckets: Vec<(NaiveDateTime, u64)> =
        series.buckets.iter().map(|b| (b.start, b.count)).collect();
    assert_eq!(buckets, vec![(at(0, 0, 0), 2), (at(0, 0, 30), 1)]);
}

#[test]
fn test_gaps_are_filled_with_zero_buckets() {
    let records = vec![
        event(Some(at(10, 0, 1))),
        event(None),
        event(Some(at(10, 2, 59))),
    ];

    let series = resample_event_counts(&records, &width("1min"))
        .unwrap()
        .expect("buckets");

    let counts: Vec<u64> = series.buckets.iter().map(|b| b.count).collect();
    assert_eq!(counts, vec![1, 0, 1]);
    assert_eq!(series.buckets[0].start, at(10, 0, 0));
    assert_eq!(series.buckets[2].start, at(10, 2, 0));
    assert_eq!(series.total(), 2);
}

#[test]
fn test_buckets_align_to_wall_clock() {
    let records = vec![event(Some(at(7, 14, 0)))];

    let series = resample_event_counts(&records, &width("1H"))
        .unwrap()
        .expect("buckets");

    assert_eq!(series.buckets.len(), 1);
    assert_eq!(series.buckets[0].start, at(7, 0, 0));
}

#[test]
fn test_no_valid_timestamps_skips_chart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("line.html");
    let records = vec![event(None), event(None)];

    let result = plot_connections_over_time(
        &records,
        &BucketWidth::default(),
        &ChartOutput::file(&path, ImageFormat::Html),
    )
    .unwrap();

    assert!(result.is_none());
    assert!(!path.exists());
}

#[test]
fn test_oversized_resample_is_an_error() {
    let start = at(0, 0, 0);
    let records = vec![
        event(Some(start)),
        event(Some(start + TimeDelta::days(30))),
    ];

    let result = resample_event_counts(&records, &width("1ms"));
    assert!(matches!(result, Err(ReportError::Resample { .. })));
}

#[test]
fn test_line_chart_is_written_as_html() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("line.html");
    let records = vec![event(Some(at(0, 0, 5))), event(Some(at(0, 1, 5)))];

    let series = plot_connections_over_time(
        &records,
        &width("30S"),
        &ChartOutput::file(&path, ImageFormat::Html),
    )
    .unwrap()
    .expect("chart rendered");

    assert_eq!(series.buckets.len(), 3);
    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.contains("Connections over time (bin=30S)"));
    assert!(html.contains("Connections"));
}
