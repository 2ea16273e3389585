//! CSV outputs read back through the precomputed-file readers.

use chrono::{TimeDelta, TimeZone, Utc};
use flowbeta_format::{CsvFormatter, Formatter};
use flowbeta_load::{read_depth, read_depth_file, read_signals};
use flowbeta_types::{DepthPoint, SignalRow};

#[test]
fn test_signals_round_trip() {
    let start = Utc.with_ymd_and_hms(2020, 11, 15, 0, 0, 0).unwrap();
    let rows: Vec<_> = (0..50_i32)
        .map(|i| {
            let x = f64::from(i);
            SignalRow::new(
                start + TimeDelta::seconds(10 * i64::from(i)),
                x * 0.5 - 3.0,
                x.powi(2) / 7.0,
                -x * 0.013,
            )
        })
        .collect();

    let mut buffer = Vec::new();
    CsvFormatter::new().write_signals(&rows, &mut buffer).unwrap();
    let back = read_signals(buffer.as_slice()).unwrap();

    assert_eq!(back, rows);
}

#[test]
fn test_depth_round_trip_keeps_nan() {
    let start = Utc.with_ymd_and_hms(2020, 11, 15, 0, 0, 0).unwrap();
    let points = vec![
        DepthPoint::new(start, 125.5),
        DepthPoint::new(start + TimeDelta::minutes(30), f64::NAN),
        DepthPoint::new(start + TimeDelta::minutes(60), 98.25),
    ];

    let mut buffer = Vec::new();
    CsvFormatter::new().write_depth(&points, &mut buffer).unwrap();
    let back = read_depth(buffer.as_slice()).unwrap();

    assert_eq!(back.len(), 3);
    assert_eq!(back[0], points[0]);
    assert_eq!(back[1].timestamp, points[1].timestamp);
    assert!(back[1].avg_depth.is_nan());
    assert_eq!(back[2], points[2]);
}

#[test]
fn test_depth_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("depth.csv");
    let start = Utc.with_ymd_and_hms(2020, 11, 16, 12, 0, 0).unwrap();
    let points = vec![DepthPoint::new(start, 7.0)];

    let file = std::fs::File::create(&path).unwrap();
    CsvFormatter::new().write_depth(&points, file).unwrap();

    let back = read_depth_file(&path).unwrap();
    approx::assert_relative_eq!(back[0].avg_depth, 7.0);
    assert_eq!(back[0].timestamp, start);
}
