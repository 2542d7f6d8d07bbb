//! Shared fixtures for integration tests.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use wellsched::series::TimeSeries;

/// Target key used by all integration fixtures.
pub const KEY: &str = "DE-hydrogen-storage";

/// Parses an in-memory CSV into a time series.
pub fn series_from(csv: &str, origin: &str) -> TimeSeries {
    let result = TimeSeries::from_reader(Cursor::new(csv.to_string()), Path::new(origin));
    assert!(result.is_ok(), "fixture should load: {:?}", result.err());
    result.unwrap()
}

/// Builds hourly aligned load/storage sources from parallel value slices.
pub fn aligned_sources(load_vals: &[f64], storage_vals: &[f64]) -> (TimeSeries, TimeSeries) {
    assert_eq!(load_vals.len(), storage_vals.len());
    let (load_csv, storage_csv) = aligned_csv(load_vals, storage_vals);
    (
        series_from(&load_csv, "2030NEPC_DE-electricity.csv"),
        series_from(&storage_csv, "2030NEPC_filling_levels.csv"),
    )
}

/// Builds the raw CSV text for hourly aligned load/storage sources.
pub fn aligned_csv(load_vals: &[f64], storage_vals: &[f64]) -> (String, String) {
    let mut load = format!("timestamp,{KEY}\n");
    let mut storage = format!("timestamp,{KEY}\n");
    for (i, (l, s)) in load_vals.iter().zip(storage_vals).enumerate() {
        load.push_str(&format!("2030-01-01 {i:02}:00:00,{l}\n"));
        storage.push_str(&format!("2030-01-01 {i:02}:00:00,{s}\n"));
    }
    (load, storage)
}

/// Unique path in the system temp directory for file-based tests.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("wellsched-{}-{name}", std::process::id()))
}
