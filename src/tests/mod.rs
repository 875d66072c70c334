//! Integration tests for catalog building, reading and writing
//!
//! Containers are seeded in a `MemoryStore` and backed by real (empty)
//! files so existence checks behave as they do against disk.

pub mod reader_tests;

use crate::models::TimeSeries;
use crate::store::MemoryStore;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SHASTA_STORAGE: &str = "/CALSIM/S_SHSTA/STORAGE//1MON/L2020A/";
pub const OROVILLE_STORAGE: &str = "/CALSIM/S_OROVL/STORAGE//1MON/L2020A/";
pub const KESWICK_FLOW: &str = "/CALSIM/C_KSWCK/FLOW-CHANNEL//1MON/L2020A/";

pub fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Three monthly points at the start of the default study period
pub fn monthly(values: [f64; 3], units: &str) -> TimeSeries {
    TimeSeries::from_points(
        [
            (ts("1921-10-31 00:00"), values[0]),
            (ts("1921-11-30 00:00"), values[1]),
            (ts("1921-12-31 00:00"), values[2]),
        ],
        units,
        "PER-AVER",
    )
}

/// Create an empty file standing in for a container on disk
pub fn container_file(temp_dir: &TempDir, name: &str) -> PathBuf {
    let path = temp_dir.path().join(name);
    fs::write(&path, b"").unwrap();
    path
}

/// A container with two storage series and one flow series
pub fn seed_study(store: &MemoryStore, path: &Path, scale: f64) {
    store
        .insert_series(path, SHASTA_STORAGE, monthly([3000.0 * scale, 3100.0, 3200.0], "taf"))
        .unwrap();
    store
        .insert_series(path, OROVILLE_STORAGE, monthly([2000.0 * scale, -901.0, 2100.0], "taf"))
        .unwrap();
    store
        .insert_series(path, KESWICK_FLOW, monthly([5000.0 * scale, 5100.0, -902.0], "cfs"))
        .unwrap();
}
