//! Series reading tests

use super::*;
use crate::catalog::{CatalogFilter, Selection, read_catalog};
use crate::config::IoConfig;
use crate::error::DssError;
use crate::io::DssIo;
use crate::reader::{read_catalog_series, read_series};
use crate::store::MemoryStore;
use crate::tidy::tidy_rows;
use tempfile::TempDir;

#[test]
fn test_read_single_container() {
    let temp_dir = TempDir::new().unwrap();
    let store = MemoryStore::new();
    let path = container_file(&temp_dir, "base.dss");
    seed_study(&store, &path, 1.0);

    let df = read_series(
        &store,
        &Selection::new(path.clone()),
        date("1921-10-31"),
        date("2003-09-30"),
    )
    .unwrap();

    let names: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
    assert_eq!(
        names,
        vec!["DateTime", "Value", "Pathname", "Units", "Data Type", "File Path"]
    );
    assert_eq!(df.height(), 9);

    let rows = tidy_rows(&df).unwrap();
    assert_eq!(rows[0].pathname, SHASTA_STORAGE);
    assert_eq!(rows[0].datetime, ts("1921-10-31 00:00"));
    assert_eq!(rows[0].value, 3000.0);
    assert_eq!(rows[0].units, "TAF");
    assert_eq!(rows[0].data_type, "PER-AVER");
    assert_eq!(rows[0].file_path.as_deref(), Some(path.to_str().unwrap()));
    assert_eq!(rows[6].pathname, KESWICK_FLOW);
    assert_eq!(rows[6].units, "CFS");
}

#[test]
fn test_read_replaces_both_sentinels() {
    let temp_dir = TempDir::new().unwrap();
    let store = MemoryStore::new();
    let path = container_file(&temp_dir, "base.dss");
    seed_study(&store, &path, 1.0);

    let df = read_series(&store, &Selection::new(path), date("1921-10-31"), date("2003-09-30"))
        .unwrap();
    let rows = tidy_rows(&df).unwrap();

    let oroville_nov = rows
        .iter()
        .find(|r| r.pathname == OROVILLE_STORAGE && r.datetime == ts("1921-11-30 00:00"))
        .unwrap();
    assert!(oroville_nov.value.is_nan());
    let keswick_dec = rows
        .iter()
        .find(|r| r.pathname == KESWICK_FLOW && r.datetime == ts("1921-12-31 00:00"))
        .unwrap();
    assert!(keswick_dec.value.is_nan());
    assert!(rows.iter().all(|r| r.value != -901.0 && r.value != -902.0));
}

#[test]
fn test_read_window_is_inclusive() {
    let temp_dir = TempDir::new().unwrap();
    let store = MemoryStore::new();
    let path = container_file(&temp_dir, "base.dss");
    seed_study(&store, &path, 1.0);

    let selection = Selection::new(path).with_filter(CatalogFilter::new().b(["S_SHSTA"]));
    let df = read_series(&store, &selection, date("1921-11-30"), date("1921-12-31")).unwrap();

    let rows = tidy_rows(&df).unwrap();
    let times: Vec<_> = rows.iter().map(|r| r.datetime).collect();
    assert_eq!(times, vec![ts("1921-11-30 00:00"), ts("1921-12-31 00:00")]);
}

#[test]
fn test_multi_study_read_order_and_tags() {
    let temp_dir = TempDir::new().unwrap();
    let store = MemoryStore::new();
    let base = container_file(&temp_dir, "base.dss");
    let alt = container_file(&temp_dir, "alt.dss");
    seed_study(&store, &base, 1.0);
    seed_study(&store, &alt, 2.0);

    let selection = Selection::new(vec![base, alt])
        .with_studies(vec!["Base", "Alt"])
        .with_filter(CatalogFilter::new().b(["S_SHSTA"]));
    let df = read_series(&store, &selection, date("1921-10-31"), date("2003-09-30")).unwrap();

    let names: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
    assert!(names.contains(&"Study".to_string()));

    let rows = tidy_rows(&df).unwrap();
    let studies: Vec<&str> = rows.iter().map(|r| r.study.as_deref().unwrap()).collect();
    assert_eq!(studies, vec!["Base", "Base", "Base", "Alt", "Alt", "Alt"]);
    assert_eq!(rows[0].value, 3000.0);
    assert_eq!(rows[3].value, 6000.0);
}

#[test]
fn test_each_container_opened_once_per_phase() {
    let temp_dir = TempDir::new().unwrap();
    let store = MemoryStore::new();
    let base = container_file(&temp_dir, "base.dss");
    let alt = container_file(&temp_dir, "alt.dss");
    seed_study(&store, &base, 1.0);
    seed_study(&store, &alt, 1.0);

    let selection = Selection::new(vec![base, alt]);
    let catalog = read_catalog(&store, &selection).unwrap();
    assert_eq!(store.open_calls(), 2);

    read_catalog_series(&store, &catalog, date("1921-10-31"), date("2003-09-30")).unwrap();
    assert_eq!(store.open_calls(), 4);
    assert_eq!(store.close_calls(), 4);
}

#[test]
fn test_failed_read_still_closes_container() {
    let temp_dir = TempDir::new().unwrap();
    let store = MemoryStore::new();
    let path = container_file(&temp_dir, "listing-only.dss");
    store.insert_catalog_entry(&path, SHASTA_STORAGE);

    let result = read_series(&store, &Selection::new(path), date("1921-10-31"), date("2003-09-30"));

    assert!(matches!(result, Err(DssError::Container { .. })));
    assert_eq!(store.open_calls(), store.close_calls());
}

#[test]
fn test_facade_uses_configured_window() {
    let temp_dir = TempDir::new().unwrap();
    let store = MemoryStore::new();
    let path = container_file(&temp_dir, "base.dss");
    seed_study(&store, &path, 1.0);

    let io = DssIo::new(store).with_config(
        IoConfig::default().with_window(date("1921-10-31"), date("1921-10-31")),
    );
    let df = io.read(&Selection::new(path.clone())).unwrap();
    assert_eq!(df.height(), 3);

    let reversed = io.read_between(&Selection::new(path), date("1922-01-01"), date("1921-01-01"));
    assert!(matches!(reversed, Err(DssError::Configuration { .. })));
}
