//! Series reading into a single tidy table.

use crate::catalog::{Catalog, Selection, read_catalog};
use crate::constants::MISSING_SENTINELS;
use crate::error::Result;
use crate::models::TimeSeries;
use crate::store::{ContainerHandle, ContainerStore};
use crate::tidy::TidyFrameBuilder;
use chrono::NaiveDate;
use polars::prelude::DataFrame;
use tracing::{debug, info};

/// Build the catalog for `selection` and read every selected series
/// between `start` and `end` (both inclusive).
pub fn read_series<S: ContainerStore>(
    store: &S,
    selection: &Selection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<DataFrame> {
    let catalog = read_catalog(store, selection)?;
    read_catalog_series(store, &catalog, start, end)
}

/// Read every pathname of an existing catalog.
///
/// Each container is opened once. Rows are ordered by (study, path) pair,
/// then catalog order, then time. Units and data type are upper-cased and
/// both missing-value sentinels become NaN. No de-duplication is applied.
pub fn read_catalog_series<S: ContainerStore>(
    store: &S,
    catalog: &Catalog,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<DataFrame> {
    let mut builder = TidyFrameBuilder::new().with_file_path_column();
    if catalog.has_study() {
        builder = builder.with_study_column();
    }

    for pair in catalog.study_filepaths() {
        let mut container = store.open_scoped(&pair.path)?;
        let file_path = pair.path.to_string_lossy().into_owned();

        for entry in catalog.entries_for(&pair) {
            let series = container.read_series(&entry.pathname, start, end)?;
            let series = normalize(series);
            builder.push_series(
                &series,
                &entry.pathname,
                pair.study.as_deref(),
                Some(&file_path),
            );
            info!("Retrieved: {}", entry.pathname);
        }

        container.finish()?;
    }

    debug!("Read {} observations", builder.len());
    builder.finish()
}

fn normalize(series: TimeSeries) -> TimeSeries {
    let values = series
        .values
        .into_iter()
        .map(|v| if MISSING_SENTINELS.contains(&v) { f64::NAN } else { v })
        .collect();
    TimeSeries {
        values,
        units: series.units.to_uppercase(),
        data_type: series.data_type.to_uppercase(),
        ..series
    }
}
