//! Writing tidy tables back into containers.
//!
//! The table is validated before any container is opened. Rows are split
//! by destination study and pathname; each pathname is sorted by time and
//! written as one series. A failure part way through leaves the pathnames
//! already written in place.

use crate::constants::{COL_STUDY, MISSING_NO_DATA};
use crate::error::{DssError, Result};
use crate::models::TimeSeries;
use crate::store::{ContainerHandle, ContainerStore};
use crate::tidy::{TidyRow, has_column, tidy_rows};
use crate::validation::validate_tidy;
use chrono::Local;
use polars::prelude::DataFrame;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Where a tidy table is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destinations {
    /// One container for a table without a `Study` column
    Single(PathBuf),
    /// One container per study label for a table with a `Study` column,
    /// written in the order given
    ByStudy(Vec<(String, PathBuf)>),
}

impl Destinations {
    pub fn by_study<I, S, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, P)>,
        S: Into<String>,
        P: Into<PathBuf>,
    {
        Destinations::ByStudy(
            pairs
                .into_iter()
                .map(|(study, path)| (study.into(), path.into()))
                .collect(),
        )
    }
}

impl From<PathBuf> for Destinations {
    fn from(path: PathBuf) -> Self {
        Destinations::Single(path)
    }
}

impl From<&str> for Destinations {
    fn from(path: &str) -> Self {
        Destinations::Single(PathBuf::from(path))
    }
}

impl From<Vec<(String, PathBuf)>> for Destinations {
    fn from(pairs: Vec<(String, PathBuf)>) -> Self {
        Destinations::ByStudy(pairs)
    }
}

/// Outcome of a successful write
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteStats {
    pub containers_written: usize,
    pub series_written: usize,
    pub rows_written: usize,
}

/// Write `table` to `destinations`.
pub fn write_series<S: ContainerStore>(
    store: &S,
    destinations: &Destinations,
    table: &DataFrame,
) -> Result<WriteStats> {
    validate_tidy(table)?;

    let mut rows = tidy_rows(table)?;
    let targets = resolve_destinations(destinations, &rows, has_column(table, COL_STUDY))?;

    for row in rows.iter_mut() {
        if row.value.is_nan() {
            row.value = MISSING_NO_DATA;
        }
    }

    let mut stats = WriteStats::default();
    for (study, path) in &targets {
        let selected: Vec<&TidyRow> = rows
            .iter()
            .filter(|row| study.is_none() || row.study == *study)
            .collect();

        let mut container = store.open_scoped(path)?;
        for (pathname, mut group) in group_by_pathname(selected) {
            group.sort_by_key(|row| row.datetime);
            let series = build_series(&pathname, &group);
            container.write_series(&pathname, &series)?;
            info!("Wrote {} to {}", pathname, path.display());

            stats.series_written += 1;
            stats.rows_written += series.len();
        }
        container.finish()?;
        stats.containers_written += 1;

        match study {
            Some(study) => info!(
                "Study {} successfully written to {} at {}.",
                study,
                path.display(),
                Local::now()
            ),
            None => info!(
                "Table successfully written to {} at {}.",
                path.display(),
                Local::now()
            ),
        }
    }

    Ok(stats)
}

/// Pair each destination path with the study whose rows it receives
fn resolve_destinations(
    destinations: &Destinations,
    rows: &[TidyRow],
    has_study: bool,
) -> Result<Vec<(Option<String>, PathBuf)>> {
    match (has_study, destinations) {
        (true, Destinations::ByStudy(pairs)) => {
            let mut labels = HashSet::new();
            if let Some((study, _)) = pairs
                .iter()
                .find(|(study, _)| !labels.insert(study.as_str()))
            {
                return Err(DssError::shape_mismatch(format!(
                    "destination for study {} given more than once",
                    study
                )));
            }

            let mut seen = HashSet::new();
            let present: Vec<&str> = rows
                .iter()
                .filter_map(|row| row.study.as_deref())
                .filter(|study| seen.insert(*study))
                .collect();

            let missing: Vec<String> = present
                .iter()
                .filter(|study| !labels.contains(**study))
                .map(|study| study.to_string())
                .collect();
            let extra: Vec<String> = pairs
                .iter()
                .filter(|(study, _)| !seen.contains(study.as_str()))
                .map(|(study, _)| study.clone())
                .collect();
            if !missing.is_empty() || !extra.is_empty() {
                return Err(DssError::StudySetMismatch { missing, extra });
            }

            Ok(pairs
                .iter()
                .map(|(study, path)| (Some(study.clone()), path.clone()))
                .collect())
        }
        (true, Destinations::Single(_)) => Err(DssError::shape_mismatch(
            "a table with a Study column needs a destination path per study",
        )),
        (false, Destinations::Single(path)) => Ok(vec![(None, path.clone())]),
        (false, Destinations::ByStudy(_)) => Err(DssError::shape_mismatch(
            "a table without a Study column needs a single destination path",
        )),
    }
}

/// Group rows by pathname, keeping first-seen pathname order
fn group_by_pathname(rows: Vec<&TidyRow>) -> Vec<(String, Vec<&TidyRow>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&TidyRow>)> = Vec::new();
    for row in rows {
        match index.get(row.pathname.as_str()) {
            Some(&i) => groups[i].1.push(row),
            None => {
                index.insert(row.pathname.as_str(), groups.len());
                groups.push((row.pathname.clone(), vec![row]));
            }
        }
    }
    groups
}

/// Series for one pathname. Units and data type are taken from the first
/// row; rows are expected to agree.
fn build_series(pathname: &str, rows: &[&TidyRow]) -> TimeSeries {
    let (units, data_type) = rows
        .first()
        .map(|row| (row.units.clone(), row.data_type.clone()))
        .unwrap_or_default();

    if rows
        .iter()
        .any(|row| row.units != units || row.data_type != data_type)
    {
        warn!(
            "Rows for {} disagree on units or data type; writing as {} / {}",
            pathname, units, data_type
        );
    }
    debug!("Writing {} points for {}", rows.len(), pathname);

    TimeSeries::from_points(
        rows.iter().map(|row| (row.datetime, row.value)),
        units,
        data_type,
    )
}
