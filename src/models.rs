//! Core data structures shared by the resolver, catalog, reader and writer.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A container path paired with an optional study label
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudyFilePath {
    pub study: Option<String>,
    pub path: PathBuf,
}

impl StudyFilePath {
    pub fn new(study: Option<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            study,
            path: path.into(),
        }
    }
}

/// One row of the catalog table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub part_a: String,
    pub part_b: String,
    pub part_c: String,
    pub part_f: String,
    pub part_e: String,
    pub file_path: PathBuf,
    pub study: Option<String>,
    /// Reconstructed record pathname with an empty D part
    pub pathname: String,
}

/// A time series as exchanged with a container
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub times: Vec<NaiveDateTime>,
    pub values: Vec<f64>,
    pub units: String,
    pub data_type: String,
}

impl TimeSeries {
    pub fn new(units: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            times: Vec::new(),
            values: Vec::new(),
            units: units.into(),
            data_type: data_type.into(),
        }
    }

    /// Build from (timestamp, value) points
    pub fn from_points(
        points: impl IntoIterator<Item = (NaiveDateTime, f64)>,
        units: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Self {
        let (times, values) = points.into_iter().unzip();
        Self {
            times,
            values,
            units: units.into(),
            data_type: data_type.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }
}

impl TimeSeries {
    /// Points whose calendar date falls inside `[start, end]`
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Self {
        let points = self.points().filter(|(t, _)| {
            let date = t.date();
            date >= start && date <= end
        });
        Self::from_points(points, self.units.clone(), self.data_type.clone())
    }

    /// Overlay `newer` onto this series: equal timestamps take the newer
    /// value, everything else is kept. Units and type come from `newer`.
    pub fn overlay(&self, newer: &TimeSeries) -> Self {
        let mut merged: BTreeMap<NaiveDateTime, f64> = self.points().collect();
        merged.extend(newer.points());
        Self::from_points(merged, newer.units.clone(), newer.data_type.clone())
    }
}
