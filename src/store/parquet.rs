//! Parquet-file container adapter.
//!
//! Each container is a single parquet file holding every stored point in
//! long format (`Pathname, DateTime, Value, Units, Data Type`). The file is
//! loaded when opened and rewritten atomically on close if anything was
//! written. Opening a path that does not exist yields an empty container.

use super::{ContainerHandle, ContainerStore};
use crate::error::{DssError, Result};
use crate::models::TimeSeries;
use crate::pathname::RecordPath;
use crate::tidy::{TidyFrameBuilder, tidy_rows};
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Containers stored as parquet files
#[derive(Debug, Clone, Copy, Default)]
pub struct ParquetStore;

impl ParquetStore {
    pub fn new() -> Self {
        Self
    }
}

impl ContainerStore for ParquetStore {
    type Handle = ParquetHandle;

    fn open(&self, path: &Path) -> Result<ParquetHandle> {
        let mut handle = ParquetHandle {
            path: path.to_path_buf(),
            catalog: Vec::new(),
            series: HashMap::new(),
            dirty: false,
        };
        if !path.exists() {
            debug!("Creating new container at {}", path.display());
            return Ok(handle);
        }

        let file = File::open(path)?;
        let df = ParquetReader::new(file)
            .finish()
            .map_err(|e| DssError::container(path, format!("failed to read container: {}", e)))?;

        for row in tidy_rows(&df)? {
            let key = RecordPath::parse(&row.pathname)?.series_key();
            let series = handle.series.entry(key).or_insert_with(|| {
                TimeSeries::new(row.units.clone(), row.data_type.clone())
            });
            series.times.push(row.datetime);
            series.values.push(row.value);
            if !handle.catalog.contains(&row.pathname) {
                handle.catalog.push(row.pathname);
            }
        }

        debug!(
            "Loaded container {}: {} pathnames, {} points",
            path.display(),
            handle.catalog.len(),
            df.height()
        );
        Ok(handle)
    }
}

/// Handle onto one parquet container, held in memory while open
#[derive(Debug)]
pub struct ParquetHandle {
    path: PathBuf,
    catalog: Vec<String>,
    series: HashMap<String, TimeSeries>,
    dirty: bool,
}

impl ParquetHandle {
    fn persist(&mut self) -> Result<()> {
        let mut builder = TidyFrameBuilder::new();
        for pathname in &self.catalog {
            let key = RecordPath::parse(pathname)?.series_key();
            if let Some(series) = self.series.get(&key) {
                builder.push_series(series, pathname, None, None);
            }
        }
        let mut df = builder.finish()?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut temp = NamedTempFile::new_in(&dir)?;
        ParquetWriter::new(temp.as_file_mut())
            .finish(&mut df)
            .map_err(|e| {
                DssError::container(&self.path, format!("failed to write container: {}", e))
            })?;
        temp.persist(&self.path).map_err(|e| DssError::Io(e.error))?;

        debug!(
            "Persisted container {}: {} rows",
            self.path.display(),
            df.height()
        );
        self.dirty = false;
        Ok(())
    }
}

impl ContainerHandle for ParquetHandle {
    fn list_catalog(&mut self) -> Result<Vec<String>> {
        Ok(self.catalog.clone())
    }

    fn read_series(
        &mut self,
        pathname: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeSeries> {
        let key = RecordPath::parse(pathname)?.series_key();
        self.series
            .get(&key)
            .map(|series| series.between(start, end))
            .ok_or_else(|| {
                DssError::container(&self.path, format!("pathname {} not found", pathname))
            })
    }

    fn write_series(&mut self, pathname: &str, series: &TimeSeries) -> Result<()> {
        let key = RecordPath::parse(pathname)?.series_key();
        let merged = match self.series.get(&key) {
            Some(existing) => existing.overlay(series),
            None => {
                self.catalog.push(pathname.to_string());
                TimeSeries::new(&series.units, &series.data_type).overlay(series)
            }
        };
        self.series.insert(key, merged);
        self.dirty = true;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.dirty {
            self.persist()?;
        }
        Ok(())
    }
}
