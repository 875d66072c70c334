//! In-process container adapter.
//!
//! Containers live in a shared map keyed by path. Clones of a store share
//! the same containers, so a test can seed data, run an operation and then
//! inspect what was written and how often containers were opened.

use super::{ContainerHandle, ContainerStore};
use crate::error::{DssError, Result};
use crate::models::TimeSeries;
use crate::pathname::RecordPath;
use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Debug, Default)]
struct MemoryContainer {
    /// Raw listing in insertion order
    catalog: Vec<String>,
    /// Series keyed by their date-independent identity
    series: HashMap<String, TimeSeries>,
}

#[derive(Debug, Default)]
struct MemoryState {
    containers: HashMap<PathBuf, MemoryContainer>,
    open_calls: usize,
    close_calls: usize,
}

/// Shared in-memory containers
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a series and list `pathname` in the container catalog
    pub fn insert_series(
        &self,
        path: impl AsRef<Path>,
        pathname: &str,
        series: TimeSeries,
    ) -> Result<()> {
        let key = RecordPath::parse(pathname)?.series_key();
        let mut state = self.state.borrow_mut();
        let container = state
            .containers
            .entry(path.as_ref().to_path_buf())
            .or_default();
        if !container.catalog.iter().any(|p| p == pathname) {
            container.catalog.push(pathname.to_string());
        }
        container.series.insert(key, series);
        Ok(())
    }

    /// Add a listing entry without data, e.g. an extra date block
    pub fn insert_catalog_entry(&self, path: impl AsRef<Path>, pathname: &str) {
        let mut state = self.state.borrow_mut();
        state
            .containers
            .entry(path.as_ref().to_path_buf())
            .or_default()
            .catalog
            .push(pathname.to_string());
    }

    /// Stored series for `pathname`, regardless of its date block
    pub fn series(&self, path: impl AsRef<Path>, pathname: &str) -> Option<TimeSeries> {
        let key = RecordPath::parse(pathname).ok()?.series_key();
        let state = self.state.borrow();
        state.containers.get(path.as_ref())?.series.get(&key).cloned()
    }

    /// Listing of the container at `path`
    pub fn catalog(&self, path: impl AsRef<Path>) -> Vec<String> {
        let state = self.state.borrow();
        state
            .containers
            .get(path.as_ref())
            .map(|c| c.catalog.clone())
            .unwrap_or_default()
    }

    pub fn open_calls(&self) -> usize {
        self.state.borrow().open_calls
    }

    pub fn close_calls(&self) -> usize {
        self.state.borrow().close_calls
    }
}

impl ContainerStore for MemoryStore {
    type Handle = MemoryHandle;

    fn open(&self, path: &Path) -> Result<MemoryHandle> {
        let mut state = self.state.borrow_mut();
        state.open_calls += 1;
        state.containers.entry(path.to_path_buf()).or_default();
        Ok(MemoryHandle {
            store: self.clone(),
            path: path.to_path_buf(),
        })
    }
}

/// Handle onto one in-memory container
#[derive(Debug)]
pub struct MemoryHandle {
    store: MemoryStore,
    path: PathBuf,
}

impl ContainerHandle for MemoryHandle {
    fn list_catalog(&mut self) -> Result<Vec<String>> {
        Ok(self.store.catalog(&self.path))
    }

    fn read_series(
        &mut self,
        pathname: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeSeries> {
        self.store
            .series(&self.path, pathname)
            .map(|series| series.between(start, end))
            .ok_or_else(|| {
                DssError::container(&self.path, format!("pathname {} not found", pathname))
            })
    }

    fn write_series(&mut self, pathname: &str, series: &TimeSeries) -> Result<()> {
        let merged = match self.store.series(&self.path, pathname) {
            Some(existing) => existing.overlay(series),
            None => series.clone(),
        };
        self.store.insert_series(&self.path, pathname, merged)
    }

    fn close(&mut self) -> Result<()> {
        self.store.state.borrow_mut().close_calls += 1;
        Ok(())
    }
}
