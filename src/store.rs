//! Container capability used by the catalog builder, reader and writer.
//!
//! A container holds many named series. This module defines the operations
//! the rest of the crate relies on (open, list, read, write, close) and the
//! scoped guard that guarantees a handle is closed on every exit path.
//!
//! Handles are not reentrant: callers must not operate on the same container
//! path from overlapping calls.

pub mod memory;
pub mod parquet;

pub use memory::MemoryStore;
pub use parquet::ParquetStore;

use crate::error::Result;
use crate::models::TimeSeries;
use chrono::NaiveDate;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Opens containers by path
pub trait ContainerStore {
    type Handle: ContainerHandle;

    /// Open the container at `path`
    fn open(&self, path: &Path) -> Result<Self::Handle>;

    /// Open the container inside a guard that closes it when dropped
    fn open_scoped(&self, path: &Path) -> Result<OpenContainer<Self::Handle>> {
        debug!("Opening container {}", path.display());
        let handle = self.open(path)?;
        Ok(OpenContainer::new(path, handle))
    }
}

/// Operations on one open container
pub trait ContainerHandle {
    /// Raw record pathnames stored in the container
    fn list_catalog(&mut self) -> Result<Vec<String>>;

    /// Read a series between two dates, both inclusive
    fn read_series(&mut self, pathname: &str, start: NaiveDate, end: NaiveDate)
    -> Result<TimeSeries>;

    /// Write a series under `pathname`
    fn write_series(&mut self, pathname: &str, series: &TimeSeries) -> Result<()>;

    /// Release the container, persisting pending writes
    fn close(&mut self) -> Result<()>;
}

/// Scoped acquisition of an open container.
///
/// `finish` closes the handle and reports close failures. A guard dropped
/// without `finish` (an error unwound past it) still closes the handle.
pub struct OpenContainer<H: ContainerHandle> {
    path: PathBuf,
    handle: H,
    closed: bool,
}

impl<H: ContainerHandle> OpenContainer<H> {
    pub fn new(path: impl Into<PathBuf>, handle: H) -> Self {
        Self {
            path: path.into(),
            handle,
            closed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the container and surface any close error
    pub fn finish(mut self) -> Result<()> {
        self.closed = true;
        debug!("Closing container {}", self.path.display());
        self.handle.close()
    }
}

impl<H: ContainerHandle> Deref for OpenContainer<H> {
    type Target = H;

    fn deref(&self) -> &H {
        &self.handle
    }
}

impl<H: ContainerHandle> DerefMut for OpenContainer<H> {
    fn deref_mut(&mut self) -> &mut H {
        &mut self.handle
    }
}

impl<H: ContainerHandle> Drop for OpenContainer<H> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.handle.close() {
            warn!(
                "Failed to close container {} on error path: {}",
                self.path.display(),
                e
            );
        }
    }
}
