//! Facade binding a container store to a read configuration.

use crate::catalog::{Catalog, Selection, read_catalog};
use crate::config::IoConfig;
use crate::error::Result;
use crate::reader::read_series;
use crate::store::ContainerStore;
use crate::writer::{Destinations, WriteStats, write_series};
use chrono::NaiveDate;
use polars::prelude::DataFrame;

/// Catalog, read and write operations over one container store
#[derive(Debug, Clone)]
pub struct DssIo<S: ContainerStore> {
    store: S,
    config: IoConfig,
}

impl<S: ContainerStore> DssIo<S> {
    /// Create with the default read window
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: IoConfig::default(),
        }
    }

    /// Configure the read window
    pub fn with_config(mut self, config: IoConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &IoConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Filtered catalog of the selected containers
    pub fn read_catalog(&self, selection: &Selection) -> Result<Catalog> {
        read_catalog(&self.store, selection)
    }

    /// Read the selected series over the configured window
    pub fn read(&self, selection: &Selection) -> Result<DataFrame> {
        self.config.validate()?;
        read_series(
            &self.store,
            selection,
            self.config.start_date,
            self.config.end_date,
        )
    }

    /// Read the selected series over an explicit window
    pub fn read_between(
        &self,
        selection: &Selection,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DataFrame> {
        self.config
            .clone()
            .with_window(start, end)
            .validate()?;
        read_series(&self.store, selection, start, end)
    }

    /// Write a tidy table
    pub fn write(&self, destinations: &Destinations, table: &DataFrame) -> Result<WriteStats> {
        write_series(&self.store, destinations, table)
    }
}
