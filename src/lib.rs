//! Tidy tabular access to water-resources study containers.
//!
//! A container holds many time series, each keyed by a six part record
//! pathname `/A/B/C/D/E/F/`. This library provides tools for:
//! - Resolving container paths and study labels into ordered pairs
//! - Building a filtered, de-duplicated catalog across many containers
//! - Reading selected series into one long-format (tidy) polars table
//! - Writing tidy tables, optionally spanning several studies, back out
//!
//! The container itself is reached only through the [`store`] capability.
//!
//! ```no_run
//! use dss_tidy::{CatalogFilter, DssIo, ParquetStore, Selection};
//!
//! let io = DssIo::new(ParquetStore::new());
//! let selection = Selection::new(vec!["base.parquet", "alt.parquet"])
//!     .with_studies(vec!["Base", "Alt"])
//!     .with_filter(CatalogFilter::new().c(["STORAGE"]));
//! let table = io.read(&selection)?;
//! println!("{}", table);
//! # Ok::<(), dss_tidy::DssError>(())
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod filepaths;
pub mod io;
pub mod models;
pub mod pathname;
pub mod reader;
pub mod store;
pub mod tidy;
pub mod validation;
pub mod writer;

#[cfg(test)]
mod tests;

pub use catalog::{Catalog, CatalogFilter, CatalogPart, MatchMode, Selection, read_catalog};
pub use config::IoConfig;
pub use error::{DssError, Result};
pub use filepaths::{FileInput, StudyInput, parse_filepaths};
pub use io::DssIo;
pub use models::{CatalogEntry, StudyFilePath, TimeSeries};
pub use pathname::RecordPath;
pub use reader::{read_catalog_series, read_series};
pub use store::{ContainerHandle, ContainerStore, MemoryStore, OpenContainer, ParquetStore};
pub use validation::{is_tidy, validate_tidy};
pub use writer::{Destinations, WriteStats, write_series};
