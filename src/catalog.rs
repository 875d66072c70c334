//! Catalog discovery across one or more containers.
//!
//! For every (study, path) pair the container listing is decomposed into
//! record path parts, filtered, tagged with its file path and study, and
//! appended to a single catalog. Exact duplicate rows are removed at the end
//! and each row gets a reconstructed pathname with an empty D part.

pub mod filter;

pub use filter::{CatalogFilter, CatalogPart, MatchMode};

use crate::constants::{
    COL_FILE_PATH, COL_PART_A, COL_PART_B, COL_PART_C, COL_PART_E, COL_PART_F, COL_PATHNAME,
    COL_STUDY,
};
use crate::error::{DssError, Result};
use crate::filepaths::{FileInput, StudyInput, parse_filepaths};
use crate::models::{CatalogEntry, StudyFilePath};
use crate::pathname::RecordPath;
use crate::store::{ContainerHandle, ContainerStore};
use polars::prelude::*;
use std::collections::HashSet;
use tracing::{debug, info};

/// Which containers to look in and which pathnames to keep
#[derive(Debug, Clone)]
pub struct Selection {
    pub files: FileInput,
    pub studies: Option<StudyInput>,
    pub filter: CatalogFilter,
}

impl Selection {
    pub fn new(files: impl Into<FileInput>) -> Self {
        Self {
            files: files.into(),
            studies: None,
            filter: CatalogFilter::default(),
        }
    }

    pub fn with_studies(mut self, studies: impl Into<StudyInput>) -> Self {
        self.studies = Some(studies.into());
        self
    }

    pub fn with_filter(mut self, filter: CatalogFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Filtered, de-duplicated catalog of record pathnames
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    has_study: bool,
}

impl Catalog {
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether rows carry a study label
    pub fn has_study(&self) -> bool {
        self.has_study
    }

    /// Distinct (study, file path) pairs in first-seen order
    pub fn study_filepaths(&self) -> Vec<StudyFilePath> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(|entry| StudyFilePath::new(entry.study.clone(), &entry.file_path))
            .filter(|pair| seen.insert(pair.clone()))
            .collect()
    }

    /// Rows belonging to one (study, file path) pair
    pub fn entries_for<'a>(
        &'a self,
        pair: &'a StudyFilePath,
    ) -> impl Iterator<Item = &'a CatalogEntry> + 'a {
        self.entries.iter().filter(move |entry| {
            entry.file_path == pair.path
                && (pair.study.is_none() || entry.study == pair.study)
        })
    }

    /// Catalog as a table:
    /// `Part A, Part B, Part C, Part F, Part E, File Path, [Study], Pathname`
    pub fn to_frame(&self) -> Result<DataFrame> {
        let text = |f: fn(&CatalogEntry) -> String| -> Vec<String> {
            self.entries.iter().map(f).collect()
        };

        let mut columns = vec![
            Column::new(COL_PART_A.into(), text(|e| e.part_a.clone())),
            Column::new(COL_PART_B.into(), text(|e| e.part_b.clone())),
            Column::new(COL_PART_C.into(), text(|e| e.part_c.clone())),
            Column::new(COL_PART_F.into(), text(|e| e.part_f.clone())),
            Column::new(COL_PART_E.into(), text(|e| e.part_e.clone())),
            Column::new(
                COL_FILE_PATH.into(),
                text(|e| e.file_path.to_string_lossy().into_owned()),
            ),
        ];
        if self.has_study {
            columns.push(Column::new(
                COL_STUDY.into(),
                text(|e| e.study.clone().unwrap_or_default()),
            ));
        }
        columns.push(Column::new(COL_PATHNAME.into(), text(|e| e.pathname.clone())));

        Ok(DataFrame::new(columns)?)
    }
}

/// Build the catalog for `selection`.
///
/// Containers are processed in resolver order, each opened, listed and
/// closed before the next. A container that does not exist, or whose listing
/// has no pathname passing the filter, aborts the whole call.
pub fn read_catalog<S: ContainerStore>(store: &S, selection: &Selection) -> Result<Catalog> {
    let pairs = parse_filepaths(&selection.files, selection.studies.as_ref())?;
    let filter = selection.filter.compile()?;

    let mut rows = Vec::new();
    for pair in &pairs {
        if !pair.path.exists() {
            return Err(DssError::ContainerNotFound {
                path: pair.path.clone(),
            });
        }

        let mut container = store.open_scoped(&pair.path)?;
        let listing = container.list_catalog()?;
        debug!(
            "Listed {} pathnames in {}",
            listing.len(),
            pair.path.display()
        );

        let mut kept = 0usize;
        for raw in &listing {
            let path = RecordPath::parse(raw)?;
            if filter.matches(&path) {
                rows.push(catalog_row(&path, pair));
                kept += 1;
            }
        }
        if kept == 0 {
            return Err(DssError::EmptyCatalog {
                path: pair.path.clone(),
            });
        }
        debug!(
            "Kept {} of {} pathnames from {}",
            kept,
            listing.len(),
            pair.path.display()
        );

        container.finish()?;
    }

    let total = rows.len();
    let mut seen = HashSet::new();
    rows.retain(|row| seen.insert(row.clone()));

    info!(
        "Catalog built from {} containers: {} pathnames ({} duplicates removed)",
        pairs.len(),
        rows.len(),
        total - rows.len()
    );

    Ok(Catalog {
        has_study: pairs.iter().any(|pair| pair.study.is_some()),
        entries: rows,
    })
}

fn catalog_row(path: &RecordPath, pair: &StudyFilePath) -> CatalogEntry {
    CatalogEntry {
        part_a: path.a.clone(),
        part_b: path.b.clone(),
        part_c: path.c.clone(),
        part_f: path.f.clone(),
        part_e: path.e.clone(),
        file_path: pair.path.clone(),
        study: pair.study.clone(),
        pathname: path.without_date().to_string(),
    }
}
