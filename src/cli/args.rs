//! Command-line argument definitions
//!
//! Defines the `catalog`, `read` and `write` subcommands using the clap
//! derive API. Selection arguments are shared by `catalog` and `read`.

use crate::catalog::{CatalogFilter, CatalogPart, MatchMode, Selection};
use crate::error::{DssError, Result};
use crate::filepaths::{FileInput, StudyInput};
use crate::writer::Destinations;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tidy access to study containers
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dss_tidy",
    version,
    about = "Catalog, read and write study container time series as tidy tables"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// List the filtered catalog of one or more containers
    Catalog(CatalogArgs),
    /// Read selected series into a tidy table
    Read(ReadArgs),
    /// Write a tidy table back into containers
    Write(WriteArgs),
}

/// Container and pathname selection shared by `catalog` and `read`
#[derive(Debug, Clone, clap::Args)]
pub struct SelectionArgs {
    /// Container file (repeat for several studies)
    #[arg(long = "file", value_name = "PATH", required = true)]
    pub files: Vec<PathBuf>,

    /// Study label, one per --file
    #[arg(long = "study", value_name = "LABEL")]
    pub studies: Vec<String>,

    /// Part A filter values
    #[arg(short = 'a', value_name = "VALUE", value_delimiter = ',')]
    pub part_a: Vec<String>,

    /// Part B filter values
    #[arg(short = 'b', value_name = "VALUE", value_delimiter = ',')]
    pub part_b: Vec<String>,

    /// Part C filter values
    #[arg(short = 'c', value_name = "VALUE", value_delimiter = ',')]
    pub part_c: Vec<String>,

    /// Part E filter values
    #[arg(short = 'e', value_name = "VALUE", value_delimiter = ',')]
    pub part_e: Vec<String>,

    /// Part F filter values
    #[arg(short = 'f', value_name = "VALUE", value_delimiter = ',')]
    pub part_f: Vec<String>,

    /// Match filter values as patterns instead of exact values
    #[arg(long = "contains")]
    pub contains: bool,
}

impl SelectionArgs {
    pub fn to_selection(&self) -> Selection {
        let files = match self.files.as_slice() {
            [single] => FileInput::Single(single.clone()),
            many => FileInput::Many(many.to_vec()),
        };
        let studies = match self.studies.as_slice() {
            [] => None,
            [single] if matches!(files, FileInput::Single(_)) => {
                Some(StudyInput::Single(single.clone()))
            }
            many => Some(StudyInput::Many(many.to_vec())),
        };
        let mode = if self.contains {
            MatchMode::Contains
        } else {
            MatchMode::Exact
        };
        let filter = CatalogFilter::new()
            .part(CatalogPart::A, self.part_a.clone())
            .part(CatalogPart::B, self.part_b.clone())
            .part(CatalogPart::C, self.part_c.clone())
            .part(CatalogPart::E, self.part_e.clone())
            .part(CatalogPart::F, self.part_f.clone())
            .with_mode(mode);

        Selection {
            files,
            studies,
            filter,
        }
    }
}

#[derive(Debug, Clone, Parser)]
pub struct CatalogArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Write the catalog to a .csv or .parquet file instead of printing it
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Parser)]
pub struct ReadArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// First date of the read window (YYYY-MM-DD)
    #[arg(long = "start", value_name = "DATE")]
    pub start: Option<NaiveDate>,

    /// Last date of the read window (YYYY-MM-DD)
    #[arg(long = "end", value_name = "DATE")]
    pub end: Option<NaiveDate>,

    /// Write the table to a .csv or .parquet file instead of printing it
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Parser)]
pub struct WriteArgs {
    /// Tidy table in parquet format
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    pub input: PathBuf,

    /// Destination container, or STUDY=PATH once per study
    #[arg(long = "dest", value_name = "DEST", required = true)]
    pub destinations: Vec<String>,
}

impl WriteArgs {
    /// Interpret `--dest` values as a single path or a study mapping
    pub fn to_destinations(&self) -> Result<Destinations> {
        if let [single] = self.destinations.as_slice() {
            if !single.contains('=') {
                return Ok(Destinations::Single(PathBuf::from(single)));
            }
        }

        let pairs = self
            .destinations
            .iter()
            .map(|dest| {
                dest.split_once('=')
                    .filter(|(study, path)| !study.is_empty() && !path.is_empty())
                    .map(|(study, path)| (study.to_string(), PathBuf::from(path)))
                    .ok_or_else(|| {
                        DssError::shape_mismatch(format!(
                            "destination '{}' must be STUDY=PATH when writing several studies",
                            dest
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Destinations::by_study(pairs))
    }
}
