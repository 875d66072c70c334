//! Resolution of container paths and study labels into ordered pairs.

use crate::constants::SYNTHESIZED_STUDY_PREFIX;
use crate::error::{DssError, Result};
use crate::models::StudyFilePath;
use std::path::PathBuf;

/// One container path or a list of them
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileInput {
    Single(PathBuf),
    Many(Vec<PathBuf>),
}

/// One study label or a list of them
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudyInput {
    Single(String),
    Many(Vec<String>),
}

impl StudyInput {
    /// Empty labels and empty lists count as no studies at all
    fn is_blank(&self) -> bool {
        match self {
            StudyInput::Single(label) => label.is_empty(),
            StudyInput::Many(labels) => labels.is_empty(),
        }
    }
}

impl From<PathBuf> for FileInput {
    fn from(path: PathBuf) -> Self {
        FileInput::Single(path)
    }
}

impl From<&str> for FileInput {
    fn from(path: &str) -> Self {
        FileInput::Single(PathBuf::from(path))
    }
}

impl From<&std::path::Path> for FileInput {
    fn from(path: &std::path::Path) -> Self {
        FileInput::Single(path.to_path_buf())
    }
}

impl From<Vec<PathBuf>> for FileInput {
    fn from(paths: Vec<PathBuf>) -> Self {
        FileInput::Many(paths)
    }
}

impl From<Vec<&str>> for FileInput {
    fn from(paths: Vec<&str>) -> Self {
        FileInput::Many(paths.into_iter().map(PathBuf::from).collect())
    }
}

impl From<&str> for StudyInput {
    fn from(label: &str) -> Self {
        StudyInput::Single(label.to_string())
    }
}

impl From<String> for StudyInput {
    fn from(label: String) -> Self {
        StudyInput::Single(label)
    }
}

impl From<Vec<String>> for StudyInput {
    fn from(labels: Vec<String>) -> Self {
        StudyInput::Many(labels)
    }
}

impl From<Vec<&str>> for StudyInput {
    fn from(labels: Vec<&str>) -> Self {
        StudyInput::Many(labels.into_iter().map(str::to_string).collect())
    }
}

/// Pair container paths with study labels, preserving input order.
///
/// A single path takes an optional single label. A list of paths takes an
/// equally long list of labels, or none, in which case labels `Alt0`,
/// `Alt1`, ... are synthesized. Any other combination is rejected.
pub fn parse_filepaths(files: &FileInput, studies: Option<&StudyInput>) -> Result<Vec<StudyFilePath>> {
    let studies = studies.filter(|s| !s.is_blank());

    match (files, studies) {
        (FileInput::Single(path), None) => Ok(vec![StudyFilePath::new(None, path)]),
        (FileInput::Single(path), Some(StudyInput::Single(label))) => {
            Ok(vec![StudyFilePath::new(Some(label.clone()), path)])
        }
        (FileInput::Many(paths), None) => {
            if paths.is_empty() {
                return Err(DssError::shape_mismatch("no file paths provided"));
            }
            Ok(paths
                .iter()
                .enumerate()
                .map(|(i, path)| {
                    StudyFilePath::new(Some(format!("{}{}", SYNTHESIZED_STUDY_PREFIX, i)), path)
                })
                .collect())
        }
        (FileInput::Many(paths), Some(StudyInput::Many(labels))) => {
            if paths.len() != labels.len() {
                return Err(DssError::shape_mismatch(format!(
                    "list length of file paths ({}) must equal list length of study names ({})",
                    paths.len(),
                    labels.len()
                )));
            }
            Ok(labels
                .iter()
                .zip(paths)
                .map(|(label, path)| StudyFilePath::new(Some(label.clone()), path))
                .collect())
        }
        _ => Err(DssError::shape_mismatch(
            "file paths and study names must both be single values or both be lists",
        )),
    }
}
