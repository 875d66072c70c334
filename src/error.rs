//! Error handling for catalog, read and write operations.
//!
//! Provides the error taxonomy shared by the resolver, catalog builder,
//! series reader, series writer and the container adapters.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DssError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Caller inputs have an incompatible shape (path/study lists, destinations).
    #[error("Incompatible inputs: {reason}")]
    ShapeMismatch { reason: String },

    #[error("File {} does not exist.", path.display())]
    ContainerNotFound { path: PathBuf },

    /// Filter criteria matched nothing in one container.
    #[error("No pathnames returned from provided filter criteria in {}.", path.display())]
    EmptyCatalog { path: PathBuf },

    #[error("{}", study_mismatch_message(.missing, .extra))]
    StudySetMismatch {
        missing: Vec<String>,
        extra: Vec<String>,
    },

    #[error("Table is not in tidy format: {reason}")]
    MalformedTable { reason: String },

    #[error("Invalid pathname '{pathname}': {reason}")]
    InvalidPathname { pathname: String, reason: String },

    #[error("Invalid filter pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Container error for {}: {reason}", path.display())]
    Container { path: PathBuf, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DssError {
    pub fn shape_mismatch(reason: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            reason: reason.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedTable {
            reason: reason.into(),
        }
    }

    pub fn container(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Container {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

fn study_mismatch_message(missing: &[String], extra: &[String]) -> String {
    let mut lines = Vec::new();
    if !missing.is_empty() {
        lines.push(format!(
            "The following studies are missing from destinations: {:?}",
            missing
        ));
    }
    if !extra.is_empty() {
        lines.push(format!(
            "The following studies do not exist in the table: {:?}",
            extra
        ));
    }
    lines.join("\n")
}

pub type Result<T> = std::result::Result<T, DssError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_study_mismatch_lists_both_sets() {
        let err = DssError::StudySetMismatch {
            missing: vec!["Alt1".to_string()],
            extra: vec!["Base".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("missing from destinations: [\"Alt1\"]"));
        assert!(message.contains("do not exist in the table: [\"Base\"]"));
    }

    #[test]
    fn test_study_mismatch_omits_empty_set() {
        let err = DssError::StudySetMismatch {
            missing: vec!["Alt1".to_string()],
            extra: vec![],
        };
        assert!(!err.to_string().contains("do not exist"));
    }
}
