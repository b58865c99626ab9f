//! Error types shared by the sort and undo engines.

use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can abort a sort pass or an undo.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The root directory is missing or is not a directory.
    #[error("Invalid base path {}: {source}", path.display())]
    InvalidBasePath {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Listing the root directory or reading an entry's metadata failed.
    #[error("Failed to scan {}: {source}", path.display())]
    ScanFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A path the sort log could not record exactly.
    #[error("Cannot sort {}: path is not valid UTF-8", path.display())]
    NonUtf8Path { path: PathBuf },

    /// Failed to create a category or period directory.
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to move an item to its destination.
    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write or delete the sort log.
    #[error("Failed to write sort log {}: {source}", path.display())]
    LogWriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read the sort log.
    #[error("Failed to read sort log {}: {source}", path.display())]
    LogReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The filter configuration could not be loaded or compiled.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for sort and undo operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

impl OrganizeError {
    pub(crate) fn invalid_base_path(path: &std::path::Path, reason: &str) -> Self {
        Self::InvalidBasePath {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, reason.to_string()),
        }
    }
}
