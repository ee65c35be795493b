//! Error types for the SCORM packaging pipeline.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while discovering, staging, describing or archiving modules.
#[derive(Debug, Error)]
pub enum PackError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk {}: {message}", path.display())]
    Walk { path: PathBuf, message: String },

    #[error("Packaging failed: {0}")]
    Packaging(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Run failed: {failed} of {total} module(s) failed (first: {first})")]
    RunFailed {
        failed: usize,
        total: usize,
        first: String,
    },
}

impl PackError {
    /// Attach the offending path to an I/O error.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        PackError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn walk(path: impl AsRef<Path>, err: walkdir::Error) -> Self {
        // Prefer the entry walkdir was looking at over the walk root.
        let path = err
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| path.as_ref().to_path_buf());
        PackError::Walk {
            path,
            message: err.to_string(),
        }
    }
}

impl From<config::ConfigError> for PackError {
    fn from(err: config::ConfigError) -> Self {
        PackError::Config(err.to_string())
    }
}

impl From<zip::result::ZipError> for PackError {
    fn from(err: zip::result::ZipError) -> Self {
        PackError::Packaging(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PackError>;
