//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::PackError;

/// Map domain errors to a single line for stderr.
pub fn map_error(e: &PackError) -> String {
    match e {
        PackError::Config(msg) => format!("Configuration error: {}\nRun 'scorm-pack validate' for details.", msg),
        other => format!("Error: {}", other),
    }
}
