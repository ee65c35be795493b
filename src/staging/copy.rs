//! Recursive copy and best-effort removal primitives.

use crate::error::PackError;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Copy a file or directory tree from `source` to `destination`.
///
/// Intermediate directories are created. Existing files are overwritten.
/// `skip` receives each path relative to `source`; returning true prunes that
/// entry (and everything below it when it is a directory).
pub fn copy_recursive<F>(source: &Path, destination: &Path, mut skip: F) -> Result<u64, PackError>
where
    F: FnMut(&Path) -> bool,
{
    let metadata = fs::metadata(source).map_err(|e| PackError::io(source, e))?;
    if metadata.is_file() {
        copy_file(source, destination)?;
        return Ok(1);
    }

    let mut copied = 0u64;
    let walker = WalkDir::new(source)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| match entry.path().strip_prefix(source) {
            Ok(relative) if !relative.as_os_str().is_empty() => !skip(relative),
            _ => true,
        });

    for entry in walker {
        let entry = entry.map_err(|e| PackError::walk(source, e))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| PackError::Walk {
                path: entry.path().to_path_buf(),
                message: e.to_string(),
            })?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| PackError::io(&target, e))?;
        } else if entry.file_type().is_file() {
            copy_file(entry.path(), &target)?;
            copied += 1;
        }
    }

    debug!(
        source = %source.display(),
        destination = %destination.display(),
        files = copied,
        "Copied tree"
    );
    Ok(copied)
}

fn copy_file(source: &Path, destination: &Path) -> Result<(), PackError> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| PackError::io(parent, e))?;
    }
    fs::copy(source, destination).map_err(|e| PackError::io(source, e))?;
    Ok(())
}

/// Remove a directory tree if present. Absence is not an error; other failures
/// are logged and reported as `false`.
pub fn remove_dir_best_effort(path: &Path) -> bool {
    match fs::remove_dir_all(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Removed directory");
            true
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to remove directory");
            false
        }
    }
}
