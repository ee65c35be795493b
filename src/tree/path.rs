//! Path canonicalization and normalization utilities

use std::path::{Component, Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

use crate::error::PackError;

/// Canonicalize a path without the `\\?\` prefix on Windows.
pub fn canonicalize_path(path: &Path) -> Result<PathBuf, PackError> {
    dunce::canonicalize(path).map_err(|e| PackError::io(path, e))
}

/// True when any segment of `relative` starts with `.`.
///
/// `.` and `..` components count as hidden too, so they never leak into a manifest.
pub fn has_hidden_segment(relative: &Path) -> bool {
    relative.components().any(|component| match component {
        Component::Normal(name) => name.to_string_lossy().starts_with('.'),
        Component::CurDir | Component::ParentDir => true,
        Component::RootDir | Component::Prefix(_) => false,
    })
}

/// Express `path` relative to `base` as a manifest href.
///
/// Segments are joined with `/` on every platform and normalized to NFC.
/// Returns `None` when `path` is not under `base`.
pub fn to_href(path: &Path, base: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    let segments: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().nfc().collect::<String>()),
            _ => None,
        })
        .collect();
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}
