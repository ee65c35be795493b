//! Filesystem walker for enumerating staged files

use crate::error::PackError;
use crate::tree::path::{has_hidden_segment, to_href};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Filesystem walker configuration
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Skip any entry with a path segment (relative to the base) starting with `.`
    pub skip_hidden: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: true,
            skip_hidden: true,
        }
    }
}

/// Enumerates files below a base directory as base-relative hrefs.
pub struct Walker {
    base: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker rooted at `base`
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(base: impl Into<PathBuf>, config: WalkerConfig) -> Self {
        Self {
            base: base.into(),
            config,
        }
    }

    /// Every file below the base.
    pub fn files(&self) -> Result<Vec<String>, PackError> {
        self.walk_from(&self.base)
    }

    /// Every file below `base/subtree`, still relative to the base.
    ///
    /// A missing subtree yields an empty list.
    pub fn files_under(&self, subtree: &str) -> Result<Vec<String>, PackError> {
        let start = self.base.join(subtree);
        if !start.exists() {
            return Ok(Vec::new());
        }
        if let Some(href) = to_href(&start, &self.base) {
            if self.config.skip_hidden && has_hidden_segment(Path::new(&href)) {
                return Ok(Vec::new());
            }
        }
        self.walk_from(&start)
    }

    /// Depth-first, siblings in file-name order.
    fn walk_from(&self, start: &Path) -> Result<Vec<String>, PackError> {
        let base = self.base.as_path();
        let skip_hidden = self.config.skip_hidden;
        let walker = WalkDir::new(start)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if !skip_hidden {
                    return true;
                }
                match entry.path().strip_prefix(base) {
                    Ok(relative) => !has_hidden_segment(relative),
                    Err(_) => true,
                }
            });

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| PackError::walk(start, e))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(href) = to_href(entry.path(), base) {
                files.push(href);
            }
        }
        Ok(files)
    }
}
