//! Project initialization
//!
//! Writes a starter `config/config.toml` via `scorm-pack init`. The starter holds
//! every setting at its default plus one example module, so editing it is the
//! quickest way to declare a course.

use crate::config::{project_config_path, PackagerConfig};
use crate::discovery::ModuleSpec;
use crate::error::PackError;
use std::path::{Path, PathBuf};
use tracing::info;

const STARTER_HEADER: &str = "# scorm-pack project configuration\n\
# Modules are packaged in table order; each needs build/module-<key>.html.\n\n";

/// What `init` did with the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitAction {
    Created,
    Overwritten,
    Skipped,
}

/// Result of initialization operation
#[derive(Debug, Clone)]
pub struct InitResult {
    pub path: PathBuf,
    pub action: InitAction,
}

/// Defaults plus one example module.
pub fn starter_config() -> PackagerConfig {
    PackagerConfig {
        modules: vec![ModuleSpec::new("0", "Introduction")],
        ..PackagerConfig::default()
    }
}

/// Starter configuration as TOML text.
pub fn render_starter_config() -> Result<String, PackError> {
    let body = toml::to_string_pretty(&starter_config())
        .map_err(|e| PackError::Config(format!("Failed to serialize starter config: {}", e)))?;
    Ok(format!("{}{}", STARTER_HEADER, body))
}

/// Write the starter config under `project_root`.
///
/// An existing file is left alone unless `force` is set.
pub fn initialize_project(project_root: &Path, force: bool) -> Result<InitResult, PackError> {
    let path = project_config_path(project_root);
    let existed = path.exists();

    if existed && !force {
        info!(path = %path.display(), "Config already exists, skipping");
        return Ok(InitResult {
            path,
            action: InitAction::Skipped,
        });
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| PackError::io(parent, e))?;
    }
    std::fs::write(&path, render_starter_config()?).map_err(|e| PackError::io(&path, e))?;
    info!(path = %path.display(), "Wrote starter config");

    Ok(InitResult {
        path,
        action: if existed {
            InitAction::Overwritten
        } else {
            InitAction::Created
        },
    })
}
