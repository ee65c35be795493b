//! Config loading entry points.

use config::{Environment, File};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::merge::merge_policy;
use super::sources::{global_file, project_file};
use super::PackagerConfig;
use crate::error::PackError;

/// Loads [`PackagerConfig`] from the layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config for a project: defaults, global file, project files, environment.
    pub fn load(project_root: &Path) -> Result<PackagerConfig, PackError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = project_file::add_to_builder(builder, project_root)?;
        let config = builder
            .add_source(Self::environment())
            .build()?
            .try_deserialize::<PackagerConfig>()?;
        debug!(
            project = %project_root.display(),
            modules = config.modules.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Load config from an explicit file; global and project files are skipped.
    pub fn load_from_file(path: &Path) -> Result<PackagerConfig, PackError> {
        if !path.is_file() {
            return Err(PackError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        let config = merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .add_source(Self::environment())
            .build()?
            .try_deserialize::<PackagerConfig>()?;
        Ok(config)
    }

    /// Path of the per-user config file, if a home directory is known.
    pub fn global_config_path() -> Option<PathBuf> {
        super::paths::global_config_path()
    }

    /// `SCORM_PACK__BUILD__LABEL=x` overrides `build.label`.
    fn environment() -> Environment {
        Environment::with_prefix("SCORM_PACK")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }
}
