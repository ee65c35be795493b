//! Config file locations.

use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Environment variable selecting the env-specific project file.
pub const ENV_NAME_VAR: &str = "SCORM_PACK_ENV";

/// Per-user configuration directory (`$XDG_CONFIG_HOME/scorm-pack` on Linux).
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "scorm-pack").map(|dirs| dirs.config_dir().to_path_buf())
}

pub(crate) fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Base project config: `<project>/config/config.toml`.
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join("config").join("config.toml")
}

pub(crate) fn env_config_path(project_root: &Path) -> PathBuf {
    let env_name = std::env::var(ENV_NAME_VAR).unwrap_or_else(|_| "development".to_string());
    project_root
        .join("config")
        .join(format!("{}.toml", env_name))
}
