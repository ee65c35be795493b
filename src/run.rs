//! Run-wide, read-only settings shared by every module pipeline.

use crate::config::PackagerConfig;
use crate::error::PackError;
use crate::manifest::IdentifierScheme;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Immutable settings for one packaging run.
///
/// Built once at startup and shared by reference (or `Arc`) with every stage.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Local start time formatted `YYYY-MM-DD-HHMMSS`
    pub run_id: String,
    /// Suffix of the run directory name
    pub label: String,
    /// Static build output being packaged
    pub build_root: PathBuf,
    /// Directory holding the fixed schema files
    pub schema_source: PathBuf,
    pub schema_files: Vec<String>,
    /// Parent of the run directory; archives land here
    pub output_root: PathBuf,
    /// Manifest identifier, unique per run unless pinned in config
    pub app_id: String,
    pub organization: String,
    pub title: String,
    pub identifier_scheme: IdentifierScheme,
    pub mastery_score: f64,
}

impl RunConfig {
    /// Build the run settings from validated configuration.
    pub fn from_config(
        config: &PackagerConfig,
        project_root: &Path,
        started: DateTime<Local>,
    ) -> Result<Self, PackError> {
        config
            .validate()
            .map_err(|errors| crate::config::validation_failure(&errors))?;

        let paths = config.build.resolve_paths(project_root);
        let run_id = format_run_id(&started);
        let app_id = match config.package.app_id {
            Some(ref fixed) => fixed.clone(),
            None => format!("{}{}", config.package.app_id_prefix, Uuid::new_v4()),
        };

        Ok(Self {
            run_id,
            label: config.build.label.clone(),
            build_root: paths.build_root,
            schema_source: paths.schema_source,
            schema_files: config.package.schema_files.clone(),
            output_root: paths.output_root,
            app_id,
            organization: config.package.organization.clone(),
            title: config.package.title.clone(),
            identifier_scheme: config.manifest.identifiers,
            mastery_score: config.manifest.mastery_score,
        })
    }

    /// `<runId>-<label>`, or the bare run id when no label is set.
    pub fn run_name(&self) -> String {
        if self.label.is_empty() {
            self.run_id.clone()
        } else {
            format!("{}-{}", self.run_id, self.label)
        }
    }

    /// `<outputRoot>/<runName>`
    pub fn destination_root(&self) -> PathBuf {
        self.output_root.join(self.run_name())
    }

    /// `<destinationRoot>/module_<key>`
    pub fn module_dir(&self, key: &str) -> PathBuf {
        self.destination_root().join(format!("module_{}", key))
    }

    /// `<outputRoot>/<runName>-<key>.<extension>`, a sibling of the run directory.
    pub fn archive_path(&self, key: &str, extension: &str) -> PathBuf {
        self.output_root
            .join(format!("{}-{}.{}", self.run_name(), key, extension))
    }
}

/// `2024-03-07-091502`
pub fn format_run_id(started: &DateTime<Local>) -> String {
    started.format("%Y-%m-%d-%H%M%S").to_string()
}
