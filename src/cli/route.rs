//! CLI route: single route table and command context. Dispatches to domain services and presentation.

use crate::cli::help::{command_name, needs_config};
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_check_text, format_discovery_json, format_discovery_text, format_init_result,
    format_run_report_json, format_run_report_text,
};
use crate::config::{ConfigLoader, PackagerConfig};
use crate::discovery::probe_modules;
use crate::error::PackError;
use crate::init::initialize_project;
use crate::manifest;
use crate::packager::ArchiverKind;
use crate::pipeline::{check_project, run_build, BuildOverrides};
use crate::run::RunConfig;
use crate::tree::path::canonicalize_path;
use chrono::Local;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// What a command printed, and whether it failed.
///
/// A failed build still has a report worth printing, so output and failure travel together.
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub failure: Option<PackError>,
}

impl CommandOutput {
    fn ok(stdout: String) -> Self {
        Self {
            stdout,
            failure: None,
        }
    }
}

/// Runtime context for CLI execution: project root, config path and the loaded config.
pub struct CommandContext {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    config: Option<PackagerConfig>,
}

impl CommandContext {
    /// Load configuration for commands that need it. `init` runs without one.
    pub fn new(
        project_root: PathBuf,
        config_path: Option<PathBuf>,
        command: &Commands,
    ) -> Result<Self, PackError> {
        let project_root = canonicalize_path(&project_root)?;
        let config = if needs_config(command) {
            Some(load_config(&project_root, config_path.as_deref())?)
        } else {
            None
        };
        Ok(Self {
            project_root,
            config_path,
            config,
        })
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, PackError> {
        let started = Instant::now();
        let name = command_name(command);
        debug!(command = name, config = ?self.config_path, "Executing command");
        let result = self.execute_inner(command);
        info!(
            command = name,
            ok = matches!(result, Ok(CommandOutput { failure: None, .. })),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<CommandOutput, PackError> {
        match command {
            Commands::Build {
                label,
                concurrency,
                archiver,
                continue_on_error,
                format,
            } => {
                let overrides = BuildOverrides {
                    label: label.clone(),
                    concurrency: *concurrency,
                    archiver: archiver.as_deref().map(parse_archiver).transpose()?,
                    continue_on_error: *continue_on_error,
                };
                self.handle_build(&overrides, format)
            }
            Commands::Discover { format } => {
                let config = self.config()?;
                let paths = config.build.resolve_paths(&self.project_root);
                let probes = probe_modules(&config.modules, &paths.build_root);
                let out = if format == "json" {
                    format_discovery_json(&probes)?
                } else {
                    format_discovery_text(&probes)
                };
                Ok(CommandOutput::ok(out))
            }
            Commands::Manifest { module_dir, print } => {
                let config = self.config()?;
                let run = RunConfig::from_config(config, &self.project_root, Local::now())?;
                let xml = manifest::regenerate(&run, &config.modules, module_dir, !*print)?;
                let out = if *print {
                    xml
                } else {
                    format!(
                        "✓ Wrote {}",
                        module_dir.join(manifest::MANIFEST_FILE).display()
                    )
                };
                Ok(CommandOutput::ok(out))
            }
            Commands::Validate => {
                let check = check_project(self.config()?, &self.project_root);
                let text = format_check_text(&check);
                if check.is_ok() {
                    Ok(CommandOutput::ok(text))
                } else {
                    Ok(CommandOutput {
                        stdout: text,
                        failure: Some(PackError::Config(format!(
                            "{} problem(s) found",
                            check.errors.len()
                        ))),
                    })
                }
            }
            Commands::Init { force } => {
                let result = initialize_project(&self.project_root, *force)?;
                Ok(CommandOutput::ok(format_init_result(&result)))
            }
        }
    }

    fn handle_build(
        &self,
        overrides: &BuildOverrides,
        format: &str,
    ) -> Result<CommandOutput, PackError> {
        let config = self.config()?;
        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| PackError::Config(format!("Failed to start async runtime: {}", e)))?;
        let report = rt.block_on(run_build(config, &self.project_root, overrides))?;

        let stdout = if format == "json" {
            format_run_report_json(&report)?
        } else {
            format_run_report_text(&report)
        };
        Ok(CommandOutput {
            stdout,
            failure: report.into_result().err(),
        })
    }

    fn config(&self) -> Result<&PackagerConfig, PackError> {
        self.config
            .as_ref()
            .ok_or_else(|| PackError::Config("configuration not loaded".to_string()))
    }
}

/// `--config` replaces the file layers; otherwise the full layered load runs.
pub fn load_config(
    project_root: &Path,
    config_path: Option<&Path>,
) -> Result<PackagerConfig, PackError> {
    match config_path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(project_root),
    }
}

fn parse_archiver(value: &str) -> Result<ArchiverKind, PackError> {
    match value {
        "zip" => Ok(ArchiverKind::Zip),
        "command" => Ok(ArchiverKind::Command),
        other => Err(PackError::Config(format!(
            "Unknown archiver '{}' (expected zip or command)",
            other
        ))),
    }
}
