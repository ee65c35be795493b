//! Packaging pipeline: discovery once, then one worker per module.

pub mod executor;
pub mod report;

pub use executor::{process_module, FailurePolicy, Orchestrator, PipelineOptions};
pub use report::{ModuleFailure, PipelineStage, RunReport};

use crate::config::PackagerConfig;
use crate::discovery::discover_modules;
use crate::error::PackError;
use crate::packager::{archiver_for, ArchiverKind};
use crate::run::RunConfig;
use chrono::Local;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Command-line adjustments applied on top of the loaded configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOverrides {
    pub label: Option<String>,
    pub concurrency: Option<usize>,
    pub archiver: Option<ArchiverKind>,
    pub continue_on_error: bool,
}

impl BuildOverrides {
    pub fn apply(&self, config: &mut PackagerConfig) {
        if let Some(ref label) = self.label {
            config.build.label = label.clone();
        }
        if let Some(concurrency) = self.concurrency {
            config.pipeline.concurrency = Some(concurrency);
        }
        if let Some(archiver) = self.archiver {
            config.pipeline.archiver = archiver;
        }
        if self.continue_on_error {
            config.pipeline.continue_on_error = true;
        }
    }
}

impl PipelineOptions {
    pub fn from_config(config: &PackagerConfig) -> Self {
        Self {
            concurrency: config.pipeline.effective_concurrency(),
            failure_policy: if config.pipeline.continue_on_error {
                FailurePolicy::Continue
            } else {
                FailurePolicy::StopLaunching
            },
        }
    }
}

/// Run discovery and the full pipeline for a project.
///
/// Returns the report even when modules failed; use [`RunReport::into_result`]
/// to turn failures into an error.
pub async fn run_build(
    config: &PackagerConfig,
    project_root: &Path,
    overrides: &BuildOverrides,
) -> Result<RunReport, PackError> {
    let mut config = config.clone();
    overrides.apply(&mut config);

    let run = RunConfig::from_config(&config, project_root, Local::now())?;
    let modules = discover_modules(&config.modules, &run.build_root);
    info!(
        declared = config.modules.len(),
        discovered = modules.len(),
        build_root = %run.build_root.display(),
        "Discovery complete"
    );

    let orchestrator = Orchestrator::new(
        Arc::new(run),
        archiver_for(&config.pipeline),
        PipelineOptions::from_config(&config),
    );
    Ok(orchestrator.run(modules).await)
}

/// Findings of a pre-flight check; errors would fail a build, warnings would not.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ProjectCheck {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ProjectCheck {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate configuration and the inputs a build would read, without writing anything.
pub fn check_project(config: &PackagerConfig, project_root: &Path) -> ProjectCheck {
    let mut check = ProjectCheck::default();
    if let Err(errors) = config.validate() {
        check.errors.extend(errors.iter().map(|e| e.to_string()));
    }

    let paths = config.build.resolve_paths(project_root);
    if !paths.build_root.is_dir() {
        check
            .errors
            .push(format!("Build directory not found: {}", paths.build_root.display()));
    }
    if !paths.schema_source.is_dir() {
        check.errors.push(format!(
            "Schema directory not found: {}",
            paths.schema_source.display()
        ));
    } else {
        for name in &config.package.schema_files {
            if !paths.schema_source.join(name).is_file() {
                check.errors.push(format!("Missing schema file: {}", name));
            }
        }
    }

    if config.modules.is_empty() {
        check.warnings.push("No modules declared".to_string());
    } else if paths.build_root.is_dir() {
        for probe in crate::discovery::probe_modules(&config.modules, &paths.build_root) {
            if !probe.entry_exists {
                check.warnings.push(format!(
                    "Module '{}' is declared but {} was not built",
                    probe.spec.key,
                    probe.spec.entry_file()
                ));
            }
        }
    }
    check
}
