//! Orchestrator: drives `stage → manifest → package` for each module on a bounded
//! pool of blocking workers and folds the outcomes into a [`RunReport`].

use crate::discovery::DiscoveredModule;
use crate::manifest;
use crate::packager::{package_module, Archiver, PackagedModule};
use crate::pipeline::report::{ModuleFailure, PipelineStage, RunReport};
use crate::run::RunConfig;
use crate::staging::stage_module;
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{error, info, warn};

/// What to do once a module has failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Let in-flight modules finish but launch no new ones
    #[default]
    StopLaunching,
    /// Run every module regardless
    Continue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub concurrency: usize,
    pub failure_policy: FailurePolicy,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            failure_policy: FailurePolicy::default(),
        }
    }
}

pub struct Orchestrator {
    run: Arc<RunConfig>,
    archiver: Arc<dyn Archiver>,
    options: PipelineOptions,
}

impl Orchestrator {
    pub fn new(run: Arc<RunConfig>, archiver: Arc<dyn Archiver>, options: PipelineOptions) -> Self {
        Self {
            run,
            archiver,
            options,
        }
    }

    /// Process every module and report the outcome.
    ///
    /// Module failures never abort the call; they are recorded in the report.
    pub async fn run(&self, modules: Vec<DiscoveredModule>) -> RunReport {
        let discovered = modules.iter().map(|m| m.key().to_string()).collect();
        let mut report = RunReport::new(self.run.run_name(), self.run.destination_root(), discovered);

        if modules.is_empty() {
            warn!(run = %report.run_name, "No modules found in build output; nothing to package");
            return report;
        }

        let concurrency = self.options.concurrency.max(1);
        info!(
            run = %report.run_name,
            modules = modules.len(),
            concurrency,
            "Starting packaging run"
        );

        let mut pending: VecDeque<DiscoveredModule> = modules.into();
        let mut in_flight = FuturesUnordered::new();
        let mut stop_launching = false;

        loop {
            while !stop_launching && in_flight.len() < concurrency {
                let Some(module) = pending.pop_front() else {
                    break;
                };
                let run = Arc::clone(&self.run);
                let archiver = Arc::clone(&self.archiver);
                let key = module.key().to_string();
                in_flight.push(async move {
                    let outcome =
                        tokio::task::spawn_blocking(move || process_module(&run, archiver.as_ref(), &module))
                            .await;
                    (key, outcome)
                });
            }

            let Some((key, outcome)) = in_flight.next().await else {
                break;
            };
            match outcome {
                Ok(Ok(packaged)) => report.packaged.push(packaged),
                Ok(Err(failure)) => {
                    error!(key = %failure.key, stage = %failure.stage, error = %failure.message, "Module failed");
                    report.failed.push(failure);
                }
                Err(join_err) => {
                    error!(key = %key, error = %join_err, "Module worker did not complete");
                    report.failed.push(ModuleFailure {
                        key,
                        stage: PipelineStage::Worker,
                        message: join_err.to_string(),
                    });
                }
            }

            if !report.failed.is_empty()
                && self.options.failure_policy == FailurePolicy::StopLaunching
                && !stop_launching
            {
                stop_launching = true;
                if !pending.is_empty() {
                    warn!(remaining = pending.len(), "Not launching remaining modules after failure");
                }
            }
        }

        report.not_started = pending.into_iter().map(|m| m.key().to_string()).collect();
        report.sort_by_discovery();

        info!(
            run = %report.run_name,
            packaged = report.packaged.len(),
            failed = report.failed.len(),
            not_started = report.not_started.len(),
            "Packaging run finished"
        );
        report
    }
}

/// Run one module through all three stages.
pub fn process_module(
    run: &RunConfig,
    archiver: &dyn Archiver,
    module: &DiscoveredModule,
) -> Result<PackagedModule, ModuleFailure> {
    let key = module.key();

    let staged = stage_module(run, module)
        .map_err(|e| ModuleFailure::new(key, PipelineStage::Staging, &e))?;
    info!(key, "Generating manifest");
    manifest::synthesize(run, &staged)
        .map_err(|e| ModuleFailure::new(key, PipelineStage::Manifest, &e))?;
    info!(key, "Packaging module");
    package_module(run, &staged, archiver)
        .map_err(|e| ModuleFailure::new(key, PipelineStage::Packaging, &e))
}
