//! Run outcome aggregation.

use crate::error::PackError;
use crate::packager::PackagedModule;
use serde::Serialize;
use std::path::PathBuf;

/// Stage at which a module failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    Staging,
    Manifest,
    Packaging,
    /// The blocking worker itself did not return (panic or cancellation)
    Worker,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PipelineStage::Staging => "staging",
            PipelineStage::Manifest => "manifest",
            PipelineStage::Packaging => "packaging",
            PipelineStage::Worker => "worker",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleFailure {
    pub key: String,
    pub stage: PipelineStage,
    pub message: String,
}

impl ModuleFailure {
    pub fn new(key: impl Into<String>, stage: PipelineStage, err: &PackError) -> Self {
        Self {
            key: key.into(),
            stage,
            message: err.to_string(),
        }
    }
}

/// What happened to every discovered module in one run.
///
/// All lists follow discovery order, whatever order the workers finished in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub run_name: String,
    pub destination_root: PathBuf,
    /// Keys of the discovered modules
    pub discovered: Vec<String>,
    pub packaged: Vec<PackagedModule>,
    pub failed: Vec<ModuleFailure>,
    /// Modules skipped after an earlier failure
    pub not_started: Vec<String>,
    /// Discovery found nothing to package
    pub empty: bool,
}

impl RunReport {
    pub fn new(run_name: impl Into<String>, destination_root: PathBuf, discovered: Vec<String>) -> Self {
        let empty = discovered.is_empty();
        Self {
            run_name: run_name.into(),
            destination_root,
            discovered,
            packaged: Vec::new(),
            failed: Vec::new(),
            not_started: Vec::new(),
            empty,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.not_started.is_empty()
    }

    /// Fail with [`PackError::RunFailed`] when any module failed.
    pub fn into_result(self) -> Result<RunReport, PackError> {
        match self.failed.first() {
            None => Ok(self),
            Some(first) => Err(PackError::RunFailed {
                failed: self.failed.len(),
                total: self.discovered.len(),
                first: format!("{} ({}): {}", first.key, first.stage, first.message),
            }),
        }
    }

    /// Put every list back in discovery order.
    pub(crate) fn sort_by_discovery(&mut self) {
        let position = |key: &str| {
            self.discovered
                .iter()
                .position(|k| k == key)
                .unwrap_or(usize::MAX)
        };
        let mut packaged = std::mem::take(&mut self.packaged);
        packaged.sort_by_key(|p| position(&p.key));
        let mut failed = std::mem::take(&mut self.failed);
        failed.sort_by_key(|f| position(&f.key));
        let mut not_started = std::mem::take(&mut self.not_started);
        not_started.sort_by_key(|k| position(k));
        self.packaged = packaged;
        self.failed = failed;
        self.not_started = not_started;
    }
}
