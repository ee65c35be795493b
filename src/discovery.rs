//! Module discovery: which declared modules were actually built.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A declared learning module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSpec {
    pub key: String,
    pub title: String,
}

impl ModuleSpec {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
        }
    }

    /// `module-<key>.html`
    pub fn entry_file(&self) -> String {
        format!("module-{}.html", self.key)
    }

    /// `module_<key>`
    pub fn asset_dir(&self) -> String {
        format!("module_{}", self.key)
    }
}

/// A module whose entry HTML exists in the build root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredModule {
    pub spec: ModuleSpec,
    /// Position in the discovery result
    pub index: usize,
    /// Whether `module_<key>/` exists next to the entry file
    pub has_assets: bool,
}

impl DiscoveredModule {
    pub fn key(&self) -> &str {
        &self.spec.key
    }

    pub fn title(&self) -> &str {
        &self.spec.title
    }
}

/// Declared module plus the on-disk evidence for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleProbe {
    pub spec: ModuleSpec,
    pub entry_path: PathBuf,
    pub entry_exists: bool,
    pub has_assets: bool,
}

/// Inspect every declared module, found or not.
pub fn probe_modules(specs: &[ModuleSpec], build_root: &Path) -> Vec<ModuleProbe> {
    specs
        .iter()
        .map(|spec| {
            let entry_path = build_root.join(spec.entry_file());
            ModuleProbe {
                entry_exists: entry_path.is_file(),
                has_assets: build_root.join(spec.asset_dir()).is_dir(),
                entry_path,
                spec: spec.clone(),
            }
        })
        .collect()
}

/// Keep the modules whose `module-<key>.html` exists under `build_root`.
///
/// Declaration order is preserved and `index` numbers the survivors from zero.
/// A missing artifact is a normal exclusion, never an error.
pub fn discover_modules(specs: &[ModuleSpec], build_root: &Path) -> Vec<DiscoveredModule> {
    probe_modules(specs, build_root)
        .into_iter()
        .filter(|probe| {
            if !probe.entry_exists {
                debug!(key = %probe.spec.key, path = %probe.entry_path.display(), "Module not built, skipping");
            }
            probe.entry_exists
        })
        .enumerate()
        .map(|(index, probe)| DiscoveredModule {
            spec: probe.spec,
            index,
            has_assets: probe.has_assets,
        })
        .collect()
}
