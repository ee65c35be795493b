//! Manifest Synthesizer
//!
//! Describes a staged module as an IMS content package manifest: one menu item and
//! one launchable resource for the module, plus the shared `common_files` asset
//! resource it depends on, wrapped in the SCORM 2004 envelope.

pub mod document;
pub mod ids;
pub mod render;

pub use document::{Item, ItemSequencing, ManifestDocument, Organization, Resource, ResourceKind};
pub use ids::{IdentifierScheme, ModuleIds, COMMON_RESOURCE_ID};
pub use render::render_manifest;

use crate::discovery::{discover_modules, ModuleSpec};
use crate::error::PackError;
use crate::run::RunConfig;
use crate::staging::StagedModule;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the manifest at the package root.
pub const MANIFEST_FILE: &str = "imsmanifest.xml";

/// Build and validate the manifest model for one staged module.
pub fn build_manifest(run: &RunConfig, staged: &StagedModule) -> Result<ManifestDocument, PackError> {
    let ids = run.identifier_scheme.ids(&staged.key, staged.index);

    let item = Item {
        identifier: ids.item,
        identifierref: ids.resource.clone(),
        title: staged.title.clone(),
        sequencing: ItemSequencing::mastery(run.mastery_score),
    };

    let module_resource = Resource {
        identifier: ids.resource,
        kind: ResourceKind::Sco {
            href: staged.entry_file.clone(),
        },
        files: staged.files.clone(),
        dependencies: vec![COMMON_RESOURCE_ID.to_string()],
    };

    let common_resource = Resource {
        identifier: COMMON_RESOURCE_ID.to_string(),
        kind: ResourceKind::Asset,
        files: staged.shared_files.clone(),
        dependencies: Vec::new(),
    };

    let doc = ManifestDocument {
        identifier: run.app_id.clone(),
        organization: Organization {
            identifier: run.organization.clone(),
            title: run.title.clone(),
            items: vec![item],
        },
        resources: vec![module_resource, common_resource],
    };
    doc.validate()?;
    Ok(doc)
}

/// Replace `imsmanifest.xml` in `dir` with `xml`.
///
/// The old file is deleted first, then the new one is written.
pub fn write_manifest(dir: &Path, xml: &str) -> Result<PathBuf, PackError> {
    let path = dir.join(MANIFEST_FILE);
    match fs::remove_file(&path) {
        Ok(()) => debug!(path = %path.display(), "Removed previous manifest"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(PackError::io(&path, e)),
    }
    fs::write(&path, xml).map_err(|e| PackError::io(&path, e))?;
    Ok(path)
}

/// Build, render and write the manifest for a staged module.
pub fn synthesize(run: &RunConfig, staged: &StagedModule) -> Result<PathBuf, PackError> {
    let doc = build_manifest(run, staged)?;
    let xml = render_manifest(&doc)?;
    let path = write_manifest(&staged.root, &xml)?;
    debug!(
        key = %staged.key,
        files = staged.files.len() + staged.shared_files.len(),
        path = %path.display(),
        "Manifest written"
    );
    Ok(path)
}

/// Rebuild the manifest of an already staged `module_<key>` directory.
///
/// The title comes from the declared modules and the position from discovery
/// against the build root, matching what a build assigns. An undeclared or
/// unbuilt key falls back to the key itself as title and position zero. Writes the file unless
/// `write` is false, and returns the XML either way.
pub fn regenerate(
    run: &RunConfig,
    specs: &[ModuleSpec],
    module_dir: &Path,
    write: bool,
) -> Result<String, PackError> {
    let key = module_dir
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_prefix("module_"))
        .filter(|k| !k.is_empty())
        .ok_or_else(|| {
            PackError::Manifest(format!(
                "{} is not a staged module directory (expected module_<key>)",
                module_dir.display()
            ))
        })?;
    if !module_dir.is_dir() {
        return Err(PackError::io(
            module_dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "staged module directory not found"),
        ));
    }

    let title = specs
        .iter()
        .find(|s| s.key == key)
        .map(|s| s.title.clone())
        .unwrap_or_else(|| key.to_string());
    let index = discover_modules(specs, &run.build_root)
        .iter()
        .find(|m| m.key() == key)
        .map(|m| m.index)
        .unwrap_or(0);

    let staged = crate::staging::inspect_staged(module_dir, key, &title, index)?;
    let xml = render_manifest(&build_manifest(run, &staged)?)?;
    if write {
        write_manifest(module_dir, &xml)?;
    }
    Ok(xml)
}
