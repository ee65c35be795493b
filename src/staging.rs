//! Staging Copier
//!
//! Builds the self-contained directory for one module inside the run directory:
//! the fixed schema files, the module's entry HTML and asset subtree (without its
//! build-internal `views/` folder), and private copies of the shared `common/` and
//! `components/` trees. The result is described by a [`StagedModule`], which is
//! what the manifest and packaging stages consume.

pub mod copy;

use crate::discovery::DiscoveredModule;
use crate::error::PackError;
use crate::run::RunConfig;
use crate::tree::walker::Walker;
use copy::{copy_recursive, remove_dir_best_effort};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Shared asset trees staged into every module.
pub const SHARED_DIRS: &[&str] = &["common", "components"];

/// Build-internal folder stripped from module assets.
pub const EXCLUDED_MODULE_DIR: &str = "views";

/// A module directory ready for manifest generation and archiving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagedModule {
    pub key: String,
    pub title: String,
    pub index: usize,
    /// `<destinationRoot>/module_<key>`
    pub root: PathBuf,
    /// `module-<key>.html`
    pub entry_file: String,
    /// Entry file first, then the `module_<key>/` subtree, relative to `root`
    pub files: Vec<String>,
    /// `common/` then `components/` files, relative to `root`
    pub shared_files: Vec<String>,
}

/// Stage one module into `run.module_dir(key)`.
pub fn stage_module(run: &RunConfig, module: &DiscoveredModule) -> Result<StagedModule, PackError> {
    let key = module.key();
    let dest = run.module_dir(key);

    if dest.exists() && !dest.is_dir() {
        return Err(PackError::io(
            &dest,
            std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "destination exists and is not a directory",
            ),
        ));
    }
    fs::create_dir_all(&dest).map_err(|e| PackError::io(&dest, e))?;
    info!(key, destination = %dest.display(), "Staging module");

    copy_schema_files(run, &dest)?;
    copy_build_entries(run, module, &dest)?;

    // Nothing under views/ was copied; clear any leftover from an earlier pass.
    remove_dir_best_effort(&dest.join(module.spec.asset_dir()).join(EXCLUDED_MODULE_DIR));

    let staged = inspect_staged(&dest, key, module.title(), module.index)?;
    debug!(
        key,
        files = staged.files.len(),
        shared_files = staged.shared_files.len(),
        "Module staged"
    );
    Ok(staged)
}

/// Describe an already staged module directory without copying anything.
pub fn inspect_staged(
    root: &Path,
    key: &str,
    title: &str,
    index: usize,
) -> Result<StagedModule, PackError> {
    let entry_file = format!("module-{}.html", key);
    let asset_dir = format!("module_{}", key);
    let walker = Walker::new(root);

    let mut files = Vec::new();
    if root.join(&entry_file).is_file() {
        files.push(entry_file.clone());
    }
    files.extend(walker.files_under(&asset_dir)?);

    let mut shared_files = Vec::new();
    for dir in SHARED_DIRS {
        shared_files.extend(walker.files_under(dir)?);
    }

    Ok(StagedModule {
        key: key.to_string(),
        title: title.to_string(),
        index,
        root: root.to_path_buf(),
        entry_file,
        files,
        shared_files,
    })
}

fn copy_schema_files(run: &RunConfig, dest: &Path) -> Result<(), PackError> {
    for name in &run.schema_files {
        let source = run.schema_source.join(name);
        let target = dest.join(name);
        fs::copy(&source, &target).map_err(|e| PackError::io(&source, e))?;
    }
    debug!(count = run.schema_files.len(), "Copied schema files");
    Ok(())
}

/// Copy the top-level build entries that belong to this module.
fn copy_build_entries(
    run: &RunConfig,
    module: &DiscoveredModule,
    dest: &Path,
) -> Result<(), PackError> {
    let entry_file = module.spec.entry_file();
    let asset_dir = module.spec.asset_dir();

    let read = fs::read_dir(&run.build_root).map_err(|e| PackError::io(&run.build_root, e))?;
    let mut entries = Vec::new();
    for entry in read {
        let entry = entry.map_err(|e| PackError::io(&run.build_root, e))?;
        entries.push(entry.path());
    }
    entries.sort();

    for source in entries {
        let Some(name) = source.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let target = dest.join(name);

        if source.is_dir() {
            if name == asset_dir {
                copy_recursive(&source, &target, |relative| {
                    relative == Path::new(EXCLUDED_MODULE_DIR)
                })?;
            } else if SHARED_DIRS.contains(&name) {
                copy_recursive(&source, &target, |_| false)?;
            }
        } else if source.is_file() && name == entry_file {
            copy_recursive(&source, &target, |_| false)?;
        }
    }
    Ok(())
}
