//! Packager
//!
//! Compresses a staged module directory into a single archive next to the run
//! directory. Two backends sit behind the [`Archiver`] trait: the in-process
//! [`ZipArchiver`] and [`CommandArchiver`], which shells out to an external `zip`.

use crate::config::PipelineConfig;
use crate::error::PackError;
use crate::run::RunConfig;
use crate::staging::StagedModule;
use crate::tree::walker::{Walker, WalkerConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const DEFAULT_COMPRESSION_LEVEL: i64 = 6;

/// Archive backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiverKind {
    #[default]
    Zip,
    Command,
}

impl std::fmt::Display for ArchiverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArchiverKind::Zip => write!(f, "zip"),
            ArchiverKind::Command => write!(f, "command"),
        }
    }
}

/// Turns a directory into one archive file.
///
/// Archive entries are relative to `source`, so the manifest sits at the archive root.
pub trait Archiver: Send + Sync {
    /// File extension of produced archives, without the dot.
    fn extension(&self) -> &str;

    fn archive(&self, source: &Path, dest: &Path) -> Result<(), PackError>;
}

/// In-process zip writer.
#[derive(Debug, Clone, Default)]
pub struct ZipArchiver {
    pub compression_level: Option<i64>,
}

impl ZipArchiver {
    pub fn new(compression_level: Option<i64>) -> Self {
        Self { compression_level }
    }
}

impl Archiver for ZipArchiver {
    fn extension(&self) -> &str {
        "zip"
    }

    fn archive(&self, source: &Path, dest: &Path) -> Result<(), PackError> {
        let walker = Walker::with_config(
            source,
            WalkerConfig {
                follow_symlinks: true,
                skip_hidden: false,
            },
        );
        let entries = walker.files()?;

        let file = File::create(dest).map_err(|e| PackError::io(dest, e))?;
        let mut zip = ZipWriter::new(BufWriter::new(file));
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(
                self.compression_level.unwrap_or(DEFAULT_COMPRESSION_LEVEL),
            ));

        let mut dirs_added: HashSet<String> = HashSet::new();
        let mut buffer = Vec::new();
        for entry in &entries {
            for dir in parent_dirs(entry) {
                if !dirs_added.contains(&dir) {
                    zip.add_directory(dir.as_str(), options)?;
                    dirs_added.insert(dir);
                }
            }

            let path = source.join(entry);
            buffer.clear();
            let mut reader = BufReader::new(File::open(&path).map_err(|e| PackError::io(&path, e))?);
            reader
                .read_to_end(&mut buffer)
                .map_err(|e| PackError::io(&path, e))?;

            zip.start_file(entry.as_str(), options)?;
            zip.write_all(&buffer).map_err(|e| PackError::io(dest, e))?;
        }

        let mut writer = zip.finish()?;
        writer.flush().map_err(|e| PackError::io(dest, e))?;
        debug!(entries = entries.len(), archive = %dest.display(), "Zip archive written");
        Ok(())
    }
}

/// `a/b/c.html` yields `a/`, `a/b/`.
fn parent_dirs(entry: &str) -> Vec<String> {
    let mut dirs = Vec::new();
    let mut end = 0;
    while let Some(pos) = entry[end..].find('/') {
        end += pos + 1;
        dirs.push(entry[..end].to_string());
    }
    dirs
}

/// Runs `<program> -r -q <dest> .` inside the source directory.
///
/// Any diagnostic output on stderr counts as failure, as does a non-zero exit.
#[derive(Debug, Clone)]
pub struct CommandArchiver {
    pub program: String,
}

impl CommandArchiver {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Archiver for CommandArchiver {
    fn extension(&self) -> &str {
        "zip"
    }

    fn archive(&self, source: &Path, dest: &Path) -> Result<(), PackError> {
        // The command runs from `source`, so the destination must not be relative.
        let dest = if dest.is_absolute() {
            dest.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|e| PackError::io(dest, e))?
                .join(dest)
        };

        let output = Command::new(&self.program)
            .arg("-r")
            .arg("-q")
            .arg(&dest)
            .arg(".")
            .current_dir(source)
            .output()
            .map_err(|e| {
                PackError::Packaging(format!("failed to run '{}': {}", self.program, e))
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(PackError::Packaging(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        if !stderr.trim().is_empty() {
            return Err(PackError::Packaging(format!(
                "'{}' reported: {}",
                self.program,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Pick the backend configured for this run.
pub fn archiver_for(config: &PipelineConfig) -> Arc<dyn Archiver> {
    match config.archiver {
        ArchiverKind::Zip => Arc::new(ZipArchiver::new(config.compression_level)),
        ArchiverKind::Command => Arc::new(CommandArchiver::new(config.zip_command.clone())),
    }
}

/// A finished archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackagedModule {
    pub key: String,
    pub archive: PathBuf,
    pub size: u64,
    /// blake3 of the archive bytes, hex encoded
    pub digest: String,
}

/// Archive a staged module to `run.archive_path(key, ext)`.
///
/// An existing archive at that path is replaced.
pub fn package_module(
    run: &RunConfig,
    staged: &StagedModule,
    archiver: &dyn Archiver,
) -> Result<PackagedModule, PackError> {
    let dest = run.archive_path(&staged.key, archiver.extension());
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| PackError::io(parent, e))?;
    }
    match fs::remove_file(&dest) {
        Ok(()) => warn!(archive = %dest.display(), "Replacing existing archive"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(PackError::io(&dest, e)),
    }

    archiver.archive(&staged.root, &dest)?;

    let (size, digest) = digest_file(&dest)?;
    info!(key = %staged.key, archive = %dest.display(), size, "Module packaged");
    Ok(PackagedModule {
        key: staged.key.clone(),
        archive: dest,
        size,
        digest,
    })
}

fn digest_file(path: &Path) -> Result<(u64, String), PackError> {
    let mut file = File::open(path).map_err(|e| PackError::io(path, e))?;
    let mut hasher = blake3::Hasher::new();
    let mut buf = [0u8; 64 * 1024];
    let mut size = 0u64;
    loop {
        let n = file.read(&mut buf).map_err(|e| PackError::io(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        size += n as u64;
    }
    Ok((size, hasher.finalize().to_hex().to_string()))
}
