//! Configuration System
//!
//! Layered configuration for a packaging run: built-in defaults, the global user file,
//! project files under `config/`, and `SCORM_PACK__*` environment overrides. The loaded
//! [`PackagerConfig`] is validated once and then turned into an immutable
//! [`crate::run::RunConfig`].

use crate::discovery::ModuleSpec;
use crate::logging::LoggingConfig;
use crate::manifest::IdentifierScheme;
use crate::packager::ArchiverKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

mod facade;
mod paths;

mod merge {
    pub mod merge_policy;
}

mod sources {
    pub mod global_file;
    pub mod project_file;
}

pub use facade::ConfigLoader;
pub use paths::{global_config_dir, project_config_path};

/// Schema and DTD files every SCORM 2004 4th Edition package ships with.
pub const DEFAULT_SCHEMA_FILES: &[&str] = &[
    "XMLSchema.dtd",
    "imsss_v1p0.xsd",
    "adlnav_v1p3.xsd",
    "imsss_v1p0util.xsd",
    "imsss_v1p0control.xsd",
    "imsss_v1p0random.xsd",
    "imscp_v1p1.xsd",
    "imsss_v1p0delivery.xsd",
    "datatypes.dtd",
    "imsss_v1p0limit.xsd",
    "adlcp_v1p3.xsd",
    "xml.xsd",
    "imsss_v1p0auxresource.xsd",
    "imsss_v1p0seqrule.xsd",
    "adlseq_v1p3.xsd",
    "imsss_v1p0rollup.xsd",
    "imsss_v1p0objective.xsd",
];

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackagerConfig {
    /// Input and output locations
    #[serde(default)]
    pub build: BuildConfig,

    /// Package identity and fixed schema files
    #[serde(default)]
    pub package: PackageConfig,

    /// Manifest generation settings
    #[serde(default)]
    pub manifest: ManifestConfig,

    /// Worker pool and archiving settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Declared modules, in table order
    #[serde(default)]
    pub modules: Vec<ModuleSpec>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Input and output locations, relative paths resolve against the project root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Static build output containing `module-<key>.html`, `common/`, `components/`
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,

    /// Directory holding the fixed SCORM schema files
    #[serde(default = "default_schema_dir")]
    pub schema_dir: PathBuf,

    /// Parent of every run directory and archive
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Suffix appended to the run id (`<runId>-<label>`)
    #[serde(default = "default_label")]
    pub label: String,
}

fn default_build_dir() -> PathBuf {
    PathBuf::from("build")
}

fn default_schema_dir() -> PathBuf {
    PathBuf::from("tools/scorm-files")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("scorm-builds")
}

fn default_label() -> String {
    "course".to_string()
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            build_dir: default_build_dir(),
            schema_dir: default_schema_dir(),
            output_dir: default_output_dir(),
            label: default_label(),
        }
    }
}

/// Absolute locations derived from [`BuildConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub build_root: PathBuf,
    pub schema_source: PathBuf,
    pub output_root: PathBuf,
}

impl BuildConfig {
    /// Resolve configured paths against the project root.
    pub fn resolve_paths(&self, project_root: &Path) -> ResolvedPaths {
        let resolve = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                project_root.join(p)
            }
        };
        ResolvedPaths {
            build_root: resolve(&self.build_dir),
            schema_source: resolve(&self.schema_dir),
            output_root: resolve(&self.output_dir),
        }
    }
}

/// Package identity written into every manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageConfig {
    /// Prefix of the generated manifest identifier; a unique token is appended per run
    #[serde(default = "default_app_id_prefix")]
    pub app_id_prefix: String,

    /// Fixed manifest identifier, bypasses per-run generation (reproducible builds)
    #[serde(default)]
    pub app_id: Option<String>,

    /// Organization identifier (`<organizations default=..>`)
    #[serde(default = "default_organization")]
    pub organization: String,

    /// Organization title
    #[serde(default = "default_title")]
    pub title: String,

    /// Schema files copied verbatim into every module package
    #[serde(default = "default_schema_files")]
    pub schema_files: Vec<String>,
}

fn default_app_id_prefix() -> String {
    "reversed.url.app.id".to_string()
}

fn default_organization() -> String {
    "organisation".to_string()
}

fn default_title() -> String {
    "App Title".to_string()
}

fn default_schema_files() -> Vec<String> {
    DEFAULT_SCHEMA_FILES.iter().map(|s| s.to_string()).collect()
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            app_id_prefix: default_app_id_prefix(),
            app_id: None,
            organization: default_organization(),
            title: default_title(),
            schema_files: default_schema_files(),
        }
    }
}

/// Manifest generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// How item/resource identifiers are derived
    #[serde(default)]
    pub identifiers: IdentifierScheme,

    /// Normalized measure at which the primary objective is satisfied
    #[serde(default = "default_mastery_score")]
    pub mastery_score: f64,
}

fn default_mastery_score() -> f64 {
    0.8
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            identifiers: IdentifierScheme::default(),
            mastery_score: default_mastery_score(),
        }
    }
}

/// Worker pool and archiving settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum modules processed at once (defaults to available parallelism)
    #[serde(default)]
    pub concurrency: Option<usize>,

    /// Archive backend
    #[serde(default)]
    pub archiver: ArchiverKind,

    /// Keep launching modules after a failure
    #[serde(default)]
    pub continue_on_error: bool,

    /// Deflate level for the built-in archiver
    #[serde(default)]
    pub compression_level: Option<i64>,

    /// Program used by the `command` archiver
    #[serde(default = "default_zip_command")]
    pub zip_command: String,
}

fn default_zip_command() -> String {
    "zip".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: None,
            archiver: ArchiverKind::default(),
            continue_on_error: false,
            compression_level: None,
            zip_command: default_zip_command(),
        }
    }
}

impl PipelineConfig {
    /// Effective worker count.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Module(String, String),
    Build(String),
    Package(String),
    Manifest(String),
    Pipeline(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Module(key, msg) => write!(f, "Module '{}': {}", key, msg),
            ValidationError::Build(msg) => write!(f, "Build: {}", msg),
            ValidationError::Package(msg) => write!(f, "Package: {}", msg),
            ValidationError::Manifest(msg) => write!(f, "Manifest: {}", msg),
            ValidationError::Pipeline(msg) => write!(f, "Pipeline: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

/// A key ends up in directory and archive names, so it must stay a single path segment.
fn module_key_problem(key: &str) -> Option<&'static str> {
    if key.is_empty() {
        Some("key cannot be empty")
    } else if key == "." || key == ".." {
        Some("key cannot be a relative path component")
    } else if key.contains(['/', '\\']) {
        Some("key cannot contain path separators")
    } else if key.chars().any(char::is_control) {
        Some("key cannot contain control characters")
    } else {
        None
    }
}

impl PackagerConfig {
    /// Validate the entire configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let mut seen = HashSet::new();
        for module in &self.modules {
            if let Some(problem) = module_key_problem(&module.key) {
                errors.push(ValidationError::Module(
                    module.key.clone(),
                    problem.to_string(),
                ));
            }
            if !seen.insert(module.key.as_str()) {
                errors.push(ValidationError::Module(
                    module.key.clone(),
                    "duplicate key".to_string(),
                ));
            }
        }

        if self.build.build_dir.as_os_str().is_empty() {
            errors.push(ValidationError::Build("build_dir cannot be empty".to_string()));
        }
        if self.build.output_dir.as_os_str().is_empty() {
            errors.push(ValidationError::Build("output_dir cannot be empty".to_string()));
        }
        if self.build.label.contains(['/', '\\']) {
            errors.push(ValidationError::Build(
                "label cannot contain path separators".to_string(),
            ));
        }

        if self.package.schema_files.is_empty() {
            errors.push(ValidationError::Package(
                "schema_files cannot be empty".to_string(),
            ));
        }
        for name in &self.package.schema_files {
            if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
                errors.push(ValidationError::Package(format!(
                    "schema file '{}' must be a plain file name",
                    name
                )));
            }
        }
        if self.package.organization.trim().is_empty() {
            errors.push(ValidationError::Package(
                "organization cannot be empty".to_string(),
            ));
        }
        if let Some(ref app_id) = self.package.app_id {
            if app_id.trim().is_empty() {
                errors.push(ValidationError::Package("app_id cannot be empty".to_string()));
            }
        }

        let score = self.manifest.mastery_score;
        if !(0.0..=1.0).contains(&score) {
            errors.push(ValidationError::Manifest(format!(
                "mastery_score must be within 0.0..=1.0, got {}",
                score
            )));
        }

        if self.pipeline.concurrency == Some(0) {
            errors.push(ValidationError::Pipeline(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if let Some(level) = self.pipeline.compression_level {
            if !(0..=9).contains(&level) {
                errors.push(ValidationError::Pipeline(format!(
                    "compression_level must be within 0..=9, got {}",
                    level
                )));
            }
        }
        if self.pipeline.zip_command.trim().is_empty() {
            errors.push(ValidationError::Pipeline(
                "zip_command cannot be empty".to_string(),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Join validation errors into one configuration error.
pub fn validation_failure(errors: &[ValidationError]) -> crate::error::PackError {
    let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    crate::error::PackError::Config(format!(
        "Configuration validation failed:\n{}",
        msgs.join("\n")
    ))
}
