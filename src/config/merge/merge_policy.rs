//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Later sources override these per key; arrays such as `modules` are replaced whole.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("build.build_dir", "build")?
        .set_default("build.schema_dir", "tools/scorm-files")?
        .set_default("build.output_dir", "scorm-builds")?
        .set_default("build.label", "course")?
        .set_default("manifest.mastery_score", 0.8)?
        .set_default("pipeline.archiver", "zip")
}
