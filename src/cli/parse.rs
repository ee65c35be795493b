//! CLI parse: clap types for scorm-pack. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// scorm-pack CLI - Assemble SCORM 2004 packages from built course modules
#[derive(Parser, Debug)]
#[command(name = "scorm-pack")]
#[command(version)]
#[command(about = "Assemble SCORM 2004 packages from pre-built static course modules")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root directory
    #[arg(long, global = true, default_value = ".")]
    pub project: PathBuf,

    /// Configuration file path (replaces global and project config files)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Disable logging
    #[arg(long, global = true, default_value = "false", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (when output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Stage, describe and archive every built module
    Build {
        /// Run directory suffix (`<runId>-<label>`)
        #[arg(long)]
        label: Option<String>,
        /// Maximum modules processed at once
        #[arg(long)]
        concurrency: Option<usize>,
        /// Archive backend (zip or command)
        #[arg(long, value_parser = ["zip", "command"])]
        archiver: Option<String>,
        /// Keep launching modules after a failure
        #[arg(long)]
        continue_on_error: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// List declared modules and whether each was built
    Discover {
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// Regenerate imsmanifest.xml for a staged module directory
    Manifest {
        /// Staged `module_<key>` directory
        module_dir: PathBuf,
        /// Print the manifest instead of writing it
        #[arg(long)]
        print: bool,
    },
    /// Check configuration, build output and schema files
    Validate,
    /// Write a starter config/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}
