//! Integration tests for the SCORM packaging pipeline

mod cli_commands;
mod config_integration;
mod pipeline_run;
mod test_utils;

pub use test_utils::{
    parse_manifest, with_isolated_env, zip_entries, ParsedManifest, ProjectFixture,
};
