//! CLI presentation: text and json formatters per command family.

mod build;
mod project;

pub use build::{format_run_report_json, format_run_report_text};
pub use project::{
    format_check_text, format_discovery_json, format_discovery_text, format_init_result,
};
