//! Project presentation: discovery, validation and init formatters.

use crate::discovery::ModuleProbe;
use crate::error::PackError;
use crate::init::{InitAction, InitResult};
use crate::pipeline::ProjectCheck;
use comfy_table::{presets::UTF8_FULL, Table};
use owo_colors::OwoColorize;

pub fn format_discovery_text(probes: &[ModuleProbe]) -> String {
    if probes.is_empty() {
        return "No modules declared. Add [[modules]] entries to config/config.toml.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Key", "Title", "Built", "Assets"]);
    for probe in probes {
        table.add_row(vec![
            probe.spec.key.clone(),
            probe.spec.title.clone(),
            if probe.entry_exists { "yes" } else { "no" }.to_string(),
            if probe.has_assets { "yes" } else { "-" }.to_string(),
        ]);
    }
    let found = probes.iter().filter(|p| p.entry_exists).count();
    format!("{}\n{} of {} declared modules built", table, found, probes.len())
}

pub fn format_discovery_json(probes: &[ModuleProbe]) -> Result<String, PackError> {
    let rows: Vec<serde_json::Value> = probes
        .iter()
        .map(|p| {
            serde_json::json!({
                "key": p.spec.key,
                "title": p.spec.title,
                "entry": p.entry_path,
                "found": p.entry_exists,
                "has_assets": p.has_assets,
            })
        })
        .collect();
    serde_json::to_string_pretty(&rows)
        .map_err(|e| PackError::Config(format!("Failed to serialize discovery: {}", e)))
}

pub fn format_check_text(check: &ProjectCheck) -> String {
    let mut s = if check.is_ok() {
        format!("{}", "Validation passed".green().bold())
    } else {
        format!("{}", "Validation failed".red().bold())
    };
    if !check.errors.is_empty() {
        s.push_str(&format!("\n\nErrors ({}):", check.errors.len()));
        for e in &check.errors {
            s.push_str(&format!("\n  ✗ {}", e));
        }
    }
    if !check.warnings.is_empty() {
        s.push_str(&format!("\n\nWarnings ({}):", check.warnings.len()));
        for w in &check.warnings {
            s.push_str(&format!("\n  ⊘ {}", w));
        }
    }
    s
}

pub fn format_init_result(result: &InitResult) -> String {
    let path = result.path.display();
    match result.action {
        InitAction::Created => format!("✓ Created {}", path),
        InitAction::Overwritten => format!("✓ {} (overwritten)", path),
        InitAction::Skipped => format!(
            "⊘ {} (already exists, skipped). Use --force to overwrite.",
            path
        ),
    }
}
