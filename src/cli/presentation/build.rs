//! Build command presentation: run report formatters.

use crate::error::PackError;
use crate::pipeline::RunReport;
use comfy_table::{presets::UTF8_FULL, Table};
use owo_colors::OwoColorize;

pub fn format_run_report_text(report: &RunReport) -> String {
    if report.empty {
        return format!(
            "{} no modules found in the build output; nothing was packaged (run {})",
            "warning:".yellow().bold(),
            report.run_name
        );
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Module", "Status", "Archive", "Size", "Digest"]);

    for key in &report.discovered {
        if let Some(p) = report.packaged.iter().find(|p| &p.key == key) {
            table.add_row(vec![
                key.clone(),
                "packaged".to_string(),
                p.archive.display().to_string(),
                format_size(p.size),
                p.digest.chars().take(12).collect(),
            ]);
        } else if let Some(f) = report.failed.iter().find(|f| &f.key == key) {
            table.add_row(vec![
                key.clone(),
                format!("failed ({})", f.stage),
                f.message.clone(),
                "-".to_string(),
                "-".to_string(),
            ]);
        } else {
            table.add_row(vec![
                key.clone(),
                "not started".to_string(),
                "-".to_string(),
                "-".to_string(),
                "-".to_string(),
            ]);
        }
    }

    let status = if report.is_success() {
        format!("{}", "✓ Build complete".green().bold())
    } else {
        format!("{}", "✗ Build failed".red().bold())
    };
    format!(
        "{}\n{}\n{}: {} packaged, {} failed, {} not started\nOutput: {}",
        table,
        status,
        report.run_name,
        report.packaged.len(),
        report.failed.len(),
        report.not_started.len(),
        report.destination_root.display()
    )
}

pub fn format_run_report_json(report: &RunReport) -> Result<String, PackError> {
    serde_json::to_string_pretty(report)
        .map_err(|e| PackError::Packaging(format!("Failed to serialize run report: {}", e)))
}

fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{} B", bytes)
    }
}
