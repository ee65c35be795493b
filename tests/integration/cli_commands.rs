//! Integration tests for the scorm-pack binary

use std::path::Path;
use std::process::{Command, Output};

use crate::integration::{zip_entries, ProjectFixture};

fn scorm_pack(project: &Path, args: &[&str]) -> Output {
    let xdg = project.join("xdg");
    std::fs::create_dir_all(&xdg).unwrap();
    Command::new(env!("CARGO_BIN_EXE_scorm-pack"))
        .arg("--project")
        .arg(project)
        .arg("--quiet")
        .args(args)
        .env("XDG_CONFIG_HOME", &xdg)
        .env_remove("SCORM_PACK_ENV")
        .env_remove("SCORM_PACK_LOG")
        .output()
        .unwrap()
}

const CONFIG: &str = r#"
[package]
app_id = "com.example.cli"

[[modules]]
key = "0"
title = "Intro"

[[modules]]
key = "1"
title = "Advanced"
"#;

#[test]
fn test_init_then_validate() {
    let project = ProjectFixture::new();

    let init = scorm_pack(project.root(), &["init"]);
    assert!(init.status.success());
    assert!(project.root().join("config/config.toml").is_file());

    let again = scorm_pack(project.root(), &["init"]);
    assert!(again.status.success());
    assert!(String::from_utf8_lossy(&again.stdout).contains("--force"));

    // Starter declares module "0", which has not been built: a warning, not an error
    let validate = scorm_pack(project.root(), &["validate"]);
    assert!(validate.status.success(), "{}", String::from_utf8_lossy(&validate.stdout));
    assert!(String::from_utf8_lossy(&validate.stdout).contains("module-0.html"));
}

#[test]
fn test_validate_fails_on_missing_schema_files() {
    let project = ProjectFixture::new();
    project.write_config(CONFIG);
    std::fs::remove_dir_all(project.root().join("tools")).unwrap();

    let output = scorm_pack(project.root(), &["validate"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Schema directory not found"));
}

#[test]
fn test_discover_json() {
    let project = ProjectFixture::new();
    project.write_config(CONFIG);
    project.build_file("module-0.html");

    let output = scorm_pack(project.root(), &["discover", "--format", "json"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["found"], true);
    assert_eq!(value[1]["found"], false);
}

#[test]
fn test_build_json_report_and_archive() {
    let project = ProjectFixture::new();
    project.write_config(CONFIG);
    project.build_file("module-0.html");
    project.build_file("common/style.css");

    let output = scorm_pack(project.root(), &["build", "--label", "cli", "--format", "json"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["discovered"], serde_json::json!(["0"]));
    assert_eq!(report["failed"], serde_json::json!([]));
    let archive = report["packaged"][0]["archive"].as_str().unwrap();
    assert!(archive.ends_with("-cli-0.zip"));
    assert!(zip_entries(Path::new(archive)).contains(&"imsmanifest.xml".to_string()));
}

#[test]
fn test_build_with_nothing_built_warns_and_succeeds() {
    let project = ProjectFixture::new();
    project.write_config(CONFIG);

    let output = scorm_pack(project.root(), &["build"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("no modules found"));
}

#[test]
fn test_build_failure_exits_non_zero() {
    let project = ProjectFixture::new();
    project.write_config(CONFIG);
    project.build_file("module-0.html");
    std::fs::remove_file(project.root().join("tools/scorm-files/xml.xsd")).unwrap();

    let output = scorm_pack(project.root(), &["build"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Run failed"));
}

#[test]
fn test_manifest_print_does_not_write() {
    let project = ProjectFixture::new();
    project.write_config(CONFIG);
    let staged = project.root().join("staged/module_1");
    project.touch("staged/module_1/module-1.html", "<html/>");

    let output = scorm_pack(
        project.root(),
        &["manifest", staged.to_str().unwrap(), "--print"],
    );
    assert!(output.status.success());
    let xml = String::from_utf8_lossy(&output.stdout);
    assert!(xml.contains(r#"<manifest identifier="com.example.cli""#));
    assert!(xml.contains("<title>Advanced</title>"));
    assert!(!staged.join("imsmanifest.xml").exists());

    let written = scorm_pack(project.root(), &["manifest", staged.to_str().unwrap()]);
    assert!(written.status.success());
    assert!(staged.join("imsmanifest.xml").is_file());
}
