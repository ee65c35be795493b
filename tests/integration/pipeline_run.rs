//! End-to-end runs through the orchestrator

use scorm_pack::error::PackError;
use scorm_pack::pipeline::{run_build, BuildOverrides, PipelineStage};
use std::fs;

use crate::integration::{parse_manifest, zip_entries, ProjectFixture};

#[tokio::test]
async fn test_build_packages_only_built_modules() {
    let project = ProjectFixture::new();
    project.build_file("module-0.html");
    project.build_file("module_0/page.html");
    project.build_file("module_0/views/debug.html");
    project.build_file("common/style.css");
    project.build_file("components/widget.js");

    let config = project.config(&[("0", "Intro"), ("1", "Advanced")]);
    let report = run_build(&config, project.root(), &BuildOverrides::default())
        .await
        .unwrap();

    assert!(report.is_success());
    assert_eq!(report.discovered, vec!["0"]);
    assert_eq!(report.packaged.len(), 1);

    let run_dirs: Vec<_> = fs::read_dir(project.root().join("scorm-builds"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    // One run directory and one archive beside it
    assert_eq!(run_dirs.iter().filter(|p| p.is_dir()).count(), 1);
    assert_eq!(run_dirs.iter().filter(|p| p.is_file()).count(), 1);
    assert!(report.destination_root.join("module_0").is_dir());
    assert!(!report.destination_root.join("module_1").exists());

    let archive = &report.packaged[0].archive;
    assert!(archive
        .file_name()
        .unwrap()
        .to_string_lossy()
        .ends_with("-course-0.zip"));
    let entries = zip_entries(archive);
    assert!(entries.contains(&"imsmanifest.xml".to_string()));
    assert!(entries.iter().all(|e| !e.contains("views")));

    let xml = fs::read_to_string(report.destination_root.join("module_0/imsmanifest.xml")).unwrap();
    let parsed = parse_manifest(&xml);
    assert_eq!(parsed.items.len(), 1);
    assert_eq!(parsed.resources.len(), 2);
    assert_eq!(
        parsed.resources[1].files,
        vec!["common/style.css", "components/widget.js"]
    );
}

#[tokio::test]
async fn test_label_override_names_run() {
    let project = ProjectFixture::new();
    project.build_file("module-0.html");

    let config = project.config(&[("0", "Intro")]);
    let overrides = BuildOverrides {
        label: Some("safran".to_string()),
        ..Default::default()
    };
    let report = run_build(&config, project.root(), &overrides).await.unwrap();
    assert!(report.run_name.ends_with("-safran"));
    assert!(report.packaged[0]
        .archive
        .to_string_lossy()
        .ends_with("-safran-0.zip"));
}

#[tokio::test]
async fn test_empty_discovery_reports_empty() {
    let project = ProjectFixture::new();
    let config = project.config(&[("0", "Intro")]);
    let report = run_build(&config, project.root(), &BuildOverrides::default())
        .await
        .unwrap();
    assert!(report.empty);
    assert!(report.packaged.is_empty());
    assert!(report.into_result().is_ok());
}

#[tokio::test]
async fn test_missing_schema_file_fails_run() {
    let project = ProjectFixture::new();
    project.build_file("module-0.html");
    project.build_file("module-1.html");
    fs::remove_file(project.root().join("tools/scorm-files/xml.xsd")).unwrap();

    let config = project.config(&[("0", "Intro"), ("1", "Advanced")]);
    let overrides = BuildOverrides {
        concurrency: Some(1),
        ..Default::default()
    };
    let report = run_build(&config, project.root(), &overrides).await.unwrap();

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].stage, PipelineStage::Staging);
    assert!(report.failed[0].message.contains("xml.xsd"));
    assert_eq!(report.not_started, vec!["1"]);

    match report.into_result() {
        Err(PackError::RunFailed { failed, total, .. }) => {
            assert_eq!(failed, 1);
            assert_eq!(total, 2);
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[tokio::test]
async fn test_continue_on_error_attempts_every_module() {
    let project = ProjectFixture::new();
    project.build_file("module-0.html");
    project.build_file("module-1.html");
    fs::remove_file(project.root().join("tools/scorm-files/xml.xsd")).unwrap();

    let config = project.config(&[("0", "Intro"), ("1", "Advanced")]);
    let overrides = BuildOverrides {
        concurrency: Some(2),
        continue_on_error: true,
        ..Default::default()
    };
    let report = run_build(&config, project.root(), &overrides).await.unwrap();
    assert_eq!(report.failed.len(), 2);
    assert!(report.not_started.is_empty());
}

#[tokio::test]
async fn test_invalid_config_is_rejected_before_any_work() {
    let project = ProjectFixture::new();
    project.build_file("module-0.html");
    let mut config = project.config(&[("0", "Intro"), ("0", "Duplicate")]);
    config.manifest.mastery_score = 2.0;

    let err = run_build(&config, project.root(), &BuildOverrides::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PackError::Config(_)));
    assert!(!project.root().join("scorm-builds").exists());
}
