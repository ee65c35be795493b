//! Integration tests for Configuration System

use scorm_pack::config::{ConfigLoader, DEFAULT_SCHEMA_FILES};
use scorm_pack::manifest::IdentifierScheme;
use scorm_pack::packager::ArchiverKind;
use std::fs;

use crate::integration::{with_isolated_env, ProjectFixture};

const PROJECT_CONFIG: &str = r#"
[build]
label = "safran"

[package]
title = "Safety Course"

[[modules]]
key = "0"
title = "Intro"

[[modules]]
key = "1"
title = "Advanced"
"#;

#[test]
fn test_defaults_without_any_file() {
    let project = ProjectFixture::new();
    let config = with_isolated_env(project.root(), &[], || {
        ConfigLoader::load(project.root()).unwrap()
    });

    assert_eq!(config.build.label, "course");
    assert_eq!(config.build.build_dir.to_string_lossy(), "build");
    assert_eq!(config.package.schema_files.len(), DEFAULT_SCHEMA_FILES.len());
    assert_eq!(config.manifest.identifiers, IdentifierScheme::Key);
    assert_eq!(config.manifest.mastery_score, 0.8);
    assert_eq!(config.pipeline.archiver, ArchiverKind::Zip);
    assert!(config.modules.is_empty());
}

#[test]
fn test_project_file_keeps_module_order() {
    let project = ProjectFixture::new();
    project.write_config(PROJECT_CONFIG);

    let config = with_isolated_env(project.root(), &[], || {
        ConfigLoader::load(project.root()).unwrap()
    });
    assert_eq!(config.build.label, "safran");
    assert_eq!(config.package.title, "Safety Course");
    let keys: Vec<_> = config.modules.iter().map(|m| m.key.as_str()).collect();
    assert_eq!(keys, vec!["0", "1"]);
    assert!(config.validate().is_ok());
}

#[test]
fn test_env_specific_file_overrides_base() {
    let project = ProjectFixture::new();
    project.write_config(PROJECT_CONFIG);
    project.touch("config/release.toml", "[build]\nlabel = \"release\"\n");

    let config = with_isolated_env(project.root(), &[("SCORM_PACK_ENV", "release")], || {
        ConfigLoader::load(project.root()).unwrap()
    });
    assert_eq!(config.build.label, "release");
    assert_eq!(config.package.title, "Safety Course");
}

#[test]
fn test_environment_variables_override_files() {
    let project = ProjectFixture::new();
    project.write_config(PROJECT_CONFIG);

    let config = with_isolated_env(
        project.root(),
        &[
            ("SCORM_PACK__BUILD__LABEL", "from-env"),
            ("SCORM_PACK__PIPELINE__CONCURRENCY", "3"),
        ],
        || ConfigLoader::load(project.root()).unwrap(),
    );
    assert_eq!(config.build.label, "from-env");
    assert_eq!(config.pipeline.concurrency, Some(3));
}

#[test]
fn test_global_file_is_lowest_file_layer() {
    let project = ProjectFixture::new();
    project.write_config("[build]\nlabel = \"project\"\n");
    project.touch(
        "xdg/scorm-pack/config.toml",
        "[build]\nlabel = \"global\"\n\n[package]\norganization = \"acme\"\n",
    );

    let config = with_isolated_env(project.root(), &[], || {
        ConfigLoader::load(project.root()).unwrap()
    });
    assert_eq!(config.build.label, "project");
    assert_eq!(config.package.organization, "acme");
}

#[test]
fn test_explicit_file_replaces_file_layers() {
    let project = ProjectFixture::new();
    project.write_config(PROJECT_CONFIG);
    let explicit = project.touch(
        "other.toml",
        "[manifest]\nidentifiers = \"sequence\"\nmastery_score = 0.5\n",
    );

    let config = with_isolated_env(project.root(), &[], || {
        ConfigLoader::load_from_file(&explicit).unwrap()
    });
    assert_eq!(config.manifest.identifiers, IdentifierScheme::Sequence);
    assert_eq!(config.manifest.mastery_score, 0.5);
    // Project file ignored
    assert_eq!(config.build.label, "course");
    assert!(config.modules.is_empty());
}

#[test]
fn test_invalid_values_are_reported() {
    let project = ProjectFixture::new();
    project.write_config(
        r#"
[manifest]
mastery_score = 1.5

[[modules]]
key = "a/b"
title = "Nested"
"#,
    );

    let config = with_isolated_env(project.root(), &[], || {
        ConfigLoader::load(project.root()).unwrap()
    });
    let errors = config.validate().unwrap_err();
    assert!(errors.len() >= 2);
}

#[test]
fn test_malformed_file_is_config_error() {
    let project = ProjectFixture::new();
    let path = project.root().join("broken.toml");
    fs::write(&path, "[build\nlabel = ").unwrap();

    let result = with_isolated_env(project.root(), &[], || ConfigLoader::load_from_file(&path));
    assert!(matches!(
        result,
        Err(scorm_pack::error::PackError::Config(_))
    ));
}
