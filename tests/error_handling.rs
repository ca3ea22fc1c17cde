// tests/error_handling.rs

use std::io::Write;

use devsync::config::load_and_validate;
use devsync::errors::DevsyncError;
use tempfile::NamedTempFile;

fn descriptor(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn unknown_module_in_group_returns_config_error() {
    let file = descriptor(
        r#"
[project]
dir = "app"

[dependencies]
restart = ["NonExistent"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(DevsyncError::ConfigError(msg)) => {
            assert!(msg.contains("unknown module"));
            assert!(msg.contains("NonExistent"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn duplicate_module_configuration_is_rejected() {
    let file = descriptor(
        r#"
[project]

[[devtools.modules]]
dependency = ":m1"
reload_task = "a"

[[devtools.modules]]
dependency = ":m1"
reload_task = "b"
"#,
    );

    let err = load_and_validate(file.path()).unwrap_err();
    assert!(matches!(err, DevsyncError::DuplicateModuleConfig(ref key) if key.starts_with(":m1")));
    assert!(err.is_configuration_error());
}

#[test]
fn malformed_module_path_returns_config_error() {
    let file = descriptor(
        r#"
[project]

[[devtools.modules]]
dependency = "common/logging"
"#,
    );

    let err = load_and_validate(file.path()).unwrap_err();
    assert!(matches!(err, DevsyncError::ConfigError(ref msg) if msg.contains("common/logging")));
}

#[test]
fn invalid_toml_returns_toml_error() {
    let file = descriptor("[project\nroot = ");

    let err = load_and_validate(file.path()).unwrap_err();
    assert!(matches!(err, DevsyncError::TomlError(_)));
}

#[test]
fn missing_descriptor_returns_io_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = load_and_validate(dir.path().join("Devsync.toml")).unwrap_err();
    assert!(matches!(err, DevsyncError::IoError(_)));
    assert!(!err.is_configuration_error());
}

#[test]
fn relative_paths_resolve_against_descriptor_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Devsync.toml");
    std::fs::write(
        &path,
        r#"
[project]
dir = "app"

[devtools]
trigger_file = ".customTriggerFile"

[module.M1]
root = "modules/m1"

[dependencies]
reload = ["M1"]
"#,
    )
    .unwrap();

    let project = load_and_validate(&path).unwrap();
    assert_eq!(project.build_dir(), dir.path().join(".").join("app").join("build"));
    assert_eq!(
        project
            .settings()
            .marker_path(&project.build_dir())
            .file_name()
            .unwrap(),
        ".customTriggerFile"
    );
}
