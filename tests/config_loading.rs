//! Integration tests for configuration loading
//!
//! Tests TOML config files on disk including:
//! - Explicit paths
//! - Missing and unreadable files
//! - Fallback to defaults
//! - Loaded policy driving a session

use std::fs;

use bodyfuzz::fuzzer::{FormatId, ImmutabilityFilter, InputSet, MutationSession};
use bodyfuzz::{ConfigLoadError, MutationConfig, MutationOptions, MutationStrategy};
use serde_json::json;
use tempfile::TempDir;

const FULL_CONFIG: &str = r#"
[mutation]
formats = ["straight", "append"]
enable_value_mutation = true
enable_extra_parameter = true
enable_name_fuzzing = false
extra_param_name = "debug"
fuzz_name_value = "yes"
immutable_paths = ["session.id"]
immutable_names = ["csrf_token"]
"#;

#[test]
fn test_load_explicit_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(&path, FULL_CONFIG).unwrap();

    let config = MutationConfig::load_from_file(Some(path.as_path())).unwrap();

    assert_eq!(
        config.options.formats,
        vec![FormatId::straight(), FormatId::append()]
    );
    assert_eq!(
        config.options.enabled_strategies(),
        vec![MutationStrategy::Value, MutationStrategy::Extra]
    );
    assert_eq!(config.options.extra_param_name, "debug");
    assert_eq!(config.options.fuzz_name_value, "yes");
    assert!(config.immutable.is_immutable(&"session.id".parse().unwrap()));
    assert!(config.immutable.is_immutable(&"a[3].csrf_token".parse().unwrap()));
    assert!(!config.immutable.is_immutable(&"id".parse().unwrap()));
}

#[test]
fn test_missing_explicit_path_is_not_found() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let err = MutationConfig::load_from_file(Some(path.as_path())).unwrap_err();
    assert!(matches!(err, ConfigLoadError::NotFound));
}

#[test]
fn test_unreadable_path_is_read_error() {
    let dir = TempDir::new().unwrap();

    let err = MutationConfig::load_from_file(Some(dir.path())).unwrap_err();
    assert!(matches!(err, ConfigLoadError::ReadError(_)));
}

#[test]
fn test_invalid_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[mutation]\nformats = 3\n").unwrap();

    assert!(matches!(
        MutationConfig::load_from_file(Some(path.as_path())),
        Err(ConfigLoadError::ParseError(_))
    ));

    let config = MutationConfig::load_or_default(Some(path.as_path()));
    assert_eq!(config.options, MutationOptions::default());
    assert!(config.immutable.is_empty());
}

#[test]
fn test_partial_section_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.toml");
    fs::write(&path, "[mutation]\nenable_name_fuzzing = true\n").unwrap();

    let config = MutationConfig::load_from_file(Some(path.as_path())).unwrap();

    assert_eq!(config.options.formats, vec![FormatId::straight()]);
    assert_eq!(
        config.options.enabled_strategies(),
        vec![MutationStrategy::Value, MutationStrategy::Name]
    );
    assert_eq!(config.options.fuzz_name, "__fuzz_name__");
}

#[test]
fn test_loaded_config_drives_session() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bodyfuzz.toml");
    fs::write(&path, FULL_CONFIG).unwrap();
    let config = MutationConfig::load_from_file(Some(path.as_path())).unwrap();

    let baseline = InputSet::from(json!({"csrf_token": "abc", "session": {"id": 7}, "q": ""}));
    let session = MutationSession::new(config.options.clone())
        .with_immutability_filter(&config.immutable);

    let bodies: Vec<_> = session
        .generate(&baseline, "P")
        .map(|m| m.unwrap().input.to_json())
        .collect();

    assert_eq!(
        bodies,
        vec![
            json!({"csrf_token": "abc", "session": {"id": 7}, "q": "P"}),
            json!({"csrf_token": "abc", "session": {"id": 7}, "q": "", "debug": "P"}),
        ]
    );
}
