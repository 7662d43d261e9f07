//! Configuration loading from TOML files.

use std::fs;

use widgetwire::config::{ConfigError, ToolkitConfig};

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = ToolkitConfig::load_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.max_inbound_operations, 1024);
    assert!(config.continue_on_adapter_error);
    assert!(!config.pretty_messages);
}

#[test]
fn file_values_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("toolkit.toml");
    fs::write(
        &path,
        "pretty_messages = true\nmax_inbound_operations = 16\n",
    )
    .unwrap();

    let config = ToolkitConfig::load_from(&path).unwrap();
    assert!(config.pretty_messages);
    assert_eq!(config.max_inbound_operations, 16);
    // Unspecified fields keep their defaults.
    assert!(config.continue_on_adapter_error);
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("toolkit.toml");
    fs::write(&path, "pretty_messages = [broken").unwrap();

    let error = ToolkitConfig::load_from(&path).unwrap_err();
    assert!(matches!(error, ConfigError::ParseError { .. }));
}

#[test]
fn zero_operation_limit_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("toolkit.toml");
    fs::write(&path, "max_inbound_operations = 0\n").unwrap();

    let error = ToolkitConfig::load_from(&path).unwrap_err();
    assert!(matches!(error, ConfigError::ValidationError { .. }));
}
