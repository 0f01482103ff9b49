//! Integration tests for Settings loading with layered precedence.
//!
//! These tests run without a global config (temp directories only), so they
//! exercise local config files on top of compiled defaults.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use partyguests::application::ApplicationError;
use partyguests::config::{local_config_path, Settings};
use partyguests::domain::ValidationMode;

#[test]
fn given_no_local_config_when_load_then_uses_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();

    // Act
    let settings = Settings::load(Some(dir.path())).expect("load settings");

    // Assert
    assert_eq!(settings.storage_key, "formData");
    assert_eq!(settings.export.prefix, "partyguests");
    assert_eq!(settings.export.dir, PathBuf::from("."));
    assert!(!settings.validation.strict);
    assert_eq!(settings.validation_mode(), ValidationMode::Lenient);
}

#[test]
fn given_local_config_when_load_then_overrides_only_given_keys() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let local = r#"
storage_key = "party2024"

[validation]
strict = true
"#;
    fs::write(local_config_path(dir.path()), local).unwrap();

    // Act
    let settings = Settings::load(Some(dir.path())).expect("load settings");

    // Assert
    assert_eq!(settings.storage_key, "party2024");
    assert_eq!(settings.validation_mode(), ValidationMode::Strict);
    // untouched keys keep their defaults
    assert_eq!(settings.export.prefix, "partyguests");
}

#[test]
fn given_local_export_section_when_load_then_applies_dir_and_prefix() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let local = format!(
        "[export]\ndir = \"{}\"\nprefix = \"summer-party\"\n",
        out.display()
    );
    fs::write(local_config_path(dir.path()), local).unwrap();

    // Act
    let settings = Settings::load(Some(dir.path())).expect("load settings");

    // Assert
    assert_eq!(settings.export.dir, out);
    assert_eq!(settings.export.prefix, "summer-party");
}

#[test]
fn given_malformed_local_config_when_load_then_config_error() {
    // Arrange
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "[export\nprefix = ").unwrap();

    // Act
    let result = Settings::load(Some(dir.path()));

    // Assert
    match result {
        Err(ApplicationError::Config { message }) => {
            assert!(message.contains(".partyguests.toml"), "message: {message}");
        }
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn given_settings_when_rendering_toml_then_parses_back() {
    // Arrange
    let settings = Settings::default();

    // Act
    let rendered = settings.to_toml().unwrap();
    let parsed: Settings = toml::from_str(&rendered).unwrap();

    // Assert
    assert_eq!(parsed, settings);
}

#[test]
fn given_template_when_parsed_then_is_valid_toml() {
    let parsed: Settings = toml::from_str(&Settings::template()).unwrap();

    assert_eq!(parsed.storage_key, "formData");
}
