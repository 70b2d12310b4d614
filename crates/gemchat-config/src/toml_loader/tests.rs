//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_parse_error() {
    let result = load_from_path(Path::new("/tmp/nonexistent_gemchat_config.toml"));
    let err = result.unwrap_err();
    assert!(matches!(err, gemchat_common::ConfigError::ParseError(_)));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r##"
[model]
name = "gemini-2.5-pro"
system_instruction = "Be terse."

[attachments]
max_file_size_mb = 10
"##,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.model.name, "gemini-2.5-pro");
    assert_eq!(config.model.system_instruction.as_deref(), Some("Be terse."));
    assert_eq!(config.attachments.max_file_size_mb, 10);
    // Defaults preserved
    assert_eq!(config.api.request_timeout_secs, 120);
    assert!(config.credentials.remember);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, gemchat_common::ConfigError::ParseError(_)));
}

#[test]
fn load_keeps_out_of_range_values_for_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[attachments]\nmax_file_size_mb = 500\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.attachments.max_file_size_mb, 500);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gemchat").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.model.name, "gemini-2.5-flash");
    assert_eq!(config.credentials.key_name, "gemini_api_key");
}

#[test]
fn default_config_toml_is_valid() {
    use super::template::default_config_toml;
    use crate::schema::GemchatConfig;

    let config: GemchatConfig = toml::from_str(&default_config_toml()).unwrap();
    assert_eq!(config.model.name, "gemini-2.5-flash");
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn default_config_path_is_reasonable() {
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("gemchat"));
        assert!(path_str.ends_with("config.toml"));
    }
}
