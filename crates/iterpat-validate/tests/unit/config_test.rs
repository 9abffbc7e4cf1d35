//! Tests for settings loading

use iterpat_validate::config::{
    CONFIG_ENV_PREFIX, DEFAULT_CONFIG_FILENAME, OutputFormat, SettingsLoader, ValidatorSettings,
};
use iterpat_validate::ValidationError;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_file_overrides_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("validate.toml");
    fs::write(
        &path,
        r#"
output_format = "json"

[rule_sets]
iterable_aggregate = false
"#,
    )
    .unwrap();

    let settings = SettingsLoader::new()
        .with_config_path(&path)
        .without_env()
        .load()
        .unwrap();
    assert_eq!(settings.output_format, OutputFormat::Json);
    assert!(!settings.debug);
    assert!(settings.rule_sets.iterator);
    assert!(!settings.rule_sets.iterable_aggregate);
}

#[test]
fn test_missing_file_yields_defaults() {
    let temp = TempDir::new().unwrap();
    let settings = SettingsLoader::new()
        .with_config_path(temp.path().join("absent.toml"))
        .without_env()
        .load()
        .unwrap();
    assert_eq!(settings, ValidatorSettings::default());
}

#[test]
fn test_invalid_value_is_a_config_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bad.toml");
    fs::write(&path, "output_format = \"xml\"\n").unwrap();

    let result = SettingsLoader::new()
        .with_config_path(&path)
        .without_env()
        .load();
    assert!(matches!(result, Err(ValidationError::Config(_))));
}

#[test]
fn test_saved_settings_load_back() {
    let temp = TempDir::new().unwrap();
    let settings = ValidatorSettings::default()
        .with_debug(true)
        .with_output_format(OutputFormat::Ci);
    settings
        .save_to_file(temp.path().join(DEFAULT_CONFIG_FILENAME))
        .unwrap();

    assert_eq!(ValidatorSettings::load_or_default(temp.path()), settings);
}

#[test]
fn test_load_or_default_survives_malformed_file() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(DEFAULT_CONFIG_FILENAME), "debug = [").unwrap();

    assert_eq!(
        ValidatorSettings::load_or_default(temp.path()),
        ValidatorSettings::default()
    );
}

#[test]
fn test_env_layer_wins_over_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("validate.toml");
    fs::write(&path, "output_format = \"json\"\n").unwrap();

    let prefix = format!("{CONFIG_ENV_PREFIX}LOADER_TEST_");
    unsafe {
        std::env::set_var(format!("{prefix}OUTPUT_FORMAT"), "ci");
        std::env::set_var(format!("{prefix}RULE_SETS__ITERATOR"), "false");
    }

    let settings = SettingsLoader::new()
        .with_config_path(&path)
        .with_env_prefix(&prefix)
        .load()
        .unwrap();
    assert_eq!(settings.output_format, OutputFormat::Ci);
    assert!(!settings.rule_sets.iterator);
    assert!(settings.rule_sets.iterable_aggregate);
}
