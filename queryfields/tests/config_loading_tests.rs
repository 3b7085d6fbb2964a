//! Layered selector configuration: defaults, TOML file, environment.

use std::fs;

use queryfields::{QueryFieldsError, SelectorConfig};
use serial_test::serial;
use tempfile::TempDir;

const ENV_VARS: &[&str] = &[
    "QUERYFIELDS_INCLUDE_ARG_NAME",
    "QUERYFIELDS_EXCLUDE_ARG_NAME",
    "QUERYFIELDS_DELIMITER",
];

/// Clears the selector environment on creation and on drop.
struct CleanEnv;

impl CleanEnv {
    fn new() -> Self {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
        CleanEnv
    }
}

impl Drop for CleanEnv {
    fn drop(&mut self) {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }
}

#[test]
#[serial]
fn test_load_defaults() {
    let _env = CleanEnv::new();

    let config = SelectorConfig::load().unwrap();

    assert_eq!(config, SelectorConfig::default());
}

#[test]
#[serial]
fn test_load_from_missing_file_uses_defaults() {
    let _env = CleanEnv::new();
    let temp = TempDir::new().unwrap();

    let config = SelectorConfig::load_from(temp.path().join("absent.toml")).unwrap();

    assert_eq!(config, SelectorConfig::default());
}

#[test]
#[serial]
fn test_load_from_toml_file() {
    let _env = CleanEnv::new();
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("queryfields.toml");
    fs::write(&path, "include_arg_name = \"only\"\ndelimiter = \"|\"\n").unwrap();

    let config = SelectorConfig::load_from(&path).unwrap();

    assert_eq!(config.include_arg_name, "only");
    assert_eq!(config.exclude_arg_name, "fields!");
    assert_eq!(config.delimiter, "|");
}

#[test]
#[serial]
fn test_env_overrides_file() {
    let _env = CleanEnv::new();
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("queryfields.toml");
    fs::write(&path, "include_arg_name = \"only\"\n").unwrap();
    std::env::set_var("QUERYFIELDS_INCLUDE_ARG_NAME", "pick");
    std::env::set_var("QUERYFIELDS_EXCLUDE_ARG_NAME", "skip");

    let config = SelectorConfig::load_from(&path).unwrap();

    assert_eq!(config.include_arg_name, "pick");
    assert_eq!(config.exclude_arg_name, "skip");
    assert_eq!(config.delimiter, ",");
}

#[test]
#[serial]
fn test_env_delimiter() {
    let _env = CleanEnv::new();
    std::env::set_var("QUERYFIELDS_DELIMITER", "|");

    let config = SelectorConfig::load().unwrap();

    assert_eq!(config.delimiter, "|");
}

#[test]
#[serial]
fn test_numeric_env_delimiter_kept_as_string() {
    let _env = CleanEnv::new();
    std::env::set_var("QUERYFIELDS_DELIMITER", "1");

    let config = SelectorConfig::load().unwrap();

    assert_eq!(config.delimiter, "1");
}

#[test]
#[serial]
fn test_reserved_env_delimiter_rejected() {
    let _env = CleanEnv::new();
    std::env::set_var("QUERYFIELDS_DELIMITER", "&");

    let err = SelectorConfig::load().unwrap_err();

    assert!(matches!(err, QueryFieldsError::InvalidDelimiter { .. }));
}

#[test]
#[serial]
fn test_reserved_delimiter_in_file_rejected() {
    let _env = CleanEnv::new();
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("queryfields.toml");
    fs::write(&path, "delimiter = \"&\"\n").unwrap();

    let err = SelectorConfig::load_from(&path).unwrap_err();

    assert!(matches!(err, QueryFieldsError::InvalidDelimiter { .. }));
}

#[test]
#[serial]
fn test_malformed_file_is_config_error() {
    let _env = CleanEnv::new();
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("queryfields.toml");
    fs::write(&path, "delimiter = [1, 2]\n").unwrap();

    let err = SelectorConfig::load_from(&path).unwrap_err();

    assert!(matches!(err, QueryFieldsError::Config(_)));
}
