//! Integration tests for the configuration system

use super::test_utils::with_env;
use ctxtree::config::{global_config_path, ConfigLoader};
use ctxtree::ApiError;
use tempfile::TempDir;

#[test]
fn test_explicit_file_overrides_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("ctxtree.toml");
    std::fs::write(
        &config_file,
        r#"
[hub]
root_id = "app-root"

[logging]
level = "debug"
format = "json"
"#,
    )
    .unwrap();

    let config = with_env(&temp_dir, &[], || ConfigLoader::load_from_file(&config_file)).unwrap();
    assert_eq!(config.hub.root_id, "app-root");
    assert_eq!(config.hub.delimiter, "/");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.logging.output, "stderr");
}

#[test]
fn test_global_file_is_picked_up() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("ctxtree");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "[hub]\ndelimiter = \".\"\n").unwrap();

    let (path, config) = with_env(&temp_dir, &[], || (global_config_path(), ConfigLoader::load()));
    assert_eq!(path, Some(dir.join("config.toml")));
    let config = config.unwrap();
    assert_eq!(config.hub.delimiter, ".");
    assert_eq!(config.hub.root_id, "root");
}

#[test]
fn test_missing_global_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = with_env(&temp_dir, &[], ConfigLoader::load).unwrap();
    assert_eq!(config.hub.root_id, "root");
    assert!(config.logging.enabled);
}

#[test]
fn test_environment_overrides_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("ctxtree.toml");
    std::fs::write(&config_file, "[hub]\nroot_id = \"from-file\"\n").unwrap();

    let config = with_env(&temp_dir, &[("CTXTREE_HUB__ROOT_ID", "from-env")], || {
        ConfigLoader::load_from_file(&config_file)
    })
    .unwrap();
    assert_eq!(config.hub.root_id, "from-env");
}

#[test]
fn test_invalid_values_are_reported_together() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("ctxtree.toml");
    std::fs::write(
        &config_file,
        "[hub]\nroot_id = \"a/b\"\n\n[logging]\noutput = \"printer\"\n",
    )
    .unwrap();

    let err = with_env(&temp_dir, &[], || ConfigLoader::load_from_file(&config_file)).unwrap_err();
    match err {
        ApiError::InvalidConfig(errors) => {
            assert_eq!(errors.len(), 2);
            assert!(errors[0].contains("delimiter"));
            assert!(errors[1].contains("printer"));
        }
        other => panic!("expected InvalidConfig, got {:?}", other),
    }
}
