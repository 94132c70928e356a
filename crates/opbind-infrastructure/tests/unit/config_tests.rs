//! Configuration Tests

use opbind_domain::InstanceContextMode;
use opbind_infrastructure::config::loader::validate_app_config;
use opbind_infrastructure::constants::{BINDING_NET_TCP, DEFAULT_LOG_LEVEL};
use opbind_infrastructure::{AppConfig, ConfigLoader};
use tempfile::TempDir;

#[test]
fn test_app_config_default() {
    let config = AppConfig::default();
    assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
    assert!(!config.logging.json_format);
    assert!(config.dispatch.reject_key_collisions);
    assert_eq!(
        config.host.default_instance_context_mode,
        InstanceContextMode::PerSession
    );
    assert!(config.host.is_sessionful(BINDING_NET_TCP));
    assert!(!config.host.is_sessionful("basic_http"));
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("opbind.toml");
    std::fs::write(
        &path,
        r#"
[logging]
level = "debug"

[dispatch]
reject_key_collisions = false

[host]
default_instance_context_mode = "per_call"
sessionful_bindings = ["net_tcp", "named_pipe"]
"#,
    )
    .unwrap();

    let config = ConfigLoader::new().with_config_path(&path).load().unwrap();
    assert_eq!(config.logging.level, "debug");
    assert!(!config.dispatch.reject_key_collisions);
    assert_eq!(
        config.host.default_instance_context_mode,
        InstanceContextMode::PerCall
    );
    assert!(config.host.is_sessionful("named_pipe"));
}

#[test]
fn test_partial_file_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("opbind.toml");
    std::fs::write(&path, "[logging]\njson_format = true\n").unwrap();

    let config = ConfigLoader::new().with_config_path(&path).load().unwrap();
    assert!(config.logging.json_format);
    assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
    assert!(config.dispatch.reject_key_collisions);
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let config = ConfigLoader::new()
        .with_config_path(dir.path().join("absent.toml"))
        .load()
        .unwrap();
    assert_eq!(config.host, AppConfig::default().host);
}

#[test]
fn test_invalid_log_level_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("opbind.toml");
    std::fs::write(&path, "[logging]\nlevel = \"loud\"\n").unwrap();

    let err = ConfigLoader::new().with_config_path(&path).load().unwrap_err();
    assert!(err.to_string().contains("Invalid log level"));
}

#[test]
fn test_invalid_mode_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("opbind.toml");
    std::fs::write(&path, "[host]\ndefault_instance_context_mode = \"sometimes\"\n").unwrap();

    assert!(ConfigLoader::new().with_config_path(&path).load().is_err());
}

#[test]
fn test_empty_binding_name_is_rejected() {
    let mut config = AppConfig::default();
    config.host.sessionful_bindings.push(" ".to_string());
    assert!(validate_app_config(&config).is_err());
}

#[test]
fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved.toml");
    let mut config = AppConfig::default();
    config.logging.level = "warn".to_string();
    config.host.default_instance_context_mode = InstanceContextMode::Single;

    let loader = ConfigLoader::new();
    loader.save_to_file(&config, &path).unwrap();
    let loaded = ConfigLoader::new().with_config_path(&path).load().unwrap();
    assert_eq!(loaded, config);
}
