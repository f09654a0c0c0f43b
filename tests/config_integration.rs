//! Configuration integration tests.
//!
//! Exercises load, save, migration and validation of the configuration
//! file using temporary directories.

use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use voice_registration::config::{default_config_path, Config};
use voice_registration::{init_logging, LoggingConfig};

// =============================================================================
// Config File Operations Tests
// =============================================================================

#[test]
fn test_save_and_load_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.json");

    let mut config = Config::default();
    config.speech.pause_timeout_ms = 10_000;
    config.logging.level = "debug".to_string();

    config.save(&config_path).expect("Failed to save config");
    let loaded = Config::load(&config_path).expect("Failed to load config");

    assert_eq!(loaded, config);
    assert_eq!(loaded.speech.pause_timeout(), Duration::from_secs(10));
}

#[test]
fn test_load_nonexistent_config_returns_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent.json");

    let config = Config::load(&config_path).expect("Should return defaults");

    assert_eq!(config, Config::default());
    assert!(!config_path.exists());
}

#[test]
fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir
        .path()
        .join("nested")
        .join("voice-registration")
        .join("config.json");

    Config::default()
        .save(&config_path)
        .expect("Failed to save config");

    assert!(config_path.exists());
}

#[test]
fn test_config_pretty_printed_json() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("pretty.json");

    Config::default().save(&config_path).expect("Failed to save");

    let content = fs::read_to_string(&config_path).expect("Failed to read");
    assert!(content.contains('\n'));
    assert!(content.contains("  "));
    assert!(content.contains("\"pause_timeout_ms\": 7000"));
}

#[test]
fn test_old_version_config_is_migrated_and_rewritten() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("old.json");
    fs::write(
        &config_path,
        r#"{"version": 0, "speech": {"locale": "sk-SK"}}"#,
    )
    .expect("Failed to write");

    let config = Config::load(&config_path).expect("Failed to load");
    assert_eq!(config.version, 1);

    let rewritten = fs::read_to_string(&config_path).expect("Failed to read");
    assert!(rewritten.contains("\"version\": 1"));
}

#[test]
fn test_config_handles_invalid_json() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("invalid.json");
    fs::write(&config_path, "{ this is not valid json }").expect("Failed to write");

    let err = Config::load(&config_path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_load_rejects_out_of_range_timeout() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("timeout.json");
    fs::write(
        &config_path,
        r#"{"version": 1, "speech": {"pause_timeout_ms": 0}}"#,
    )
    .expect("Failed to write");

    let err = Config::load(&config_path).unwrap_err();
    assert!(err.to_string().contains("pause_timeout_ms"));
}

#[test]
fn test_save_rejects_invalid_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("invalid-values.json");

    let mut config = Config::default();
    config.speech.max_alternatives = 0;

    assert!(config.save(&config_path).is_err());
    assert!(!config_path.exists());
}

#[test]
fn test_multiple_saves_keep_last_value() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("repeated.json");

    for i in 0..10 {
        let mut config = Config::default();
        config.speech.pause_timeout_ms = 5_000 + i * 1_000;
        config.save(&config_path).expect("Failed to save");
    }

    let loaded = Config::load(&config_path).expect("Failed to load");
    assert_eq!(loaded.speech.pause_timeout_ms, 14_000);
}

#[test]
fn test_default_config_path_is_namespaced() {
    let path = default_config_path();
    assert_eq!(
        path.file_name().and_then(|name| name.to_str()),
        Some("config.json")
    );
    assert!(path
        .parent()
        .is_some_and(|dir| dir.ends_with("voice-registration")));
}

// =============================================================================
// Logging Tests
// =============================================================================

#[test]
fn test_init_logging_writes_file_and_refuses_second_init() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let log_path = temp_dir.path().join("logs").join("registration.log");
    let config = LoggingConfig {
        level: "info".to_string(),
        log_file: Some(log_path.clone()),
    };

    init_logging(&config).expect("First init should succeed");
    tracing::info!("logging smoke test");

    assert!(log_path.exists());
    assert!(init_logging(&LoggingConfig::default()).is_err());
}
