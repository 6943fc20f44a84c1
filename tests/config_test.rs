//! Configuration loading and validation.

use std::path::PathBuf;
use std::time::Duration;

use reelcast::config::{load_config, load_config_or_default, validate_config, Config};
use tempfile::tempdir;

fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.storage.dir, PathBuf::from("videos"));
    assert_eq!(config.storage.ttl(), Duration::from_secs(300));
    assert!(config.storage.sweep_on_start);
    assert_eq!(config.acquire.max_attempts, 5);
    assert_eq!(config.acquire.timeout(), Duration::from_secs(3600));
    assert!(config.relays.enabled);
    assert_eq!(config.relays.sources.len(), 3);
    assert!(config.relays.addresses.is_empty());
}

#[test]
fn test_empty_file_uses_defaults() {
    let (_dir, path) = write_config("");
    let config = load_config(&path).unwrap();
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.acquire.max_attempts, 5);
}

#[test]
fn test_partial_sections() {
    let (_dir, path) = write_config(
        r#"
[server]
port = 8090

[storage]
dir = "/tmp/reelcast-videos"
ttl_secs = 60

[acquire]
max_attempts = 2
extra_args = ["--no-playlist"]

[relays]
enabled = true
sources = []
addresses = ["192.168.1.10:3128"]
"#,
    );

    let config = load_config(&path).unwrap();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8090);
    assert_eq!(config.storage.dir, PathBuf::from("/tmp/reelcast-videos"));
    assert_eq!(config.storage.ttl(), Duration::from_secs(60));
    assert_eq!(config.acquire.max_attempts, 2);
    assert_eq!(config.acquire.extra_args, vec!["--no-playlist".to_string()]);
    assert!(config.relays.sources.is_empty());
    assert_eq!(config.relays.addresses, vec!["192.168.1.10:3128".to_string()]);
}

#[test]
fn test_invalid_toml_is_error() {
    let (_dir, path) = write_config("[server\nport = ");
    assert!(load_config(&path).is_err());
}

#[test]
fn test_missing_file_is_error() {
    let dir = tempdir().unwrap();
    assert!(load_config(&dir.path().join("absent.toml")).is_err());
}

#[test]
fn test_explicit_path_is_used() {
    let (_dir, path) = write_config("[server]\nport = 4242\n");
    let config = load_config_or_default(Some(&path)).unwrap();
    assert_eq!(config.server.port, 4242);
}

#[test]
fn test_validation_rejects_zero_values() {
    let mut config = Config::default();
    config.server.port = 0;
    assert!(validate_config(&config).is_err());

    let mut config = Config::default();
    config.storage.ttl_secs = 0;
    assert!(validate_config(&config).is_err());

    let mut config = Config::default();
    config.acquire.timeout_secs = 0;
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_validation_rejects_bad_relay_address() {
    let (_dir, path) = write_config("[relays]\naddresses = [\"proxy.example.com:80\"]\n");
    let err = load_config(&path).unwrap_err();
    assert!(format!("{err:#}").contains("proxy.example.com:80"));
}

#[test]
fn test_zero_max_attempts_is_allowed() {
    let mut config = Config::default();
    config.acquire.max_attempts = 0;
    assert!(validate_config(&config).is_ok());
}
