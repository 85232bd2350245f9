//! Integration tests for Configuration System

use std::sync::Mutex;
use tempfile::TempDir;
use unitree::config::{ConfigLoader, UnitreeConfig};
use unitree::viewport::Viewport;

/// Serializes tests that touch UNITREE__* variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn write_workspace_config(root: &std::path::Path, name: &str, body: &str) {
    let dir = root.join("config");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(name), body).unwrap();
}

#[test]
fn test_environment_overrides_files() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new().unwrap();
    write_workspace_config(
        temp_dir.path(),
        "config.toml",
        "[transport]\npage_size = 40\nbase_url = \"http://files:1\"\n",
    );

    std::env::set_var("UNITREE__TRANSPORT__PAGE_SIZE", "7");
    let config = ConfigLoader::new(temp_dir.path())
        .global_file(None)
        .build();
    std::env::remove_var("UNITREE__TRANSPORT__PAGE_SIZE");

    let config = config.unwrap();
    assert_eq!(config.transport.page_size, 7);
    assert_eq!(config.transport.base_url, "http://files:1");
}

#[test]
fn test_env_specific_file_layers_over_base() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new().unwrap();
    write_workspace_config(
        temp_dir.path(),
        "config.toml",
        "[viewport]\nheight = 300\noverscan = 1\n",
    );
    write_workspace_config(temp_dir.path(), "production.toml", "[viewport]\nheight = 900\n");

    let config = ConfigLoader::new(temp_dir.path())
        .global_file(None)
        .env_name("production")
        .without_env()
        .build_validated()
        .unwrap();
    assert_eq!(config.viewport.height, 900);
    assert_eq!(config.viewport.overscan, 1);

    let viewport = Viewport::from(&config.viewport);
    assert_eq!(viewport.height, 900);
    assert_eq!(viewport.row_height, 30);
}

#[test]
fn test_effective_config_prints_all_sections() {
    let out = UnitreeConfig::default().to_toml().unwrap();
    assert!(out.contains("[transport]"));
    assert!(out.contains("[viewport]"));
    assert!(out.contains("[logging]"));
    assert!(out.contains("base_url = \"http://localhost:8000\""));
}

#[test]
fn test_invalid_values_are_reported_together() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new().unwrap();
    write_workspace_config(
        temp_dir.path(),
        "config.toml",
        "[transport]\nbase_url = \"localhost\"\n\n[logging]\noutput = \"syslog\"\n",
    );

    let err = ConfigLoader::new(temp_dir.path())
        .global_file(None)
        .without_env()
        .build_validated()
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("transport: base_url"));
    assert!(message.contains("logging: Invalid log output"));
}
