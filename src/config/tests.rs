// direnv-bridge: direnv environment loader for host processes
//
// SPDX-FileCopyrightText: 2026 direnv-bridge contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{ConfigLoader, Settings};
use crate::logging::LogLevel;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_defaults() {
    let settings = Settings::default();
    assert!(settings.direnv_path.is_none());
    assert!(!settings.import_on_open);
    assert!(!settings.import_per_execution);
    assert_eq!(settings.export_timeout(), Duration::from_secs(30));
    assert_eq!(settings.allow_timeout(), Duration::from_secs(10));
    assert_eq!(settings.log.output_log_level, LogLevel::INFO);
}

#[test]
fn test_loader_from_toml_str() {
    let settings = ConfigLoader::new()
        .add_toml_str(
            r#"
            direnv_path = "/usr/local/bin/direnv"
            import_on_open = true
            export_timeout_secs = 5

            [log]
            output_log_level = 4
            "#,
        )
        .build()
        .expect("settings should parse");

    assert_eq!(
        settings.direnv_path,
        Some(PathBuf::from("/usr/local/bin/direnv"))
    );
    assert!(settings.import_on_open);
    assert!(!settings.import_per_execution);
    assert_eq!(settings.export_timeout(), Duration::from_secs(5));
    assert_eq!(settings.log.output_log_level, LogLevel::DEBUG);
}

#[test]
fn test_loader_layering() {
    let settings = ConfigLoader::new()
        .add_toml_str("export_timeout_secs = 5")
        .add_toml_str("export_timeout_secs = 7")
        .build()
        .expect("settings should parse");
    // later sources win
    assert_eq!(settings.export_timeout_secs, 7);
}

#[test]
fn test_loader_set_override() {
    let settings = ConfigLoader::new()
        .add_toml_str("import_per_execution = false")
        .set("import_per_execution", true)
        .expect("override should apply")
        .build()
        .expect("settings should parse");
    assert!(settings.import_per_execution);
}

#[test]
fn test_zero_timeout_rejected() {
    let result = ConfigLoader::new()
        .add_toml_str("export_timeout_secs = 0")
        .build();
    assert!(result.is_err());
}

#[test]
fn test_missing_required_file() {
    let result = ConfigLoader::new()
        .add_toml_file("/nonexistent/bridge.toml")
        .build();
    assert!(result.is_err());
}

#[test]
fn test_executable_falls_back_to_name() {
    let settings = Settings {
        direnv_path: Some(PathBuf::from("/opt/direnv")),
        ..Settings::default()
    };
    assert_eq!(settings.direnv_executable(), PathBuf::from("/opt/direnv"));
}
