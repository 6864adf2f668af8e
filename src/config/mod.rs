// direnv-bridge: direnv environment loader for host processes
//
// SPDX-FileCopyrightText: 2026 direnv-bridge contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Settings for the bridge, layered from multiple sources.
//!
//! # Loader Pipeline
//!
//! ```text
//! ConfigLoader::new()
//!   .add_toml_file(req)
//!   .add_toml_file_optional(opt)
//!   .add_toml_str()
//!   .with_env_prefix("DIRENV_BRIDGE")
//!   .set()
//!        |
//!        v
//!    build() --> Settings
//! ```
//!
//! The settings provider is a collaborator of the sync core: the engine
//! consumes `Settings` but never writes it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};
use crate::logging::LogLevel;

/// Name of the external tool, used when no override is configured.
pub const DEFAULT_EXECUTABLE: &str = "direnv";

/// Logging-related settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Log level for console output (0-5).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-5).
    pub file_log_level: LogLevel,
    /// Path to log file, if any.
    pub log_file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}

/// Application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Override for the direnv executable. When unset, the executable is
    /// resolved via the caller's search path.
    pub direnv_path: Option<PathBuf>,
    /// Synchronize automatically when a root directory is opened.
    pub import_on_open: bool,
    /// Synchronize before every external build execution.
    pub import_per_execution: bool,
    /// Wall-clock bound on waiting for `export json` to exit.
    pub export_timeout_secs: u64,
    /// Wall-clock bound on waiting for `allow` to exit.
    pub allow_timeout_secs: u64,
    /// Logging settings.
    pub log: LogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            direnv_path: None,
            import_on_open: false,
            import_per_execution: false,
            export_timeout_secs: 30,
            allow_timeout_secs: 10,
            log: LogSettings::default(),
        }
    }
}

impl Settings {
    /// Timeout for the export step.
    #[must_use]
    pub const fn export_timeout(&self) -> Duration {
        Duration::from_secs(self.export_timeout_secs)
    }

    /// Timeout for the allow step.
    #[must_use]
    pub const fn allow_timeout(&self) -> Duration {
        Duration::from_secs(self.allow_timeout_secs)
    }

    /// The direnv executable to invoke: the configured override, the PATH
    /// resolution result, or the bare name for the OS to resolve at spawn.
    #[must_use]
    pub fn direnv_executable(&self) -> PathBuf {
        self.direnv_path.clone().unwrap_or_else(|| {
            which::which(DEFAULT_EXECUTABLE)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_EXECUTABLE))
        })
    }

    /// Validates settings values.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::InvalidValue` for a zero timeout.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.export_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "export_timeout_secs".to_string(),
                message: "timeout must be greater than zero".to_string(),
            });
        }
        if self.allow_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "allow_timeout_secs".to_string(),
                message: "timeout must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for loading settings from multiple sources.
pub struct ConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
        }
    }

    /// Adds a TOML configuration file to the loader.
    ///
    /// The file will be read when `build()` is called. If the file doesn't
    /// exist or contains invalid TOML, `build()` will return an error.
    #[must_use]
    pub fn add_toml_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        self.builder = self.builder.add_source(
            File::from(path.as_ref())
                .format(FileFormat::Toml)
                .required(true),
        );
        self
    }

    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        self.builder = self.builder.add_source(
            File::from(path.as_ref())
                .format(FileFormat::Toml)
                .required(false),
        );
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        use config::{File, FileFormat};
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self
    }

    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Sets a configuration override.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or if the value cannot be
    /// converted to a configuration value.
    pub fn set<T: Into<config::Value>>(mut self, key: &str, value: T) -> Result<Self> {
        self.builder = self
            .builder
            .set_override(key, value)
            .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;
        Ok(self)
    }

    /// Builds the settings from all added sources.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required configuration files are missing.
    /// - Configuration files have invalid TOML syntax.
    /// - Environment variables cannot be parsed.
    /// - The merged configuration cannot be deserialized into `Settings`.
    pub fn build(self) -> Result<Settings> {
        let builder = match &self.env_prefix {
            Some(prefix) => self.builder.add_source(
                config::Environment::with_prefix(prefix)
                    .separator("__")
                    .try_parsing(true),
            ),
            None => self.builder,
        };
        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
