// direnv-bridge: direnv environment loader for host processes
//
// SPDX-FileCopyrightText: 2026 direnv-bridge contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Settings --> Logging --> Command Dispatch
//!   Sync | Allow | Status | Exec | Version
//! ```

use std::process::ExitCode;

use direnv_bridge::cli::global::GlobalOptions;
use direnv_bridge::cli::{self, Command};
use direnv_bridge::cmd::exec::run_exec_command;
use direnv_bridge::cmd::status::run_status_command;
use direnv_bridge::cmd::sync::{run_allow_command, run_sync_command};
use direnv_bridge::config::{ConfigLoader, Settings};
use direnv_bridge::core::store::EnvironmentStore;
use direnv_bridge::logging::{LogConfig, LogLevel, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let settings = match load_settings(&cli.global) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let log_config = build_log_config(&cli.global, &settings);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, settings).await
}

fn build_log_config(global: &GlobalOptions, settings: &Settings) -> LogConfig {
    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(settings.log.output_log_level);

    let file_level = global
        .file_log_level
        .and_then(LogLevel::from_u8)
        .unwrap_or(settings.log.file_log_level);

    let log_file = global
        .log_file
        .clone()
        .or_else(|| settings.log.log_file.clone());

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(log_file.map(|p| p.display().to_string()))
        .build()
}

async fn dispatch_command(cli: &cli::Cli, settings: Settings) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Sync(args)) => run_sync_command(args, settings).await,
        Some(Command::Allow(args)) => run_allow_command(args, settings).await,
        Some(Command::Status(args)) => {
            let store = EnvironmentStore::new();
            run_status_command(args, &settings, &store)
        }
        Some(Command::Exec(args)) => {
            // exec forwards the child's exit code directly
            return match run_exec_command(args, settings).await {
                Ok(code) => code,
                Err(e) => {
                    eprintln!("Error: {e:#}");
                    ExitCode::FAILURE
                }
            };
        }
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn load_settings(global: &GlobalOptions) -> direnv_bridge::error::Result<Settings> {
    let mut loader = ConfigLoader::new().add_toml_file_optional("direnv-bridge.toml");
    for config_path in &global.configs {
        loader = loader.add_toml_file(config_path);
    }
    loader = loader.with_env_prefix("DIRENV_BRIDGE");
    if let Some(direnv) = &global.direnv {
        loader = loader.set("direnv_path", direnv.display().to_string())?;
    }
    loader.build()
}
