// direnv-bridge: direnv environment loader for host processes
//
// SPDX-FileCopyrightText: 2026 direnv-bridge contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Status command implementation.

use crate::cli::sync::StatusArgs;
use crate::config::Settings;
use crate::core::path::resolve_envrc;
use crate::core::store::EnvironmentStore;
use crate::error::Result;

/// Main handler for the status command.
///
/// Reports which descriptor a directory resolves to, which direnv executable
/// would be invoked, and what `store` currently holds. Never runs the tool.
///
/// # Errors
///
/// Infallible in practice; the `Result` keeps the handler signature uniform.
pub fn run_status_command(
    args: &StatusArgs,
    settings: &Settings,
    store: &EnvironmentStore,
) -> Result<()> {
    let dir = args.target_dir();

    println!("directory:  {}", dir.display());
    println!("executable: {}", settings.direnv_executable().display());

    match resolve_envrc(&dir) {
        Some(envrc) => println!("descriptor: {}", envrc.path().display()),
        None => println!("descriptor: none within 2 levels"),
    }

    let loaded = store.loaded_snapshot();
    if loaded.is_empty() {
        println!("loaded:     none");
    } else {
        println!("loaded:");
        for (name, value) in &loaded {
            println!("  {name}={value}");
        }
    }
    Ok(())
}
