// direnv-bridge: direnv environment loader for host processes
//
// SPDX-FileCopyrightText: 2026 direnv-bridge contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Exec command implementation.
//!
//! ```text
//! exec DIR -- CMD...
//!   sync DIR into a detached store
//!   spawn CMD with the loaded variables layered over the inherited env
//!   forward CMD's exit code
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use crate::cli::sync::ExecArgs;
use crate::config::Settings;
use crate::core::store::EnvironmentStore;
use crate::core::sync::{SyncEngine, SyncFlags, SyncOutcome};
use crate::error::Result;

/// Main handler for the exec command.
///
/// The loaded variables go into a detached store and are handed to the child
/// explicitly; this process's own environment stays untouched.
///
/// # Errors
///
/// Returns an error if the sync fails or the command cannot be spawned.
pub async fn run_exec_command(args: &ExecArgs, settings: Settings) -> Result<ExitCode> {
    let dir = args.target_dir();

    let store = Arc::new(EnvironmentStore::detached());
    let engine =
        SyncEngine::new(Arc::clone(&store), settings).with_flags(SyncFlags::AUTO_ALLOW);

    if let Some(outcome) = engine.sync_root(&dir).await? {
        match outcome {
            SyncOutcome::Changed | SyncOutcome::Unchanged => {}
            SyncOutcome::Blocked { stderr } | SyncOutcome::ProcessFailed { stderr, .. } => {
                eprintln!("{}", stderr.trim_end());
                return Err(anyhow::anyhow!("could not load the environment"));
            }
            other => return Err(anyhow::anyhow!(other.to_string())),
        }
    }

    let Some((program, rest)) = args.command.split_first() else {
        return Err(anyhow::anyhow!("no command to run"));
    };

    let status = tokio::process::Command::new(program)
        .args(rest)
        .current_dir(&dir)
        .envs(store.loaded_snapshot())
        .status()
        .await
        .map_err(|e| anyhow::anyhow!("failed to run `{program}`: {e}"))?;

    // 130-style codes pass through; a signal death maps to failure
    Ok(status.code().map_or(ExitCode::FAILURE, |code| {
        ExitCode::from(u8::try_from(code).unwrap_or(u8::MAX))
    }))
}
