// direnv-bridge: direnv environment loader for host processes
//
// SPDX-FileCopyrightText: 2026 direnv-bridge contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sync and allow command implementations.

use std::sync::Arc;

use crate::cli::sync::{AllowArgs, SyncArgs};
use crate::config::Settings;
use crate::core::path::resolve_envrc;
use crate::core::store::EnvironmentStore;
use crate::core::sync::{SyncEngine, SyncFlags, SyncOutcome};
use crate::error::Result;

/// Main handler for the sync command.
///
/// Loads the nearest descriptor's environment into this process. The exported
/// variables land in the process environment table, so child processes spawned
/// afterwards inherit them.
///
/// # Errors
///
/// Returns an error for spawn and store failures, and for syncs that end in a
/// failure outcome.
pub async fn run_sync_command(args: &SyncArgs, settings: Settings) -> Result<()> {
    let dir = args.target_dir();

    let mut flags = SyncFlags::empty();
    if args.allow {
        flags |= SyncFlags::AUTO_ALLOW;
    }

    let store = Arc::new(EnvironmentStore::new());
    let engine = SyncEngine::new(Arc::clone(&store), settings).with_flags(flags);

    let Some(outcome) = engine.sync_root(&dir).await? else {
        println!("no .envrc found under {}", dir.display());
        return Ok(());
    };

    match &outcome {
        SyncOutcome::Changed => {
            println!("{outcome} ({} variables loaded)", store.loaded_snapshot().len());
        }
        SyncOutcome::Unchanged => {
            if !args.quiet {
                println!("{outcome}");
            }
        }
        SyncOutcome::Blocked { stderr } => {
            eprintln!("{}", stderr.trim_end());
            return Err(anyhow::anyhow!(
                "descriptor is blocked; rerun with --allow or run `direnv allow`"
            ));
        }
        SyncOutcome::ProcessFailed { stderr, .. } => {
            eprintln!("{}", stderr.trim_end());
            return Err(anyhow::anyhow!(outcome.to_string()));
        }
        SyncOutcome::TimedOut | SyncOutcome::DecodeFailed { .. } => {
            return Err(anyhow::anyhow!(outcome.to_string()));
        }
    }
    Ok(())
}

/// Main handler for the allow command.
///
/// # Errors
///
/// Returns an error if no descriptor resolves for the directory or if
/// `direnv allow` fails.
pub async fn run_allow_command(args: &AllowArgs, settings: Settings) -> Result<()> {
    let dir = args.target_dir();

    let Some(envrc) = resolve_envrc(&dir) else {
        return Err(anyhow::anyhow!("no .envrc found under {}", dir.display()));
    };

    let engine = SyncEngine::new(Arc::new(EnvironmentStore::new()), settings);
    engine.allow(&envrc).await?;
    println!("allowed {}", envrc.path().display());
    Ok(())
}
