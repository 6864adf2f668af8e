// direnv-bridge: direnv environment loader for host processes
//
// SPDX-FileCopyrightText: 2026 direnv-bridge contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments for the sync-family commands.
//!
//! # Flag Effects
//!
//! ```text
//! sync --allow implies: on a blocked descriptor, run `direnv allow`
//!                       and retry the export once
//! sync --quiet suppresses the "already up to date" line
//! exec -- CMD...  loads the environment, then runs CMD inside it
//! ```

use clap::ArgAction;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the `sync` command.
#[derive(Debug, Clone, Default, Args)]
pub struct SyncArgs {
    /// Directory whose descriptor to load. Defaults to the current directory.
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Authorizes a blocked descriptor and retries the export once.
    #[arg(short = 'a', long = "allow", action = ArgAction::SetTrue)]
    pub allow: bool,

    /// Don't print anything when the environment is already up to date.
    #[arg(short = 'q', long = "quiet", action = ArgAction::SetTrue)]
    pub quiet: bool,
}

/// Arguments for the `allow` command.
#[derive(Debug, Clone, Default, Args)]
pub struct AllowArgs {
    /// Directory whose descriptor to authorize. Defaults to the current
    /// directory.
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, Args)]
pub struct StatusArgs {
    /// Directory to inspect. Defaults to the current directory.
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

/// Arguments for the `exec` command.
#[derive(Debug, Clone, Default, Args)]
pub struct ExecArgs {
    /// Directory whose descriptor to load. Defaults to the current directory.
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Command to run inside the loaded environment.
    #[arg(
        value_name = "CMD",
        required = true,
        last = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

impl SyncArgs {
    /// The effective target directory.
    #[must_use]
    pub fn target_dir(&self) -> PathBuf {
        resolve_dir(self.dir.as_deref())
    }
}

impl AllowArgs {
    /// The effective target directory.
    #[must_use]
    pub fn target_dir(&self) -> PathBuf {
        resolve_dir(self.dir.as_deref())
    }
}

impl StatusArgs {
    /// The effective target directory.
    #[must_use]
    pub fn target_dir(&self) -> PathBuf {
        resolve_dir(self.dir.as_deref())
    }
}

impl ExecArgs {
    /// The effective target directory.
    #[must_use]
    pub fn target_dir(&self) -> PathBuf {
        resolve_dir(self.dir.as_deref())
    }
}

fn resolve_dir(dir: Option<&std::path::Path>) -> PathBuf {
    dir.map_or_else(
        || std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        std::path::Path::to_path_buf,
    )
}
