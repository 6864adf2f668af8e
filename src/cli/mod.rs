// direnv-bridge: direnv environment loader for host processes
//
// SPDX-FileCopyrightText: 2026 direnv-bridge contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for direnv-bridge using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! direnv-bridge [global options] <command>
//! sync [DIR] [--allow] [--quiet]
//! allow [DIR]
//! status [DIR]
//! exec [DIR] -- CMD...
//! version
//! ```

pub mod global;
pub mod sync;


use crate::cli::global::GlobalOptions;
use crate::cli::sync::{AllowArgs, ExecArgs, StatusArgs, SyncArgs};
use clap::{Parser, Subcommand};

/// direnv environment loader for host processes.
///
/// Runs `direnv export json` against a project's `.envrc` and mirrors the
/// result into the process environment.
#[derive(Debug, Parser)]
#[command(
    name = "direnv-bridge",
    author,
    version,
    about = "direnv environment loader",
    long_about = "direnv-bridge Copyright (C) 2026 direnv-bridge contributors\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Loads the environment that direnv derives from a project's\n\
                  `.envrc` into the current process. `direnv-bridge sync` loads\n\
                  the nearest descriptor; `direnv-bridge exec DIR -- cmd` runs a\n\
                  command inside the loaded environment. See\n\
                  `direnv-bridge <command> --help` for more information.",
    after_help = "CONFIG FILES:\n\n\
                  By default, direnv-bridge looks for `direnv-bridge.toml` in the\n\
                  current directory. Additional files can be specified with\n\
                  --config; those are loaded afterwards and override the default.\n\
                  Environment variables prefixed with DIRENV_BRIDGE_ override\n\
                  file values, and command-line flags override everything."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Loads the environment from the nearest descriptor.
    Sync(SyncArgs),

    /// Authorizes a descriptor without loading it.
    Allow(AllowArgs),

    /// Shows the descriptor a directory resolves to.
    Status(StatusArgs),

    /// Runs a command inside the loaded environment.
    Exec(ExecArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version
/// information was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
