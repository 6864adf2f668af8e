// direnv-bridge: direnv environment loader for host processes
//
// SPDX-FileCopyrightText: 2026 direnv-bridge contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! direnv invocation: command construction and spawning.
//!
//! ```text
//! DirenvCommand::export(envrc, exe) / ::allow(envrc, exe)
//!              |
//!              v
//!        build_command()
//!      cwd = envrc parent
//!        /            \
//!       v              v
//!  (WSL mount)      (native)
//!  wsl.exe shim     direct spawn
//!        \            /
//!         v          v
//!      spawn() -> Child (piped stdout/stderr, kill_on_drop)
//! ```

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::{debug, trace};

use crate::core::path::EnvrcFile;
use crate::core::wsl::{DistroStrategy, WslStrategy};
use crate::error::ProcessError;

/// A configured direnv invocation against a specific descriptor.
#[derive(Debug, Clone)]
pub struct DirenvCommand {
    program: PathBuf,
    args: Vec<String>,
    cwd: PathBuf,
}

impl DirenvCommand {
    /// The export step: `direnv export json` in the descriptor's directory.
    #[must_use]
    pub fn export(envrc: &EnvrcFile, executable: impl Into<PathBuf>) -> Self {
        Self::new(envrc, executable, &["export", "json"])
    }

    /// The authorization step: `direnv allow` in the descriptor's directory.
    #[must_use]
    pub fn allow(envrc: &EnvrcFile, executable: impl Into<PathBuf>) -> Self {
        Self::new(envrc, executable, &["allow"])
    }

    fn new(envrc: &EnvrcFile, executable: impl Into<PathBuf>, args: &[&str]) -> Self {
        Self {
            program: executable.into(),
            args: args.iter().map(ToString::to_string).collect(),
            cwd: envrc.dir().to_path_buf(),
        }
    }

    /// Returns the full command line as a string (for logging and errors).
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut cmd = format!("{}", self.program.display());
        for arg in &self.args {
            if arg.contains(' ') {
                use std::fmt::Write as _;
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                use std::fmt::Write as _;
                let _ = write!(cmd, " {arg}");
            }
        }
        cmd
    }

    /// Working directory of the invocation (the descriptor's parent).
    #[must_use]
    pub fn working_dir(&self) -> &Path {
        &self.cwd
    }

    /// Builds the tokio Command, re-targeting through the WSL shim when the
    /// working directory names a distribution mount.
    fn build_command(&self) -> Command {
        let mut command = match WslStrategy.detect(&self.cwd) {
            Some(ctx) => {
                debug!(
                    distribution = ctx.distribution(),
                    cwd = ctx.linux_path(),
                    "re-targeting into WSL distribution"
                );
                let invocation = WslStrategy.build_command(&ctx, &self.program, &self.args);
                let mut command = Command::new(invocation.program);
                command.args(invocation.args);
                // the remote working directory travels inside the shim args
                command
            }
            None => {
                debug!(cwd = %self.cwd.display(), "cd");
                let mut command = Command::new(&self.program);
                command.args(&self.args);
                command.current_dir(&self.cwd);
                command
            }
        };

        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        // Kill on drop for safety
        command.kill_on_drop(true);

        command
    }

    /// Spawns the process.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::ExecutableNotFound`] when the OS cannot locate
    /// the program, [`ProcessError::SpawnFailed`] with the full command line
    /// for any other refusal.
    pub fn spawn(&self) -> Result<Child, ProcessError> {
        let cmd_line = self.command_line();
        debug!(cmd = %cmd_line, "exec");

        let child = self.build_command().spawn().map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ProcessError::ExecutableNotFound {
                    name: self.program.display().to_string(),
                }
            } else {
                ProcessError::SpawnFailed {
                    command: cmd_line,
                    source,
                }
            }
        })?;

        trace!(pid = ?child.id(), "spawned");
        Ok(child)
    }
}
