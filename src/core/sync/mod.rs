// direnv-bridge: direnv environment loader for host processes
//
// SPDX-FileCopyrightText: 2026 direnv-bridge contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! The synchronization engine.
//!
//! ```text
//! Idle -> Invoking -> AwaitingOutput -> Reconciling -> {Done, Failed, Blocked}
//!
//! sync(envrc)
//!   spawn `direnv export json`
//!   drain stdout/stderr to EOF, then reap (timeout-bounded)
//!   exit 0   -> decode + apply to store -> Changed | Unchanged
//!   blocked  -> Blocked (AUTO_ALLOW: `direnv allow`, one fresh retry)
//!   nonzero  -> ProcessFailed(exit, stderr verbatim)
//!   expiry   -> kill -> TimedOut
//! ```
//!
//! Each sync is an independent unit of background work; retry after allow is a
//! fresh pass through the same states, never a resumed one.

use bitflags::bitflags;
use std::fmt;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::Child;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::Settings;
use crate::core::decode::{EnvEvent, decode_export};
use crate::core::path::{EnvrcFile, resolve_envrc};
use crate::core::process::DirenvCommand;
use crate::core::store::EnvironmentStore;
use crate::error::{BridgeError, BridgeResult, ProcessError, StoreError};

/// Substring of direnv's stderr that marks an unauthorized descriptor.
pub const BLOCKED_INDICATOR: &str = " is blocked";

bitflags! {
    /// Flags controlling sync behavior.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SyncFlags: u32 {
        /// Report `Unchanged` outcomes to the notifier as well
        const NOTIFY_UNCHANGED = 0x01;
        /// On `Blocked`, run `direnv allow` and retry the export once
        const AUTO_ALLOW = 0x02;
    }
}

/// Summary of one completed sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// At least one variable changed.
    Changed,
    /// The export replayed the already-loaded set.
    Unchanged,
    /// The export exceeded its wall-clock bound and was force-terminated.
    TimedOut,
    /// The descriptor is not yet authorized; `stderr` is verbatim.
    Blocked { stderr: String },
    /// Nonzero exit for any other reason; `stderr` is verbatim.
    ProcessFailed { exit_code: i32, stderr: String },
    /// The export stream was malformed. Mutations applied before the abort
    /// stay applied; `any_changed` says whether the store moved.
    DecodeFailed { message: String, any_changed: bool },
}

impl SyncOutcome {
    /// Whether the sync ran to completion.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Changed | Self::Unchanged)
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Changed => write!(f, "environment updated"),
            Self::Unchanged => write!(f, "environment already up to date"),
            Self::TimedOut => write!(f, "direnv timed out"),
            Self::Blocked { .. } => write!(f, ".envrc is blocked; allow it to load"),
            Self::ProcessFailed { exit_code, .. } => {
                write!(f, "direnv failed with exit code {exit_code}")
            }
            Self::DecodeFailed { message, .. } => {
                write!(f, "could not decode direnv output: {message}")
            }
        }
    }
}

/// What the engine hands to a notifier after each sync.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub envrc: PathBuf,
    pub outcome: SyncOutcome,
}

/// Receiver for user-facing sync results. The engine functions headless with
/// no notifier attached.
pub trait SyncNotifier: Send + Sync {
    fn notify(&self, report: &SyncReport);
}

/// One finished export invocation.
enum RunResult {
    Completed {
        exit_code: i32,
        stdout: Vec<u8>,
        stderr: String,
    },
    TimedOut,
    Cancelled,
}

/// Orchestrates descriptor resolution, direnv invocation, output decoding and
/// store reconciliation.
pub struct SyncEngine {
    store: Arc<EnvironmentStore>,
    settings: Settings,
    notifier: Option<Arc<dyn SyncNotifier>>,
    flags: SyncFlags,
}

impl SyncEngine {
    #[must_use]
    pub fn new(store: Arc<EnvironmentStore>, settings: Settings) -> Self {
        Self {
            store,
            settings,
            notifier: None,
            flags: SyncFlags::empty(),
        }
    }

    /// Attaches a notifier for user-facing results.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn SyncNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Sets sync flags.
    #[must_use]
    pub const fn with_flags(mut self, flags: SyncFlags) -> Self {
        self.flags = flags;
        self
    }

    /// The store this engine reconciles into.
    #[must_use]
    pub const fn store(&self) -> &Arc<EnvironmentStore> {
        &self.store
    }

    /// The settings this engine was built with.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Resolves `root`'s descriptor and syncs it.
    ///
    /// A missing descriptor is benign: the result is `Ok(None)`, never an
    /// error.
    ///
    /// # Errors
    ///
    /// Propagates spawn and store failures from [`sync`](Self::sync).
    pub async fn sync_root(&self, root: &Path) -> BridgeResult<Option<SyncOutcome>> {
        match resolve_envrc(root) {
            Some(envrc) => Ok(Some(self.sync(&envrc).await?)),
            None => {
                debug!(root = %root.display(), "no descriptor to sync");
                Ok(None)
            }
        }
    }

    /// Runs one sync against a known descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error for spawn failures and for environment mutations the
    /// platform table cannot represent. Everything else is a [`SyncOutcome`].
    pub async fn sync(&self, envrc: &EnvrcFile) -> BridgeResult<SyncOutcome> {
        match self.sync_cancellable(envrc, CancellationToken::new()).await? {
            Some(outcome) => Ok(outcome),
            None => Err(BridgeError::Other(
                "sync cancelled without a cancellation source".into(),
            )),
        }
    }

    /// Runs one sync, abandoning it when `cancel` fires (host shutdown).
    ///
    /// Cancellation force-terminates the child and yields `Ok(None)`; nothing
    /// is reported to the notifier.
    ///
    /// # Errors
    ///
    /// As for [`sync`](Self::sync).
    pub async fn sync_cancellable(
        &self,
        envrc: &EnvrcFile,
        cancel: CancellationToken,
    ) -> BridgeResult<Option<SyncOutcome>> {
        let executable = self.settings.direnv_executable();
        let mut allowed = false;

        loop {
            let command = DirenvCommand::export(envrc, &executable);
            let run = self
                .run_command(&command, self.settings.export_timeout(), Some(&cancel))
                .await?;

            let outcome = match run {
                RunResult::Cancelled => {
                    warn!(envrc = %envrc.path().display(), "sync cancelled");
                    return Ok(None);
                }
                RunResult::TimedOut => SyncOutcome::TimedOut,
                RunResult::Completed {
                    exit_code: 0,
                    stdout,
                    ..
                } => self.reconcile(&stdout)?,
                RunResult::Completed {
                    exit_code, stderr, ..
                } => {
                    if stderr.contains(BLOCKED_INDICATOR) {
                        if self.flags.contains(SyncFlags::AUTO_ALLOW) && !allowed {
                            // guided recovery: authorize, then one fresh pass
                            allowed = true;
                            self.allow(envrc).await?;
                            continue;
                        }
                        SyncOutcome::Blocked { stderr }
                    } else {
                        error!(envrc = %envrc.path().display(), stderr = %stderr, "export failed");
                        SyncOutcome::ProcessFailed { exit_code, stderr }
                    }
                }
            };

            self.report(envrc, &outcome);
            return Ok(Some(outcome));
        }
    }

    /// Authorizes the descriptor via `direnv allow`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProcessError`] for spawn failure, nonzero exit, or expiry
    /// of the allow timeout.
    pub async fn allow(&self, envrc: &EnvrcFile) -> BridgeResult<()> {
        let command = DirenvCommand::allow(envrc, self.settings.direnv_executable());
        let cmd_line = command.command_line();

        match self
            .run_command(&command, self.settings.allow_timeout(), None)
            .await?
        {
            RunResult::Completed { exit_code: 0, .. } => {
                info!(envrc = %envrc.path().display(), "descriptor allowed");
                Ok(())
            }
            RunResult::Completed {
                exit_code, stderr, ..
            } => {
                error!(stderr = %stderr, "allow failed");
                Err(ProcessError::NonZeroExit {
                    command: cmd_line,
                    code: exit_code,
                }
                .into())
            }
            RunResult::TimedOut => Err(ProcessError::Timeout {
                command: cmd_line,
                timeout_secs: self.settings.allow_timeout_secs,
            }
            .into()),
            RunResult::Cancelled => Err(BridgeError::Other("allow cancelled".into())),
        }
    }

    /// Spawns the command and shepherds it to completion within `timeout`.
    async fn run_command(
        &self,
        command: &DirenvCommand,
        timeout: Duration,
        cancel: Option<&CancellationToken>,
    ) -> BridgeResult<RunResult> {
        let cmd_line = command.command_line();
        let mut child = command.spawn()?;

        let stdout_task = spawn_drain(child.stdout.take());
        let stderr_task = spawn_drain(child.stderr.take());

        let waited = if let Some(cancel) = cancel {
            tokio::select! {
                res = tokio::time::timeout(
                    timeout,
                    drain_then_reap(&mut child, stdout_task, stderr_task),
                ) => Some(res),
                () = cancel.cancelled() => None,
            }
        } else {
            Some(
                tokio::time::timeout(
                    timeout,
                    drain_then_reap(&mut child, stdout_task, stderr_task),
                )
                .await,
            )
        };

        match waited {
            None => {
                kill_child(&cmd_line, &mut child).await;
                Ok(RunResult::Cancelled)
            }
            Some(Err(_elapsed)) => {
                warn!(cmd = %cmd_line, timeout = ?timeout, "process timed out");
                kill_child(&cmd_line, &mut child).await;
                Ok(RunResult::TimedOut)
            }
            Some(Ok(reaped)) => {
                let (status, stdout, stderr) =
                    reaped.map_err(|e| ProcessError::OutputError {
                        command: cmd_line,
                        message: e.to_string(),
                    })?;
                Ok(RunResult::Completed {
                    exit_code: status.code().unwrap_or(-1),
                    stdout,
                    stderr: String::from_utf8_lossy(&stderr).into_owned(),
                })
            }
        }
    }

    /// Applies the decoded export stream to the store.
    ///
    /// A decode error aborts the rest of the stream but keeps mutations that
    /// were already applied, mirroring the tool's incremental semantics.
    pub(crate) fn reconcile(&self, stdout: &[u8]) -> BridgeResult<SyncOutcome> {
        let mut any_changed = false;
        let mut store_error: Option<StoreError> = None;

        let decoded = decode_export(stdout, |event| {
            let applied = match &event {
                EnvEvent::Set { name, value } => self.store.set(name, value),
                EnvEvent::Unset { name } => self.store.unset(name),
            };
            match applied {
                Ok(changed) => {
                    any_changed |= changed;
                    ControlFlow::Continue(())
                }
                Err(e) => {
                    store_error = Some(e);
                    ControlFlow::Break(())
                }
            }
        });

        if let Some(e) = store_error {
            return Err(e.into());
        }

        match decoded {
            Ok(()) => Ok(if any_changed {
                SyncOutcome::Changed
            } else {
                SyncOutcome::Unchanged
            }),
            Err(e) => Ok(SyncOutcome::DecodeFailed {
                message: e.to_string(),
                any_changed,
            }),
        }
    }

    fn report(&self, envrc: &EnvrcFile, outcome: &SyncOutcome) {
        match outcome {
            SyncOutcome::Changed => info!(envrc = %envrc.path().display(), "{outcome}"),
            SyncOutcome::Unchanged => debug!(envrc = %envrc.path().display(), "{outcome}"),
            _ => warn!(envrc = %envrc.path().display(), "{outcome}"),
        }

        if let Some(notifier) = &self.notifier {
            if matches!(outcome, SyncOutcome::Unchanged)
                && !self.flags.contains(SyncFlags::NOTIFY_UNCHANGED)
            {
                return;
            }
            notifier.notify(&SyncReport {
                envrc: envrc.path().to_path_buf(),
                outcome: outcome.clone(),
            });
        }
    }
}

/// Reads a pipe to EOF on its own task so draining runs alongside waiting.
/// A mid-stream read failure travels back as the task's result.
fn spawn_drain<R>(pipe: Option<R>) -> Option<JoinHandle<std::io::Result<Vec<u8>>>>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    pipe.map(|mut pipe| {
        tokio::spawn(async move {
            let mut buf = Vec::new();
            pipe.read_to_end(&mut buf).await?;
            Ok(buf)
        })
    })
}

/// Drains both pipes to EOF, then reaps the child.
///
/// The tool holds its output pipe open until drained; reaping first can
/// deadlock once the pipe buffer fills. Read failures surface only after the
/// child is reaped, so a truncated stream never leaves a process behind.
async fn drain_then_reap(
    child: &mut Child,
    stdout_task: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    stderr_task: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
) -> std::io::Result<(std::process::ExitStatus, Vec<u8>, Vec<u8>)> {
    let stdout = drained(stdout_task).await;
    let stderr = drained(stderr_task).await;
    let status = child.wait().await?;
    Ok((status, stdout?, stderr?))
}

/// Resolves a drain task; a panicked task counts as a read failure.
async fn drained(task: Option<JoinHandle<std::io::Result<Vec<u8>>>>) -> std::io::Result<Vec<u8>> {
    match task {
        Some(task) => task.await.map_err(std::io::Error::other)?,
        None => Ok(Vec::new()),
    }
}

/// Force-terminates a child; no timed-out process may be left running.
async fn kill_child(cmd_line: &str, child: &mut Child) {
    if let Err(e) = child.kill().await {
        error!(cmd = %cmd_line, error = %e, "failed to kill process");
    }
}
