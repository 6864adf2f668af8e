// direnv-bridge: direnv environment loader for host processes
//
// SPDX-FileCopyrightText: 2026 direnv-bridge contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! WSL distribution detection and path/command translation.
//!
//! ```text
//! \\wsl$\Ubuntu\home\me\proj      //wsl.localhost/Debian/srv
//!            |                              |
//!            v                              v
//!      detect() --> DistributionContext { distribution, linux_path }
//!            |
//!            v
//!      build_command() --> wsl.exe --distribution ... --cd ... --exec sh -lc "..."
//! ```
//!
//! Branching on the mount form lives behind [`DistroStrategy`], selected once
//! per invocation instead of scattered conditionals.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Matches a path inside a WSL distribution mount, capturing the distribution
/// name and the path inside it. Applied after backslash normalization.
static WSL_MOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^//wsl(?:\$|\.localhost)/([^/]+)(/.*)?$").expect("static pattern")
});

/// Matches the mount root of a distribution itself (no inner path).
static WSL_MOUNT_ROOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^//wsl[^/]*/[^/]+/?$").expect("static pattern"));

/// Normalizes a path for mount-pattern matching: lossy UTF-8, forward slashes.
fn normalize(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Whether the path lives anywhere inside the WSL filesystem.
#[must_use]
pub fn is_wsl_path(path: &Path) -> bool {
    normalize(path).starts_with("//wsl")
}

/// Whether the path is exactly a distribution's own mount root.
#[must_use]
pub fn is_distribution_root(path: &Path) -> bool {
    WSL_MOUNT_ROOT.is_match(&normalize(path))
}

/// Context for a working directory that resolves into a WSL distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionContext {
    distribution: String,
    linux_path: String,
}

impl DistributionContext {
    /// The distribution identifier (e.g. `Ubuntu`).
    #[must_use]
    pub fn distribution(&self) -> &str {
        &self.distribution
    }

    /// The translated native path inside the distribution.
    #[must_use]
    pub fn linux_path(&self) -> &str {
        &self.linux_path
    }
}

/// A fully resolved spawn target after translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

/// Strategy seam for virtualized-distribution handling.
///
/// `detect` classifies a working directory; `build_command` re-targets an
/// invocation to run remotely inside the distribution's default shell.
pub trait DistroStrategy: Send + Sync {
    /// Returns the distribution context if `path` names a distribution mount.
    fn detect(&self, path: &Path) -> Option<DistributionContext>;

    /// Builds the remote invocation for `program args...` with the context's
    /// native path as remote working directory.
    fn build_command(
        &self,
        ctx: &DistributionContext,
        program: &Path,
        args: &[String],
    ) -> Invocation;
}

/// Production strategy for `\\wsl$\` and `\\wsl.localhost\` mounts.
#[derive(Debug, Default, Clone, Copy)]
pub struct WslStrategy;

impl DistroStrategy for WslStrategy {
    fn detect(&self, path: &Path) -> Option<DistributionContext> {
        let normalized = normalize(path);
        let caps = WSL_MOUNT.captures(&normalized)?;
        let distribution = caps.get(1).map(|m| m.as_str().to_string())?;
        let linux_path = caps
            .get(2)
            .map_or_else(|| "/".to_string(), |m| m.as_str().to_string());
        Some(DistributionContext {
            distribution,
            linux_path,
        })
    }

    fn build_command(
        &self,
        ctx: &DistributionContext,
        program: &Path,
        args: &[String],
    ) -> Invocation {
        // Remote working directory plus execution in the default login shell,
        // so the user's PATH inside the distribution applies.
        let mut shell_command = shell_quote(&program.to_string_lossy());
        for arg in args {
            shell_command.push(' ');
            shell_command.push_str(&shell_quote(arg));
        }

        Invocation {
            program: PathBuf::from("wsl.exe"),
            args: vec![
                "--distribution".to_string(),
                ctx.distribution.clone(),
                "--cd".to_string(),
                ctx.linux_path.clone(),
                "--exec".to_string(),
                "/bin/sh".to_string(),
                "-lc".to_string(),
                shell_command,
            ],
        }
    }
}

/// Single-quotes a token for a POSIX shell.
fn shell_quote(token: &str) -> String {
    if !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '-' | '_'))
    {
        return token.to_string();
    }
    format!("'{}'", token.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests;
