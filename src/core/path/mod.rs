// direnv-bridge: direnv environment loader for host processes
//
// SPDX-FileCopyrightText: 2026 direnv-bridge contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Descriptor discovery: a bounded ancestor walk for `.envrc`.
//!
//! ```text
//! resolve_envrc(root)
//!   root, then at most one parent (bound = 2 levels)
//!   stop at: filesystem root | WSL distribution root | leaving WSL fs
//!   direct fs existence checks, no directory scan
//! ```

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::trace;

use crate::core::wsl;

/// Name of the directory-scoped descriptor file.
pub const ENVRC_FILE_NAME: &str = ".envrc";

/// Root directory plus at most one parent. Deeper ancestors are deliberately
/// out of reach: an unrelated ancestor's descriptor is worse than none.
const MAX_WALK_DEPTH: usize = 2;

/// Matches a Windows drive root like `C:`, `C:\` or `C:/`.
static DRIVE_ROOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]:[\\/]?$").expect("static pattern"));

/// A discovered descriptor file. Discovered per query, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvrcFile {
    path: PathBuf,
    dir: PathBuf,
}

impl EnvrcFile {
    pub(crate) fn new(path: PathBuf) -> Self {
        let dir = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Self { path, dir }
    }

    /// Absolute path of the descriptor file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parent directory, the working directory for direnv invocations.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn is_filesystem_root(path: &Path) -> bool {
    let text = path.to_string_lossy();
    text == "/" || DRIVE_ROOT.is_match(&text)
}

/// Locates the authoritative `.envrc` for `root`.
///
/// Checks `root` itself and at most one parent, using direct filesystem
/// existence checks. For roots inside a WSL mount, the walk never crosses the
/// distribution's own mount root and never leaves the WSL filesystem.
/// Returns `None` when nothing is found within the bound.
#[must_use]
pub fn resolve_envrc(root: &Path) -> Option<EnvrcFile> {
    let wsl_root = wsl::is_wsl_path(root);
    let mut current = root.to_path_buf();

    for _ in 0..MAX_WALK_DEPTH {
        if is_filesystem_root(&current) {
            break;
        }
        if wsl_root && (wsl::is_distribution_root(&current) || !wsl::is_wsl_path(&current)) {
            break;
        }

        let candidate = current.join(ENVRC_FILE_NAME);
        if candidate.is_file() {
            trace!(path = %candidate.display(), "found descriptor");
            return Some(EnvrcFile::new(candidate));
        }

        let Some(parent) = current.parent() else {
            break;
        };
        current = parent.to_path_buf();
    }

    trace!(root = %root.display(), "no descriptor within walk bound");
    None
}
