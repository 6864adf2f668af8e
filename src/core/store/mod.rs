// direnv-bridge: direnv environment loader for host processes
//
// SPDX-FileCopyrightText: 2026 direnv-bridge contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process-wide environment store.
//!
//! ```text
//! EnvironmentStore (Arc-shared, one per host process)
//!   Mutex<StoreInner>
//!     backend: Process (real env table) | Detached (tests)
//!     loaded:  BTreeMap of variables this store set
//!
//! set/unset mutate the real table so descendants inherit;
//! snapshot()/loaded_snapshot() hand out independent copies.
//! ```
//!
//! The store is injected explicitly (created once per host process, shared by
//! `Arc`), never reached through ambient globals, so tests substitute a
//! detached instance that touches only an in-memory table.

use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::trace;

use crate::error::StoreError;

/// Backing table for the store.
#[derive(Debug)]
enum Backend {
    /// The hosting process's real environment table.
    Process,
    /// An isolated in-memory table, for tests and dry runs.
    Detached(BTreeMap<String, String>),
}

impl Backend {
    fn get(&self, name: &str) -> Option<String> {
        match self {
            Self::Process => std::env::var(name).ok(),
            Self::Detached(vars) => vars.get(name).cloned(),
        }
    }

    fn set(&mut self, name: &str, value: &str) {
        match self {
            Self::Process => {
                // SAFETY: every mutation of the process table goes through the
                // store's lock; nothing else in this crate writes the table.
                unsafe { std::env::set_var(name, value) };
            }
            Self::Detached(vars) => {
                vars.insert(name.to_string(), value.to_string());
            }
        }
    }

    fn remove(&mut self, name: &str) {
        match self {
            Self::Process => {
                // SAFETY: as in `set`, serialized behind the store's lock.
                unsafe { std::env::remove_var(name) };
            }
            Self::Detached(vars) => {
                vars.remove(name);
            }
        }
    }

    fn snapshot(&self) -> BTreeMap<String, String> {
        match self {
            Self::Process => std::env::vars().collect(),
            Self::Detached(vars) => vars.clone(),
        }
    }
}

#[derive(Debug)]
struct StoreInner {
    backend: Backend,
    /// Variables this store set, distinct from pre-existing host variables.
    loaded: BTreeMap<String, String>,
}

/// Shared, process-wide store of loaded environment variables.
///
/// Mutated only via [`set`](Self::set)/[`unset`](Self::unset); readers receive
/// independent copies, never a live alias. Concurrent syncs racing on a key
/// converge last-writer-wins; a reader never observes a torn key set.
#[derive(Debug)]
pub struct EnvironmentStore {
    inner: Mutex<StoreInner>,
}

impl Default for EnvironmentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentStore {
    /// A store backed by the real process environment table. Descendant
    /// processes inherit every value written through it.
    #[must_use]
    pub fn new() -> Self {
        Self::with_backend(Backend::Process)
    }

    /// A store backed by an isolated in-memory table.
    #[must_use]
    pub fn detached() -> Self {
        Self::with_backend(Backend::Detached(BTreeMap::new()))
    }

    /// A detached store seeded with pre-existing "host" variables.
    #[must_use]
    pub fn detached_with(vars: BTreeMap<String, String>) -> Self {
        Self::with_backend(Backend::Detached(vars))
    }

    fn with_backend(backend: Backend) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                backend,
                loaded: BTreeMap::new(),
            }),
        }
    }

    /// Sets a variable in the environment table and records it as loaded.
    ///
    /// Returns `true` iff the new value differs from the prior value or the
    /// key was previously absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MutationUnsupported`] when the platform table
    /// cannot represent the entry.
    pub fn set(&self, name: &str, value: &str) -> Result<bool, StoreError> {
        validate_name(name)?;
        validate_value(name, value)?;

        let mut inner = self.lock();
        let changed = inner.backend.get(name).as_deref() != Some(value);
        inner.backend.set(name, value);
        inner.loaded.insert(name.to_string(), value.to_string());
        trace!(name, changed, "set variable");
        Ok(changed)
    }

    /// Removes a variable from the environment table entirely.
    ///
    /// Returns `true` iff the key existed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MutationUnsupported`] when the platform table
    /// cannot represent the name.
    pub fn unset(&self, name: &str) -> Result<bool, StoreError> {
        validate_name(name)?;

        let mut inner = self.lock();
        let existed = inner.backend.get(name).is_some();
        inner.backend.remove(name);
        inner.loaded.remove(name);
        trace!(name, existed, "unset variable");
        Ok(existed)
    }

    /// Current value of a variable, loaded or pre-existing.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        self.lock().backend.get(name)
    }

    /// Independent copy of the full environment table.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.lock().backend.snapshot()
    }

    /// Independent copy of only the variables this store has set.
    #[must_use]
    pub fn loaded_snapshot(&self) -> BTreeMap<String, String> {
        self.lock().loaded.clone()
    }

    /// Whether this store has loaded any variables yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().loaded.is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

fn validate_name(name: &str) -> Result<(), StoreError> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.contains('=') {
        "name contains '='"
    } else if name.contains('\0') {
        "name contains NUL"
    } else {
        return Ok(());
    };
    Err(StoreError::MutationUnsupported {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}

fn validate_value(name: &str, value: &str) -> Result<(), StoreError> {
    if value.contains('\0') {
        return Err(StoreError::MutationUnsupported {
            name: name.to_string(),
            reason: "value contains NUL".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests;
