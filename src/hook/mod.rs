// direnv-bridge: direnv environment loader for host processes
//
// SPDX-FileCopyrightText: 2026 direnv-bridge contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Collaborator surfaces around the sync core.
//!
//! ```text
//! LogNotifier          SyncNotifier backed by tracing (headless default)
//! BuildEnvHook         before an external build launches, merge the loaded
//!                      variables into the build's own environment map,
//!                      syncing lazily when import settings ask for it
//! merge_loaded_env     the bare merge, tolerant of zero loaded variables
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::store::EnvironmentStore;
use crate::core::sync::{SyncEngine, SyncNotifier, SyncReport};
use crate::error::BridgeResult;

/// A notifier that writes reports to the log. Hosts with a real notification
/// surface replace it; the engine also runs with none at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl SyncNotifier for LogNotifier {
    fn notify(&self, report: &SyncReport) {
        if report.outcome.is_success() {
            info!(envrc = %report.envrc.display(), "{}", report.outcome);
        } else {
            warn!(envrc = %report.envrc.display(), "{}", report.outcome);
        }
    }
}

/// Merges the store's loaded variables into an external build's environment
/// map. A store with nothing loaded is a no-op.
pub fn merge_loaded_env(store: &EnvironmentStore, env: &mut BTreeMap<String, String>) {
    let loaded = store.loaded_snapshot();
    if loaded.is_empty() {
        debug!("no loaded variables to merge");
        return;
    }
    debug!(count = loaded.len(), "merging loaded variables");
    env.extend(loaded);
}

/// Pre-launch hook for external build tools.
///
/// Queries the engine's store and folds the loaded variables into the build's
/// environment. When nothing is loaded yet and an import setting is enabled,
/// it synchronizes first so the very first build still sees the variables.
pub struct BuildEnvHook {
    engine: Arc<SyncEngine>,
}

impl BuildEnvHook {
    #[must_use]
    pub fn new(engine: Arc<SyncEngine>) -> Self {
        Self { engine }
    }

    /// Prepares `env` for a build rooted at `root`.
    ///
    /// # Errors
    ///
    /// Propagates engine failures from the lazy sync; the merge itself cannot
    /// fail.
    pub async fn prepare(
        &self,
        root: &Path,
        env: &mut BTreeMap<String, String>,
    ) -> BridgeResult<()> {
        let settings = self.engine.settings();
        if self.engine.store().is_empty()
            && (settings.import_on_open || settings.import_per_execution)
        {
            debug!(root = %root.display(), "no variables loaded yet, syncing before build");
            self.engine.sync_root(root).await?;
        }

        merge_loaded_env(self.engine.store(), env);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
