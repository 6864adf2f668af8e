// direnv-bridge: direnv environment loader for host processes
//
// SPDX-FileCopyrightText: 2026 direnv-bridge contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{BuildEnvHook, merge_loaded_env};
use crate::config::Settings;
use crate::core::store::EnvironmentStore;
use crate::core::sync::SyncEngine;
use std::collections::BTreeMap;
use std::sync::Arc;

#[test]
fn test_merge_with_empty_store_is_noop() {
    let store = EnvironmentStore::detached();
    let mut env = BTreeMap::new();
    env.insert("EXISTING".to_string(), "kept".to_string());

    merge_loaded_env(&store, &mut env);
    assert_eq!(env.len(), 1);
    assert_eq!(env.get("EXISTING").map(String::as_str), Some("kept"));
}

#[test]
fn test_merge_overrides_and_adds() {
    let store = EnvironmentStore::detached();
    store.set("EXISTING", "overridden").expect("set");
    store.set("NEW", "added").expect("set");

    let mut env = BTreeMap::new();
    env.insert("EXISTING".to_string(), "kept".to_string());
    env.insert("UNRELATED".to_string(), "kept".to_string());

    merge_loaded_env(&store, &mut env);
    assert_eq!(env.get("EXISTING").map(String::as_str), Some("overridden"));
    assert_eq!(env.get("NEW").map(String::as_str), Some("added"));
    assert_eq!(env.get("UNRELATED").map(String::as_str), Some("kept"));
}

#[tokio::test]
async fn test_hook_without_import_settings_does_not_sync() {
    let engine = Arc::new(SyncEngine::new(
        Arc::new(EnvironmentStore::detached()),
        Settings::default(),
    ));
    let hook = BuildEnvHook::new(Arc::clone(&engine));

    // no descriptor anywhere near this temp dir, and import flags are off:
    // prepare must still succeed and leave the map alone
    let dir = tempfile::tempdir().expect("tempdir");
    let mut env = BTreeMap::new();
    hook.prepare(dir.path(), &mut env).await.expect("prepare");
    assert!(env.is_empty());
}

#[tokio::test]
async fn test_hook_merges_already_loaded_variables() {
    let store = Arc::new(EnvironmentStore::detached());
    store.set("FROM_DIRENV", "v").expect("set");
    let engine = Arc::new(SyncEngine::new(Arc::clone(&store), Settings::default()));
    let hook = BuildEnvHook::new(engine);

    let dir = tempfile::tempdir().expect("tempdir");
    let mut env = BTreeMap::new();
    hook.prepare(dir.path(), &mut env).await.expect("prepare");
    assert_eq!(env.get("FROM_DIRENV").map(String::as_str), Some("v"));
}

#[tokio::test]
async fn test_hook_with_import_enabled_and_no_descriptor() {
    let settings = Settings {
        import_per_execution: true,
        ..Settings::default()
    };
    let engine = Arc::new(SyncEngine::new(
        Arc::new(EnvironmentStore::detached()),
        settings,
    ));
    let hook = BuildEnvHook::new(engine);

    // lazy sync path runs, finds nothing, and stays benign
    let dir = tempfile::tempdir().expect("tempdir");
    let mut env = BTreeMap::new();
    hook.prepare(dir.path(), &mut env).await.expect("prepare");
    assert!(env.is_empty());
}
