// direnv-bridge: direnv environment loader for host processes
//
// SPDX-FileCopyrightText: 2026 direnv-bridge contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use super::EnvironmentStore;
use std::collections::BTreeMap;
use std::sync::Arc;

#[test]
fn test_set_then_snapshot_contains() {
    let store = EnvironmentStore::detached();
    assert!(store.set("FOO", "bar").expect("set"));
    assert_eq!(store.snapshot().get("FOO").map(String::as_str), Some("bar"));

    assert!(store.unset("FOO").expect("unset"));
    assert!(!store.snapshot().contains_key("FOO"));
}

#[test]
fn test_set_change_detection() {
    let store = EnvironmentStore::detached();
    assert!(store.set("KEY", "v1").expect("set"), "absent key is a change");
    assert!(!store.set("KEY", "v1").expect("set"), "same value is not");
    assert!(store.set("KEY", "v2").expect("set"), "new value is");
}

#[test]
fn test_unset_reports_existence() {
    let store = EnvironmentStore::detached();
    assert!(!store.unset("NEVER_SET").expect("unset"));
    store.set("KEY", "v").expect("set");
    assert!(store.unset("KEY").expect("unset"));
    assert!(!store.unset("KEY").expect("unset"));
}

#[test]
fn test_preexisting_host_variable() {
    let mut host = BTreeMap::new();
    host.insert("HOST_VAR".to_string(), "host".to_string());
    let store = EnvironmentStore::detached_with(host);

    // same value as the host's: present, but not a change
    assert!(!store.set("HOST_VAR", "host").expect("set"));
    // still recorded as loaded from now on
    assert!(store.loaded_snapshot().contains_key("HOST_VAR"));
    // removing a pre-existing key reports existence
    assert!(store.unset("HOST_VAR").expect("unset"));
    assert!(!store.snapshot().contains_key("HOST_VAR"));
}

#[test]
fn test_loaded_snapshot_excludes_host_variables() {
    let mut host = BTreeMap::new();
    host.insert("HOST_VAR".to_string(), "host".to_string());
    let store = EnvironmentStore::detached_with(host);
    store.set("LOADED_VAR", "x").expect("set");

    let loaded = store.loaded_snapshot();
    assert_eq!(loaded.len(), 1);
    assert!(loaded.contains_key("LOADED_VAR"));
    assert!(store.snapshot().contains_key("HOST_VAR"));
}

#[test]
fn test_snapshot_is_an_independent_copy() {
    let store = EnvironmentStore::detached();
    store.set("A", "1").expect("set");
    let before = store.snapshot();
    store.set("A", "2").expect("set");
    assert_eq!(before.get("A").map(String::as_str), Some("1"));
}

#[test]
fn test_unsupported_names_fail_fast() {
    let store = EnvironmentStore::detached();
    assert!(store.set("", "v").is_err());
    assert!(store.set("A=B", "v").is_err());
    assert!(store.set("NUL\0", "v").is_err());
    assert!(store.set("OK", "v\0v").is_err());
    assert!(store.unset("A=B").is_err());
}

#[test]
fn test_process_backend_mutates_real_environment() {
    let store = EnvironmentStore::new();
    let key = "DIRENV_BRIDGE_STORE_TEST_KEY";

    store.set(key, "inherited").expect("set");
    assert_eq!(std::env::var(key).as_deref(), Ok("inherited"));
    assert!(store.loaded_snapshot().contains_key(key));

    store.unset(key).expect("unset");
    assert!(std::env::var(key).is_err());
}

#[test]
fn test_concurrent_writers_converge() {
    let store = Arc::new(EnvironmentStore::detached());
    let mut handles = Vec::new();

    // disjoint keys: no lost updates
    for worker in 0..4 {
        let store = Arc::clone(&store);
        handles.push(std::thread::spawn(move || {
            for i in 0..50 {
                store
                    .set(&format!("W{worker}_K{i}"), &format!("{worker}"))
                    .expect("set");
            }
        }));
    }
    // same key: last writer wins, value never torn
    for worker in 0..4 {
        let store = Arc::clone(&store);
        handles.push(std::thread::spawn(move || {
            for _ in 0..50 {
                store.set("SHARED", &format!("value-{worker}")).expect("set");
            }
        }));
    }
    for handle in handles {
        handle.join().expect("worker");
    }

    let snapshot = store.loaded_snapshot();
    for worker in 0..4 {
        for i in 0..50 {
            assert_eq!(
                snapshot.get(&format!("W{worker}_K{i}")).map(String::as_str),
                Some(format!("{worker}").as_str())
            );
        }
    }
    let shared = snapshot.get("SHARED").expect("shared key present");
    assert!((0..4).any(|w| shared == &format!("value-{w}")));
}
