// direnv-bridge: direnv environment loader for host processes
//
// SPDX-FileCopyrightText: 2026 direnv-bridge contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{BridgeError, BridgeResult, ProcessError, StoreError};

#[test]
fn test_process_error_display() {
    let err = ProcessError::Timeout {
        command: "direnv export json".to_string(),
        timeout_secs: 30,
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"process 'direnv export json' timed out after 30 seconds"
    );
}

#[test]
fn test_store_error_display() {
    let err = StoreError::MutationUnsupported {
        name: "A=B".to_string(),
        reason: "name contains '='".to_string(),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"cannot write 'A=B' to the process environment: name contains '='"
    );
}

#[test]
fn test_boxed_conversion() {
    let err: BridgeError = ProcessError::ExecutableNotFound {
        name: "direnv".to_string(),
    }
    .into();
    assert!(matches!(err, BridgeError::Process(_)));
    assert_eq!(
        err.to_string(),
        "process error: executable not found: 'direnv' (not in PATH)"
    );
}

#[test]
fn test_bridge_error_size() {
    // All payload variants are boxed; Other is a boxed str (fat pointer).
    let size = std::mem::size_of::<BridgeError>();
    assert!(size <= 24, "BridgeError is {size} bytes, expected <= 24");
}

#[test]
fn test_bridge_result_size() {
    let size = std::mem::size_of::<BridgeResult<()>>();
    assert!(size <= 24, "BridgeResult<()> is {size} bytes, expected <= 24");
}
