// direnv-bridge: direnv environment loader for host processes
//
// SPDX-FileCopyrightText: 2026 direnv-bridge contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{EnvEvent, decode_export};
use std::ops::ControlFlow;

fn collect(bytes: &[u8]) -> Result<Vec<EnvEvent>, crate::error::DecodeError> {
    let mut events = Vec::new();
    decode_export(bytes, |event| {
        events.push(event);
        ControlFlow::Continue(())
    })?;
    Ok(events)
}

#[test]
fn test_set_and_unset_events_in_order() {
    let events = collect(br#"{"A":"1","B":null,"C":"2"}"#).expect("should decode");
    assert_eq!(
        events,
        vec![
            EnvEvent::Set {
                name: "A".to_string(),
                value: "1".to_string()
            },
            EnvEvent::Unset {
                name: "B".to_string()
            },
            EnvEvent::Set {
                name: "C".to_string(),
                value: "2".to_string()
            },
        ]
    );
}

#[test]
fn test_unknown_value_kinds_skipped() {
    let events =
        collect(br#"{"N":7,"B":true,"L":[1,2],"O":{"x":1},"S":"keep"}"#).expect("should decode");
    assert_eq!(
        events,
        vec![EnvEvent::Set {
            name: "S".to_string(),
            value: "keep".to_string()
        }]
    );
}

#[test]
fn test_empty_stream_is_no_changes() {
    assert!(collect(b"").expect("should decode").is_empty());
    assert!(collect(b"  \n").expect("should decode").is_empty());
    assert!(collect(b"{}").expect("should decode").is_empty());
}

#[test]
fn test_malformed_json_is_an_error() {
    assert!(collect(br#"{"A":"1","#).is_err());
    assert!(collect(b"[1,2,3]").is_err());
    assert!(collect(b"not json").is_err());
}

#[test]
fn test_events_before_malformed_tail_are_delivered() {
    let mut events = Vec::new();
    let result = decode_export(br#"{"A":"1","B":"#, |event| {
        events.push(event);
        ControlFlow::Continue(())
    });
    assert!(result.is_err());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name(), "A");
}

#[test]
fn test_sink_can_terminate_early() {
    let mut seen = 0;
    decode_export(br#"{"A":"1","B":"2","C":"3"}"#, |_| {
        seen += 1;
        if seen == 2 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .expect("early termination is not an error");
    assert_eq!(seen, 2);
}

#[test]
fn test_escaped_values_decode() {
    let events = collect(br#"{"PATH":"/a b/c:\"quoted\"\nline"}"#).expect("should decode");
    assert_eq!(
        events,
        vec![EnvEvent::Set {
            name: "PATH".to_string(),
            value: "/a b/c:\"quoted\"\nline".to_string()
        }]
    );
}
