// direnv-bridge: direnv environment loader for host processes
//
// SPDX-FileCopyrightText: 2026 direnv-bridge contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{DistroStrategy, WslStrategy, is_distribution_root, is_wsl_path};
use std::path::{Path, PathBuf};

#[test]
fn test_detect_dollar_mount() {
    let ctx = WslStrategy
        .detect(Path::new(r"\\wsl$\Ubuntu\home\me\proj"))
        .expect("should detect");
    assert_eq!(ctx.distribution(), "Ubuntu");
    assert_eq!(ctx.linux_path(), "/home/me/proj");
}

#[test]
fn test_detect_localhost_mount() {
    let ctx = WslStrategy
        .detect(Path::new("//wsl.localhost/Debian/srv/app"))
        .expect("should detect");
    assert_eq!(ctx.distribution(), "Debian");
    assert_eq!(ctx.linux_path(), "/srv/app");
}

#[test]
fn test_detect_mount_root_translates_to_slash() {
    let ctx = WslStrategy
        .detect(Path::new(r"\\wsl$\Ubuntu"))
        .expect("should detect");
    assert_eq!(ctx.linux_path(), "/");
}

#[test]
fn test_detect_rejects_native_paths() {
    assert!(WslStrategy.detect(Path::new("/home/me/proj")).is_none());
    assert!(WslStrategy.detect(Path::new(r"C:\Users\me")).is_none());
    assert!(WslStrategy.detect(Path::new(r"\\server\share")).is_none());
}

#[test]
fn test_boundary_helpers() {
    assert!(is_wsl_path(Path::new(r"\\wsl$\Ubuntu\home")));
    assert!(!is_wsl_path(Path::new("/home")));
    assert!(is_distribution_root(Path::new(r"\\wsl$\Ubuntu")));
    assert!(is_distribution_root(Path::new("//wsl.localhost/Debian/")));
    assert!(!is_distribution_root(Path::new(r"\\wsl$\Ubuntu\home")));
}

#[test]
fn test_build_command_retargets_to_wsl_exe() {
    let ctx = WslStrategy
        .detect(Path::new(r"\\wsl$\Ubuntu\home\me\proj"))
        .expect("should detect");
    let invocation = WslStrategy.build_command(
        &ctx,
        &PathBuf::from("direnv"),
        &["export".to_string(), "json".to_string()],
    );
    assert_eq!(invocation.program, PathBuf::from("wsl.exe"));
    insta::assert_snapshot!(
        invocation.args.join(" "),
        @"--distribution Ubuntu --cd /home/me/proj --exec /bin/sh -lc direnv export json"
    );
}

#[test]
fn test_build_command_quotes_awkward_tokens() {
    let ctx = WslStrategy
        .detect(Path::new("//wsl.localhost/Debian/srv"))
        .expect("should detect");
    let invocation = WslStrategy.build_command(
        &ctx,
        &PathBuf::from("/opt/my tools/direnv"),
        &["export".to_string()],
    );
    assert_eq!(
        invocation.args.last().map(String::as_str),
        Some("'/opt/my tools/direnv' export")
    );
}
