// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cronbelld --help` / `--version` specs.

use crate::prelude::cronbelld;

#[test]
fn help_names_the_flags() {
    let output = cronbelld().arg("--help").assert().success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    assert!(stdout.contains("--config"));
    assert!(stdout.contains("--validate"));
    assert!(stdout.contains("--listen"));
}

#[test]
fn version_prints_package_version() {
    let output = cronbelld().arg("--version").assert().success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_config_flag_is_a_usage_error() {
    cronbelld().assert().failure();
}
