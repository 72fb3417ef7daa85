// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for behavioral specs.

use std::io::Write;
use std::path::{Path, PathBuf};

/// Resolve the path to the `cronbelld` binary built into the workspace
/// target directory. The specs live in the root package, which does not
/// own the binary, so `CARGO_BIN_EXE_cronbelld` is not set for this test
/// — locate the artifact by path instead.
fn cronbelld_binary() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let standard = manifest_dir.join("target/debug/cronbelld");
    if standard.exists() {
        return standard;
    }

    // Fallback: resolve relative to the test binary itself. The test
    // binary lives at target/debug/deps/specs-<hash>, so its grandparent
    // is target/debug/ where cronbelld is built.
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join("cronbelld");
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

/// Command against the `cronbelld` binary.
pub fn cronbelld() -> assert_cmd::Command {
    assert_cmd::Command::new(cronbelld_binary())
}

/// Path to the demo deployment checked into the repo.
pub fn demo_config() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/file-transfer.hcl")
}

/// Write a config file into a temp dir, returning (dir guard, path).
pub fn write_config(name: &str, content: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    (dir, path)
}
