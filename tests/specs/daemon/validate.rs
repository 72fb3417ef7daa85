// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cronbelld --validate` specs.

use crate::prelude::{cronbelld, demo_config, write_config};

#[test]
fn demo_deployment_validates() {
    let output = cronbelld()
        .arg("--config")
        .arg(demo_config())
        .arg("--validate")
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    assert!(stdout.contains("config ok"), "got: {stdout}");
    assert!(stdout.contains("file-transfer"));
    assert!(stdout.contains("2 rule(s)"));
}

#[test]
fn invalid_cron_fails_validation_with_location() {
    let (_dir, path) = write_config(
        "bad.toml",
        r#"
[schedule]
cron = "not a cron"

[job.x]
image = "x:latest"
cpu = 1
memory = 512

[backend]
endpoint = "https://batch.internal"
queue = "q"
"#,
    );
    let output = cronbelld()
        .arg("--config")
        .arg(&path)
        .arg("--validate")
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&output.get_output().stderr).to_string();
    assert!(stderr.contains("schedule.cron"), "got: {stderr}");
}

#[test]
fn unknown_extension_is_rejected() {
    let (_dir, path) = write_config("deploy.yaml", "anything");
    let output = cronbelld()
        .arg("--config")
        .arg(&path)
        .arg("--validate")
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&output.get_output().stderr).to_string();
    assert!(stderr.contains("unrecognized config extension"), "got: {stderr}");
}

#[test]
fn nonzero_retry_attempts_fail_validation() {
    let (_dir, path) = write_config(
        "retries.toml",
        r#"
[schedule]
cron = "0 9 * * *"

[job.x]
image = "x:latest"
cpu = 1
memory = 512
retry_attempts = 2

[backend]
endpoint = "https://batch.internal"
queue = "q"
"#,
    );
    let output = cronbelld()
        .arg("--config")
        .arg(&path)
        .arg("--validate")
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&output.get_output().stderr).to_string();
    assert!(stderr.contains("retry_attempts"), "got: {stderr}");
}
