// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config validation error tests.

use super::*;

const VALID: &str = r#"
[schedule]
cron = "0 9 * * *"

[job.transfer]
image = "transfer:latest"
cpu = 1
memory = 2048

[backend]
endpoint = "https://batch.internal"
queue = "q1"

[target.slack]
url = "https://hooks.example.com/x"

[rule.done.match.detail]
status = ["SUCCEEDED"]

[rule.done.notify.slack.payload]
text = "done"
"#;

#[test]
fn valid_config_parses() {
    let config = parse_config(VALID).unwrap();
    assert_eq!(config.job().unwrap().name, "transfer");
}

#[test]
fn missing_schedule_is_rejected() {
    let content = VALID.replace("cron = \"0 9 * * *\"", "");
    let (location, message) = expect_invalid(parse_config(&content));
    assert_eq!(location, "schedule.cron");
    assert!(message.contains("required"));
}

#[test]
fn bad_cron_is_rejected_with_diagnostic() {
    let content = VALID.replace("0 9 * * *", "0 9 * *");
    let (location, message) = expect_invalid(parse_config(&content));
    assert_eq!(location, "schedule.cron");
    assert!(message.contains("expected 5 fields"), "got: {message}");
}

#[test]
fn missing_job_is_rejected() {
    let content = VALID.replace("[job.transfer]", "[ignored.transfer]");
    let (location, _) = expect_invalid(parse_config(&content));
    assert_eq!(location, "job");
}

#[test]
fn second_job_is_rejected() {
    let content = format!("{VALID}\n[job.other]\nimage = \"other:latest\"\ncpu = 1\nmemory = 512\n");
    let (location, message) = expect_invalid(parse_config(&content));
    assert_eq!(location, "job");
    assert!(message.contains("found 2"));
}

#[test]
fn empty_image_is_rejected() {
    let content = VALID.replace("image = \"transfer:latest\"", "image = \"\"");
    let (location, _) = expect_invalid(parse_config(&content));
    assert_eq!(location, "job.transfer.image");
}

#[test]
fn nonzero_retry_attempts_is_rejected() {
    let content = VALID.replace("cpu = 1", "cpu = 1\nretry_attempts = 3");
    let (location, message) = expect_invalid(parse_config(&content));
    assert_eq!(location, "job.transfer.retry_attempts");
    assert!(message.contains("must be 0"));
}

#[yare::parameterized(
    endpoint = { "endpoint = \"https://batch.internal\"", "backend.endpoint" },
    queue    = { "queue = \"q1\"", "backend.queue" },
)]
fn missing_backend_field_is_rejected(line: &str, expected_location: &str) {
    let content = VALID.replace(line, "");
    let (location, _) = expect_invalid(parse_config(&content));
    assert_eq!(location, expected_location);
}

#[test]
fn bad_timeout_is_rejected() {
    let content = format!("{VALID}\n[settings]\nsubmit_timeout = \"soon\"\n");
    let (location, _) = expect_invalid(parse_config(&content));
    assert_eq!(location, "settings.submit_timeout");
}

#[test]
fn empty_pattern_is_rejected() {
    let content = r#"
[schedule]
cron = "0 9 * * *"

[job.transfer]
image = "transfer:latest"
cpu = 1
memory = 2048

[backend]
endpoint = "https://batch.internal"
queue = "q1"

[target.slack]
url = "https://hooks.example.com/x"

[rule.done.match]

[rule.done.notify.slack.payload]
text = "done"
"#;
    let (location, message) = expect_invalid(parse_config(content));
    assert_eq!(location, "rule.done.match");
    assert!(message.contains("at least one field"));
}

#[test]
fn rule_without_notify_is_rejected() {
    let content = VALID.replace(
        "[rule.done.notify.slack.payload]\ntext = \"done\"",
        "",
    );
    let (location, _) = expect_invalid(parse_config(&content));
    assert_eq!(location, "rule.done");
}

#[test]
fn unknown_target_is_rejected_with_alternatives() {
    let content = VALID.replace("notify.slack", "notify.pager");
    let (location, message) = expect_invalid(parse_config(&content));
    assert_eq!(location, "rule.done.notify.pager");
    assert!(message.contains("unknown target 'pager'"));
    assert!(message.contains("available targets: slack"));
}
