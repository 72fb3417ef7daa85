// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Multi-format parsing tests: TOML, JSON, and HCL.

use super::*;
use cronbell_core::Event;

/// Shared assertions for the sample "file-transfer" deployment across all
/// three formats.
fn assert_sample_deployment(config: &Config) {
    assert_eq!(config.schedule.cron, "0 9 * * *");
    assert!(config.schedule_spec().is_ok());

    // Job
    let job = config.job().unwrap();
    assert_eq!(job.name, "file-transfer");
    assert_eq!(job.image, "registry.example.com/file-transfer:latest");
    assert_eq!(job.resources.cpu, 1);
    assert_eq!(job.resources.memory_mib, 2048);
    assert_eq!(job.env.get("TRANSFER_MODE"), Some(&"full".to_string()));
    assert_eq!(
        job.secrets.get("PORTAL_KEY").map(String::as_str),
        Some("arn:aws:secretsmanager:us-west-2:1:secret:portal-key")
    );
    assert_eq!(job.retry_attempts, 0);
    assert_eq!(job.log_prefix.as_deref(), Some("file-transfer"));

    // Backend
    assert_eq!(config.backend.endpoint, "https://batch.internal.example.com");
    assert_eq!(config.backend.queue, "file-transfer-queue");
    assert_eq!(config.backend.token_env.as_deref(), Some("CRONBELL_BACKEND_TOKEN"));

    // Target
    let target = &config.targets["ops-slack"];
    assert_eq!(target.name, "ops-slack");
    assert_eq!(target.url, "https://hooks.example.com/services/T0/B0/x");

    // Rules
    assert_eq!(config.rules.len(), 2);
    let succeeded = &config.rules["notify-succeeded"];
    assert_eq!(succeeded.name, "notify-succeeded");
    assert_eq!(succeeded.notify.len(), 1);
    let payload = &succeeded.notify["ops-slack"].payload;
    assert!(payload["text"].contains("${detail.jobQueue}"));

    // The pattern matches a succeeded event once ${job.queue} is resolved.
    let resolved = succeeded
        .pattern
        .map_literals(|s| -> Result<String, ()> {
            Ok(s.replace("${job.queue}", "file-transfer-queue"))
        })
        .unwrap();
    let event = Event::new("aws.batch", "Batch Job State Change")
        .with_detail("status", "SUCCEEDED")
        .with_detail("jobQueue", "file-transfer-queue");
    assert!(resolved.matches(&event));
    let failed_event = Event::new("aws.batch", "Batch Job State Change")
        .with_detail("status", "FAILED")
        .with_detail("jobQueue", "file-transfer-queue");
    assert!(!resolved.matches(&failed_event));
}

// ============================================================================
// HCL Format
// ============================================================================

const SAMPLE_HCL: &str = r#"
schedule {
  cron = "0 9 * * *"
}

job "file-transfer" {
  image  = "registry.example.com/file-transfer:latest"
  cpu    = 1
  memory = 2048

  env = {
    TRANSFER_MODE = "full"
  }

  secrets = {
    PORTAL_KEY = "arn:aws:secretsmanager:us-west-2:1:secret:portal-key"
  }

  log_prefix = "file-transfer"
}

backend {
  endpoint  = "https://batch.internal.example.com"
  queue     = "file-transfer-queue"
  token_env = "CRONBELL_BACKEND_TOKEN"
}

target "ops-slack" {
  url = "https://hooks.example.com/services/T0/B0/x"
}

rule "notify-succeeded" {
  match {
    source      = ["aws.batch"]
    detail_type = ["Batch Job State Change"]

    detail = {
      status   = ["SUCCEEDED"]
      jobQueue = ["${job.queue}"]
    }
  }

  notify "ops-slack" {
    payload = {
      text = ":white_check_mark: *file-transfer succeeded* | ${detail.jobQueue}"
    }
  }
}

rule "notify-failed" {
  match {
    source      = ["aws.batch"]
    detail_type = ["Batch Job State Change"]

    detail = {
      status   = ["FAILED"]
      jobQueue = ["${job.queue}"]
    }
  }

  notify "ops-slack" {
    payload = {
      text = ":x: *file-transfer failed* | ${detail.jobQueue}"
    }
  }
}
"#;

#[test]
fn hcl_sample_deployment() {
    let config = super::parse_hcl(SAMPLE_HCL);
    assert_sample_deployment(&config);
    // Settings were omitted: defaults apply.
    assert_eq!(config.settings.listen, "127.0.0.1:4710");
    assert_eq!(config.settings.submit_timeout, "30s");
    assert_eq!(config.settings.deliver_timeout, "10s");
}

#[test]
fn hcl_settings_override_defaults() {
    let content = format!(
        "{SAMPLE_HCL}\nsettings {{\n  listen = \"0.0.0.0:9000\"\n  submit_timeout = \"1m\"\n}}\n"
    );
    let config = super::parse_hcl(&content);
    assert_eq!(config.settings.listen, "0.0.0.0:9000");
    assert_eq!(config.settings.submit_timeout, "1m");
    // Unset keys keep their defaults.
    assert_eq!(config.settings.deliver_timeout, "10s");
}

// ============================================================================
// TOML Format
// ============================================================================

const SAMPLE_TOML: &str = r#"
[schedule]
cron = "0 9 * * *"

[job.file-transfer]
image = "registry.example.com/file-transfer:latest"
cpu = 1
memory = 2048
log_prefix = "file-transfer"

[job.file-transfer.env]
TRANSFER_MODE = "full"

[job.file-transfer.secrets]
PORTAL_KEY = "arn:aws:secretsmanager:us-west-2:1:secret:portal-key"

[backend]
endpoint = "https://batch.internal.example.com"
queue = "file-transfer-queue"
token_env = "CRONBELL_BACKEND_TOKEN"

[target.ops-slack]
url = "https://hooks.example.com/services/T0/B0/x"

[rule.notify-succeeded.match]
source = ["aws.batch"]
detail_type = ["Batch Job State Change"]

[rule.notify-succeeded.match.detail]
status = ["SUCCEEDED"]
jobQueue = ["${job.queue}"]

[rule.notify-succeeded.notify.ops-slack.payload]
text = ":white_check_mark: *file-transfer succeeded* | ${detail.jobQueue}"

[rule.notify-failed.match]
source = ["aws.batch"]
detail_type = ["Batch Job State Change"]

[rule.notify-failed.match.detail]
status = ["FAILED"]
jobQueue = ["${job.queue}"]

[rule.notify-failed.notify.ops-slack.payload]
text = ":x: *file-transfer failed* | ${detail.jobQueue}"
"#;

#[test]
fn toml_sample_deployment() {
    let config = super::parse_toml(SAMPLE_TOML);
    assert_sample_deployment(&config);
}

#[test]
fn toml_is_the_default_format() {
    let config = parse_config(SAMPLE_TOML).unwrap();
    assert_sample_deployment(&config);
}

// ============================================================================
// JSON Format
// ============================================================================

#[test]
fn json_sample_deployment() {
    let content = serde_json::json!({
        "schedule": {"cron": "0 9 * * *"},
        "job": {
            "file-transfer": {
                "image": "registry.example.com/file-transfer:latest",
                "cpu": 1,
                "memory": 2048,
                "env": {"TRANSFER_MODE": "full"},
                "secrets": {"PORTAL_KEY": "arn:aws:secretsmanager:us-west-2:1:secret:portal-key"},
                "log_prefix": "file-transfer"
            }
        },
        "backend": {
            "endpoint": "https://batch.internal.example.com",
            "queue": "file-transfer-queue",
            "token_env": "CRONBELL_BACKEND_TOKEN"
        },
        "target": {
            "ops-slack": {"url": "https://hooks.example.com/services/T0/B0/x"}
        },
        "rule": {
            "notify-succeeded": {
                "match": {
                    "source": ["aws.batch"],
                    "detail_type": ["Batch Job State Change"],
                    "detail": {"status": ["SUCCEEDED"], "jobQueue": ["${job.queue}"]}
                },
                "notify": {
                    "ops-slack": {"payload": {"text": ":white_check_mark: *file-transfer succeeded* | ${detail.jobQueue}"}}
                }
            },
            "notify-failed": {
                "match": {
                    "source": ["aws.batch"],
                    "detail_type": ["Batch Job State Change"],
                    "detail": {"status": ["FAILED"], "jobQueue": ["${job.queue}"]}
                },
                "notify": {
                    "ops-slack": {"payload": {"text": ":x: *file-transfer failed* | ${detail.jobQueue}"}}
                }
            }
        }
    })
    .to_string();
    let config = super::parse_json(&content);
    assert_sample_deployment(&config);
}
