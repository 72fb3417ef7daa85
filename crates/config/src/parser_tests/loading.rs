// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File loading and format detection tests.

use super::*;
use std::io::Write;

const MINIMAL_TOML: &str = r#"
[schedule]
cron = "0 9 * * *"

[job.transfer]
image = "transfer:latest"
cpu = 1
memory = 2048

[backend]
endpoint = "https://batch.internal"
queue = "q1"
"#;

fn write_config(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[yare::parameterized(
    toml = { "cronbell.toml", Some(Format::Toml) },
    hcl  = { "cronbell.hcl", Some(Format::Hcl) },
    json = { "cronbell.json", Some(Format::Json) },
    conf = { "cronbell.conf", None },
    none = { "cronbell", None },
)]
fn format_detection(name: &str, expected: Option<Format>) {
    assert_eq!(Format::from_path(std::path::Path::new(name)), expected);
}

#[test]
fn loads_toml_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "deploy.toml", MINIMAL_TOML);
    let config = load_config(&path).unwrap();
    assert_eq!(config.schedule.cron, "0 9 * * *");
}

#[test]
fn loads_hcl_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let content = r#"
schedule {
  cron = "30 6 * * 1"
}

job "sync" {
  image  = "sync:latest"
  cpu    = 2
  memory = 1024
}

backend {
  endpoint = "https://batch.internal"
  queue    = "sync-queue"
}
"#;
    let path = write_config(&dir, "deploy.hcl", content);
    let config = load_config(&path).unwrap();
    assert_eq!(config.schedule.cron, "30 6 * * 1");
    assert_eq!(config.job().unwrap().name, "sync");
}

#[test]
fn unknown_extension_is_rejected() {
    let err = load_config(std::path::Path::new("/tmp/deploy.yaml")).unwrap_err();
    assert!(matches!(err, LoadError::UnknownFormat(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_config(std::path::Path::new("/nonexistent/deploy.toml")).unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}

#[test]
fn parse_errors_surface_through_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "deploy.toml", "schedule = not toml");
    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, LoadError::Parse(_)));
}
