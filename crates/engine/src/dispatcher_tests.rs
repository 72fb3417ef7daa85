// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use cronbell_adapters::FakeComputeBackend;

fn description() -> JobDescription {
    let mut desc: JobDescription = serde_json::from_value(serde_json::json!({
        "image": "transfer:latest",
        "cpu": 1,
        "memory": 2048
    }))
    .unwrap();
    desc.name = "transfer".to_string();
    desc
}

#[tokio::test]
async fn submits_the_description_unchanged() {
    let backend = FakeComputeBackend::new("q1");
    let dispatcher = Dispatcher::new(backend.clone(), description(), Duration::from_secs(5));

    let handle = dispatcher.submit().await.unwrap();
    assert_eq!(handle.queue, "q1");
    assert_eq!(backend.submissions(), vec![description()]);
}

#[tokio::test]
async fn each_firing_submits_independently() {
    // Duplicate firings produce duplicate jobs: no dedup window.
    let backend = FakeComputeBackend::new("q1");
    let dispatcher = Dispatcher::new(backend.clone(), description(), Duration::from_secs(5));

    let first = dispatcher.submit().await.unwrap();
    let second = dispatcher.submit().await.unwrap();
    assert_ne!(first.job_id, second.job_id);
    assert_eq!(backend.submissions().len(), 2);
}

#[tokio::test]
async fn rejection_is_terminal_for_the_firing() {
    let backend = FakeComputeBackend::new("q1");
    backend.reject_with("invalid resource request");
    let dispatcher = Dispatcher::new(backend.clone(), description(), Duration::from_secs(5));

    let err = dispatcher.submit().await.unwrap_err();
    assert!(matches!(err, DispatchError::Rejected { .. }));

    // No retry happened: the backend saw nothing.
    assert!(backend.submissions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn slow_backend_times_out() {
    let backend = FakeComputeBackend::new("q1");
    backend.delay(Duration::from_secs(60));
    let dispatcher = Dispatcher::new(backend, description(), Duration::from_secs(10));

    let err = dispatcher.submit().await.unwrap_err();
    match err {
        DispatchError::Timeout { after } => assert_eq!(after, Duration::from_secs(10)),
        other => panic!("expected Timeout, got: {other:?}"),
    }
}

#[tokio::test]
async fn failure_then_success_across_firings() {
    // A failed firing never blocks the next one.
    let backend = FakeComputeBackend::new("q1");
    let dispatcher = Dispatcher::new(backend.clone(), description(), Duration::from_secs(5));

    backend.reject_with("queue unavailable");
    assert!(dispatcher.submit().await.is_err());

    backend.recover();
    assert!(dispatcher.submit().await.is_ok());
    assert_eq!(backend.submissions().len(), 1);
}
