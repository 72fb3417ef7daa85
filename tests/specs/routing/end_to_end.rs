// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end routing over the demo deployment's rules, with fake targets
//! standing in for the Slack webhook.

use crate::prelude::demo_config;
use cronbell_adapters::{FakeComputeBackend, FakeTarget, NotifyTarget};
use cronbell_config::load_config;
use cronbell_core::{Clock, Event, FakeClock, JobStatus, QueueId};
use cronbell_engine::{CronScheduler, Dispatcher, Router, RouterContext};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

fn demo_router() -> (Router, FakeTarget) {
    let config = load_config(&demo_config()).unwrap();
    let slack = FakeTarget::new("staging-slack");
    let targets: HashMap<String, Arc<dyn NotifyTarget>> = HashMap::from([(
        "staging-slack".to_string(),
        Arc::new(slack.clone()) as Arc<dyn NotifyTarget>,
    )]);
    let job = config.job().unwrap();
    let context = RouterContext {
        job_name: job.name.clone(),
        queue: QueueId::new(config.backend.queue.clone()),
    };
    let router = Router::build(&config.rules, &targets, &context, Duration::from_secs(5)).unwrap();
    (router, slack)
}

fn state_change(status: &str, queue: &str) -> Event {
    Event::new("aws.batch", "Batch Job State Change")
        .with_detail("status", status)
        .with_detail("jobQueue", queue)
}

#[tokio::test]
async fn succeeded_run_notifies_slack() {
    let (router, slack) = demo_router();

    let report = router
        .route(&state_change("SUCCEEDED", "FileTransferJobQueue"))
        .await;

    assert_eq!(report.matched, vec!["notify-succeeded"]);
    assert_eq!(report.delivered_count(), 1);
    let delivered = slack.delivered();
    assert_eq!(delivered.len(), 1);
    let text = delivered[0]["text"].as_str().unwrap();
    assert!(text.contains(":white_check_mark:"), "got: {text}");
    assert!(text.contains("file-transfer"));
    assert!(text.contains("FileTransferJobQueue"));
}

#[tokio::test]
async fn failed_run_notifies_slack_with_failure_marker() {
    let (router, slack) = demo_router();

    let report = router
        .route(&state_change("FAILED", "FileTransferJobQueue"))
        .await;

    assert_eq!(report.matched, vec!["notify-failed"]);
    let text = slack.delivered()[0]["text"].as_str().unwrap().to_string();
    assert!(text.contains(":x:"), "got: {text}");
}

#[tokio::test]
async fn intermediate_states_are_ignored() {
    let (router, slack) = demo_router();

    for status in ["SUBMITTED", "PENDING", "RUNNABLE", "STARTING", "RUNNING"] {
        let report = router
            .route(&state_change(status, "FileTransferJobQueue"))
            .await;
        assert!(report.matched.is_empty(), "{status} should not match");
    }
    assert!(slack.delivered().is_empty());
}

#[tokio::test]
async fn other_queues_are_ignored() {
    let (router, slack) = demo_router();

    let report = router.route(&state_change("SUCCEEDED", "SomeOtherQueue")).await;

    assert!(report.matched.is_empty());
    assert!(slack.delivered().is_empty());
}

#[tokio::test]
async fn events_missing_the_queue_field_are_ignored() {
    let (router, slack) = demo_router();

    let event =
        Event::new("aws.batch", "Batch Job State Change").with_detail("status", "SUCCEEDED");
    let report = router.route(&event).await;

    assert!(report.matched.is_empty());
    assert!(slack.delivered().is_empty());
}

#[tokio::test]
async fn firing_to_notification_full_loop() {
    // Schedule fires -> job submits -> backend reports SUCCEEDED -> the
    // success rule delivers, all against the demo deployment.
    let config = load_config(&demo_config()).unwrap();
    let (router, slack) = demo_router();

    let clock = FakeClock::at(
        chrono::DateTime::parse_from_rfc3339("2026-08-06T08:59:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc),
    );
    let spec = config.schedule_spec().unwrap();
    let mut scheduler = CronScheduler::new(spec, clock.now());

    let backend = FakeComputeBackend::new(config.backend.queue.clone());
    let dispatcher = Dispatcher::new(
        backend.clone(),
        config.job().unwrap().clone(),
        Duration::from_secs(5),
    );

    // 09:00 arrives.
    clock.advance(Duration::from_secs(60));
    let firing = scheduler.poll(clock.now()).expect("schedule should fire at 09:00");
    assert_eq!(firing.due_at.to_rfc3339(), "2026-08-06T09:00:00+00:00");

    let handle = dispatcher.submit().await.unwrap();
    assert_eq!(handle.queue, "FileTransferJobQueue");

    let event = FakeComputeBackend::state_change(&handle, JobStatus::Succeeded);
    let report = router.route(&event).await;

    assert_eq!(report.matched, vec!["notify-succeeded"]);
    let text = slack.delivered()[0]["text"].as_str().unwrap().to_string();
    assert!(text.contains("file-transfer succeeded"), "got: {text}");
    assert!(text.contains("FileTransferJobQueue"));
}

#[tokio::test]
async fn dispatch_failure_leaves_the_schedule_armed() {
    // A rejected submission is terminal for its firing; the next instant
    // still fires.
    let config = load_config(&demo_config()).unwrap();
    let clock = FakeClock::at(
        chrono::DateTime::parse_from_rfc3339("2026-08-06T08:59:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc),
    );
    let mut scheduler = CronScheduler::new(config.schedule_spec().unwrap(), clock.now());

    let backend = FakeComputeBackend::new(config.backend.queue.clone());
    backend.reject_with("queue unavailable");
    let dispatcher = Dispatcher::new(
        backend,
        config.job().unwrap().clone(),
        Duration::from_secs(5),
    );

    clock.advance(Duration::from_secs(60));
    assert!(scheduler.poll(clock.now()).is_some());
    assert!(dispatcher.submit().await.is_err());

    // Tomorrow's firing is unaffected by today's failure.
    assert_eq!(
        scheduler
            .next_deadline()
            .map(|t| t.to_rfc3339()),
        Some("2026-08-07T09:00:00+00:00".to_string())
    );
    clock.advance(Duration::from_secs(24 * 60 * 60));
    assert!(scheduler.poll(clock.now()).is_some());
}

#[tokio::test]
async fn foreign_sources_are_ignored() {
    let (router, slack) = demo_router();

    let event = Event::new("aws.ec2", "Batch Job State Change")
        .with_detail("status", "SUCCEEDED")
        .with_detail("jobQueue", "FileTransferJobQueue");
    let report = router.route(&event).await;

    assert!(report.matched.is_empty());
    assert!(slack.delivered().is_empty());
}
