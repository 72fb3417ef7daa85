// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use cronbell_adapters::FakeTarget;
use serde_json::json;

fn context() -> RouterContext {
    RouterContext {
        job_name: "file-transfer".to_string(),
        queue: QueueId::new("Q1"),
    }
}

fn rule_def(name: &str, raw: serde_json::Value) -> (String, RuleDef) {
    let mut rule: RuleDef = serde_json::from_value(raw).unwrap();
    rule.name = name.to_string();
    (name.to_string(), rule)
}

fn targets_from(fakes: &[&FakeTarget]) -> HashMap<String, Arc<dyn NotifyTarget>> {
    fakes
        .iter()
        .map(|fake| {
            (
                fake.name().to_string(),
                Arc::new((*fake).clone()) as Arc<dyn NotifyTarget>,
            )
        })
        .collect()
}

fn succeeded_rule() -> (String, RuleDef) {
    rule_def(
        "notify-succeeded",
        json!({
            "match": {
                "source": ["batch"],
                "detail_type": ["JobStateChange"],
                "detail": {"status": ["SUCCEEDED"], "jobQueue": ["${job.queue}"]}
            },
            "notify": {
                "slack": {"payload": {"text": ":white_check_mark: ${job.name} | ${detail.jobQueue}"}}
            }
        }),
    )
}

fn failed_rule() -> (String, RuleDef) {
    rule_def(
        "notify-failed",
        json!({
            "match": {"detail": {"status": ["FAILED"], "jobQueue": ["${job.queue}"]}},
            "notify": {
                "slack": {"payload": {"text": ":x: ${job.name} | ${detail.jobQueue}"}}
            }
        }),
    )
}

fn succeeded_event() -> Event {
    Event::new("batch", "JobStateChange")
        .with_detail("status", "SUCCEEDED")
        .with_detail("jobQueue", "Q1")
}

fn build(rules: Vec<(String, RuleDef)>, fakes: &[&FakeTarget]) -> Router {
    Router::build(
        &rules.into_iter().collect(),
        &targets_from(fakes),
        &context(),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn matching_rule_delivers_rendered_payload() {
    let slack = FakeTarget::new("slack");
    let router = build(vec![succeeded_rule()], &[&slack]);

    let report = router.route(&succeeded_event()).await;

    assert_eq!(report.matched, vec!["notify-succeeded"]);
    assert_eq!(report.delivered_count(), 1);
    assert_eq!(report.failure_count(), 0);
    assert_eq!(
        slack.delivered(),
        vec![json!({"text": ":white_check_mark: file-transfer | Q1"})]
    );
}

#[tokio::test]
async fn non_matching_rule_delivers_nothing() {
    let slack = FakeTarget::new("slack");
    let router = build(vec![failed_rule()], &[&slack]);

    let report = router.route(&succeeded_event()).await;

    assert!(report.matched.is_empty());
    assert!(report.deliveries.is_empty());
    assert!(slack.delivered().is_empty());
}

#[tokio::test]
async fn absent_correlation_field_fails_closed() {
    let slack = FakeTarget::new("slack");
    let router = build(vec![succeeded_rule()], &[&slack]);

    let event = Event::new("batch", "JobStateChange").with_detail("status", "SUCCEEDED");
    let report = router.route(&event).await;

    assert!(report.matched.is_empty());
    assert!(slack.delivered().is_empty());
}

#[tokio::test]
async fn sibling_rules_fire_independently() {
    // Both rules are registered; only the matching one delivers.
    let slack = FakeTarget::new("slack");
    let router = build(vec![succeeded_rule(), failed_rule()], &[&slack]);

    let report = router.route(&succeeded_event()).await;
    assert_eq!(report.matched, vec!["notify-succeeded"]);
    assert_eq!(slack.delivered().len(), 1);
}

#[tokio::test]
async fn multiple_matching_rules_all_fire() {
    let slack = FakeTarget::new("slack");
    let audit = FakeTarget::new("audit");
    let terminal = rule_def(
        "notify-terminal",
        json!({
            "match": {"detail": {"status": ["SUCCEEDED", "FAILED"]}},
            "notify": {"audit": {"payload": {"text": "${detail.status} on ${rule.name}"}}}
        }),
    );
    let router = build(vec![succeeded_rule(), terminal], &[&slack, &audit]);

    let report = router.route(&succeeded_event()).await;

    assert_eq!(report.matched.len(), 2);
    assert_eq!(slack.delivered().len(), 1);
    assert_eq!(
        audit.delivered(),
        vec![json!({"text": "SUCCEEDED on notify-terminal"})]
    );
}

#[tokio::test]
async fn template_error_does_not_block_other_targets() {
    // One action references a field absent from the event; the other
    // action on the same rule still delivers.
    let slack = FakeTarget::new("slack");
    let audit = FakeTarget::new("audit");
    let rule = rule_def(
        "notify",
        json!({
            "match": {"detail": {"status": ["SUCCEEDED"]}},
            "notify": {
                "slack": {"payload": {"text": "${detail.missingField}"}},
                "audit": {"payload": {"text": "${detail.status}"}}
            }
        }),
    );
    let router = build(vec![rule], &[&slack, &audit]);

    let report = router.route(&succeeded_event()).await;

    assert_eq!(report.deliveries.len(), 2);
    assert_eq!(report.delivered_count(), 1);
    let template_failure = report
        .deliveries
        .iter()
        .find(|d| d.target == "slack")
        .unwrap();
    assert!(matches!(
        template_failure.outcome,
        DeliveryOutcome::Template(TemplateError::MissingField(_))
    ));
    assert!(slack.delivered().is_empty());
    assert_eq!(audit.delivered().len(), 1);
}

#[tokio::test]
async fn delivery_failure_is_isolated_per_target() {
    let slack = FakeTarget::new("slack");
    let audit = FakeTarget::new("audit");
    slack.fail_with("endpoint down");
    let rule = rule_def(
        "notify",
        json!({
            "match": {"detail": {"status": ["SUCCEEDED"]}},
            "notify": {
                "slack": {"payload": {"text": "${detail.status}"}},
                "audit": {"payload": {"text": "${detail.status}"}}
            }
        }),
    );
    let router = build(vec![rule], &[&slack, &audit]);

    let report = router.route(&succeeded_event()).await;

    assert_eq!(report.delivered_count(), 1);
    assert_eq!(report.failure_count(), 1);
    assert_eq!(audit.delivered().len(), 1);
}

#[tokio::test]
async fn failure_does_not_affect_later_events() {
    let slack = FakeTarget::new("slack");
    let router = build(vec![succeeded_rule()], &[&slack]);

    slack.fail_with("endpoint down");
    let first = router.route(&succeeded_event()).await;
    assert_eq!(first.failure_count(), 1);

    slack.recover();
    let second = router.route(&succeeded_event()).await;
    assert_eq!(second.delivered_count(), 1);
    assert_eq!(slack.delivered().len(), 1);
}

#[tokio::test]
async fn rendering_is_fresh_per_event() {
    let slack = FakeTarget::new("slack");
    let rule = rule_def(
        "notify",
        json!({
            "match": {"detail": {"status": ["SUCCEEDED", "FAILED"]}},
            "notify": {"slack": {"payload": {"text": "${detail.status}"}}}
        }),
    );
    let router = build(vec![rule], &[&slack]);

    router.route(&succeeded_event()).await;
    let failed = Event::new("batch", "JobStateChange")
        .with_detail("status", "FAILED")
        .with_detail("jobQueue", "Q1");
    router.route(&failed).await;

    assert_eq!(
        slack.delivered(),
        vec![json!({"text": "SUCCEEDED"}), json!({"text": "FAILED"})]
    );
}

#[tokio::test(start_paused = true)]
async fn slow_target_times_out_without_blocking_others() {
    struct StuckTarget;

    #[async_trait::async_trait]
    impl NotifyTarget for StuckTarget {
        async fn deliver(&self, _payload: &serde_json::Value) -> Result<(), DeliveryError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }

        fn kind(&self) -> &str {
            "stuck"
        }
    }

    let audit = FakeTarget::new("audit");
    let mut targets = targets_from(&[&audit]);
    targets.insert("stuck".to_string(), Arc::new(StuckTarget));

    let rule = rule_def(
        "notify",
        json!({
            "match": {"detail": {"status": ["SUCCEEDED"]}},
            "notify": {
                "stuck": {"payload": {"text": "x"}},
                "audit": {"payload": {"text": "y"}}
            }
        }),
    );
    let router = Router::build(
        &vec![rule].into_iter().collect(),
        &targets,
        &context(),
        Duration::from_secs(2),
    )
    .unwrap();

    let report = router.route(&succeeded_event()).await;

    assert_eq!(report.deliveries.len(), 2);
    let stuck = report.deliveries.iter().find(|d| d.target == "stuck").unwrap();
    assert!(matches!(
        stuck.outcome,
        DeliveryOutcome::Failed(DeliveryError::Timeout { .. })
    ));
    assert_eq!(audit.delivered().len(), 1);
}

#[test]
fn unknown_target_is_a_build_error() {
    let rule = rule_def(
        "notify",
        json!({
            "match": {"detail": {"status": ["SUCCEEDED"]}},
            "notify": {"pager": {"payload": {"text": "x"}}}
        }),
    );
    let err = Router::build(
        &vec![rule].into_iter().collect(),
        &HashMap::new(),
        &context(),
        Duration::from_secs(5),
    )
    .unwrap_err();
    match err {
        BuildError::UnknownTarget { rule, target } => {
            assert_eq!(rule, "notify");
            assert_eq!(target, "pager");
        }
        other => panic!("expected UnknownTarget, got: {other}"),
    }
}

#[test]
fn unresolvable_pattern_placeholder_is_a_build_error() {
    let slack = FakeTarget::new("slack");
    let rule = rule_def(
        "notify",
        json!({
            "match": {"detail": {"jobQueue": ["${cluster.arn}"]}},
            "notify": {"slack": {"payload": {"text": "x"}}}
        }),
    );
    let err = Router::build(
        &vec![rule].into_iter().collect(),
        &targets_from(&[&slack]),
        &context(),
        Duration::from_secs(5),
    )
    .unwrap_err();
    assert!(matches!(err, BuildError::Pattern { .. }));
}
