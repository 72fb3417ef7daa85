// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative event routing.
//!
//! The router holds the deployment's fixed rule set. Every incoming event
//! is evaluated against every rule; for each match, the rule's payload
//! templates render fresh against the event plus static rule context, and
//! the rendered payloads fan out to the rule's targets concurrently. A
//! failure on one (rule, target) pair never blocks the others, and nothing
//! is retried.

use crate::error::BuildError;
use crate::vars;
use cronbell_adapters::{DeliveryError, NotifyTarget};
use cronbell_config::{render, render_payload, PayloadTemplate, RuleDef, TemplateError};
use cronbell_core::{Event, EventPattern, QueueId};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Static deployment context exposed to rules and templates.
#[derive(Debug, Clone)]
pub struct RouterContext {
    /// Deployed job name (`${job.name}`).
    pub job_name: String,
    /// Queue accepting submissions (`${job.queue}`).
    pub queue: QueueId,
}

struct Action {
    target_name: String,
    target: Arc<dyn NotifyTarget>,
    payload: PayloadTemplate,
}

struct CompiledRule {
    name: String,
    pattern: EventPattern,
    static_vars: HashMap<String, String>,
    actions: Vec<Action>,
}

/// Outcome of one (rule, target) delivery attempt.
#[derive(Debug)]
pub enum DeliveryOutcome {
    Delivered,
    /// Payload rendering referenced a field absent from the event; nothing
    /// was sent.
    Template(TemplateError),
    /// The target reported a failure (or timed out); the payload is
    /// dropped.
    Failed(DeliveryError),
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered)
    }
}

/// One attempted delivery, for observability.
#[derive(Debug)]
pub struct DeliveryRecord {
    pub rule: String,
    pub target: String,
    pub outcome: DeliveryOutcome,
}

/// Everything that happened while routing one event.
#[derive(Debug, Default)]
pub struct RouteReport {
    /// Names of rules whose pattern matched.
    pub matched: Vec<String>,
    /// One record per attempted (rule, target) pair, in no guaranteed
    /// order.
    pub deliveries: Vec<DeliveryRecord>,
}

impl RouteReport {
    pub fn delivered_count(&self) -> usize {
        self.deliveries
            .iter()
            .filter(|d| d.outcome.is_delivered())
            .count()
    }

    pub fn failure_count(&self) -> usize {
        self.deliveries.len() - self.delivered_count()
    }
}

/// The deployment's fixed rule set.
pub struct Router {
    rules: Vec<CompiledRule>,
    deliver_timeout: Duration,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("rules", &self.rules.len())
            .field("deliver_timeout", &self.deliver_timeout)
            .finish()
    }
}

impl Router {
    /// Compile the rule set once, at startup.
    ///
    /// Static context is interpolated into pattern literals here; payload
    /// templates keep their placeholders for per-event rendering. Unknown
    /// target references and unresolvable pattern placeholders are build
    /// errors.
    pub fn build(
        rules: &IndexMap<String, RuleDef>,
        targets: &HashMap<String, Arc<dyn NotifyTarget>>,
        context: &RouterContext,
        deliver_timeout: Duration,
    ) -> Result<Self, BuildError> {
        let mut compiled = Vec::with_capacity(rules.len());
        for (rule_name, rule) in rules {
            let static_vars = vars::static_vars(&context.job_name, &context.queue, rule_name);
            let pattern = rule
                .pattern
                .map_literals(|text| render(text, &static_vars))
                .map_err(|source| BuildError::Pattern {
                    rule: rule_name.clone(),
                    source,
                })?;

            let mut actions = Vec::with_capacity(rule.notify.len());
            for (target_name, notify) in &rule.notify {
                let target =
                    targets
                        .get(target_name)
                        .cloned()
                        .ok_or_else(|| BuildError::UnknownTarget {
                            rule: rule_name.clone(),
                            target: target_name.clone(),
                        })?;
                actions.push(Action {
                    target_name: target_name.clone(),
                    target,
                    payload: notify.payload.clone(),
                });
            }

            compiled.push(CompiledRule {
                name: rule_name.clone(),
                pattern,
                static_vars,
                actions,
            });
        }
        Ok(Self {
            rules: compiled,
            deliver_timeout,
        })
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Route one event through every rule.
    ///
    /// Rendering happens before any I/O; deliveries for all matched rules
    /// run concurrently, each bounded by the deliver timeout. Failures are
    /// logged and recorded, never propagated.
    pub async fn route(&self, event: &Event) -> RouteReport {
        let mut report = RouteReport::default();
        let event_vars = vars::event_vars(event);
        let mut deliveries: JoinSet<DeliveryRecord> = JoinSet::new();

        for rule in &self.rules {
            if !rule.pattern.matches(event) {
                continue;
            }
            tracing::debug!(rule = %rule.name, event = %event.log_summary(), "rule matched");
            report.matched.push(rule.name.clone());

            let mut render_vars = event_vars.clone();
            render_vars.extend(rule.static_vars.clone());

            for action in &rule.actions {
                match render_payload(&action.payload, &render_vars) {
                    Ok(payload) => {
                        let target = Arc::clone(&action.target);
                        let timeout = self.deliver_timeout;
                        let rule_name = rule.name.clone();
                        let target_name = action.target_name.clone();
                        deliveries.spawn(async move {
                            let outcome =
                                match tokio::time::timeout(timeout, target.deliver(&payload)).await
                                {
                                    Ok(Ok(())) => DeliveryOutcome::Delivered,
                                    Ok(Err(e)) => {
                                        tracing::warn!(
                                            rule = %rule_name,
                                            target = %target_name,
                                            error = %e,
                                            "notification delivery failed"
                                        );
                                        DeliveryOutcome::Failed(e)
                                    }
                                    Err(_) => {
                                        tracing::warn!(
                                            rule = %rule_name,
                                            target = %target_name,
                                            timeout = ?timeout,
                                            "notification delivery timed out"
                                        );
                                        DeliveryOutcome::Failed(DeliveryError::Timeout {
                                            after: timeout,
                                        })
                                    }
                                };
                            DeliveryRecord {
                                rule: rule_name,
                                target: target_name,
                                outcome,
                            }
                        });
                    }
                    Err(e) => {
                        // Rendering failures are local to this pair; the
                        // remaining rules and targets still run.
                        tracing::warn!(
                            rule = %rule.name,
                            target = %action.target_name,
                            error = %e,
                            "payload rendering failed"
                        );
                        report.deliveries.push(DeliveryRecord {
                            rule: rule.name.clone(),
                            target: action.target_name.clone(),
                            outcome: DeliveryOutcome::Template(e),
                        });
                    }
                }
            }
        }

        while let Some(joined) = deliveries.join_next().await {
            match joined {
                Ok(record) => report.deliveries.push(record),
                Err(e) => tracing::error!(error = %e, "delivery task failed to join"),
            }
        }
        report
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
