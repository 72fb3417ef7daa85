// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! cronbell daemon (cronbelld)
//!
//! Runs one deployment: fires the cron schedule, submits the batch job to
//! the compute backend, and routes the backend's state-change events to
//! notification targets.
//!
//! Architecture:
//! - Ingest task: accepts the backend's event stream, feeds the EventBus
//! - Engine loop: routes events and polls the schedule; each firing and
//!   each event is handled on its own task so nothing stalls the timer

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use clap::Parser;
use cronbell_core::{Clock, SystemClock};
use cronbell_daemon::{event_bus, lifecycle, Ingest};
use tokio::signal::unix::{signal, SignalKind};
use tracing::info;

/// Events buffered between ingest and the engine loop.
const EVENT_BUS_CAPACITY: usize = 256;

#[derive(Parser)]
#[command(
    name = "cronbelld",
    version,
    about = "Scheduled batch-job orchestration with event-routed notifications"
)]
struct Args {
    /// Deployment config file (.hcl, .toml, or .json)
    #[arg(short, long)]
    config: PathBuf,

    /// Parse and validate the config, then exit
    #[arg(long)]
    validate: bool,

    /// Override the ingest listen address from config
    #[arg(long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_logging();

    let config = cronbell_config::load_config(&args.config)?;
    if args.validate {
        let job = config.job().map(|j| j.name.clone()).unwrap_or_default();
        println!(
            "config ok: job '{}', schedule \"{}\", {} rule(s), {} target(s)",
            job,
            config.schedule.cron,
            config.rules.len(),
            config.targets.len()
        );
        return Ok(());
    }

    let clock = SystemClock;
    let mut daemon = lifecycle::build(&config, clock.now().with_timezone(&Local))?;
    if let Some(listen) = args.listen {
        daemon.listen = listen;
    }

    let (bus, mut events) = event_bus::event_bus(EVENT_BUS_CAPACITY);
    let ingest = Ingest::bind(&daemon.listen, bus).await?;
    info!(addr = %ingest.local_addr()?, "event ingest listening");
    tokio::spawn(ingest.run());

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    // Schedule check interval (1-second resolution)
    // NOTE: Must be created outside the loop - tokio::select! re-evaluates
    // branches on each iteration, so using sleep() inside would reset on
    // every event and the schedule would never fire during activity.
    let mut tick = tokio::time::interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            maybe_event = events.recv() => {
                match maybe_event {
                    Some(event) => {
                        let router = Arc::clone(&daemon.router);
                        tokio::spawn(async move {
                            let report = router.route(&event).await;
                            if !report.matched.is_empty() {
                                info!(
                                    event = %event.log_summary(),
                                    matched = report.matched.len(),
                                    delivered = report.delivered_count(),
                                    failed = report.failure_count(),
                                    "event routed"
                                );
                            }
                        });
                    }
                    None => {
                        info!("event bus closed, shutting down");
                        break;
                    }
                }
            }

            _ = tick.tick() => {
                let now = clock.now().with_timezone(&Local);
                if let Some(firing) = daemon.scheduler.poll(now) {
                    info!(due = %firing.due_at, "schedule fired");
                    let dispatcher = Arc::clone(&daemon.dispatcher);
                    tokio::spawn(async move {
                        // Outcome is logged by the dispatcher; a failed
                        // submission is terminal for this firing and never
                        // touches the timer.
                        let _ = dispatcher.submit().await;
                    });
                }
            }

            _ = sigterm.recv() => {
                info!("received SIGTERM, shutting down");
                break;
            }

            _ = sigint.recv() => {
                info!("received SIGINT, shutting down");
                break;
            }
        }
    }

    info!("daemon stopped");
    Ok(())
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Containerized deployment: structured logs to stdout, filtered by
    // RUST_LOG when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}
