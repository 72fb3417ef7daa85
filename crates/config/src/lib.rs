// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Deployment-time configuration: schedule, job, rules, and targets.
//!
//! A deployment is described once, in an HCL, TOML, or JSON document, and
//! loaded immutably at startup. Nothing here changes at runtime.

mod duration;
mod parser;
mod rule;
mod schedule;
mod target;
mod template;

pub use duration::{parse_duration, DurationError};
pub use parser::{
    load_config, parse_config, parse_config_with_format, BackendDef, Config, Format, LoadError,
    ParseError, ScheduleDef, Settings,
};
pub use rule::{NotifyDef, PayloadTemplate, RuleDef};
pub use schedule::{ScheduleError, ScheduleSpec};
pub use target::TargetDef;
pub use template::{render, render_payload, TemplateError, VAR_PATTERN};
