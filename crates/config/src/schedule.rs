// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cron schedule parsing and calendar matching.
//!
//! Standard 5-field cron: minute, hour, day-of-month, month, day-of-week.
//! Each field is `*`, a literal, a range `a-b`, a step (`*/n`, `a-b/n`),
//! or a comma list of those. When both day fields are restricted, the day
//! matches if either does (Vixie OR); otherwise restricted fields combine
//! by AND. Day-of-week runs 0–6 with Sunday as 0 (7 also accepted as
//! Sunday).

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from cron expression parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("expected 5 fields (minute hour day month weekday), got {0}")]
    FieldCount(usize),

    #[error("invalid {field} field '{text}': {reason}")]
    InvalidField {
        field: &'static str,
        text: String,
        reason: String,
    },
}

/// One cron field.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CronField {
    /// `*`: any value.
    Any,
    /// Sorted, deduplicated value set expanded from literals, lists,
    /// ranges, and steps.
    Values(Vec<u8>),
}

impl CronField {
    fn matches(&self, value: u8) -> bool {
        match self {
            CronField::Any => true,
            CronField::Values(values) => values.binary_search(&value).is_ok(),
        }
    }

    fn is_restricted(&self) -> bool {
        matches!(self, CronField::Values(_))
    }
}

struct FieldSpec {
    name: &'static str,
    min: u8,
    max: u8,
}

const MINUTE: FieldSpec = FieldSpec {
    name: "minute",
    min: 0,
    max: 59,
};
const HOUR: FieldSpec = FieldSpec {
    name: "hour",
    min: 0,
    max: 23,
};
const DAY_OF_MONTH: FieldSpec = FieldSpec {
    name: "day",
    min: 1,
    max: 31,
};
const MONTH: FieldSpec = FieldSpec {
    name: "month",
    min: 1,
    max: 12,
};
const DAY_OF_WEEK: FieldSpec = FieldSpec {
    name: "weekday",
    min: 0,
    max: 7,
};

/// A parsed 5-field cron expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSpec {
    expr: String,
    minute: CronField,
    hour: CronField,
    day_of_month: CronField,
    month: CronField,
    day_of_week: CronField,
}

impl FromStr for ScheduleSpec {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(ScheduleError::FieldCount(fields.len()));
        }
        let mut day_of_week = parse_field(fields[4], &DAY_OF_WEEK)?;
        if let CronField::Values(values) = &mut day_of_week {
            // 7 is an alias for Sunday.
            for v in values.iter_mut() {
                *v %= 7;
            }
            values.sort_unstable();
            values.dedup();
        }
        Ok(ScheduleSpec {
            expr: fields.join(" "),
            minute: parse_field(fields[0], &MINUTE)?,
            hour: parse_field(fields[1], &HOUR)?,
            day_of_month: parse_field(fields[2], &DAY_OF_MONTH)?,
            month: parse_field(fields[3], &MONTH)?,
            day_of_week,
        })
    }
}

impl fmt::Display for ScheduleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

impl ScheduleSpec {
    /// True when `t` matches the expression (second-of-minute ignored).
    pub fn matches<Tz: TimeZone>(&self, t: &DateTime<Tz>) -> bool {
        self.minute.matches(t.minute() as u8)
            && self.hour.matches(t.hour() as u8)
            && self.month.matches(t.month() as u8)
            && self.day_matches(t.day() as u8, t.weekday().num_days_from_sunday() as u8)
    }

    fn day_matches(&self, day_of_month: u8, day_of_week: u8) -> bool {
        if self.day_of_month.is_restricted() && self.day_of_week.is_restricted() {
            // Vixie OR: when both day fields are restricted, either suffices.
            self.day_of_month.matches(day_of_month) || self.day_of_week.matches(day_of_week)
        } else {
            self.day_of_month.matches(day_of_month) && self.day_of_week.matches(day_of_week)
        }
    }

    /// Next matching instant strictly after `t`, at minute resolution.
    ///
    /// Returns `None` when the expression cannot match within four years
    /// (e.g. `0 0 30 2 *`).
    pub fn next_after<Tz: TimeZone>(&self, t: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let mut probe = floor_to_minute(t) + Duration::minutes(1);
        let horizon = t.clone() + Duration::days(4 * 366);
        while probe <= horizon {
            let day_ok = self.month.matches(probe.month() as u8)
                && self.day_matches(
                    probe.day() as u8,
                    probe.weekday().num_days_from_sunday() as u8,
                );
            if !day_ok {
                // Skip ahead to (around) the next midnight. Across a DST
                // transition this lands somewhere inside the next day,
                // which the loop re-checks anyway.
                let minutes_left = (24 * 60) - i64::from(probe.hour() * 60 + probe.minute());
                probe += Duration::minutes(minutes_left.max(1));
                continue;
            }
            if self.minute.matches(probe.minute() as u8) && self.hour.matches(probe.hour() as u8)
            {
                return Some(probe);
            }
            probe += Duration::minutes(1);
        }
        None
    }
}

fn floor_to_minute<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Tz> {
    let secs = i64::from(t.second());
    let nanos = i64::from(t.nanosecond() % 1_000_000_000);
    t.clone() - Duration::seconds(secs) - Duration::nanoseconds(nanos)
}

fn parse_field(text: &str, spec: &FieldSpec) -> Result<CronField, ScheduleError> {
    if text == "*" {
        return Ok(CronField::Any);
    }
    let mut values = Vec::new();
    for part in text.split(',') {
        expand_part(part, spec, &mut values)?;
    }
    values.sort_unstable();
    values.dedup();
    Ok(CronField::Values(values))
}

fn expand_part(part: &str, spec: &FieldSpec, out: &mut Vec<u8>) -> Result<(), ScheduleError> {
    let err = |reason: String| ScheduleError::InvalidField {
        field: spec.name,
        text: part.to_string(),
        reason,
    };

    let (range_text, step) = match part.split_once('/') {
        Some((range, step_text)) => {
            let step: u8 = step_text
                .parse()
                .map_err(|_| err(format!("bad step '{step_text}'")))?;
            if step == 0 {
                return Err(err("step must be nonzero".to_string()));
            }
            (range, step)
        }
        None => (part, 1),
    };

    let (lo, hi) = if range_text == "*" {
        (spec.min, spec.max)
    } else if let Some((a, b)) = range_text.split_once('-') {
        let lo = parse_value(a, spec).map_err(err)?;
        let hi = parse_value(b, spec).map_err(err)?;
        if lo > hi {
            return Err(err(format!("range {lo}-{hi} is inverted")));
        }
        (lo, hi)
    } else {
        let v = parse_value(range_text, spec).map_err(err)?;
        // A bare value with a step ("5/15") means "from 5 to max", per
        // Vixie cron.
        if step > 1 {
            (v, spec.max)
        } else {
            (v, v)
        }
    };

    let mut v = lo;
    while v <= hi {
        out.push(v);
        v = match v.checked_add(step) {
            Some(next) => next,
            None => break,
        };
    }
    Ok(())
}

fn parse_value(text: &str, spec: &FieldSpec) -> Result<u8, String> {
    let v: u8 = text
        .parse()
        .map_err(|_| format!("'{text}' is not a number"))?;
    if v < spec.min || v > spec.max {
        return Err(format!(
            "{v} is out of range {}-{}",
            spec.min, spec.max
        ));
    }
    Ok(v)
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
