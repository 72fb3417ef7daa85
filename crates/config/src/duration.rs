// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Duration string parsing for config timeouts.

use std::time::Duration;
use thiserror::Error;

/// Errors from duration string parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationError {
    #[error("empty duration")]
    Empty,

    #[error("invalid duration '{0}': expected digits with s/m/h/d units (e.g. \"30s\", \"1h30m\")")]
    Invalid(String),
}

/// Parse a duration string like `"30s"`, `"5m"`, `"2h"`, `"1d"`, or a
/// combination (`"1h30m"`). A bare number is seconds.
pub fn parse_duration(s: &str) -> Result<Duration, DurationError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(DurationError::Empty);
    }

    let mut total_secs: u64 = 0;
    let mut digits = String::new();
    let mut saw_unit = false;

    for ch in trimmed.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        if digits.is_empty() {
            return Err(DurationError::Invalid(s.to_string()));
        }
        let n: u64 = digits
            .parse()
            .map_err(|_| DurationError::Invalid(s.to_string()))?;
        digits.clear();
        let unit_secs = match ch {
            's' => 1,
            'm' => 60,
            'h' => 3_600,
            'd' => 86_400,
            _ => return Err(DurationError::Invalid(s.to_string())),
        };
        total_secs += n * unit_secs;
        saw_unit = true;
    }

    if !digits.is_empty() {
        if saw_unit {
            // Trailing digits after a unit ("1h30") are ambiguous.
            return Err(DurationError::Invalid(s.to_string()));
        }
        let n: u64 = digits
            .parse()
            .map_err(|_| DurationError::Invalid(s.to_string()))?;
        total_secs = n;
    }

    Ok(Duration::from_secs(total_secs))
}

#[cfg(test)]
#[path = "duration_tests.rs"]
mod tests;
