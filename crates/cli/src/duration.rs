// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Human-friendly durations in config files: `500ms`, `30s`, `15m`, `7d`.

use serde::{Deserialize, Deserializer};
use std::time::Duration;

use crate::error::{Error, Result};

const UNITS: &str = "ms, s, m, h, d, w";

/// Parses `<number><unit>` where unit is one of `ms, s, m, h, d, w`.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return Err(Error::InvalidDuration { reason: "empty duration".to_string() });
    }

    let (num_str, unit) = split_number_unit(s)?;
    let num: u64 = num_str.parse().map_err(|_| Error::InvalidDuration {
        reason: format!("invalid number in duration: '{num_str}'"),
    })?;

    let secs = |per: u64| Duration::from_secs(num.saturating_mul(per));
    match unit {
        "ms" => Ok(Duration::from_millis(num)),
        "s" => Ok(secs(1)),
        "m" => Ok(secs(60)),
        "h" => Ok(secs(3_600)),
        "d" => Ok(secs(86_400)),
        "w" => Ok(secs(604_800)),
        _ => Err(Error::InvalidDuration {
            reason: format!("unknown duration unit '{unit}'. Valid units: {UNITS}"),
        }),
    }
}

/// Split a duration string into number and unit parts.
fn split_number_unit(s: &str) -> Result<(&str, &str)> {
    let num_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());

    if num_end == 0 {
        let reason = if s.starts_with('-') {
            "negative durations are not allowed".to_string()
        } else {
            format!("duration must start with a number: '{s}'")
        };
        return Err(Error::InvalidDuration { reason });
    }

    let (num_str, unit) = s.split_at(num_end);
    if unit.is_empty() {
        return Err(Error::InvalidDuration {
            reason: format!("duration missing unit: '{s}'. Valid units: {UNITS}"),
        });
    }

    Ok((num_str, unit))
}

/// Serde adapter for duration fields.
pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_duration(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
#[path = "duration_tests.rs"]
mod tests;
