//! Derived metrics computed from lower-level upstream fields.
//!
//! Some candidate endpoints report streaks and acceptance rate directly;
//! others only expose a submission calendar and raw submission counts.
//! These helpers fill the gap with a single definition of each metric so
//! every candidate produces comparable numbers.

use std::collections::BTreeMap;

use serde_json::Value;

/// Per-day activity counts, keyed by UTC day index (days since the unix epoch).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityCalendar {
    days: BTreeMap<u64, u64>,
}

impl ActivityCalendar {
    /// Build from `(unix_seconds, count)` pairs. Timestamps falling on the
    /// same UTC day are summed.
    pub fn from_timestamps<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (u64, u64)>,
    {
        let mut days = BTreeMap::new();
        for (secs, count) in entries {
            *days.entry(secs / 86_400).or_insert(0) += count;
        }
        Self { days }
    }

    /// Build from `(day_index, count)` pairs.
    pub fn from_days<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (u64, u64)>,
    {
        let mut days = BTreeMap::new();
        for (day, count) in entries {
            *days.entry(day).or_insert(0) += count;
        }
        Self { days }
    }

    /// Parse an upstream submission calendar.
    ///
    /// Accepts a JSON object of `"<unix seconds>": count`, or the same object
    /// JSON-encoded inside a string. Keys or counts that are not
    /// non-negative integers are skipped. Returns `None` for any other shape.
    pub fn parse(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self::from_timestamps(map.iter().filter_map(
                |(key, count)| Some((key.trim().parse::<u64>().ok()?, count.as_u64()?)),
            ))),
            Value::String(encoded) => match serde_json::from_str::<Value>(encoded) {
                Ok(inner @ Value::Object(_)) => Self::parse(&inner),
                _ => None,
            },
            _ => None,
        }
    }

    /// Activity recorded on `day` (0 when absent).
    pub fn count_on(&self, day: u64) -> u64 {
        self.days.get(&day).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.days.values().all(|&c| c == 0)
    }

    /// Consecutive active days ending at `today`.
    ///
    /// Walks backward from `today`, stopping at the first day that is
    /// missing or has a zero count. No activity today means a streak of 0.
    pub fn current_streak(&self, today: u64) -> u32 {
        let mut streak = 0u32;
        let mut day = today;
        while self.count_on(day) > 0 {
            streak += 1;
            match day.checked_sub(1) {
                Some(prev) => day = prev,
                None => break,
            }
        }
        streak
    }

    /// Longest run of consecutive active days anywhere in the calendar.
    pub fn longest_streak(&self) -> u32 {
        let mut longest = 0u32;
        let mut run = 0u32;
        let mut previous: Option<u64> = None;
        for (&day, _) in self.days.iter().filter(|(_, count)| **count > 0) {
            run = match previous {
                Some(prev) if prev + 1 == day => run + 1,
                _ => 1,
            };
            longest = longest.max(run);
            previous = Some(day);
        }
        longest
    }
}

/// Round to one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    if value.is_finite() {
        (value * 10.0).round() / 10.0
    } else {
        0.0
    }
}

/// Accepted percentage: `solved / attempted * 100`, one decimal place.
///
/// Zero attempts yields `0.0`.
pub fn acceptance_rate(solved: u64, attempted: u64) -> f64 {
    if attempted == 0 {
        return 0.0;
    }
    round_one_decimal(solved as f64 / attempted as f64 * 100.0)
}
