//! Slot generation — weekly cadence to concrete post slots.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use postaja_core::{SlotTime, Weekday};

/// Default planning horizon: one week.
pub const DEFAULT_HORIZON_DAYS: u32 = 7;

/// A single schedulable (date, time) point for one post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub date: NaiveDate,
    pub time: SlotTime,
}

impl Slot {
    pub fn new(date: NaiveDate, time: SlotTime) -> Self {
        Self { date, time }
    }

    /// The slot as an instant; store wall time is taken as UTC.
    pub fn starts_at(&self) -> DateTime<Utc> {
        self.date.and_time(self.time.time()).and_utc()
    }

    pub fn weekday(&self) -> Weekday {
        Weekday::from_chrono(self.date.weekday())
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.weekday(), self.date, self.time)
    }
}

/// Generate every slot in the horizon, sorted by (date, time).
///
/// Covers `horizon_days` calendar days starting at `horizon_start`
/// inclusive. Empty `days` or `times` yield no slots.
pub fn generate_slots(
    days: &BTreeSet<Weekday>,
    times: &BTreeSet<SlotTime>,
    horizon_start: NaiveDate,
    horizon_days: u32,
) -> Vec<Slot> {
    if days.is_empty() || times.is_empty() {
        return Vec::new();
    }

    let mut slots = Vec::new();
    for offset in 0..horizon_days {
        let Some(date) = horizon_start.checked_add_days(Days::new(u64::from(offset))) else {
            break;
        };
        if !days.contains(&Weekday::from_chrono(date.weekday())) {
            continue;
        }
        // BTreeSet iterates times in ascending order.
        slots.extend(times.iter().map(|time| Slot::new(date, *time)));
    }
    slots
}
