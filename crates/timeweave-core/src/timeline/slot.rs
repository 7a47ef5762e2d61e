//! Free-slot detection inside a day's active window.
//!
//! Finds the stretches of time not covered by any existing event.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::events::Event;

/// Half-open interval `[start, end)` of free time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeSlot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Sweep `events` against `[day_start, day_end)` and return the uncovered parts.
///
/// Events are taken in start order; a cursor advances past each event's end.
/// Overlapping and out-of-order events are handled; slots never extend past
/// `day_end`. The result is chronological.
pub fn find_free_slots(
    day_start: DateTime<Utc>,
    day_end: DateTime<Utc>,
    events: &[&Event],
) -> Vec<TimeSlot> {
    let mut sorted: Vec<&Event> = events.to_vec();
    sorted.sort_by_key(|e| e.start_time);

    let mut slots = Vec::new();
    let mut cursor = day_start;

    for event in sorted {
        let gap_end = event.start_time.min(day_end);
        if cursor < gap_end {
            slots.push(TimeSlot::new(cursor, gap_end));
        }
        cursor = cursor.max(event.end_time);
    }

    if cursor < day_end {
        slots.push(TimeSlot::new(cursor, day_end));
    }

    slots
}

/// Events that make time busy for the active window of `day`.
///
/// An event belongs to the day when its start falls on that calendar date in
/// `tz`. Events from other dates that still intersect the window (a late
/// event running past midnight, or early next-day events when bedtime is
/// after midnight) are included too, so no slot can overlap them.
pub fn events_for_day<'a, Tz: TimeZone>(
    events: &'a [Event],
    tz: &Tz,
    day: NaiveDate,
    window: (DateTime<Utc>, DateTime<Utc>),
) -> Vec<&'a Event> {
    let (start, end) = window;
    events
        .iter()
        .filter(|e| {
            e.start_time.with_timezone(tz).date_naive() == day
                || (e.start_time < end && e.end_time > start)
        })
        .collect()
}
