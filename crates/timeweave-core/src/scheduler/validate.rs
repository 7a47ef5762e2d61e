//! Conflict check for a suggestion against existing events.
//!
//! Suggestions from [`super::StudyScheduler`] never overlap the events they
//! were planned against. This check exists for callers whose event set may
//! have changed between planning and saving.

use crate::events::Event;

/// First existing event that the suggestion overlaps, if any.
pub fn find_conflict<'a>(suggestion: &Event, existing_events: &'a [Event]) -> Option<&'a Event> {
    existing_events
        .iter()
        .find(|e| e.overlaps(suggestion.start_time, suggestion.end_time))
}

/// `true` when the suggestion overlaps none of `existing_events`.
pub fn validate_suggestion(suggestion: &Event, existing_events: &[Event]) -> bool {
    find_conflict(suggestion, existing_events).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventType;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, h, m, 0).unwrap()
    }

    fn event(title: &str, s: DateTime<Utc>, e: DateTime<Utc>) -> Event {
        Event::new(title, EventType::Work, s, e).unwrap()
    }

    #[test]
    fn reports_each_overlap_shape() {
        let existing = vec![event("shift", at(12, 0), at(14, 0))];

        let start_inside = event("s", at(13, 0), at(15, 0));
        let end_inside = event("s", at(11, 0), at(12, 30));
        let contains = event("s", at(11, 0), at(15, 0));
        let within = event("s", at(12, 30), at(13, 30));

        for s in [&start_inside, &end_inside, &contains, &within] {
            assert!(!validate_suggestion(s, &existing));
            assert_eq!(find_conflict(s, &existing).unwrap().title, "shift");
        }
    }

    #[test]
    fn adjacent_and_distant_are_fine() {
        let existing = vec![
            event("a", at(9, 0), at(10, 0)),
            event("b", at(12, 0), at(13, 0)),
        ];
        assert!(validate_suggestion(&event("s", at(10, 0), at(12, 0)), &existing));
        assert!(validate_suggestion(&event("s", at(13, 0), at(14, 0)), &existing));
        assert!(validate_suggestion(&event("s", at(7, 0), at(8, 0)), &[]));
    }

    #[test]
    fn picks_first_conflict_in_input_order() {
        let existing = vec![
            event("first", at(9, 0), at(10, 0)),
            event("second", at(9, 30), at(11, 0)),
        ];
        let s = event("s", at(9, 45), at(10, 30));
        assert_eq!(find_conflict(&s, &existing).unwrap().title, "first");
    }
}
