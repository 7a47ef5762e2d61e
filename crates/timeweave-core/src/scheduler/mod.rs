//! Automatic study-session planner.
//!
//! For each day of the target week this module:
//! - Derives the active window (wake to bed) from the profile
//! - Finds free slots between the day's existing events
//! - Places one study suggestion at the start of every slot long enough
//! - Picks a deep session inside the chronotype's energy peak, a review
//!   session outside it
//!
//! Planning is pure: inputs are only read and the suggestions are returned
//! to the caller, which decides what to persist.

mod validate;

pub use validate::{find_conflict, validate_suggestion};

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::events::{Event, EventType};
use crate::profile::{EnergyPeakRange, Profile, ProfileSignals};
use crate::timeline::{events_for_day, find_free_slots, TimeSlot};

/// Kind of suggested study session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    /// Slot starts inside the energy peak
    Deep,
    /// Slot starts outside the energy peak
    Review,
}

impl SessionKind {
    pub fn for_hour(peak: EnergyPeakRange, hour: u32) -> Self {
        if peak.contains_hour(hour) {
            Self::Deep
        } else {
            Self::Review
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Deep => "Deep study",
            Self::Review => "Review / Homework",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Deep => "Intensive study session during your energy peak",
            Self::Review => "Light review of concepts or pending homework",
        }
    }
}

/// Planner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Shortest free slot that receives a suggestion (minutes)
    #[serde(default = "default_min_slot_minutes")]
    pub min_slot_minutes: i64,
    /// Longest session placed inside the energy peak (minutes)
    #[serde(default = "default_peak_session_minutes")]
    pub peak_session_minutes: i64,
    /// Longest session placed outside the energy peak (minutes)
    #[serde(default = "default_off_peak_session_minutes")]
    pub off_peak_session_minutes: i64,
    /// Re-check each suggestion against the store right before saving it
    #[serde(default = "default_true")]
    pub revalidate_before_persist: bool,
}

fn default_min_slot_minutes() -> i64 {
    45
}
fn default_peak_session_minutes() -> i64 {
    90
}
fn default_off_peak_session_minutes() -> i64 {
    60
}
fn default_true() -> bool {
    true
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            min_slot_minutes: default_min_slot_minutes(),
            peak_session_minutes: default_peak_session_minutes(),
            off_peak_session_minutes: default_off_peak_session_minutes(),
            revalidate_before_persist: true,
        }
    }
}

impl PlannerConfig {
    pub fn max_session_minutes(&self, kind: SessionKind) -> i64 {
        match kind {
            SessionKind::Deep => self.peak_session_minutes,
            SessionKind::Review => self.off_peak_session_minutes,
        }
    }
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Monday through Sunday of the week containing `date`.
pub fn week_days(date: NaiveDate) -> Vec<NaiveDate> {
    week_start(date).iter_days().take(7).collect()
}

/// Study-session planner
#[derive(Debug, Clone, Default)]
pub struct StudyScheduler {
    config: PlannerConfig,
}

impl StudyScheduler {
    /// Create a new scheduler with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Suggest study sessions for the Monday-start week containing `reference`.
    ///
    /// Calendar days and hours of day are read in `reference`'s time zone.
    /// An incomplete profile yields no suggestions.
    ///
    /// # Returns
    /// Suggestions ordered by day (Monday first), chronological within a day
    pub fn generate<Tz: TimeZone>(
        &self,
        existing_events: &[Event],
        profile: &Profile,
        reference: &DateTime<Tz>,
    ) -> Vec<Event> {
        match profile.interpret() {
            Some(signals) => self.generate_with_signals(existing_events, &signals, reference),
            None => {
                tracing::warn!(
                    missing = profile.missing_field(),
                    "incomplete profile, no study sessions generated"
                );
                Vec::new()
            }
        }
    }

    /// Same as [`StudyScheduler::generate`] for an already interpreted profile.
    pub fn generate_with_signals<Tz: TimeZone>(
        &self,
        existing_events: &[Event],
        signals: &ProfileSignals,
        reference: &DateTime<Tz>,
    ) -> Vec<Event> {
        let tz = reference.timezone();
        let suggestions: Vec<Event> = week_days(reference.date_naive())
            .into_iter()
            .flat_map(|day| self.plan_day(existing_events, signals, &tz, day))
            .collect();

        tracing::debug!(
            chronotype = signals.chronotype.as_str(),
            count = suggestions.len(),
            "study sessions generated"
        );
        suggestions
    }

    /// Suggestions for a single calendar day.
    pub fn plan_day<Tz: TimeZone>(
        &self,
        existing_events: &[Event],
        signals: &ProfileSignals,
        tz: &Tz,
        day: NaiveDate,
    ) -> Vec<Event> {
        let Some((day_start, day_end)) = signals.window.bounds_on(tz, day) else {
            tracing::warn!(%day, "active window cannot be placed in this time zone");
            return Vec::new();
        };

        let busy = events_for_day(existing_events, tz, day, (day_start, day_end));
        let slots = find_free_slots(day_start, day_end, &busy);

        tracing::debug!(
            %day,
            %day_start,
            %day_end,
            busy = busy.len(),
            slots = slots.len(),
            "planning day"
        );

        slots
            .iter()
            .filter_map(|slot| self.suggest_for_slot(slot, signals.peak, tz))
            .collect()
    }

    /// At most one suggestion anchored at the start of `slot`.
    ///
    /// Slots shorter than the configured minimum get nothing. The session is
    /// capped by its kind's maximum and by the slot itself.
    pub fn suggest_for_slot<Tz: TimeZone>(
        &self,
        slot: &TimeSlot,
        peak: EnergyPeakRange,
        tz: &Tz,
    ) -> Option<Event> {
        let slot_minutes = slot.duration_minutes();
        if slot_minutes < self.config.min_slot_minutes {
            return None;
        }

        let kind = SessionKind::for_hour(peak, slot.start.with_timezone(tz).hour());
        let session_minutes = self.config.max_session_minutes(kind).min(slot_minutes);
        let end = slot.start + Duration::minutes(session_minutes);

        Event::new(kind.title(), EventType::Study, slot.start, end)
            .ok()
            .map(|e| e.tentative().with_description(kind.description()))
    }
}

/// Suggest study sessions with the default planner configuration.
pub fn generate_study_schedule<Tz: TimeZone>(
    existing_events: &[Event],
    profile: &Profile,
    reference: &DateTime<Tz>,
) -> Vec<Event> {
    StudyScheduler::new().generate(existing_events, profile, reference)
}
