//! Chronobiological profile and its interpretation.
//!
//! A profile is three user-supplied fields: chronotype, wake-up time and
//! sleep duration. The planner turns them into an active window (wake to bed)
//! and an energy-peak range.

mod chronotype;
mod clock;

pub use chronotype::{Chronotype, EnergyPeakRange};
pub use clock::{
    bedtime, default_wake_time, derive_active_window, parse_hhmm, parse_time_of_day,
    ActiveWindow, ParsedTime,
};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ProfileError;

/// User profile as held by the profile store.
///
/// Every field is optional because stored profiles may be half-configured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, deserialize_with = "deserialize_chronotype_lenient")]
    pub chronotype: Option<Chronotype>,
    /// "HH:MM"
    #[serde(default)]
    pub wakeup_time: Option<String>,
    /// Hours of sleep (7.5 or 9 in practice)
    #[serde(default)]
    pub sleep_duration: Option<f64>,
}

/// Everything the planner derives from a complete profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileSignals {
    pub chronotype: Chronotype,
    /// Wake time as parsed, including whether it had to be defaulted.
    pub wake: ParsedTime,
    pub window: ActiveWindow,
    pub peak: EnergyPeakRange,
}

impl Profile {
    pub fn new(
        chronotype: Chronotype,
        wakeup_time: impl Into<String>,
        sleep_duration: f64,
    ) -> Self {
        Self {
            chronotype: Some(chronotype),
            wakeup_time: Some(wakeup_time.into()),
            sleep_duration: Some(sleep_duration),
        }
    }

    fn wakeup_time_str(&self) -> Option<&str> {
        self.wakeup_time
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn usable_sleep_duration(&self) -> Option<f64> {
        self.sleep_duration.filter(|h| h.is_finite() && *h > 0.0)
    }

    /// First field that keeps this profile from being complete.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.wakeup_time_str().is_none() {
            Some("wakeup_time")
        } else if self.usable_sleep_duration().is_none() {
            Some("sleep_duration")
        } else if self.chronotype.is_none() {
            Some("chronotype")
        } else {
            None
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing_field().is_none()
    }

    /// Lenient interpretation used by the planner.
    ///
    /// `None` when the profile is incomplete. A malformed wake time is
    /// replaced by 07:00 and reported through [`ProfileSignals::wake`].
    pub fn interpret(&self) -> Option<ProfileSignals> {
        let chronotype = self.chronotype?;
        let sleep = self.usable_sleep_duration()?;
        let wake = parse_time_of_day(Some(self.wakeup_time_str()?));
        if wake.is_defaulted() {
            tracing::warn!(
                wakeup_time = ?self.wakeup_time,
                "malformed wake-up time, assuming 07:00"
            );
        }

        Some(ProfileSignals {
            chronotype,
            wake,
            window: ActiveWindow::new(wake.time(), sleep),
            peak: chronotype.peak_range(),
        })
    }

    /// Strict interpretation for callers that treat bad profile data as an error.
    pub fn validate(&self) -> Result<ProfileSignals, ProfileError> {
        let raw_wake = self.wakeup_time_str().ok_or(ProfileError::Missing("wakeup_time"))?;
        let sleep = self.sleep_duration.ok_or(ProfileError::Missing("sleep_duration"))?;
        if !(sleep.is_finite() && sleep > 0.0) {
            return Err(ProfileError::InvalidSleepDuration(sleep));
        }
        let chronotype = self.chronotype.ok_or(ProfileError::Missing("chronotype"))?;
        let wake = parse_hhmm(raw_wake)?;

        Ok(ProfileSignals {
            chronotype,
            wake: ParsedTime::Parsed(wake),
            window: ActiveWindow::new(wake, sleep),
            peak: chronotype.peak_range(),
        })
    }
}

fn deserialize_chronotype_lenient<'de, D>(deserializer: D) -> Result<Option<Chronotype>, D::Error>
where
    D: Deserializer<'de>,
{
    let tag: Option<String> = Option::deserialize(deserializer)?;
    Ok(tag
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Chronotype::from_tag_or_default))
}
