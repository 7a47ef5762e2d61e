//! Wake/bed clock arithmetic.
//!
//! Everything that decides where a day's active period starts and ends lives
//! here, so the planner and any display code agree on midnight crossing.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};

use crate::error::ProfileError;

/// Wake time assumed when the stored value is missing or malformed (07:00).
pub fn default_wake_time() -> NaiveTime {
    NaiveTime::from_hms_opt(7, 0, 0).unwrap_or_default()
}

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Outcome of lenient time-of-day parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedTime {
    /// The input was a well-formed "HH:MM".
    Parsed(NaiveTime),
    /// The input was absent or malformed; [`default_wake_time`] was substituted.
    Defaulted(NaiveTime),
}

impl ParsedTime {
    pub fn time(&self) -> NaiveTime {
        match self {
            Self::Parsed(t) | Self::Defaulted(t) => *t,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, Self::Defaulted(_))
    }
}

/// Strictly parse "HH:MM" (one or two hour digits, two minute digits).
pub fn parse_hhmm(input: &str) -> Result<NaiveTime, ProfileError> {
    let malformed = || ProfileError::MalformedTime(input.to_string());
    let (h, m) = input.trim().split_once(':').ok_or_else(malformed)?;

    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(h) || h.len() > 2 || !digits(m) || m.len() != 2 {
        return Err(malformed());
    }

    let hour: u32 = h.parse().map_err(|_| malformed())?;
    let minute: u32 = m.parse().map_err(|_| malformed())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(malformed)
}

/// Parse "HH:MM", falling back to 07:00 for absent or malformed input.
pub fn parse_time_of_day(input: Option<&str>) -> ParsedTime {
    match input.map(parse_hhmm) {
        Some(Ok(t)) => ParsedTime::Parsed(t),
        _ => ParsedTime::Defaulted(default_wake_time()),
    }
}

/// Bedtime is wake time minus the sleep duration, wrapping around midnight.
///
/// Fractional hours are honoured; any sub-minute remainder is truncated.
pub fn bedtime(wake: NaiveTime, sleep_hours: f64) -> NaiveTime {
    let secs = (sleep_hours * 3600.0).round() as i64;
    let (bed, _) = wake.overflowing_sub_signed(Duration::seconds(secs.rem_euclid(SECONDS_PER_DAY)));
    bed.with_second(0).unwrap_or(bed)
}

/// The part of a day between waking up and going to bed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveWindow {
    pub wake: NaiveTime,
    pub bed: NaiveTime,
}

impl ActiveWindow {
    pub fn new(wake: NaiveTime, sleep_hours: f64) -> Self {
        Self {
            wake,
            bed: bedtime(wake, sleep_hours),
        }
    }

    pub fn wake_hour(&self) -> u32 {
        self.wake.hour()
    }

    pub fn wake_minute(&self) -> u32 {
        self.wake.minute()
    }

    pub fn bed_hour(&self) -> u32 {
        self.bed.hour()
    }

    pub fn bed_minute(&self) -> u32 {
        self.bed.minute()
    }

    /// Whether bedtime falls on the calendar day after wake-up.
    ///
    /// This is the single crossing rule: bedtime strictly earlier than wake
    /// time, comparing hours and minutes. Equal times mean an empty window.
    pub fn crosses_midnight(&self) -> bool {
        self.bed < self.wake
    }

    /// Length of the active period.
    pub fn duration(&self) -> Duration {
        let span = self.bed.signed_duration_since(self.wake);
        if self.crosses_midnight() {
            span + Duration::days(1)
        } else {
            span
        }
    }

    /// Absolute `[wake, bed)` bounds for the active period starting on `day`.
    ///
    /// Returns `None` only if the zone cannot represent either instant.
    pub fn bounds_on<Tz: TimeZone>(
        &self,
        tz: &Tz,
        day: NaiveDate,
    ) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let end_day = if self.crosses_midnight() {
            day.succ_opt()?
        } else {
            day
        };
        let start = resolve_local(tz, day, self.wake)?;
        let end = resolve_local(tz, end_day, self.bed)?;
        Some((start, end))
    }

    /// Absolute `[bed, next wake)` sleep period that follows the active period of `day`.
    pub fn sleep_window_on<Tz: TimeZone>(
        &self,
        tz: &Tz,
        day: NaiveDate,
    ) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let (_, bed) = self.bounds_on(tz, day)?;
        let (next_wake, _) = self.bounds_on(tz, day.succ_opt()?)?;
        Some((bed, next_wake))
    }
}

/// Interpret raw profile fields as an active window.
///
/// A missing or malformed wake time becomes 07:00.
pub fn derive_active_window(wakeup_time: Option<&str>, sleep_hours: f64) -> ActiveWindow {
    ActiveWindow::new(parse_time_of_day(wakeup_time).time(), sleep_hours)
}

/// Map a local wall-clock time to an instant.
///
/// Ambiguous times take the earlier instant; times skipped by a DST jump
/// move forward an hour.
fn resolve_local<Tz: TimeZone>(
    tz: &Tz,
    date: NaiveDate,
    time: NaiveTime,
) -> Option<DateTime<Utc>> {
    let naive = date.and_time(time);
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}
