//! Time zone the CLI reads and prints calendar times in.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use timeweave_core::scheduler::week_start;
use timeweave_core::{ActiveWindow, Config, Event, ProfileSignals, StudyScheduler};

/// Configured IANA zone, or the system's local time when none is set.
#[derive(Debug, Clone, Copy)]
pub enum Zone {
    Named(chrono_tz::Tz),
    Local,
}

fn to_utc<T: TimeZone>(tz: &T, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}

fn plan_in<T: TimeZone>(
    tz: &T,
    scheduler: &StudyScheduler,
    events: &[Event],
    signals: &ProfileSignals,
    date: NaiveDate,
) -> Option<Vec<Event>> {
    let noon = date.and_time(NaiveTime::MIN) + Duration::hours(12);
    let reference = tz.from_local_datetime(&noon).earliest()?;
    Some(scheduler.generate_with_signals(events, signals, &reference))
}

impl Zone {
    pub fn from_config(config: &Config) -> Result<Self, String> {
        match config
            .timezone
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(name) => name
                .parse::<chrono_tz::Tz>()
                .map(Zone::Named)
                .map_err(|_| format!("unknown timezone '{name}' in config")),
            None => Ok(Zone::Local),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Zone::Named(tz) => tz.name().to_string(),
            Zone::Local => "local".to_string(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        match self {
            Zone::Named(tz) => Utc::now().with_timezone(tz).date_naive(),
            Zone::Local => Local::now().date_naive(),
        }
    }

    /// Instant of a wall-clock time in this zone.
    pub fn local_to_utc(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Zone::Named(tz) => to_utc(tz, naive),
            Zone::Local => to_utc(&Local, naive),
        }
    }

    /// Accepts RFC 3339, or `YYYY-MM-DD HH:MM` read in this zone.
    pub fn parse_datetime(&self, s: &str) -> Result<DateTime<Utc>, String> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }
        ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .and_then(|naive| self.local_to_utc(naive))
            .ok_or_else(|| format!("expected 'YYYY-MM-DD HH:MM' or RFC 3339, got '{s}'"))
    }

    /// `[Monday 00:00, next Monday 00:00)` of the week containing `date`.
    pub fn week_range(&self, date: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let monday = week_start(date);
        let start = self.local_to_utc(monday.and_time(NaiveTime::MIN))?;
        let end = self.local_to_utc((monday + Duration::days(7)).and_time(NaiveTime::MIN))?;
        Some((start, end))
    }

    /// Run the planner for the week containing `date`, read in this zone.
    pub fn plan_week(
        &self,
        scheduler: &StudyScheduler,
        events: &[Event],
        signals: &ProfileSignals,
        date: NaiveDate,
    ) -> Result<Vec<Event>, String> {
        let planned = match self {
            Zone::Named(tz) => plan_in(tz, scheduler, events, signals, date),
            Zone::Local => plan_in(&Local, scheduler, events, signals, date),
        };
        planned.ok_or_else(|| format!("{date} cannot be represented in zone {}", self.name()))
    }

    /// Sleep period that follows the active period of `day`.
    pub fn sleep_window(
        &self,
        window: &ActiveWindow,
        day: NaiveDate,
    ) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match self {
            Zone::Named(tz) => window.sleep_window_on(tz, day),
            Zone::Local => window.sleep_window_on(&Local, day),
        }
    }

    pub fn display(&self, dt: DateTime<Utc>) -> String {
        self.format(dt, "%a %Y-%m-%d %H:%M")
    }

    pub fn display_time(&self, dt: DateTime<Utc>) -> String {
        self.format(dt, "%H:%M")
    }

    fn format(&self, dt: DateTime<Utc>, fmt: &str) -> String {
        match self {
            Zone::Named(tz) => dt.with_timezone(tz).format(fmt).to_string(),
            Zone::Local => dt.with_timezone(&Local).format(fmt).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn madrid() -> Zone {
        Zone::Named("Europe/Madrid".parse().unwrap())
    }

    #[test]
    fn parses_local_and_rfc3339_times() {
        let zone = madrid();
        let expected = Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap();
        assert_eq!(zone.parse_datetime("2025-03-10 09:00").unwrap(), expected);
        assert_eq!(zone.parse_datetime("2025-03-10T09:00").unwrap(), expected);
        assert_eq!(
            zone.parse_datetime("2025-03-10T08:00:00Z").unwrap(),
            expected
        );
        assert!(zone.parse_datetime("tomorrow").is_err());
    }

    #[test]
    fn local_times_across_dst_transitions() {
        let zone = madrid();
        // Skipped hour moves forward: 03:30 CEST.
        assert_eq!(
            zone.parse_datetime("2025-03-30 02:30").unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 30, 1, 30, 0).unwrap()
        );
        // Repeated hour takes the earlier instant: 02:30 CEST.
        assert_eq!(
            zone.parse_datetime("2025-10-26 02:30").unwrap(),
            Utc.with_ymd_and_hms(2025, 10, 26, 0, 30, 0).unwrap()
        );
    }

    #[test]
    fn week_range_starts_monday_midnight() {
        let zone = Zone::Named(chrono_tz::UTC);
        let (start, end) = zone
            .week_range(NaiveDate::from_ymd_opt(2025, 3, 13).unwrap())
            .unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 3, 17, 0, 0, 0).unwrap());
    }

    #[test]
    fn unknown_zone_is_rejected() {
        let config = Config {
            timezone: Some("Mars/Olympus".into()),
            ..Config::default()
        };
        assert!(Zone::from_config(&config).is_err());
        assert!(matches!(Zone::from_config(&Config::default()), Ok(Zone::Local)));
    }
}
