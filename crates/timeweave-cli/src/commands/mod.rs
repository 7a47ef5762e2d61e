pub mod config;
pub mod events;
pub mod plan;
pub mod profile;
mod zone;

use chrono::NaiveDate;
use timeweave_core::Event;

pub use zone::Zone;

/// clap parser for `--date YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("expected a date as YYYY-MM-DD, got '{s}'"))
}

/// One-line rendering of an event in the configured zone.
pub fn event_line(zone: &Zone, event: &Event) -> String {
    let mut flags = Vec::new();
    if event.is_fixed {
        flags.push("fixed");
    }
    if event.is_tentative {
        flags.push("suggestion");
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" ({})", flags.join(", "))
    };

    format!(
        "{id}  {start} - {end}  [{kind}] {title}{flags}",
        id = event.id.as_deref().unwrap_or("-"),
        start = zone.display(event.start_time),
        end = zone.display_time(event.end_time),
        kind = event.event_type,
        title = event.title,
    )
}
