use chrono::NaiveDate;
use clap::Subcommand;
use timeweave_core::storage::{accept_suggestion, clear_suggestions, reject_suggestion};
use timeweave_core::{Config, Event, EventStore, EventType, JsonEventStore};

use super::{event_line, parse_date, Zone};

#[derive(Subcommand)]
pub enum EventsAction {
    /// List stored events
    List {
        /// Only the week containing this day (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        week: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add an event
    Add {
        /// Event title
        title: String,
        /// class, work, study, biological or personal
        #[arg(long = "type", default_value = "personal")]
        event_type: EventType,
        /// Start, as "YYYY-MM-DD HH:MM" in the configured zone or RFC 3339
        #[arg(long)]
        start: String,
        /// End, same formats as --start
        #[arg(long)]
        end: String,
        /// Mark as a fixed commitment
        #[arg(long)]
        fixed: bool,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
    },
    /// Remove an event
    Remove {
        /// Event ID
        id: String,
    },
    /// Confirm a saved suggestion
    Accept {
        /// Event ID
        id: String,
    },
    /// Discard a saved suggestion
    Reject {
        /// Event ID
        id: String,
    },
    /// Discard all pending suggestions of a week
    ClearSuggestions {
        /// Any day of the week (YYYY-MM-DD); defaults to today
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
}

pub fn run(action: EventsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let zone = Zone::from_config(&config)?;
    let mut store = JsonEventStore::open_default()?;

    match action {
        EventsAction::List { week, json } => {
            let events = match week {
                Some(day) => {
                    let (start, end) = week_range(&zone, day)?;
                    store.list_range(start, end)?
                }
                None => store.list()?,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&events)?);
            } else if events.is_empty() {
                println!("No events.");
            } else {
                for e in &events {
                    println!("{}", event_line(&zone, e));
                }
            }
        }
        EventsAction::Add {
            title,
            event_type,
            start,
            end,
            fixed,
            description,
        } => {
            let start = zone.parse_datetime(&start)?;
            let end = zone.parse_datetime(&end)?;
            let mut event = Event::new(title, event_type, start, end)?;
            if fixed {
                event = event.fixed();
            }
            if let Some(d) = description {
                event = event.with_description(d);
            }
            let id = store.create(&event)?;
            println!("Event created: {}", event_line(&zone, &event.with_id(id)));
        }
        EventsAction::Remove { id } => {
            store.delete(&id)?;
            println!("Event removed: {id}");
        }
        EventsAction::Accept { id } => {
            let event = accept_suggestion(&mut store, &id)?;
            println!("Suggestion accepted: {}", event_line(&zone, &event));
        }
        EventsAction::Reject { id } => {
            reject_suggestion(&mut store, &id)?;
            println!("Suggestion rejected: {id}");
        }
        EventsAction::ClearSuggestions { date } => {
            let (start, end) = week_range(&zone, date.unwrap_or_else(|| zone.today()))?;
            let removed = clear_suggestions(&mut store, start, end)?;
            println!("Removed {removed} pending suggestion(s)");
        }
    }
    Ok(())
}

fn week_range(
    zone: &Zone,
    day: NaiveDate,
) -> Result<(chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>), String> {
    zone.week_range(day)
        .ok_or_else(|| format!("week of {day} cannot be represented in zone {}", zone.name()))
}
