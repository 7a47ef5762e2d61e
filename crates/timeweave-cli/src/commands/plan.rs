//! Weekly study planning commands.

use chrono::NaiveDate;
use clap::Subcommand;
use timeweave_core::{
    persist_suggestions, Config, EventStore, JsonEventStore, ProfileSignals, StudyScheduler,
};

use super::{event_line, parse_date, Zone};

#[derive(Subcommand)]
pub enum PlanAction {
    /// Preview study suggestions for a week without saving them
    Generate {
        /// Any day of the target week (YYYY-MM-DD); defaults to today
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Fail on a malformed wake-up time instead of assuming 07:00
        #[arg(long)]
        strict: bool,
    },
    /// Generate suggestions for a week and save them as tentative events
    Apply {
        /// Any day of the target week (YYYY-MM-DD); defaults to today
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// Output the save report as JSON
        #[arg(long)]
        json: bool,
        /// Fail on a malformed wake-up time instead of assuming 07:00
        #[arg(long)]
        strict: bool,
    },
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PlanAction::Generate { date, json, strict } => generate(date, json, strict),
        PlanAction::Apply { date, json, strict } => apply(date, json, strict),
    }
}

fn signals(config: &Config, strict: bool) -> Result<ProfileSignals, Box<dyn std::error::Error>> {
    let profile = &config.profile;
    if strict {
        return Ok(profile.validate()?);
    }
    profile.interpret().ok_or_else(|| {
        format!(
            "profile incomplete (missing {}); run `timeweave-cli profile set`",
            profile.missing_field().unwrap_or("fields")
        )
        .into()
    })
}

fn generate(
    date: Option<NaiveDate>,
    json: bool,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let zone = Zone::from_config(&config)?;
    let signals = signals(&config, strict)?;
    let date = date.unwrap_or_else(|| zone.today());
    tracing::debug!(zone = %zone.name(), %date, strict, "planning week");

    let store = JsonEventStore::open_default()?;
    let existing = store.list()?;
    let scheduler = StudyScheduler::with_config(config.planner.clone());
    let suggestions = zone.plan_week(&scheduler, &existing, &signals, date)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    if suggestions.is_empty() {
        println!("No free slot long enough this week.");
        return Ok(());
    }
    println!(
        "{} study suggestion(s) for the week of {}:",
        suggestions.len(),
        timeweave_core::scheduler::week_start(date)
    );
    for s in &suggestions {
        println!("  {}", event_line(&zone, s));
    }
    Ok(())
}

fn apply(
    date: Option<NaiveDate>,
    json: bool,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let zone = Zone::from_config(&config)?;
    let signals = signals(&config, strict)?;
    let date = date.unwrap_or_else(|| zone.today());
    tracing::debug!(zone = %zone.name(), %date, strict, "planning week");

    let mut store = JsonEventStore::open_default()?;
    let existing = store.list()?;
    let scheduler = StudyScheduler::with_config(config.planner.clone());
    let suggestions = zone.plan_week(&scheduler, &existing, &signals, date)?;

    let report = persist_suggestions(
        &mut store,
        suggestions,
        config.planner.revalidate_before_persist,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Saved {} of {} suggestion(s)", report.saved_count(), report.attempted());
    for e in &report.saved {
        println!("  {}", event_line(&zone, e));
    }
    for c in &report.conflicts {
        println!(
            "  skipped {}: overlaps '{}'",
            zone.display(c.suggestion.start_time),
            c.blocking.title
        );
    }
    for (e, reason) in &report.failed {
        println!("  failed {}: {reason}", zone.display(e.start_time));
    }
    Ok(())
}
