//! Chronobiological profile commands.
//!
//! The profile lives in the `[profile]` table of the config file.

use clap::Subcommand;
use timeweave_core::{Chronotype, Config, Profile};

use super::Zone;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the profile and what the planner derives from it
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update one or more profile fields
    Set {
        /// lion, bear, wolf or dolphin
        #[arg(long)]
        chronotype: Option<String>,
        /// Wake-up time as HH:MM
        #[arg(long)]
        wakeup_time: Option<String>,
        /// Hours of sleep (e.g. 7.5 or 9)
        #[arg(long)]
        sleep_duration: Option<f64>,
    },

    /// Show bedtime and tonight's sleep window
    Bedtime,

    /// List chronotypes and their energy peaks
    Chronotypes,
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ProfileAction::Show { json } => show(json),
        ProfileAction::Set {
            chronotype,
            wakeup_time,
            sleep_duration,
        } => set(chronotype, wakeup_time, sleep_duration),
        ProfileAction::Bedtime => bedtime(),
        ProfileAction::Chronotypes => {
            for c in Chronotype::ALL {
                println!("{:<8} {} ({})", c.as_str(), c.label(), c.peak_range());
                println!("         {}", c.description());
            }
            Ok(())
        }
    }
}

fn show(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let profile = &config.profile;

    if json {
        let signals = profile.interpret();
        let out = serde_json::json!({
            "profile": profile,
            "complete": profile.is_complete(),
            "wake_time": signals.map(|s| s.window.wake.format("%H:%M").to_string()),
            "bedtime": signals.map(|s| s.window.bed.format("%H:%M").to_string()),
            "crosses_midnight": signals.map(|s| s.window.crosses_midnight()),
            "energy_peak": signals.map(|s| s.peak),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print_fields(profile);
    match profile.interpret() {
        Some(signals) => {
            println!();
            println!("Energy peak:  {}", signals.peak);
            let awake = signals.window.duration();
            println!(
                "Active:       {} - {}{} ({}h{:02})",
                signals.window.wake.format("%H:%M"),
                signals.window.bed.format("%H:%M"),
                if signals.window.crosses_midnight() {
                    " (next day)"
                } else {
                    ""
                },
                awake.num_hours(),
                awake.num_minutes() % 60
            );
            if signals.wake.is_defaulted() {
                println!("Note: wake-up time is not HH:MM, 07:00 is used instead");
            }
        }
        None => {
            println!();
            println!(
                "Profile incomplete (missing {}); no study sessions will be planned.",
                profile.missing_field().unwrap_or("fields")
            );
        }
    }
    Ok(())
}

fn print_fields(profile: &Profile) {
    let or_unset = |v: Option<String>| v.unwrap_or_else(|| "(unset)".to_string());
    println!(
        "Chronotype:   {}",
        or_unset(profile.chronotype.map(|c| c.label().to_string()))
    );
    println!("Wake-up time: {}", or_unset(profile.wakeup_time.clone()));
    println!(
        "Sleep:        {}",
        or_unset(profile.sleep_duration.map(|h| format!("{h} h")))
    );
}

fn set(
    chronotype: Option<String>,
    wakeup_time: Option<String>,
    sleep_duration: Option<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    if chronotype.is_none() && wakeup_time.is_none() && sleep_duration.is_none() {
        return Err("nothing to set; pass --chronotype, --wakeup-time or --sleep-duration".into());
    }

    let mut config = Config::load()?;
    if let Some(c) = chronotype {
        config.set_value("profile.chronotype", &c.to_lowercase())?;
    }
    if let Some(w) = wakeup_time {
        config.set_value("profile.wakeup_time", &w)?;
    }
    if let Some(h) = sleep_duration {
        config.set_value("profile.sleep_duration", &h.to_string())?;
    }
    config.save()?;

    print_fields(&config.profile);
    Ok(())
}

fn bedtime() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let zone = Zone::from_config(&config)?;
    let signals = config.profile.validate()?;

    println!("Bedtime: {}", signals.window.bed.format("%H:%M"));
    if let Some((start, end)) = zone.sleep_window(&signals.window, zone.today()) {
        println!("Tonight: {} - {}", zone.display(start), zone.display(end));
    }
    Ok(())
}
