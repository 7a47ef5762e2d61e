//! Chronotypes and their energy-peak windows.

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

/// Hour-of-day window of peak alertness, half-open: `[start_hour, end_hour)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyPeakRange {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl EnergyPeakRange {
    pub const fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    pub fn contains_hour(&self, hour: u32) -> bool {
        self.start_hour <= hour && hour < self.end_hour
    }
}

impl std::fmt::Display for EnergyPeakRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:00 - {:02}:00", self.start_hour, self.end_hour)
    }
}

/// Behavioural sleep/alertness classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chronotype {
    Lion,
    Bear,
    Wolf,
    Dolphin,
}

impl Chronotype {
    pub const ALL: [Chronotype; 4] = [Self::Lion, Self::Bear, Self::Wolf, Self::Dolphin];

    /// Chronotype used when a stored tag is not recognised.
    pub const FALLBACK: Chronotype = Chronotype::Bear;

    pub fn peak_range(self) -> EnergyPeakRange {
        match self {
            Self::Lion => EnergyPeakRange::new(8, 12),
            Self::Bear => EnergyPeakRange::new(10, 14),
            Self::Wolf => EnergyPeakRange::new(16, 21),
            Self::Dolphin => EnergyPeakRange::new(10, 12),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lion => "lion",
            Self::Bear => "bear",
            Self::Wolf => "wolf",
            Self::Dolphin => "dolphin",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Lion => "Lion",
            Self::Bear => "Bear",
            Self::Wolf => "Wolf",
            Self::Dolphin => "Dolphin",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Lion => "Extreme early riser, most energetic in the morning",
            Self::Bear => "Follows the sun, balanced energy through the day",
            Self::Wolf => "Evening type, hard to wake early, creative at night",
            Self::Dolphin => "Light, irregular sleeper, sensitive to the environment",
        }
    }

    /// Resolve a stored tag, mapping anything unrecognised to [`Chronotype::FALLBACK`].
    ///
    /// Profiles written by older clients may carry tags outside the four known
    /// chronotypes. Rather than refusing to plan for them, the planner treats
    /// them as bears and logs the substitution.
    pub fn from_tag_or_default(tag: &str) -> Self {
        tag.parse().unwrap_or_else(|_| {
            tracing::warn!(tag, fallback = Self::FALLBACK.as_str(), "unknown chronotype tag");
            Self::FALLBACK
        })
    }
}

impl std::fmt::Display for Chronotype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Chronotype {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lion" => Ok(Self::Lion),
            "bear" => Ok(Self::Bear),
            "wolf" => Ok(Self::Wolf),
            "dolphin" => Ok(Self::Dolphin),
            _ => Err(ProfileError::UnknownChronotype(s.to_string())),
        }
    }
}
