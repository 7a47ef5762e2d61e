//! Calendar events: the user's commitments and the planner's suggestions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Kind of calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Class,
    Work,
    Study,
    /// Meals, sleep, exercise
    Biological,
    Personal,
    Suggestion,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Work => "work",
            Self::Study => "study",
            Self::Biological => "biological",
            Self::Personal => "personal",
            Self::Suggestion => "suggestion",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "class" => Ok(Self::Class),
            "work" => Ok(Self::Work),
            "study" => Ok(Self::Study),
            "biological" => Ok(Self::Biological),
            "personal" => Ok(Self::Personal),
            "suggestion" => Ok(Self::Suggestion),
            other => Err(ValidationError::InvalidValue {
                field: "type".to_string(),
                message: format!(
                    "'{other}' is not one of class, work, study, biological, personal, suggestion"
                ),
            }),
        }
    }
}

/// A calendar event.
///
/// Both fixed and movable events count as busy time for the planner.
/// `start_time < end_time` always holds, including for deserialized events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEvent")]
pub struct Event {
    /// Assigned by the event store; `None` until persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub is_fixed: bool,
    /// Set on planner output until the user accepts it.
    #[serde(default)]
    pub is_tentative: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
}

/// Wire shape of [`Event`], checked before it becomes one.
#[derive(Deserialize)]
struct RawEvent {
    #[serde(default)]
    id: Option<String>,
    title: String,
    #[serde(rename = "type")]
    event_type: EventType,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    #[serde(default)]
    is_fixed: bool,
    #[serde(default)]
    is_tentative: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    is_recurring: bool,
}

impl TryFrom<RawEvent> for Event {
    type Error = ValidationError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        let mut event = Event::new(raw.title, raw.event_type, raw.start_time, raw.end_time)?;
        event.id = raw.id;
        event.is_fixed = raw.is_fixed;
        event.is_tentative = raw.is_tentative;
        event.description = raw.description;
        event.is_recurring = raw.is_recurring;
        Ok(event)
    }
}

impl Event {
    /// Create a confirmed, movable event.
    pub fn new(
        title: impl Into<String>,
        event_type: EventType,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if end_time <= start_time {
            return Err(ValidationError::InvalidTimeRange {
                start: start_time,
                end: end_time,
            });
        }

        Ok(Self {
            id: None,
            title: title.into(),
            event_type,
            start_time,
            end_time,
            is_fixed: false,
            is_tentative: false,
            description: None,
            is_recurring: false,
        })
    }

    pub fn fixed(mut self) -> Self {
        self.is_fixed = true;
        self
    }

    pub fn tentative(mut self) -> Self {
        self.is_tentative = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    /// Three-way overlap test used by the suggestion validator.
    ///
    /// True when `start` falls inside this event, `end` falls inside it, or
    /// `[start, end)` swallows it whole. Touching endpoints do not overlap.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        (start >= self.start_time && start < self.end_time)
            || (end > self.start_time && end <= self.end_time)
            || (start <= self.start_time && end >= self.end_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, h, m, 0).unwrap()
    }

    #[test]
    fn new_rejects_empty_or_inverted_range() {
        assert!(Event::new("x", EventType::Class, at(9, 0), at(9, 0)).is_err());
        assert!(matches!(
            Event::new("x", EventType::Class, at(10, 0), at(9, 0)),
            Err(ValidationError::InvalidTimeRange { .. })
        ));
        let ok = Event::new("x", EventType::Class, at(9, 0), at(10, 30)).unwrap();
        assert_eq!(ok.duration_minutes(), 90);
        assert!(!ok.is_fixed);
        assert!(!ok.is_tentative);
    }

    #[test]
    fn deserialize_rejects_inverted_range() {
        let ok: Event = serde_json::from_str(
            r#"{"title":"lab","type":"class","start_time":"2025-03-10T10:00:00Z","end_time":"2025-03-10T11:00:00Z","is_fixed":true}"#,
        )
        .unwrap();
        assert_eq!(ok.duration_minutes(), 60);
        assert!(ok.is_fixed);
        assert!(ok.id.is_none());

        let err = serde_json::from_str::<Event>(
            r#"{"title":"bad","type":"class","start_time":"2025-03-10T09:00:00Z","end_time":"2025-03-10T07:00:00Z"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid time range"));
    }

    #[test]
    fn overlap_cases() {
        let e = Event::new("lecture", EventType::Class, at(10, 0), at(11, 0)).unwrap();

        // start inside
        assert!(e.overlaps(at(10, 30), at(11, 30)));
        // end inside
        assert!(e.overlaps(at(9, 30), at(10, 30)));
        // contains
        assert!(e.overlaps(at(9, 0), at(12, 0)));
        // contained
        assert!(e.overlaps(at(10, 15), at(10, 45)));
        // touching on either side
        assert!(!e.overlaps(at(9, 0), at(10, 0)));
        assert!(!e.overlaps(at(11, 0), at(12, 0)));
    }

    #[test]
    fn event_type_parses_and_serializes_lowercase() {
        assert_eq!("Biological".parse::<EventType>().unwrap(), EventType::Biological);
        assert!("meeting".parse::<EventType>().is_err());

        let e = Event::new("gym", EventType::Personal, at(18, 0), at(19, 0))
            .unwrap()
            .fixed();
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["type"], "personal");
        assert_eq!(json["is_fixed"], true);
        assert!(json.get("id").is_none());
    }

    #[test]
    fn timestamps_survive_json() {
        let e = Event::new("lab", EventType::Class, at(8, 15), at(9, 45))
            .unwrap()
            .with_id("abc");
        let json = serde_json::to_string(&e).unwrap();
        let decoded: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, e);
    }
}
