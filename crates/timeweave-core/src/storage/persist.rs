//! Saving planner output and acting on saved suggestions.
//!
//! Planning and persisting are separate steps: generate the full list first,
//! then hand it to [`persist_suggestions`]. Each suggestion is saved on its
//! own, so one failure never blocks the rest.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::EventStore;
use crate::error::StoreError;
use crate::events::Event;
use crate::scheduler::find_conflict;

/// A suggestion skipped because the store changed under it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conflict {
    pub suggestion: Event,
    pub blocking: Event,
}

/// Outcome of a batch save.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PersistReport {
    /// Saved suggestions, with the ids the store assigned
    pub saved: Vec<Event>,
    /// Skipped after re-validation found an overlap
    pub conflicts: Vec<Conflict>,
    /// Suggestions the store refused, with the error message
    pub failed: Vec<(Event, String)>,
}

impl PersistReport {
    pub fn saved_count(&self) -> usize {
        self.saved.len()
    }

    pub fn attempted(&self) -> usize {
        self.saved.len() + self.conflicts.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.conflicts.is_empty() && self.failed.is_empty()
    }
}

/// Save each suggestion independently.
///
/// With `revalidate`, every suggestion is checked against the store's
/// current contents just before it is created and skipped on overlap.
pub fn persist_suggestions<S: EventStore + ?Sized>(
    store: &mut S,
    suggestions: Vec<Event>,
    revalidate: bool,
) -> PersistReport {
    let mut report = PersistReport::default();

    for suggestion in suggestions {
        if revalidate {
            match store.list() {
                Ok(current) => {
                    if let Some(blocking) = find_conflict(&suggestion, &current) {
                        tracing::warn!(
                            start = %suggestion.start_time,
                            blocking = %blocking.title,
                            "suggestion overlaps an event added since planning, skipped"
                        );
                        report.conflicts.push(Conflict {
                            blocking: blocking.clone(),
                            suggestion,
                        });
                        continue;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "could not re-validate suggestion");
                    report.failed.push((suggestion, e.to_string()));
                    continue;
                }
            }
        }

        match store.create(&suggestion) {
            Ok(id) => report.saved.push(suggestion.with_id(id)),
            Err(e) => {
                tracing::warn!(error = %e, start = %suggestion.start_time, "failed to save suggestion");
                report.failed.push((suggestion, e.to_string()));
            }
        }
    }

    tracing::debug!(
        saved = report.saved.len(),
        conflicts = report.conflicts.len(),
        failed = report.failed.len(),
        "suggestions persisted"
    );
    report
}

/// Confirm a suggestion so it becomes a regular event.
pub fn accept_suggestion<S: EventStore + ?Sized>(
    store: &mut S,
    id: &str,
) -> Result<Event, StoreError> {
    let mut event = store.get(id)?;
    if event.is_tentative {
        event.is_tentative = false;
        store.update(id, &event)?;
    }
    Ok(event)
}

/// Discard a suggestion. Confirmed events are refused.
pub fn reject_suggestion<S: EventStore + ?Sized>(store: &mut S, id: &str) -> Result<(), StoreError> {
    let event = store.get(id)?;
    if !event.is_tentative {
        return Err(StoreError::Refused {
            id: id.to_string(),
            reason: "not a pending suggestion".to_string(),
        });
    }
    store.delete(id)
}

/// Discard every pending suggestion starting in `[start, end)`. Returns how many went.
pub fn clear_suggestions<S: EventStore + ?Sized>(
    store: &mut S,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<usize, StoreError> {
    let pending: Vec<String> = store
        .list_range(start, end)?
        .into_iter()
        .filter(|e| e.is_tentative)
        .filter_map(|e| e.id)
        .collect();

    for id in &pending {
        store.delete(id)?;
    }
    Ok(pending.len())
}
