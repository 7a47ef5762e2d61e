//! Event store boundary.
//!
//! The planner never touches storage. Callers read the week's events from an
//! [`EventStore`], plan, then write accepted suggestions back one by one.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::data_dir;
use crate::error::StoreError;
use crate::events::Event;

/// Persistence for calendar events.
///
/// `create` assigns a stable identifier and returns it; every other field,
/// timestamps included, must come back exactly as written.
pub trait EventStore {
    /// All stored events, ordered by start time.
    fn list(&self) -> Result<Vec<Event>, StoreError>;

    /// Events whose start lies in `[start, end)`.
    fn list_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Event>, StoreError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|e| e.start_time >= start && e.start_time < end)
            .collect())
    }

    /// Look up a single event.
    fn get(&self, id: &str) -> Result<Event, StoreError> {
        self.list()?
            .into_iter()
            .find(|e| e.id.as_deref() == Some(id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Store a new event, ignoring any id it carries. Returns the new id.
    fn create(&mut self, event: &Event) -> Result<String, StoreError>;

    /// Replace the event stored under `id`.
    fn update(&mut self, id: &str, event: &Event) -> Result<(), StoreError>;

    /// Remove the event stored under `id`.
    fn delete(&mut self, id: &str) -> Result<(), StoreError>;
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn sorted(mut events: Vec<Event>) -> Vec<Event> {
    events.sort_by_key(|e| e.start_time);
    events
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventStore {
    events: Vec<Event>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with events; those without an id get one.
    pub fn with_events(events: impl IntoIterator<Item = Event>) -> Self {
        let events = events
            .into_iter()
            .map(|mut e| {
                if e.id.is_none() {
                    e.id = Some(new_id());
                }
                e
            })
            .collect();
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn position(&self, id: &str) -> Result<usize, StoreError> {
        self.events
            .iter()
            .position(|e| e.id.as_deref() == Some(id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

impl EventStore for MemoryEventStore {
    fn list(&self) -> Result<Vec<Event>, StoreError> {
        Ok(sorted(self.events.clone()))
    }

    fn create(&mut self, event: &Event) -> Result<String, StoreError> {
        let id = new_id();
        self.events.push(event.clone().with_id(id.clone()));
        Ok(id)
    }

    fn update(&mut self, id: &str, event: &Event) -> Result<(), StoreError> {
        let idx = self.position(id)?;
        self.events[idx] = event.clone().with_id(id);
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let idx = self.position(id)?;
        self.events.remove(idx);
        Ok(())
    }
}

/// Store backed by a JSON array on disk.
///
/// The whole file is read on open and rewritten after every mutation, via a
/// temporary file renamed over the original.
#[derive(Debug)]
pub struct JsonEventStore {
    path: PathBuf,
    inner: MemoryEventStore,
}

impl JsonEventStore {
    /// Open `events.json` in the data directory.
    pub fn open_default() -> Result<Self, crate::error::CoreError> {
        Ok(Self::open(data_dir()?.join("events.json"))?)
    }

    /// Open a store file; a missing or empty file is an empty store.
    ///
    /// Records without an id get one, and the file is rewritten so the ids
    /// survive the next open. Records with `end_time <= start_time` make the
    /// file corrupt.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let events = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => Vec::new(),
            Ok(content) => serde_json::from_str::<Vec<Event>>(&content).map_err(|e| {
                StoreError::Corrupt {
                    path: path.clone(),
                    message: e.to_string(),
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let missing_ids = events.iter().filter(|e| e.id.is_none()).count();
        let store = Self {
            path,
            inner: MemoryEventStore::with_events(events),
        };
        if missing_ids > 0 {
            tracing::debug!(
                count = missing_ids,
                path = %store.path.display(),
                "assigned ids to stored events"
            );
            store.flush()?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        let json = serde_json::to_string_pretty(&self.inner.events).map_err(|e| {
            StoreError::Corrupt {
                path: self.path.clone(),
                message: e.to_string(),
            }
        })?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

impl EventStore for JsonEventStore {
    fn list(&self) -> Result<Vec<Event>, StoreError> {
        self.inner.list()
    }

    fn create(&mut self, event: &Event) -> Result<String, StoreError> {
        let id = self.inner.create(event)?;
        self.flush()?;
        Ok(id)
    }

    fn update(&mut self, id: &str, event: &Event) -> Result<(), StoreError> {
        self.inner.update(id, event)?;
        self.flush()
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.inner.delete(id)?;
        self.flush()
    }
}
