//! # TimeWeave Core Library
//!
//! Business logic for the TimeWeave weekly planner: a user's fixed
//! commitments are overlaid with automatically suggested study sessions that
//! follow their chronotype's energy peak. The CLI is a thin layer over this
//! crate.
//!
//! ## Architecture
//!
//! - **Profile**: chronotype, wake-up time and sleep duration, interpreted as
//!   an active window and an energy-peak range
//! - **Timeline**: half-open time slots and free-slot detection
//! - **Scheduler**: the pure weekly planner and the overlap validator
//! - **Storage**: event store boundary, batch persist, TOML configuration
//!
//! ## Key Components
//!
//! - [`StudyScheduler`]: plans one week of study suggestions
//! - [`generate_study_schedule`]: the planner with default policy
//! - [`validate_suggestion`]: conflict check before saving
//! - [`EventStore`]: trait for event persistence
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod profile;
pub mod scheduler;
pub mod storage;
pub mod timeline;

pub use error::{ConfigError, CoreError, ProfileError, StoreError, ValidationError};
pub use events::{Event, EventType};
pub use profile::{ActiveWindow, Chronotype, EnergyPeakRange, ParsedTime, Profile, ProfileSignals};
pub use scheduler::{
    find_conflict, generate_study_schedule, validate_suggestion, PlannerConfig, SessionKind,
    StudyScheduler,
};
pub use storage::{
    persist_suggestions, Config, EventStore, JsonEventStore, MemoryEventStore, PersistReport,
};
pub use timeline::{find_free_slots, TimeSlot};
