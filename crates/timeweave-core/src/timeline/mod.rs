//! Time-window model and free-slot detection.

mod slot;

pub use slot::{events_for_day, find_free_slots, TimeSlot};
