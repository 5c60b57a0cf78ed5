//! Core export and aggregation engine for the coursecal backend.
//!
//! Turns enrolled course meetings into exportable calendar artifacts and an
//! aggregated availability heatmap:
//! - `recurrence` encodes a meeting's repetition as an RRULE value
//! - `expand` turns recurring meetings into concrete occurrences
//! - `export` serializes source lists as ICS, provider event payloads,
//!   tabular CSV, listing summaries, and heatmap CSV/XLSX files
//! - `availability` aggregates seat occupancy over a date × hour scope
//!
//! Everything is synchronous and pure over its inputs; the only shared
//! resource is the cache directory, where each export writes under a fresh
//! UUID. HTTP routing, auth, and course lookup live in the calling service.

pub mod availability;
pub mod cache;
pub mod constants;
pub mod error;
pub mod expand;
pub mod export;
pub mod meeting;
pub mod recurrence;

pub use availability::{AvailabilityGrid, Scope};
pub use cache::CacheDir;
pub use error::{CourseCalError, CourseCalResult};
pub use expand::{expand_meeting, expand_source, expand_sources};
pub use meeting::{DisplayOverrides, MeetingSource, RecurringMeeting, SingleOccurrence};
pub use recurrence::{OccurrenceLimit, OccurrenceUnit, Recurrence};
