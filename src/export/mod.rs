//! Format-specific serializers for meeting sources and availability grids.

pub mod events;
pub mod gcal;
pub mod heatmap;
pub mod ics;
pub mod table;

pub use events::{MeetingSummary, meeting_summaries};
pub use gcal::{GcalDateTime, GcalEvent, gcal_event_bodies};
pub use heatmap::{HeatmapFiles, generate_heatmap, write_heatmap_csv, write_heatmap_xlsx};
pub use ics::create_ics_calendar;
pub use table::create_table_csv;
