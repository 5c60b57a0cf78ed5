//! Meeting types shared by every exporter.
//!
//! A `RecurringMeeting` is one scheduled activity as it comes from upstream
//! course data, possibly repeating. A `SingleOccurrence` is one concrete
//! calendar instance of it. Exporters accept a mixed list of both through
//! `MeetingSource` and dispatch on the variant.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{CourseCalError, CourseCalResult};
use crate::recurrence::{OccurrenceUnit, Recurrence};

/// A scheduled meeting, possibly repeating (provider-neutral).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringMeeting {
    pub name: String,
    pub description: String,
    pub location: String,

    /// Seats currently taken across enrolled students.
    pub seats_filled: u32,
    /// Maximum seats, -1 = unlimited.
    pub max_capacity: i32,
    pub is_virtual: bool,
    pub colour: Option<String>,

    /// Calendar date span of the first occurrence.
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    /// Wall-clock time of day, identical for every occurrence.
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,
    /// IANA timezone identifier, e.g. "America/Toronto".
    pub timezone: String,

    /// None = a one-off meeting; recurrence fields only exist when it repeats.
    pub recurrence: Option<Recurrence>,
}

impl RecurringMeeting {
    /// Check the descriptor invariants that upstream data can violate.
    pub fn validate(&self) -> CourseCalResult<()> {
        if self.date_start > self.date_end {
            return Err(CourseCalError::InvalidMeeting(format!(
                "'{}': date_start={} is after date_end={}",
                self.name, self.date_start, self.date_end
            )));
        }

        if let Some(recurrence) = &self.recurrence {
            if recurrence.interval < 1 {
                return Err(CourseCalError::InvalidRecurrence(format!(
                    "'{}': occurrence interval must be >= 1",
                    self.name
                )));
            }
            if recurrence.unit == OccurrenceUnit::Weekly && recurrence.weekdays.is_empty() {
                return Err(CourseCalError::InvalidRecurrence(format!(
                    "'{}': weekly recurrence requires a non-empty weekday set",
                    self.name
                )));
            }
        }

        Ok(())
    }

    /// Naive local start of the first occurrence.
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date_start.and_time(self.time_start)
    }

    /// Naive local end of the first occurrence.
    pub fn ends_at(&self) -> NaiveDateTime {
        self.date_end.and_time(self.time_end)
    }

    /// Resolve the IANA timezone identifier.
    pub(crate) fn tz(&self) -> CourseCalResult<chrono_tz::Tz> {
        self.timezone
            .parse()
            .map_err(|_| CourseCalError::UnknownTimezone(self.timezone.clone()))
    }

    /// This meeting as one concrete instance, recurrence dropped.
    pub fn as_single_occurrence(&self) -> SingleOccurrence {
        SingleOccurrence {
            name: self.name.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            seats_filled: self.seats_filled,
            max_capacity: self.max_capacity,
            is_virtual: self.is_virtual,
            colour: self.colour.clone(),
            date_start: self.date_start,
            date_end: self.date_end,
            time_start: self.time_start,
            time_end: self.time_end,
            timezone: self.timezone.clone(),
        }
    }
}

/// One concrete, non-repeating calendar instance of a meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleOccurrence {
    pub name: String,
    pub description: String,
    pub location: String,

    pub seats_filled: u32,
    pub max_capacity: i32,
    pub is_virtual: bool,
    pub colour: Option<String>,

    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,
    pub timezone: String,
}

impl SingleOccurrence {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date_start.and_time(self.time_start)
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.date_end.and_time(self.time_end)
    }
}

/// Input to the exporters: either a recurring descriptor or a pre-expanded
/// occurrence. A closed union so dispatch is explicit at every call site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MeetingSource {
    Recurring(RecurringMeeting),
    Single(SingleOccurrence),
}

impl MeetingSource {
    pub fn name(&self) -> &str {
        match self {
            MeetingSource::Recurring(meeting) => &meeting.name,
            MeetingSource::Single(occurrence) => &occurrence.name,
        }
    }
}

/// Display-field overrides applied at build time. Callers sometimes pin
/// `colour` or `is_virtual` for a whole export without touching the
/// descriptors themselves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayOverrides {
    pub colour: Option<String>,
    pub is_virtual: Option<bool>,
}
