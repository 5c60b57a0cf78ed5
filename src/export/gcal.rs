//! Google Calendar event payload generation.
//!
//! Builds the JSON bodies that the calendar provider's events.insert API
//! accepts. Timestamps stay naive-local with an explicit timeZone field;
//! the recurrence array carries the UTC-normalized RRULE.

use serde::{Deserialize, Serialize};

use crate::error::{CourseCalError, CourseCalResult};
use crate::meeting::{MeetingSource, RecurringMeeting, SingleOccurrence};
use crate::recurrence::rrule_value_utc;

const GCAL_DT: &str = "%Y-%m-%dT%H:%M:%S";

/// `start`/`end` of a provider event: a naive-local timestamp plus the IANA
/// zone it is expressed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcalDateTime {
    #[serde(rename = "dateTime")]
    pub date_time: String,
    #[serde(rename = "timeZone")]
    pub time_zone: String,
}

/// One event body for the provider API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcalEvent {
    pub summary: String,
    pub location: String,
    pub description: String,
    pub start: GcalDateTime,
    pub end: GcalDateTime,
    /// Empty for one-off meetings, else exactly one RRULE string.
    pub recurrence: Vec<String>,
}

/// Build one event body per source item.
pub fn gcal_event_bodies(sources: &[MeetingSource]) -> CourseCalResult<Vec<GcalEvent>> {
    if sources.is_empty() {
        return Err(CourseCalError::EmptySource);
    }

    sources.iter().map(build_event_body).collect()
}

fn build_event_body(source: &MeetingSource) -> CourseCalResult<GcalEvent> {
    match source {
        MeetingSource::Recurring(meeting) => build_from_meeting(meeting),
        MeetingSource::Single(occurrence) => Ok(build_from_occurrence(occurrence)),
    }
}

fn build_from_meeting(meeting: &RecurringMeeting) -> CourseCalResult<GcalEvent> {
    let recurrence = rrule_value_utc(meeting)?
        .map(|rule| vec![format!("RRULE:{rule}")])
        .unwrap_or_default();

    Ok(GcalEvent {
        summary: meeting.name.clone(),
        location: meeting.location.clone(),
        description: meeting.description.clone(),
        start: GcalDateTime {
            date_time: meeting.starts_at().format(GCAL_DT).to_string(),
            time_zone: meeting.timezone.clone(),
        },
        end: GcalDateTime {
            date_time: meeting.ends_at().format(GCAL_DT).to_string(),
            time_zone: meeting.timezone.clone(),
        },
        recurrence,
    })
}

fn build_from_occurrence(occurrence: &SingleOccurrence) -> GcalEvent {
    GcalEvent {
        summary: occurrence.name.clone(),
        location: occurrence.location.clone(),
        description: occurrence.description.clone(),
        start: GcalDateTime {
            date_time: occurrence.starts_at().format(GCAL_DT).to_string(),
            time_zone: occurrence.timezone.clone(),
        },
        end: GcalDateTime {
            date_time: occurrence.ends_at().format(GCAL_DT).to_string(),
            time_zone: occurrence.timezone.clone(),
        },
        recurrence: Vec::new(),
    }
}
