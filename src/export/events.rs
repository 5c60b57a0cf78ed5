//! Meeting summary payloads for API consumers.
//!
//! A flat, serializable view of each source item with its occupancy and
//! display fields, plus a recurrence string in the form rrule.js consumes.
//! Callers can pin `colour`/`is_virtual` for a whole listing through
//! [`DisplayOverrides`] instead of rewriting the descriptors.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{CourseCalError, CourseCalResult};
use crate::meeting::{DisplayOverrides, MeetingSource};
use crate::recurrence::rrule_value;

/// One source item flattened for a listing response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingSummary {
    pub name: String,
    pub description: String,
    pub location: String,
    pub seats_filled: u32,
    pub max_capacity: i32,
    pub is_virtual: bool,
    pub colour: Option<String>,
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,
    /// `DTSTART;TZID=...;` + `RRULE:` block for rrule.js, None for one-off
    /// meetings.
    pub rrule_js: Option<String>,
}

/// Flatten a source list into summaries, order preserved.
pub fn meeting_summaries(
    sources: &[MeetingSource],
    overrides: &DisplayOverrides,
) -> CourseCalResult<Vec<MeetingSummary>> {
    if sources.is_empty() {
        return Err(CourseCalError::EmptySource);
    }

    sources
        .iter()
        .map(|source| build_summary(source, overrides))
        .collect()
}

fn build_summary(
    source: &MeetingSource,
    overrides: &DisplayOverrides,
) -> CourseCalResult<MeetingSummary> {
    let (occurrence, rrule_js) = match source {
        MeetingSource::Recurring(meeting) => {
            let rrule_js = rrule_value(meeting)?.map(|rule| {
                format!(
                    "DTSTART;TZID={}:{};\nRRULE:{}",
                    meeting.timezone,
                    meeting.starts_at().format("%Y%m%dT%H%M%S"),
                    rule
                )
            });
            (meeting.as_single_occurrence(), rrule_js)
        }
        MeetingSource::Single(occurrence) => (occurrence.clone(), None),
    };

    Ok(MeetingSummary {
        name: occurrence.name,
        description: occurrence.description,
        location: occurrence.location,
        seats_filled: occurrence.seats_filled,
        max_capacity: occurrence.max_capacity,
        is_virtual: overrides.is_virtual.unwrap_or(occurrence.is_virtual),
        colour: overrides.colour.clone().or(occurrence.colour),
        time_start: occurrence.time_start,
        time_end: occurrence.time_end,
        rrule_js,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meeting::RecurringMeeting;
    use crate::recurrence::{OccurrenceLimit, OccurrenceUnit, Recurrence};
    use chrono::{NaiveDate, Weekday};

    fn make_test_meeting() -> RecurringMeeting {
        RecurringMeeting {
            name: "Thermodynamics".to_string(),
            description: String::new(),
            location: "ENG 2200".to_string(),
            seats_filled: 55,
            max_capacity: 90,
            is_virtual: false,
            colour: Some("#1d4ed8".to_string()),
            date_start: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            date_end: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            time_start: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            time_end: NaiveTime::from_hms_opt(11, 30, 0).unwrap(),
            timezone: "America/Toronto".to_string(),
            recurrence: Some(Recurrence {
                unit: OccurrenceUnit::Weekly,
                interval: 1,
                limit: OccurrenceLimit::Count(8),
                weekdays: vec![Weekday::Wed],
            }),
        }
    }

    #[test]
    fn test_empty_source_list_is_rejected() {
        assert!(matches!(
            meeting_summaries(&[], &DisplayOverrides::default()),
            Err(CourseCalError::EmptySource)
        ));
    }

    #[test]
    fn test_summary_carries_occupancy_and_rrule_js() {
        let sources = vec![MeetingSource::Recurring(make_test_meeting())];
        let summaries = meeting_summaries(&sources, &DisplayOverrides::default()).unwrap();

        assert_eq!(summaries.len(), 1);
        let summary = &summaries[0];
        assert_eq!(summary.seats_filled, 55);
        assert_eq!(summary.max_capacity, 90);
        assert_eq!(summary.colour.as_deref(), Some("#1d4ed8"));

        let rrule_js = summary.rrule_js.as_deref().unwrap();
        assert_eq!(
            rrule_js,
            "DTSTART;TZID=America/Toronto:20240110T100000;\nRRULE:FREQ=WEEKLY;COUNT=8;BYDAY=WE;INTERVAL=1"
        );
    }

    #[test]
    fn test_overrides_pin_display_fields() {
        let sources = vec![MeetingSource::Recurring(make_test_meeting())];
        let overrides = DisplayOverrides {
            colour: Some("#000000".to_string()),
            is_virtual: Some(true),
        };

        let summaries = meeting_summaries(&sources, &overrides).unwrap();
        assert_eq!(summaries[0].colour.as_deref(), Some("#000000"));
        assert!(summaries[0].is_virtual);
    }

    #[test]
    fn test_single_occurrence_has_no_rrule_js() {
        let sources = vec![MeetingSource::Single(
            make_test_meeting().as_single_occurrence(),
        )];
        let summaries = meeting_summaries(&sources, &DisplayOverrides::default()).unwrap();
        assert_eq!(summaries[0].rrule_js, None);
    }
}
