//! Occurrence expansion for recurring meetings.
//!
//! The export pipeline works on concrete instances: a recurring meeting is
//! expanded into an ordered, finite list of [`SingleOccurrence`]s bounded by
//! its occurrence limit. Expansion goes through the rrule crate against the
//! same RRULE text we export, so the two can never drift apart.

use chrono::Duration;
use rrule::RRuleSet;

use crate::constants::MAX_OCCURRENCES;
use crate::error::{CourseCalError, CourseCalResult};
use crate::meeting::{MeetingSource, RecurringMeeting, SingleOccurrence};
use crate::recurrence::rrule_value_utc;

/// Expand a meeting into its occurrences, in chronological order.
///
/// A one-off meeting yields itself. A recurring meeting yields one
/// occurrence per repetition, each spanning the same number of days as the
/// master, capped at [`MAX_OCCURRENCES`].
pub fn expand_meeting(meeting: &RecurringMeeting) -> CourseCalResult<Vec<SingleOccurrence>> {
    let Some(rule) = rrule_value_utc(meeting)? else {
        return Ok(vec![meeting.as_single_occurrence()]);
    };

    // The rrule parser wants a full DTSTART + RRULE document, and a
    // UTC-normalized UNTIL next to a TZID-qualified DTSTART.
    let rrule_text = format!(
        "DTSTART;TZID={}:{}\nRRULE:{}",
        meeting.timezone,
        meeting.starts_at().format("%Y%m%dT%H%M%S"),
        rule
    );

    let rrule_set: RRuleSet = rrule_text.parse().map_err(|e| {
        CourseCalError::RruleExpand(format!(
            "failed to parse RRULE for meeting '{}': {e}",
            meeting.name
        ))
    })?;

    let day_span = (meeting.date_end - meeting.date_start).num_days();
    let result = rrule_set.all(MAX_OCCURRENCES);

    let occurrences = result
        .dates
        .iter()
        .map(|occ_dt| {
            let date_start = occ_dt.date_naive();
            let mut occurrence = meeting.as_single_occurrence();
            occurrence.date_start = date_start;
            occurrence.date_end = date_start + Duration::days(day_span);
            occurrence
        })
        .collect();

    Ok(occurrences)
}

/// Expand one source item: descriptors are expanded, pre-expanded
/// occurrences pass through as a list of one.
pub fn expand_source(source: &MeetingSource) -> CourseCalResult<Vec<SingleOccurrence>> {
    match source {
        MeetingSource::Recurring(meeting) => expand_meeting(meeting),
        MeetingSource::Single(occurrence) => Ok(vec![occurrence.clone()]),
    }
}

/// Flatten a mixed source list into concrete occurrences, order preserved.
pub fn expand_sources(sources: &[MeetingSource]) -> CourseCalResult<Vec<SingleOccurrence>> {
    let mut occurrences = Vec::new();
    for source in sources {
        occurrences.extend(expand_source(source)?);
    }
    Ok(occurrences)
}
