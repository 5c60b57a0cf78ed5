//! ICS calendar generation.
//!
//! One VEVENT per source item. Recurring meetings keep their RRULE line;
//! pre-expanded occurrences are emitted as plain events.

use std::path::PathBuf;

use chrono::{NaiveDateTime, Utc};
use icalendar::{Calendar, Component, EventLike, Property};
use tracing::debug;
use uuid::Uuid;

use crate::cache::CacheDir;
use crate::constants::BASE_ICS_FILENAME;
use crate::error::{CourseCalError, CourseCalResult};
use crate::meeting::{MeetingSource, RecurringMeeting, SingleOccurrence};
use crate::recurrence::rrule_value;

/// Generate an .ics document for a source list and write it to the cache.
///
/// Returns the cache path of the created file. An empty source list fails
/// before anything is written.
pub fn create_ics_calendar(
    sources: &[MeetingSource],
    cache: &CacheDir,
) -> CourseCalResult<PathBuf> {
    if sources.is_empty() {
        return Err(CourseCalError::EmptySource);
    }

    let mut cal = Calendar::new();
    for source in sources {
        match source {
            MeetingSource::Recurring(meeting) => {
                cal.push(build_meeting_event(meeting)?);
            }
            MeetingSource::Single(occurrence) => {
                cal.push(build_occurrence_event(occurrence));
            }
        }
    }

    let output = normalize_calendar(&cal.done().to_string());

    let file_path = cache.allocate(BASE_ICS_FILENAME, &Uuid::new_v4().simple().to_string())?;
    std::fs::write(&file_path, output)?;
    debug!(path = %file_path.display(), events = sources.len(), "wrote ics calendar");
    Ok(file_path)
}

fn build_meeting_event(meeting: &RecurringMeeting) -> CourseCalResult<icalendar::Event> {
    // rrule_value validates the descriptor before anything is emitted.
    let rule = rrule_value(meeting)?;

    let mut event = base_event(
        &meeting.name,
        &meeting.description,
        &meeting.location,
        meeting.starts_at(),
        meeting.ends_at(),
        &meeting.timezone,
    );
    if let Some(rule) = rule {
        event.add_property("RRULE", rule);
    }
    Ok(event.done())
}

fn build_occurrence_event(occurrence: &SingleOccurrence) -> icalendar::Event {
    base_event(
        &occurrence.name,
        &occurrence.description,
        &occurrence.location,
        occurrence.starts_at(),
        occurrence.ends_at(),
        &occurrence.timezone,
    )
    .done()
}

fn base_event(
    summary: &str,
    description: &str,
    location: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
    tzid: &str,
) -> icalendar::Event {
    let mut event = icalendar::Event::new();
    event.uid(&format!("{}@coursecal", Uuid::new_v4()));
    event.summary(summary);
    event.description(description);
    event.location(location);

    // DTSTAMP - required by RFC 5545; generation time is fine since these
    // documents are built fresh per request.
    event.add_property("DTSTAMP", Utc::now().format("%Y%m%dT%H%M%SZ").to_string());

    add_zoned_property(&mut event, "DTSTART", start, tzid);
    add_zoned_property(&mut event, "DTEND", end, tzid);
    event
}

/// Add a datetime property with a TZID parameter.
fn add_zoned_property(
    event: &mut icalendar::Event,
    name: &str,
    datetime: NaiveDateTime,
    tzid: &str,
) {
    let mut prop = Property::new(name, datetime.format("%Y%m%dT%H%M%S").to_string());
    prop.add_parameter("TZID", tzid);
    event.append_property(prop);
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with our product identifier
/// - Remove CALSCALE:GREGORIAN (it's the default)
fn normalize_calendar(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:COURSECAL\r\n");
            continue;
        }
        if line == "CALSCALE:GREGORIAN" {
            continue;
        }
        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::{OccurrenceLimit, OccurrenceUnit, Recurrence};
    use chrono::{NaiveDate, NaiveTime, Weekday};

    fn make_test_meeting() -> RecurringMeeting {
        RecurringMeeting {
            name: "Software Design".to_string(),
            description: "Section 001\nBring laptops".to_string(),
            location: "UA 2240".to_string(),
            seats_filled: 60,
            max_capacity: 100,
            is_virtual: false,
            colour: None,
            date_start: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            date_end: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            time_start: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            time_end: NaiveTime::from_hms_opt(12, 30, 0).unwrap(),
            timezone: "America/Toronto".to_string(),
            recurrence: Some(Recurrence {
                unit: OccurrenceUnit::Weekly,
                interval: 1,
                limit: OccurrenceLimit::Count(12),
                weekdays: vec![Weekday::Mon],
            }),
        }
    }

    fn make_test_cache() -> CacheDir {
        CacheDir::new(std::env::temp_dir().join(format!("coursecal-test-{}", Uuid::new_v4())))
    }

    #[test]
    fn test_empty_source_list_is_rejected() {
        let cache = make_test_cache();
        assert!(matches!(
            create_ics_calendar(&[], &cache),
            Err(CourseCalError::EmptySource)
        ));
        assert!(!cache.root().exists(), "no file should have been written");
    }

    #[test]
    fn test_document_is_wrapped_and_branded() {
        let cache = make_test_cache();
        let sources = vec![MeetingSource::Recurring(make_test_meeting())];

        let path = create_ics_calendar(&sources, &cache).unwrap();
        let ics = std::fs::read_to_string(&path).unwrap();

        assert!(ics.starts_with("BEGIN:VCALENDAR"), "ICS:\n{ics}");
        assert!(ics.trim_end().ends_with("END:VCALENDAR"), "ICS:\n{ics}");
        assert!(ics.contains("PRODID:COURSECAL"), "ICS:\n{ics}");
        assert!(!ics.contains("CALSCALE"), "ICS:\n{ics}");
    }

    #[test]
    fn test_recurring_meeting_keeps_rrule_and_tzid() {
        let cache = make_test_cache();
        let sources = vec![MeetingSource::Recurring(make_test_meeting())];

        let path = create_ics_calendar(&sources, &cache).unwrap();
        let ics = std::fs::read_to_string(&path).unwrap();

        assert!(
            ics.contains("RRULE:FREQ=WEEKLY;COUNT=12;BYDAY=MO;INTERVAL=1"),
            "ICS:\n{ics}"
        );
        assert!(
            ics.contains("DTSTART;TZID=America/Toronto:20240108T110000"),
            "ICS:\n{ics}"
        );
        assert!(
            ics.contains("DTEND;TZID=America/Toronto:20240108T123000"),
            "ICS:\n{ics}"
        );
    }

    #[test]
    fn test_single_occurrence_has_no_rrule() {
        let cache = make_test_cache();
        let sources = vec![MeetingSource::Single(
            make_test_meeting().as_single_occurrence(),
        )];

        let path = create_ics_calendar(&sources, &cache).unwrap();
        let ics = std::fs::read_to_string(&path).unwrap();

        assert!(!ics.contains("RRULE"), "ICS:\n{ics}");
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 1);
    }

    #[test]
    fn test_one_event_block_per_source() {
        let cache = make_test_cache();
        let sources = vec![
            MeetingSource::Recurring(make_test_meeting()),
            MeetingSource::Single(make_test_meeting().as_single_occurrence()),
        ];

        let path = create_ics_calendar(&sources, &cache).unwrap();
        let ics = std::fs::read_to_string(&path).unwrap();

        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2, "ICS:\n{ics}");
        assert_eq!(ics.matches("END:VEVENT").count(), 2, "ICS:\n{ics}");
    }
}
