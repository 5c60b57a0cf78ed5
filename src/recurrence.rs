//! Recurrence descriptors and RRULE encoding.
//!
//! Encodes a meeting's recurrence into an iCalendar RRULE value. `UNTIL`
//! limits come in two flavours: the meeting's local clock for ICS output,
//! and a UTC-normalized form with the trailing "Z" for provider APIs and
//! the rrule parser.

use chrono::{Datelike, NaiveDate, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{CourseCalError, CourseCalResult};
use crate::meeting::RecurringMeeting;

/// Two-letter iCalendar day codes, indexed by days from Monday.
pub const DAY_CODES: [&str; 7] = ["MO", "TU", "WE", "TH", "FR", "SA", "SU"];

/// Repetition granularity of a recurring meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OccurrenceUnit {
    Daily,
    Weekly,
    /// Monthly on the nth weekday of the month (e.g. 3rd Tuesday).
    MonthlyByWeekday,
    /// Monthly on the same day-of-month number.
    MonthlyByDay,
    Yearly,
}

/// How a recurrence ends: after a fixed number of occurrences, or on an
/// inclusive end date. Exactly one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OccurrenceLimit {
    Count(u32),
    Until(NaiveDate),
}

/// Recurrence descriptor attached to a [`RecurringMeeting`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recurrence {
    pub unit: OccurrenceUnit,
    /// Stride between occurrences, >= 1.
    pub interval: u32,
    pub limit: OccurrenceLimit,
    /// Weekdays the meeting repeats on. Required for weekly rules, ignored
    /// otherwise.
    pub weekdays: Vec<Weekday>,
}

/// RRULE value for a meeting, e.g. `FREQ=WEEKLY;COUNT=10;BYDAY=MO,WE;INTERVAL=1`.
///
/// `Ok(None)` when the meeting does not repeat. `UNTIL` stays in the
/// meeting's local clock, alongside a TZID-qualified DTSTART.
pub fn rrule_value(meeting: &RecurringMeeting) -> CourseCalResult<Option<String>> {
    meeting.validate()?;
    match &meeting.recurrence {
        Some(recurrence) => Ok(Some(encode(meeting, recurrence, limit_clause_local(&recurrence.limit)))),
        None => Ok(None),
    }
}

/// Same as [`rrule_value`] but with the `UNTIL` clause normalized to UTC.
///
/// The limit date is taken as end-of-day in the meeting's timezone, then
/// converted; the Google Calendar API rejects anything else.
pub fn rrule_value_utc(meeting: &RecurringMeeting) -> CourseCalResult<Option<String>> {
    meeting.validate()?;
    match &meeting.recurrence {
        Some(recurrence) => {
            let limit = limit_clause_utc(meeting, &recurrence.limit)?;
            Ok(Some(encode(meeting, recurrence, limit)))
        }
        None => Ok(None),
    }
}

fn encode(meeting: &RecurringMeeting, recurrence: &Recurrence, limit: String) -> String {
    let interval = recurrence.interval;
    match recurrence.unit {
        OccurrenceUnit::Daily => format!("FREQ=DAILY;{limit};INTERVAL={interval}"),
        OccurrenceUnit::Weekly => format!(
            "FREQ=WEEKLY;{limit};BYDAY={};INTERVAL={interval}",
            weekday_codes(&recurrence.weekdays)
        ),
        OccurrenceUnit::MonthlyByWeekday => format!(
            "FREQ=MONTHLY;{limit};INTERVAL={interval};BYDAY={}{}",
            (meeting.date_start.day() - 1) / 7 + 1,
            day_code(meeting.date_start.weekday())
        ),
        OccurrenceUnit::MonthlyByDay => format!(
            "FREQ=MONTHLY;{limit};INTERVAL={interval};BYMONTHDAY={}",
            meeting.date_start.day()
        ),
        OccurrenceUnit::Yearly => format!("FREQ=YEARLY;{limit};INTERVAL={interval}"),
    }
}

fn limit_clause_local(limit: &OccurrenceLimit) -> String {
    match limit {
        OccurrenceLimit::Count(n) => format!("COUNT={n}"),
        // End of the limit day, so the date itself stays inclusive.
        OccurrenceLimit::Until(date) => format!("UNTIL={}T235959", date.format("%Y%m%d")),
    }
}

fn limit_clause_utc(meeting: &RecurringMeeting, limit: &OccurrenceLimit) -> CourseCalResult<String> {
    match limit {
        OccurrenceLimit::Count(n) => Ok(format!("COUNT={n}")),
        OccurrenceLimit::Until(date) => {
            let tz = meeting.tz()?;
            let end_of_day = date.and_hms_opt(23, 59, 59).unwrap();
            let localized = tz.from_local_datetime(&end_of_day).earliest().ok_or_else(|| {
                CourseCalError::InvalidRecurrence(format!(
                    "'{}': limit date {date} has no valid local time in {}",
                    meeting.name, meeting.timezone
                ))
            })?;
            Ok(format!(
                "UNTIL={}",
                localized.with_timezone(&Utc).format("%Y%m%dT%H%M%SZ")
            ))
        }
    }
}

/// Comma-joined BYDAY codes, ordered Monday-first and deduplicated.
fn weekday_codes(weekdays: &[Weekday]) -> String {
    let mut days: Vec<u32> = weekdays.iter().map(Weekday::num_days_from_monday).collect();
    days.sort_unstable();
    days.dedup();
    days.iter()
        .map(|&d| DAY_CODES[d as usize])
        .collect::<Vec<_>>()
        .join(",")
}

fn day_code(weekday: Weekday) -> &'static str {
    DAY_CODES[weekday.num_days_from_monday() as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn make_meeting(recurrence: Option<Recurrence>) -> RecurringMeeting {
        RecurringMeeting {
            name: "Operating Systems".to_string(),
            description: String::new(),
            location: "ERC 1080".to_string(),
            seats_filled: 0,
            max_capacity: -1,
            is_virtual: false,
            colour: None,
            date_start: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            date_end: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            time_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            time_end: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            timezone: "America/Toronto".to_string(),
            recurrence,
        }
    }

    #[test]
    fn test_weekly_rule_has_freq_and_byday() {
        let meeting = make_meeting(Some(Recurrence {
            unit: OccurrenceUnit::Weekly,
            interval: 1,
            limit: OccurrenceLimit::Count(10),
            weekdays: vec![Weekday::Mon, Weekday::Wed],
        }));

        let rule = rrule_value(&meeting).unwrap().unwrap();
        assert_eq!(rule, "FREQ=WEEKLY;COUNT=10;BYDAY=MO,WE;INTERVAL=1");
    }

    #[test]
    fn test_byday_order_is_monday_first() {
        let meeting = make_meeting(Some(Recurrence {
            unit: OccurrenceUnit::Weekly,
            interval: 2,
            limit: OccurrenceLimit::Count(4),
            weekdays: vec![Weekday::Fri, Weekday::Tue, Weekday::Fri],
        }));

        let rule = rrule_value(&meeting).unwrap().unwrap();
        assert!(rule.contains("BYDAY=TU,FR"), "Got: {rule}");
    }

    #[test]
    fn test_monthly_by_weekday_third_tuesday() {
        // 2024-01-16 is the 3rd Tuesday of January 2024.
        let mut meeting = make_meeting(Some(Recurrence {
            unit: OccurrenceUnit::MonthlyByWeekday,
            interval: 1,
            limit: OccurrenceLimit::Count(6),
            weekdays: vec![],
        }));
        meeting.date_start = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
        meeting.date_end = meeting.date_start;

        let rule = rrule_value(&meeting).unwrap().unwrap();
        assert_eq!(rule, "FREQ=MONTHLY;COUNT=6;INTERVAL=1;BYDAY=3TU");
    }

    #[test]
    fn test_monthly_by_day_uses_start_day_of_month() {
        let mut meeting = make_meeting(Some(Recurrence {
            unit: OccurrenceUnit::MonthlyByDay,
            interval: 3,
            limit: OccurrenceLimit::Count(4),
            weekdays: vec![],
        }));
        meeting.date_start = NaiveDate::from_ymd_opt(2024, 5, 21).unwrap();
        meeting.date_end = meeting.date_start;

        let rule = rrule_value(&meeting).unwrap().unwrap();
        assert_eq!(rule, "FREQ=MONTHLY;COUNT=4;INTERVAL=3;BYMONTHDAY=21");
    }

    #[test]
    fn test_until_limit_is_end_of_day_local() {
        let meeting = make_meeting(Some(Recurrence {
            unit: OccurrenceUnit::Daily,
            interval: 1,
            limit: OccurrenceLimit::Until(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()),
            weekdays: vec![],
        }));

        let rule = rrule_value(&meeting).unwrap().unwrap();
        assert_eq!(rule, "FREQ=DAILY;UNTIL=20240131T235959;INTERVAL=1");
    }

    #[test]
    fn test_until_limit_utc_crosses_midnight() {
        // Toronto is UTC-5 on 2024-01-31, so local end-of-day lands on the
        // next UTC morning.
        let meeting = make_meeting(Some(Recurrence {
            unit: OccurrenceUnit::Daily,
            interval: 1,
            limit: OccurrenceLimit::Until(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()),
            weekdays: vec![],
        }));

        let rule = rrule_value_utc(&meeting).unwrap().unwrap();
        assert_eq!(rule, "FREQ=DAILY;UNTIL=20240201T045959Z;INTERVAL=1");
    }

    #[test]
    fn test_no_recurrence_encodes_nothing() {
        let meeting = make_meeting(None);
        assert_eq!(rrule_value(&meeting).unwrap(), None);
        assert_eq!(rrule_value_utc(&meeting).unwrap(), None);
    }
}
