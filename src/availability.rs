//! Seat-occupancy aggregation over a date × time-of-day scope.
//!
//! Occurrences are bucketed into a grid of scope days by half-hour
//! intervals; each cell holds the sum of `seats_filled` over every
//! occurrence covering it.

use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{CourseCalError, CourseCalResult};
use crate::meeting::SingleOccurrence;

/// Caller-chosen aggregation window: an inclusive date range and an
/// hour-of-day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    /// First hour of day covered by the grid, in [0, 23].
    pub hour_start: u32,
    /// End hour of day (exclusive bucket bound), in [0, 23].
    pub hour_end: u32,
}

impl Scope {
    pub fn validate(&self) -> CourseCalResult<()> {
        if self.date_start > self.date_end {
            return Err(CourseCalError::InvalidScope(format!(
                "Expected scope_date_start={} <= scope_date_end={}",
                self.date_start, self.date_end
            )));
        }
        if self.hour_start > 23 {
            return Err(CourseCalError::InvalidScope(format!(
                "Expected 0 <= scope_hour_start={} <= 23",
                self.hour_start
            )));
        }
        if self.hour_end > 23 {
            return Err(CourseCalError::InvalidScope(format!(
                "Expected 0 <= scope_hour_end={} <= 23",
                self.hour_end
            )));
        }
        if self.hour_start >= self.hour_end {
            return Err(CourseCalError::InvalidScope(format!(
                "Expected scope_hour_start={} < scope_hour_end={}",
                self.hour_start, self.hour_end
            )));
        }
        Ok(())
    }

    /// Days in scope, both ends inclusive.
    pub fn num_days(&self) -> usize {
        ((self.date_end - self.date_start).num_days() + 1) as usize
    }

    /// Half-hour intervals per day.
    pub fn num_intervals(&self) -> usize {
        (2 * (self.hour_end - self.hour_start)) as usize
    }

    /// The scope days in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.num_days() as i64).map(|d| self.date_start + Duration::days(d))
    }

    /// Column labels, one per half-hour interval, e.g. `08:00-08:30`.
    pub fn interval_labels(&self) -> Vec<String> {
        (self.hour_start * 2..self.hour_end * 2)
            .map(|i| {
                format!(
                    "{:02}:{:02}-{:02}:{:02}",
                    i / 2,
                    i % 2 * 30,
                    (i + 1) / 2,
                    (i + 1) % 2 * 30
                )
            })
            .collect()
    }
}

/// Day-indexed × half-hour-indexed occupancy matrix for one [`Scope`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityGrid {
    scope: Scope,
    /// Row per scope day, column per half-hour interval.
    cells: Vec<Vec<u32>>,
}

impl AvailabilityGrid {
    /// Aggregate occurrences into a fresh grid.
    ///
    /// Occurrences whose dates do not intersect the scope are skipped.
    /// Contributing occurrences must keep their time of day inside
    /// `[hour_start:00, hour_end:00]`; anything else fails fast instead of
    /// indexing outside the grid.
    pub fn aggregate(
        occurrences: &[SingleOccurrence],
        scope: Scope,
    ) -> CourseCalResult<AvailabilityGrid> {
        scope.validate()?;

        let num_days = scope.num_days();
        let num_intervals = scope.num_intervals();
        let mut cells = vec![vec![0u32; num_intervals]; num_days];

        let window_start = NaiveTime::from_hms_opt(scope.hour_start, 0, 0).unwrap();
        let window_end = NaiveTime::from_hms_opt(scope.hour_end, 0, 0).unwrap();

        for occurrence in occurrences {
            // Date-range intersection with the scope, both ends inclusive.
            if occurrence.date_end < scope.date_start || occurrence.date_start > scope.date_end {
                continue;
            }

            if occurrence.time_start < window_start || occurrence.time_end > window_end {
                return Err(CourseCalError::OutsideScopeHours(format!(
                    "'{}' runs {}-{}, scope covers {:02}:00-{:02}:00",
                    occurrence.name,
                    occurrence.time_start.format("%H:%M"),
                    occurrence.time_end.format("%H:%M"),
                    scope.hour_start,
                    scope.hour_end
                )));
            }

            // Clamp multi-day spans to the grid edges after the
            // intersection test.
            let day_lo = (occurrence.date_start - scope.date_start).num_days().max(0) as usize;
            let day_hi = ((occurrence.date_end - scope.date_start).num_days() as usize)
                .min(num_days - 1);

            let time_lo = 2 * (occurrence.time_start.hour() as i64 - scope.hour_start as i64)
                + occurrence.time_start.minute() as i64 / 30;
            let time_hi = 2 * (occurrence.time_end.hour() as i64 - scope.hour_start as i64)
                + occurrence.time_end.minute() as i64 / 30
                - 1;
            if time_hi < time_lo {
                // Rounds to an empty half-hour range; nothing to add.
                continue;
            }

            for row in &mut cells[day_lo..=day_hi] {
                for cell in &mut row[time_lo as usize..=time_hi as usize] {
                    *cell += occurrence.seats_filled;
                }
            }
        }

        Ok(AvailabilityGrid { scope, cells })
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// (days, intervals)
    pub fn shape(&self) -> (usize, usize) {
        (self.cells.len(), self.scope.num_intervals())
    }

    pub fn rows(&self) -> &[Vec<u32>] {
        &self.cells
    }

    pub fn cell(&self, day: usize, interval: usize) -> u32 {
        self.cells[day][interval]
    }
}
