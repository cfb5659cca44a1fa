use std::cell::RefCell;
use std::num::NonZeroUsize;

use chrono::{Datelike, NaiveDate};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Hours of availability for each weekday, Monday first.
///
/// A zero-hour day is non-working.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    hours: [f64; 7],
}

impl WeeklySchedule {
    /// Build a schedule from Monday-first hour slots. Negative input is
    /// clamped to zero.
    pub fn new(hours: [f64; 7]) -> Self {
        Self {
            hours: hours.map(|h| h.max(0.0)),
        }
    }

    /// Eight hours Monday through Friday.
    pub fn standard() -> Self {
        Self::new([8.0, 8.0, 8.0, 8.0, 8.0, 0.0, 0.0])
    }

    /// Scheduled hours on the given date's weekday.
    pub fn hours_on(&self, date: NaiveDate) -> f64 {
        self.hours[date.weekday().num_days_from_monday() as usize]
    }

    pub fn is_working(&self, date: NaiveDate) -> bool {
        self.hours_on(date) > 0.0
    }

    pub fn hours_per_week(&self) -> f64 {
        self.hours.iter().sum()
    }

    pub fn working_days_per_week(&self) -> i64 {
        self.hours.iter().filter(|h| **h > 0.0).count() as i64
    }

    fn hours_at(&self, weekday_index: usize) -> f64 {
        self.hours[weekday_index % 7]
    }
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, Copy)]
struct SpanTotals {
    working_days: i64,
    available_hours: f64,
}

const SPAN_CACHE_CAP: usize = 4096;

/// Working-time arithmetic over a weekly schedule.
///
/// Every render pass re-asks the same span questions, so answers are
/// memoized per `(start, end)`; replacing the schedule clears the cache.
/// Queries run in O(1) of the span length: full weeks are multiplied out
/// and only the 0–6 remainder days are walked.
#[derive(Debug)]
pub struct WorkCalendar {
    schedule: WeeklySchedule,
    cache: RefCell<LruCache<(NaiveDate, NaiveDate), SpanTotals>>,
}

impl WorkCalendar {
    pub fn new(schedule: WeeklySchedule) -> Self {
        let cap = NonZeroUsize::new(SPAN_CACHE_CAP).unwrap_or(NonZeroUsize::MIN);
        Self {
            schedule,
            cache: RefCell::new(LruCache::new(cap)),
        }
    }

    pub fn schedule(&self) -> &WeeklySchedule {
        &self.schedule
    }

    /// Replace the schedule, invalidating every memoized span.
    pub fn set_schedule(&mut self, schedule: WeeklySchedule) {
        if schedule == self.schedule {
            return;
        }
        self.schedule = schedule;
        self.cache.get_mut().clear();
        debug!(target: "workline::schedule", "schedule replaced, span cache cleared");
    }

    /// Inclusive count of working days in `start..=end`.
    ///
    /// A reversed range encodes how overdue it is: the result is `-(n - 1)`
    /// where `n` counts working days over `end..=start`.
    pub fn working_days_between(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        if end < start {
            -(self.totals(end, start).working_days - 1)
        } else {
            self.totals(start, end).working_days
        }
    }

    /// Scheduled hours in `start..=end`; zero for reversed ranges.
    pub fn available_hours_between(&self, start: NaiveDate, end: NaiveDate) -> f64 {
        if end < start {
            0.0
        } else {
            self.totals(start, end).available_hours
        }
    }

    fn totals(&self, start: NaiveDate, end: NaiveDate) -> SpanTotals {
        debug_assert!(start <= end);
        if let Some(totals) = self.cache.borrow_mut().get(&(start, end)) {
            return *totals;
        }
        let totals = self.compute_totals(start, end);
        self.cache.borrow_mut().put((start, end), totals);
        totals
    }

    fn compute_totals(&self, start: NaiveDate, end: NaiveDate) -> SpanTotals {
        let span_days = (end - start).num_days() + 1;
        let full_weeks = span_days / 7;
        let remainder = (span_days % 7) as usize;

        let mut working_days = full_weeks * self.schedule.working_days_per_week();
        let mut available_hours = full_weeks as f64 * self.schedule.hours_per_week();

        // Remainder days carry the same weekdays as the first `remainder`
        // days of the span.
        let first_weekday = start.weekday().num_days_from_monday() as usize;
        for offset in 0..remainder {
            let hours = self.schedule.hours_at(first_weekday + offset);
            if hours > 0.0 {
                working_days += 1;
            }
            available_hours += hours;
        }

        SpanTotals {
            working_days,
            available_hours,
        }
    }
}
