use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{Task, WorkCalendar};

/// Risk classification for a scheduled task.
///
/// Variants are declared in urgency order so `Ord` sorts the most urgent
/// work first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum FlexibilityStatus {
    Overbooked,
    AtRisk,
    OnTrack,
    Completed,
}

/// Derived scheduling-risk numbers for one task.
///
/// Recomputed from the current snapshot on every render pass; never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlexibilityScore {
    /// Slack the original plan had, as a rounded percentage. Negative means
    /// the plan was already too tight when it was made.
    pub initial: i32,
    /// Slack left between today and the due date, as a rounded percentage.
    pub remaining: i32,
    pub status: FlexibilityStatus,
    /// Signed working-day count to the due date; negative once past due.
    pub days_remaining: i64,
    pub hours_remaining: f64,
}

const AT_RISK_THRESHOLD: i32 = 20;

/// Classify one task against the calendar.
///
/// Returns `None` when the task has no due date or no estimate — there is
/// nothing to measure. `today` is explicit so classification stays a pure
/// function. `spent_override` substitutes for the task's recorded spent
/// hours when the caller tracks in-flight effort elsewhere.
pub fn classify(
    task: &Task,
    calendar: &WorkCalendar,
    today: NaiveDate,
    spent_override: Option<f64>,
) -> Option<FlexibilityScore> {
    let due = task.due?;
    let estimate = task.estimated_hours?;
    let effective_spent = spent_override.unwrap_or(task.spent_hours);

    // Over-budget but unfinished work would go negative under naive
    // subtraction; estimate the rest from the completion ratio instead.
    let hours_remaining = if effective_spent > estimate && task.done_ratio < 100 {
        estimate * (1.0 - f64::from(task.done_ratio) / 100.0)
    } else {
        (estimate - effective_spent).max(0.0)
    };

    let plan_start = task.start.unwrap_or(due);
    let initial = percent(calendar.available_hours_between(plan_start, due), estimate);
    let remaining = if hours_remaining > 0.0 {
        percent(calendar.available_hours_between(today, due), hours_remaining)
    } else {
        100
    };

    let status = if task.done_ratio >= 100 {
        FlexibilityStatus::Completed
    } else if remaining < 0 {
        FlexibilityStatus::Overbooked
    } else if remaining < AT_RISK_THRESHOLD {
        FlexibilityStatus::AtRisk
    } else {
        FlexibilityStatus::OnTrack
    };

    Some(FlexibilityScore {
        initial,
        remaining,
        status,
        days_remaining: calendar.working_days_between(today, due),
        hours_remaining,
    })
}

/// Slack of `avail` hours against `needed` hours as a rounded percentage:
/// positive is spare capacity, negative means the window cannot fit the
/// work, and zero is an exact fit.
fn percent(avail: f64, needed: f64) -> i32 {
    if needed <= 0.0 {
        100
    } else {
        ((avail / needed - 1.0) * 100.0).round() as i32
    }
}

/// Uniform share of the estimate allocated to one day of the task's span,
/// as a ratio of that day's scheduled hours. Zero outside the span, on
/// non-working days, and whenever the span has no working time at all. The
/// raw value may exceed 1.0; callers aggregating workload must use it
/// unclamped.
pub fn daily_intensity(task: &Task, calendar: &WorkCalendar, day: NaiveDate) -> f64 {
    let Some((start, due)) = task.span() else {
        return 0.0;
    };
    let Some(estimate) = task.estimated_hours else {
        return 0.0;
    };
    if day < start || day > due || !calendar.schedule().is_working(day) {
        return 0.0;
    }
    let total_available = calendar.available_hours_between(start, due);
    if total_available <= 0.0 {
        return 0.0;
    }
    estimate / total_available
}

/// Ceiling applied to intensity when used as a display shade.
pub const INTENSITY_SHADE_CAP: f64 = 1.5;

/// Intensity clamped for opacity/height rendering.
pub fn intensity_shade(intensity: f64) -> f64 {
    intensity.clamp(0.0, INTENSITY_SHADE_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WeeklySchedule;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn scheduled_task(estimate: f64, start: NaiveDate, due: NaiveDate) -> Task {
        let mut task = Task::new(1, "Work", 10, "Infra");
        task.estimated_hours = Some(estimate);
        task.start = Some(start);
        task.due = Some(due);
        task
    }

    // 2026-03-02 is a Monday.
    fn monday() -> NaiveDate {
        date(2026, 3, 2)
    }

    #[test]
    fn exact_fit_is_on_track_not_at_risk() {
        let cal = WorkCalendar::new(WeeklySchedule::standard());
        let task = scheduled_task(24.0, monday(), date(2026, 3, 4));
        let score = classify(&task, &cal, monday(), None).expect("classifiable");
        assert_eq!(score.initial, 0);
        assert_eq!(score.remaining, 0);
        assert_eq!(score.status, FlexibilityStatus::OnTrack);
        assert_eq!(score.days_remaining, 3);
        assert_eq!(score.hours_remaining, 24.0);
    }

    #[test]
    fn two_working_days_for_twenty_four_hours_is_overbooked() {
        let cal = WorkCalendar::new(WeeklySchedule::standard());
        let task = scheduled_task(24.0, monday(), date(2026, 3, 3));
        let score = classify(&task, &cal, monday(), None).expect("classifiable");
        assert_eq!(score.initial, -33);
        assert_eq!(score.remaining, -33);
        assert_eq!(score.status, FlexibilityStatus::Overbooked);
    }

    #[test]
    fn thin_slack_is_at_risk() {
        let cal = WorkCalendar::new(WeeklySchedule::standard());
        // 40 scheduled hours against a 36 hour estimate: 11% slack.
        let task = scheduled_task(36.0, monday(), date(2026, 3, 6));
        let score = classify(&task, &cal, monday(), None).expect("classifiable");
        assert_eq!(score.remaining, 11);
        assert_eq!(score.status, FlexibilityStatus::AtRisk);
    }

    #[test]
    fn missing_estimate_or_due_date_is_unclassifiable() {
        let cal = WorkCalendar::new(WeeklySchedule::standard());
        let mut no_estimate = scheduled_task(8.0, monday(), date(2026, 3, 6));
        no_estimate.estimated_hours = None;
        assert!(classify(&no_estimate, &cal, monday(), None).is_none());

        let mut no_due = scheduled_task(8.0, monday(), date(2026, 3, 6));
        no_due.due = None;
        assert!(classify(&no_due, &cal, monday(), None).is_none());
    }

    #[test]
    fn done_task_is_completed_even_when_past_due() {
        let cal = WorkCalendar::new(WeeklySchedule::standard());
        let mut task = scheduled_task(8.0, monday(), date(2026, 3, 3));
        task.done_ratio = 100;
        let today = date(2026, 3, 13);
        let score = classify(&task, &cal, today, None).expect("classifiable");
        assert_eq!(score.status, FlexibilityStatus::Completed);
        assert!(score.days_remaining < 0);
    }

    #[test]
    fn overspent_unfinished_work_falls_back_to_done_ratio() {
        let cal = WorkCalendar::new(WeeklySchedule::standard());
        let mut task = scheduled_task(10.0, monday(), date(2026, 3, 6));
        task.spent_hours = 14.0;
        task.done_ratio = 50;
        let score = classify(&task, &cal, monday(), None).expect("classifiable");
        assert_eq!(score.hours_remaining, 5.0);
    }

    #[test]
    fn spent_override_replaces_recorded_hours() {
        let cal = WorkCalendar::new(WeeklySchedule::standard());
        let mut task = scheduled_task(16.0, monday(), date(2026, 3, 6));
        task.spent_hours = 0.0;
        let score = classify(&task, &cal, monday(), Some(8.0)).expect("classifiable");
        assert_eq!(score.hours_remaining, 8.0);
    }

    #[test]
    fn status_sorts_by_urgency() {
        assert!(FlexibilityStatus::Overbooked < FlexibilityStatus::AtRisk);
        assert!(FlexibilityStatus::AtRisk < FlexibilityStatus::OnTrack);
        assert!(FlexibilityStatus::OnTrack < FlexibilityStatus::Completed);
    }

    #[test]
    fn intensity_spreads_estimate_uniformly_over_working_days() {
        let cal = WorkCalendar::new(WeeklySchedule::standard());
        let task = scheduled_task(24.0, monday(), date(2026, 3, 4));
        assert_eq!(daily_intensity(&task, &cal, monday()), 1.0);
        assert_eq!(daily_intensity(&task, &cal, date(2026, 3, 4)), 1.0);
        // Outside the span.
        assert_eq!(daily_intensity(&task, &cal, date(2026, 3, 5)), 0.0);
    }

    #[test]
    fn intensity_is_zero_on_non_working_days_and_dead_spans() {
        let cal = WorkCalendar::new(WeeklySchedule::standard());
        // Span covering a weekend only: no working time at all.
        let weekend = scheduled_task(8.0, date(2026, 3, 7), date(2026, 3, 8));
        assert_eq!(daily_intensity(&weekend, &cal, date(2026, 3, 7)), 0.0);

        let task = scheduled_task(80.0, monday(), date(2026, 3, 8));
        assert_eq!(daily_intensity(&task, &cal, date(2026, 3, 7)), 0.0);
    }

    #[test]
    fn shade_clamps_but_raw_value_does_not() {
        let cal = WorkCalendar::new(WeeklySchedule::standard());
        // 80 hours into one 8-hour day.
        let task = scheduled_task(80.0, monday(), monday());
        let raw = daily_intensity(&task, &cal, monday());
        assert_eq!(raw, 10.0);
        assert_eq!(intensity_shade(raw), INTENSITY_SHADE_CAP);
    }
}
