use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::task::Task;

/// Controls what scale the timeline displays.
///
/// Each level is a fixed pixels-per-day density; the host picks one and the
/// whole chart is laid out against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomLevel {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl ZoomLevel {
    pub fn pixels_per_day(self) -> f32 {
        match self {
            ZoomLevel::Day => 32.0,
            ZoomLevel::Week => 18.0,
            ZoomLevel::Month => 8.0,
            ZoomLevel::Quarter => 3.5,
            ZoomLevel::Year => 1.5,
        }
    }

    /// The next denser level (saturates at `Day`).
    pub fn zoom_in(self) -> ZoomLevel {
        match self {
            ZoomLevel::Year => ZoomLevel::Quarter,
            ZoomLevel::Quarter => ZoomLevel::Month,
            ZoomLevel::Month => ZoomLevel::Week,
            ZoomLevel::Week | ZoomLevel::Day => ZoomLevel::Day,
        }
    }

    /// The next coarser level (saturates at `Year`).
    pub fn zoom_out(self) -> ZoomLevel {
        match self {
            ZoomLevel::Day => ZoomLevel::Week,
            ZoomLevel::Week => ZoomLevel::Month,
            ZoomLevel::Month => ZoomLevel::Quarter,
            ZoomLevel::Quarter | ZoomLevel::Year => ZoomLevel::Year,
        }
    }
}

/// Days of slack added on both sides of the data extent.
const EXTENT_PAD_DAYS: i64 = 7;

/// Maps dates to horizontal pixel coordinates for one render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineScale {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    pub zoom: ZoomLevel,
}

impl TimelineScale {
    /// Build a scale spanning the snapshot's date extent, padded a week on
    /// each side. `fallback` anchors the scale when no task carries a date.
    pub fn from_tasks(tasks: &[Task], zoom: ZoomLevel, fallback: NaiveDate) -> Self {
        let mut min: Option<NaiveDate> = None;
        let mut max: Option<NaiveDate> = None;
        for task in tasks {
            for date in [task.start, task.due].into_iter().flatten() {
                min = Some(min.map_or(date, |m| m.min(date)));
                max = Some(max.map_or(date, |m| m.max(date)));
            }
        }
        Self {
            min_date: min.unwrap_or(fallback) - Duration::days(EXTENT_PAD_DAYS),
            max_date: max.unwrap_or(fallback) + Duration::days(EXTENT_PAD_DAYS),
            zoom,
        }
    }

    /// Convert a date to an x-pixel offset from the scale origin.
    pub fn date_to_x(&self, date: NaiveDate) -> f32 {
        let days = (date - self.min_date).num_days() as f32;
        days * self.zoom.pixels_per_day()
    }

    /// Convert an x-pixel offset back to a date, snapped to whole days.
    pub fn x_to_date(&self, x: f32) -> NaiveDate {
        let days = (x / self.zoom.pixels_per_day()).round() as i64;
        self.min_date + Duration::days(days)
    }

    /// Pixel range of a bar. The right edge is computed against the day
    /// after the due date so the bar covers the whole due day.
    pub fn bar_x_range(&self, start: NaiveDate, due: NaiveDate) -> (f32, f32) {
        (self.date_to_x(start), self.date_to_x(due + Duration::days(1)))
    }

    /// Total width in pixels of the padded extent.
    pub fn total_width(&self) -> f32 {
        self.date_to_x(self.max_date + Duration::days(1))
    }
}
