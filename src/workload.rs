use std::collections::{BTreeMap, HashSet};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::{Task, TaskId, WorkCalendar};

/// Color band for a day's aggregate utilization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadBand {
    Low,
    Medium,
    High,
    Critical,
}

impl LoadBand {
    pub fn for_utilization(utilization: f64) -> LoadBand {
        if utilization <= 0.8 {
            LoadBand::Low
        } else if utilization <= 1.0 {
            LoadBand::Medium
        } else if utilization <= 1.2 {
            LoadBand::High
        } else {
            LoadBand::Critical
        }
    }
}

/// Sum per-day utilization across every schedulable task in the window.
///
/// Every date of the window appears in the result, zero-initialized, so the
/// heatmap always has a cell to color. Summary tasks (anything referenced
/// as a parent) and terminal tasks contribute nothing; a task needs both
/// span dates and an estimate to count. Each contributing task adds its
/// uniform `estimate / total_available` share on the working days it
/// covers.
pub fn aggregate(
    tasks: &[Task],
    calendar: &WorkCalendar,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> BTreeMap<NaiveDate, f64> {
    let mut load = BTreeMap::new();
    if window_end < window_start {
        return load;
    }
    let mut day = window_start;
    while day <= window_end {
        load.insert(day, 0.0);
        day += Duration::days(1);
    }

    let parents: HashSet<TaskId> = tasks.iter().filter_map(|t| t.parent_id).collect();

    for task in tasks {
        if parents.contains(&task.id) || task.is_done() || task.closed {
            continue;
        }
        let (Some(start), Some(due)) = (task.start, task.due) else {
            continue;
        };
        let Some(estimate) = task.estimated_hours else {
            continue;
        };
        let total_available = calendar.available_hours_between(start, due);
        if total_available <= 0.0 {
            continue;
        }
        let share = estimate / total_available;

        let mut day = start.max(window_start);
        let last = due.min(window_end);
        while day <= last {
            if calendar.schedule().is_working(day) {
                if let Some(cell) = load.get_mut(&day) {
                    *cell += share;
                }
            }
            day += Duration::days(1);
        }
    }

    load
}
