use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::layout::{layout, LaidOutRow, RowKind};
use super::router::{route_all, ArrowPath, RoutedBar};
use super::{Rect, BAR_INSET, HEADER_HEIGHT, ROW_GAP, ROW_HEIGHT};
use crate::flexibility::{classify, intensity_shade, FlexibilityStatus};
use crate::model::{Task, TaskId, TimelineScale, WorkCalendar, ZoomLevel};
use crate::workload::{aggregate, LoadBand};

/// One task bar, positioned and classified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarShape {
    pub task_id: TaskId,
    pub rect: Rect,
    /// Index into [`Scene::rows`].
    pub row: usize,
    pub summary: bool,
    /// Completion fraction, 0.0–1.0.
    pub progress: f32,
    pub label: String,
    /// Absent when the task lacks the data to classify.
    pub status: Option<FlexibilityStatus>,
    /// Intensity shade for the bar fill, clamped for display.
    pub shade: f64,
}

/// One day of the aggregate workload strip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub x: f32,
    pub width: f32,
    /// Raw utilization ratio; may exceed 1.0.
    pub utilization: f64,
    pub band: LoadBand,
}

/// Renderer-agnostic description of one chart frame. The host translates
/// this into its own drawing primitives and owns hit testing against the
/// reported geometry.
#[derive(Debug, Clone, Serialize)]
pub struct Scene {
    pub scale: TimelineScale,
    pub rows: Vec<LaidOutRow>,
    pub bars: Vec<BarShape>,
    pub arrows: Vec<ArrowPath>,
    pub heatmap: Vec<HeatmapCell>,
    pub today_x: f32,
    pub width: f32,
    pub height: f32,
}

impl Scene {
    /// Assemble the scene for one render pass: layout, classification,
    /// workload aggregation, and dependency routing, all from the snapshot
    /// handed in. Nothing is retained between passes.
    pub fn build(
        tasks: &[Task],
        calendar: &WorkCalendar,
        zoom: ZoomLevel,
        today: NaiveDate,
    ) -> Scene {
        let scale = TimelineScale::from_tasks(tasks, zoom, today);
        let rows = layout(tasks);
        let by_id: HashMap<TaskId, &Task> = tasks.iter().map(|t| (t.id, t)).collect();

        let mut bars = Vec::new();
        let mut anchors: HashMap<TaskId, RoutedBar> = HashMap::new();
        for (row_index, row) in rows.iter().enumerate() {
            let RowKind::Task { task_id, summary } = &row.kind else {
                continue;
            };
            let (task_id, summary) = (*task_id, *summary);
            let Some(task) = by_id.get(&task_id).copied() else {
                continue;
            };
            let Some((start, due)) = task.span() else {
                continue;
            };
            let (x0, x1) = scale.bar_x_range(start, due);
            let rect = Rect::new(x0, row.y + BAR_INSET, x1, row.y + ROW_HEIGHT - BAR_INSET);
            anchors.insert(task.id, RoutedBar { rect, row: row_index });

            // Summary bars are display-only aggregates: no classification,
            // no intensity fill.
            let (status, shade) = if summary {
                (None, 0.0)
            } else {
                let status = classify(task, calendar, today, None).map(|s| s.status);
                let total = calendar.available_hours_between(start, due);
                let shade = match task.estimated_hours {
                    Some(estimate) if total > 0.0 => intensity_shade(estimate / total),
                    _ => 0.0,
                };
                (status, shade)
            };

            bars.push(BarShape {
                task_id: task.id,
                rect,
                row: row_index,
                summary,
                progress: task.progress(),
                label: task.subject.clone(),
                status,
                shade,
            });
        }

        let arrows = route_all(tasks.iter().flat_map(|t| t.relations.iter()), &anchors);

        let heatmap = aggregate(tasks, calendar, scale.min_date, scale.max_date)
            .into_iter()
            .map(|(date, utilization)| HeatmapCell {
                date,
                x: scale.date_to_x(date),
                width: zoom.pixels_per_day(),
                utilization,
                band: LoadBand::for_utilization(utilization),
            })
            .collect();

        let height = HEADER_HEIGHT + rows.len() as f32 * (ROW_HEIGHT + ROW_GAP);
        Scene {
            today_x: scale.date_to_x(today),
            width: scale.total_width(),
            height,
            scale,
            rows,
            bars,
            arrows,
            heatmap,
        }
    }
}
