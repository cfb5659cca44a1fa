use chrono::{Duration, NaiveDate};

use super::Point;
use crate::model::{RelationKind, Task, TaskId, TimelineScale};
use crate::undo::EditIntent;

/// Label/timeline column split limits, pixels.
pub const MIN_LABEL_WIDTH: f32 = 120.0;
pub const MAX_LABEL_WIDTH: f32 = 480.0;
pub const DEFAULT_LABEL_WIDTH: f32 = 240.0;

/// Which bar edge a resize grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Left,
    Right,
}

/// What the host's hit test found under a pointer-down. The three regions
/// are disjoint, which is what keeps the gesture modes mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitTarget {
    BarEdge { task: TaskId, edge: ResizeEdge },
    LinkHandle { task: TaskId },
    ColumnSplitter,
}

#[derive(Debug, Clone, PartialEq)]
enum Gesture {
    Idle,
    Resize {
        task: TaskId,
        edge: ResizeEdge,
        old_start: Option<NaiveDate>,
        old_due: Option<NaiveDate>,
        /// Bar span at grab time (single-date bars collapsed).
        span: (NaiveDate, NaiveDate),
        grab_x: f32,
        /// Span with the dragged edge snapped to the pointer.
        current: (NaiveDate, NaiveDate),
    },
    Link {
        source: TaskId,
        pointer: Point,
        candidate: Option<TaskId>,
    },
    ColumnResize {
        grab_x: f32,
        origin_width: f32,
    },
}

/// What a finished gesture asks the host to do.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// Nothing: the gesture continues, was cancelled, or ended as a no-op.
    None,
    /// A date edit to submit through the edit log.
    Edit(EditIntent),
    /// Link released over a valid target: let the user pick a kind from
    /// [`crate::model::RelationKind::CREATABLE`], then call
    /// [`InteractionController::confirm_link`].
    ChooseRelation { source: TaskId, target: TaskId },
}

/// Client-side state machine for chart gestures.
///
/// At most one gesture is active at a time; a pointer-down while another
/// gesture is in flight is ignored. Gestures never touch the mutation
/// gateway themselves — they only produce [`EditIntent`] values.
#[derive(Debug)]
pub struct InteractionController {
    gesture: Gesture,
    label_width: f32,
    pending_link: Option<(TaskId, TaskId)>,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            gesture: Gesture::Idle,
            label_width: DEFAULT_LABEL_WIDTH,
            pending_link: None,
        }
    }

    /// Current label-column width; column resize only ever changes this.
    pub fn label_width(&self) -> f32 {
        self.label_width
    }

    /// True while a resize or link drag is in flight. Hosts suppress
    /// re-renders from concurrent refreshes during this window.
    pub fn is_dragging(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    /// The live resize preview, if a resize is in flight: `(task, start, due)`.
    pub fn resize_preview(&self) -> Option<(TaskId, NaiveDate, NaiveDate)> {
        match &self.gesture {
            Gesture::Resize { task, current, .. } => Some((*task, current.0, current.1)),
            _ => None,
        }
    }

    /// The highlighted link candidate, if a link drag is in flight.
    pub fn link_candidate(&self) -> Option<TaskId> {
        match &self.gesture {
            Gesture::Link { candidate, .. } => *candidate,
            _ => None,
        }
    }

    /// The temporary arrow endpoint while a link drag is in flight.
    pub fn link_pointer(&self) -> Option<(TaskId, Point)> {
        match &self.gesture {
            Gesture::Link {
                source, pointer, ..
            } => Some((*source, *pointer)),
            _ => None,
        }
    }

    /// Begin a gesture from a hit-tested pointer-down.
    pub fn pointer_down(&mut self, hit: HitTarget, pos: Point, tasks: &[Task]) {
        if !matches!(self.gesture, Gesture::Idle) {
            return;
        }
        match hit {
            HitTarget::BarEdge { task, edge } => {
                let Some(t) = tasks.iter().find(|t| t.id == task) else {
                    return;
                };
                let Some(span) = t.span() else {
                    return;
                };
                self.gesture = Gesture::Resize {
                    task,
                    edge,
                    old_start: t.start,
                    old_due: t.due,
                    span,
                    grab_x: pos.x,
                    current: span,
                };
            }
            HitTarget::LinkHandle { task } => {
                self.gesture = Gesture::Link {
                    source: task,
                    pointer: pos,
                    candidate: None,
                };
            }
            HitTarget::ColumnSplitter => {
                self.gesture = Gesture::ColumnResize {
                    grab_x: pos.x,
                    origin_width: self.label_width,
                };
            }
        }
    }

    /// Advance the active gesture. `hover` is the task currently under the
    /// pointer, as reported by the host's hit test.
    pub fn pointer_move(&mut self, pos: Point, scale: &TimelineScale, hover: Option<TaskId>) {
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Resize {
                edge,
                span,
                grab_x,
                current,
                ..
            } => {
                // Snap the travelled distance to whole days.
                let days = ((pos.x - *grab_x) / scale.zoom.pixels_per_day()).round() as i64;
                match edge {
                    ResizeEdge::Left => {
                        current.0 = (span.0 + Duration::days(days)).min(span.1);
                    }
                    ResizeEdge::Right => {
                        current.1 = (span.1 + Duration::days(days)).max(span.0);
                    }
                }
            }
            Gesture::Link {
                source,
                pointer,
                candidate,
            } => {
                *pointer = pos;
                *candidate = hover.filter(|t| t != source);
            }
            Gesture::ColumnResize {
                grab_x,
                origin_width,
            } => {
                self.label_width =
                    (*origin_width + (pos.x - *grab_x)).clamp(MIN_LABEL_WIDTH, MAX_LABEL_WIDTH);
            }
        }
    }

    /// Finish the active gesture.
    pub fn pointer_up(&mut self) -> GestureOutcome {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Idle => GestureOutcome::None,
            Gesture::Resize {
                task,
                edge,
                old_start,
                old_due,
                span,
                current,
                ..
            } => {
                if current == span {
                    // Pure click, nothing moved.
                    return GestureOutcome::None;
                }
                let (new_start, new_due) = match edge {
                    ResizeEdge::Left => (Some(current.0), old_due),
                    ResizeEdge::Right => (old_start, Some(current.1)),
                };
                GestureOutcome::Edit(EditIntent::DateChange {
                    task_id: task,
                    old_start,
                    old_due,
                    new_start,
                    new_due,
                })
            }
            Gesture::Link {
                source, candidate, ..
            } => match candidate {
                Some(target) => {
                    self.pending_link = Some((source, target));
                    GestureOutcome::ChooseRelation { source, target }
                }
                None => GestureOutcome::None,
            },
            Gesture::ColumnResize { .. } => GestureOutcome::None,
        }
    }

    /// The user picked a relation kind for a pending link.
    pub fn confirm_link(&mut self, kind: RelationKind) -> Option<EditIntent> {
        self.pending_link
            .take()
            .map(|(from, to)| EditIntent::CreateRelation { from, to, kind })
    }

    /// The user dismissed the relation-kind prompt.
    pub fn dismiss_link(&mut self) {
        self.pending_link = None;
    }

    /// Abort whatever is in flight (Escape). Always safe: no mutation has
    /// been issued yet.
    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
        self.pending_link = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RelationKind, TimelineScale, ZoomLevel};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn scale() -> TimelineScale {
        TimelineScale {
            min_date: date(2026, 3, 2),
            max_date: date(2026, 4, 30),
            zoom: ZoomLevel::Day,
        }
    }

    fn dated_task(id: TaskId, start: &str, due: &str) -> Task {
        let mut t = Task::new(id, format!("t{id}"), 1, "P");
        t.start = start.parse().ok();
        t.due = due.parse().ok();
        t
    }

    #[test]
    fn right_edge_drag_snaps_to_whole_days_and_emits_intent() {
        let tasks = vec![dated_task(1, "2026-03-02", "2026-03-04")];
        let mut ctl = InteractionController::new();
        let edge = HitTarget::BarEdge {
            task: 1,
            edge: ResizeEdge::Right,
        };
        ctl.pointer_down(edge, Point::new(96.0, 50.0), &tasks);
        // Two days and a bit: snaps to two days.
        let ppd = ZoomLevel::Day.pixels_per_day();
        ctl.pointer_move(Point::new(96.0 + 2.3 * ppd, 50.0), &scale(), None);
        let outcome = ctl.pointer_up();
        assert_eq!(
            outcome,
            GestureOutcome::Edit(EditIntent::DateChange {
                task_id: 1,
                old_start: Some(date(2026, 3, 2)),
                old_due: Some(date(2026, 3, 4)),
                new_start: Some(date(2026, 3, 2)),
                new_due: Some(date(2026, 3, 6)),
            })
        );
    }

    #[test]
    fn left_edge_cannot_cross_the_right_edge() {
        let tasks = vec![dated_task(1, "2026-03-02", "2026-03-04")];
        let mut ctl = InteractionController::new();
        ctl.pointer_down(
            HitTarget::BarEdge {
                task: 1,
                edge: ResizeEdge::Left,
            },
            Point::new(0.0, 50.0),
            &tasks,
        );
        let ppd = ZoomLevel::Day.pixels_per_day();
        ctl.pointer_move(Point::new(10.0 * ppd, 50.0), &scale(), None);
        let (_, start, due) = ctl.resize_preview().expect("resize in flight");
        assert_eq!(start, due);
        assert_eq!(start, date(2026, 3, 4));
    }

    #[test]
    fn unmoved_release_is_a_noop() {
        let tasks = vec![dated_task(1, "2026-03-02", "2026-03-04")];
        let mut ctl = InteractionController::new();
        ctl.pointer_down(
            HitTarget::BarEdge {
                task: 1,
                edge: ResizeEdge::Right,
            },
            Point::new(96.0, 50.0),
            &tasks,
        );
        ctl.pointer_move(Point::new(97.0, 51.0), &scale(), None);
        assert_eq!(ctl.pointer_up(), GestureOutcome::None);
    }

    #[test]
    fn link_drag_tracks_candidate_and_prompts_for_kind() {
        let tasks = vec![dated_task(1, "2026-03-02", "2026-03-04")];
        let mut ctl = InteractionController::new();
        ctl.pointer_down(
            HitTarget::LinkHandle { task: 1 },
            Point::new(10.0, 10.0),
            &tasks,
        );
        // The source itself is never a candidate.
        ctl.pointer_move(Point::new(20.0, 20.0), &scale(), Some(1));
        assert_eq!(ctl.link_candidate(), None);
        ctl.pointer_move(Point::new(30.0, 80.0), &scale(), Some(2));
        assert_eq!(ctl.link_candidate(), Some(2));

        assert_eq!(
            ctl.pointer_up(),
            GestureOutcome::ChooseRelation {
                source: 1,
                target: 2
            }
        );
        assert_eq!(
            ctl.confirm_link(RelationKind::Blocks),
            Some(EditIntent::CreateRelation {
                from: 1,
                to: 2,
                kind: RelationKind::Blocks,
            })
        );
        // The prompt is one-shot.
        assert_eq!(ctl.confirm_link(RelationKind::Blocks), None);
    }

    #[test]
    fn link_release_over_nothing_cancels_silently() {
        let tasks = vec![dated_task(1, "2026-03-02", "2026-03-04")];
        let mut ctl = InteractionController::new();
        ctl.pointer_down(
            HitTarget::LinkHandle { task: 1 },
            Point::new(10.0, 10.0),
            &tasks,
        );
        ctl.pointer_move(Point::new(500.0, 500.0), &scale(), None);
        assert_eq!(ctl.pointer_up(), GestureOutcome::None);
        assert_eq!(ctl.confirm_link(RelationKind::Blocks), None);
    }

    #[test]
    fn escape_aborts_without_side_effects() {
        let tasks = vec![dated_task(1, "2026-03-02", "2026-03-04")];
        let mut ctl = InteractionController::new();
        ctl.pointer_down(
            HitTarget::LinkHandle { task: 1 },
            Point::new(10.0, 10.0),
            &tasks,
        );
        ctl.cancel();
        assert!(!ctl.is_dragging());
        assert_eq!(ctl.pointer_up(), GestureOutcome::None);
    }

    #[test]
    fn column_resize_is_display_only_and_clamped() {
        let mut ctl = InteractionController::new();
        ctl.pointer_down(HitTarget::ColumnSplitter, Point::new(240.0, 0.0), &[]);
        ctl.pointer_move(Point::new(2000.0, 0.0), &scale(), None);
        assert_eq!(ctl.label_width(), MAX_LABEL_WIDTH);
        assert_eq!(ctl.pointer_up(), GestureOutcome::None);

        ctl.pointer_down(HitTarget::ColumnSplitter, Point::new(100.0, 0.0), &[]);
        ctl.pointer_move(Point::new(-2000.0, 0.0), &scale(), None);
        assert_eq!(ctl.label_width(), MIN_LABEL_WIDTH);
        ctl.pointer_up();
    }

    #[test]
    fn gestures_are_mutually_exclusive() {
        let tasks = vec![
            dated_task(1, "2026-03-02", "2026-03-04"),
            dated_task(2, "2026-03-09", "2026-03-11"),
        ];
        let mut ctl = InteractionController::new();
        ctl.pointer_down(
            HitTarget::BarEdge {
                task: 1,
                edge: ResizeEdge::Right,
            },
            Point::new(96.0, 50.0),
            &tasks,
        );
        // A second pointer-down while resizing is ignored.
        ctl.pointer_down(
            HitTarget::LinkHandle { task: 2 },
            Point::new(10.0, 10.0),
            &tasks,
        );
        assert!(ctl.resize_preview().is_some());
        assert_eq!(ctl.link_pointer(), None);
    }
}
