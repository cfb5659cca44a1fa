use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::{HEADER_HEIGHT, ROW_GAP, ROW_HEIGHT};
use crate::model::{ProjectId, Task, TaskId};

/// What a chart row displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RowKind {
    ProjectHeader { project_id: ProjectId, name: String },
    Task { task_id: TaskId, summary: bool },
}

/// One row of the chart, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaidOutRow {
    pub kind: RowKind,
    /// Nesting level: project headers at 0, their root tasks at 1.
    pub depth: usize,
    /// Pixel offset of the row's top edge.
    pub y: f32,
}

impl LaidOutRow {
    pub fn task_id(&self) -> Option<TaskId> {
        match self.kind {
            RowKind::Task { task_id, .. } => Some(task_id),
            RowKind::ProjectHeader { .. } => None,
        }
    }
}

/// Top edge of the row at `index`, below the timeline header band.
pub fn row_y(index: usize) -> f32 {
    HEADER_HEIGHT + index as f32 * (ROW_HEIGHT + ROW_GAP)
}

/// Convert the flat snapshot into the hierarchical, z-ordered row sequence.
///
/// Tasks are grouped by project, largest group first (ties keep snapshot
/// order). Within a project, rows follow a pre-order walk of the
/// parent/child tree; a parent reference that leaves the project, or points
/// at a task missing from the snapshot, is not renderable as nesting and
/// the task surfaces as a root.
pub fn layout(tasks: &[Task]) -> Vec<LaidOutRow> {
    let mut order: Vec<ProjectId> = Vec::new();
    let mut groups: HashMap<ProjectId, Vec<&Task>> = HashMap::new();
    for task in tasks {
        if !groups.contains_key(&task.project_id) {
            order.push(task.project_id);
        }
        groups.entry(task.project_id).or_default().push(task);
    }
    order.sort_by_key(|id| std::cmp::Reverse(groups[id].len()));

    let mut rows = Vec::new();
    for project_id in order {
        let members = &groups[&project_id];
        let name = members
            .first()
            .map(|t| t.project_name.clone())
            .unwrap_or_default();
        rows.push(LaidOutRow {
            kind: RowKind::ProjectHeader { project_id, name },
            depth: 0,
            y: 0.0,
        });

        let ids: HashSet<TaskId> = members.iter().map(|t| t.id).collect();
        let mut children: HashMap<TaskId, Vec<&Task>> = HashMap::new();
        let mut roots: Vec<&Task> = Vec::new();
        for task in members.iter().copied() {
            match task.parent_id.filter(|p| ids.contains(p) && *p != task.id) {
                Some(parent) => children.entry(parent).or_default().push(task),
                None => roots.push(task),
            }
        }

        let mut emitted: HashSet<TaskId> = HashSet::new();
        for root in roots.iter().copied() {
            push_subtree(root, 1, &children, &mut emitted, &mut rows);
        }
        // A parent cycle in the snapshot never reaches a root; surface those
        // tasks instead of dropping them.
        for task in members.iter().copied() {
            if !emitted.contains(&task.id) {
                push_subtree(task, 1, &children, &mut emitted, &mut rows);
            }
        }
    }

    for (index, row) in rows.iter_mut().enumerate() {
        row.y = row_y(index);
    }
    rows
}

fn push_subtree<'a>(
    task: &'a Task,
    depth: usize,
    children: &HashMap<TaskId, Vec<&'a Task>>,
    emitted: &mut HashSet<TaskId>,
    rows: &mut Vec<LaidOutRow>,
) {
    if !emitted.insert(task.id) {
        return;
    }
    let kids = children.get(&task.id);
    rows.push(LaidOutRow {
        kind: RowKind::Task {
            task_id: task.id,
            summary: kids.is_some_and(|k| !k.is_empty()),
        },
        depth,
        y: 0.0,
    });
    if let Some(kids) = kids {
        for kid in kids.iter().copied() {
            push_subtree(kid, depth + 1, children, emitted, rows);
        }
    }
}
