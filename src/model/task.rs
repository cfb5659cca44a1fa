use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier assigned to an issue by the remote tracker.
pub type TaskId = i64;
/// Identifier assigned to a relation by the remote tracker.
pub type RelationId = i64;
/// Identifier of the project an issue belongs to.
pub type ProjectId = i64;

/// Represents the kind of directed association between two tasks.
///
/// Forward kinds are the renderable direction; the reverse forms are the
/// same link as seen from the opposite endpoint and are suppressed when
/// drawing so each link produces a single arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Relates,
    Duplicates,
    Duplicated,
    Blocks,
    Blocked,
    Precedes,
    Follows,
    CopiedTo,
    CopiedFrom,
}

impl RelationKind {
    /// Whether this kind is drawn on the chart.
    pub fn is_forward(self) -> bool {
        matches!(
            self,
            RelationKind::Relates
                | RelationKind::Duplicates
                | RelationKind::Blocks
                | RelationKind::Precedes
                | RelationKind::CopiedTo
        )
    }

    /// Temporal kinds imply sequencing: arrows attach the source's end edge
    /// to the target's start edge instead of joining bar centers.
    pub fn is_temporal(self) -> bool {
        matches!(self, RelationKind::Blocks | RelationKind::Precedes)
    }

    /// The forward mirror of a reverse kind; identity for forward kinds.
    pub fn forward(self) -> RelationKind {
        match self {
            RelationKind::Duplicated => RelationKind::Duplicates,
            RelationKind::Blocked => RelationKind::Blocks,
            RelationKind::Follows => RelationKind::Precedes,
            RelationKind::CopiedFrom => RelationKind::CopiedTo,
            other => other,
        }
    }

    /// Wire name used by the tracker API.
    pub fn as_str(self) -> &'static str {
        match self {
            RelationKind::Relates => "relates",
            RelationKind::Duplicates => "duplicates",
            RelationKind::Duplicated => "duplicated",
            RelationKind::Blocks => "blocks",
            RelationKind::Blocked => "blocked",
            RelationKind::Precedes => "precedes",
            RelationKind::Follows => "follows",
            RelationKind::CopiedTo => "copied_to",
            RelationKind::CopiedFrom => "copied_from",
        }
    }

    /// The kinds a user may pick when creating a link from the chart.
    pub const CREATABLE: &'static [RelationKind] = &[
        RelationKind::Relates,
        RelationKind::Duplicates,
        RelationKind::Blocks,
        RelationKind::Precedes,
        RelationKind::CopiedTo,
    ];
}

/// A directed relation between two tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub id: RelationId,
    pub kind: RelationKind,
    pub from_task: TaskId,
    pub to_task: TaskId,
}

impl Relation {
    /// Self-relations are invalid snapshot data and never drawn.
    pub fn is_self(&self) -> bool {
        self.from_task == self.to_task
    }
}

/// A single schedulable issue from the tracker snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub subject: String,
    pub start: Option<NaiveDate>,
    pub due: Option<NaiveDate>,
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub spent_hours: f64,
    /// Completion percentage, 0–100.
    #[serde(default)]
    pub done_ratio: u8,
    pub project_id: ProjectId,
    pub project_name: String,
    pub parent_id: Option<TaskId>,
    /// Outgoing relations, in tracker order.
    #[serde(default)]
    pub relations: Vec<Relation>,
    #[serde(default)]
    pub closed: bool,
}

impl Task {
    /// Create a task with empty scheduling data.
    pub fn new(
        id: TaskId,
        subject: impl Into<String>,
        project_id: ProjectId,
        project_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            subject: subject.into(),
            start: None,
            due: None,
            estimated_hours: None,
            spent_hours: 0.0,
            done_ratio: 0,
            project_id,
            project_name: project_name.into(),
            parent_id: None,
            relations: Vec::new(),
            closed: false,
        }
    }

    /// The bar span on the chart. A task with only one of its dates set
    /// occupies that single day; a task with neither has no bar.
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start, self.due) {
            (Some(start), Some(due)) => Some((start, due)),
            (Some(start), None) => Some((start, start)),
            (None, Some(due)) => Some((due, due)),
            (None, None) => None,
        }
    }

    /// Terminal for capacity purposes.
    pub fn is_done(&self) -> bool {
        self.done_ratio >= 100
    }

    /// Completion as a 0.0–1.0 fraction.
    pub fn progress(&self) -> f32 {
        f32::from(self.done_ratio.min(100)) / 100.0
    }
}
