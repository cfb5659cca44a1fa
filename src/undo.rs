use std::cell::Cell;
use std::rc::Rc;

use chrono::NaiveDate;
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::gateway::MutationGateway;
use crate::model::{RelationId, RelationKind, TaskId};

/// An edit the chart asks the engine to commit.
#[derive(Debug, Clone, PartialEq)]
pub enum EditIntent {
    DateChange {
        task_id: TaskId,
        old_start: Option<NaiveDate>,
        old_due: Option<NaiveDate>,
        new_start: Option<NaiveDate>,
        new_due: Option<NaiveDate>,
    },
    CreateRelation {
        from: TaskId,
        to: TaskId,
        kind: RelationKind,
    },
    DeleteRelation {
        id: RelationId,
        from: TaskId,
        to: TaskId,
        kind: RelationKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationOp {
    Create,
    Delete,
}

/// A committed, reversible edit.
///
/// Relation actions hold their identifier in a shared cell. Re-creating a
/// relation through undo or redo is not identity-preserving — the tracker
/// assigns a fresh id — and updating the one cell retargets every history
/// entry that refers to the relation, in whichever stack it sits.
#[derive(Debug, Clone)]
pub enum EditAction {
    DateChange {
        task_id: TaskId,
        old_start: Option<NaiveDate>,
        old_due: Option<NaiveDate>,
        new_start: Option<NaiveDate>,
        new_due: Option<NaiveDate>,
    },
    RelationChange {
        op: RelationOp,
        id: Rc<Cell<RelationId>>,
        from: TaskId,
        to: TaskId,
        kind: RelationKind,
    },
}

/// Linear undo/redo history over gateway mutations. No branching: any new
/// edit discards the redo stack.
#[derive(Debug, Default)]
pub struct UndoLog {
    undo: Vec<EditAction>,
    redo: Vec<EditAction>,
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Commit an intent: issue the mutation, then record it as a reversible
    /// action. A rejected mutation records nothing.
    pub async fn apply<G: MutationGateway>(
        &mut self,
        intent: EditIntent,
        gateway: &G,
    ) -> EngineResult<()> {
        let action = match intent {
            EditIntent::DateChange {
                task_id,
                old_start,
                old_due,
                new_start,
                new_due,
            } => {
                gateway
                    .update_dates(task_id, new_start, new_due)
                    .await
                    .map_err(EngineError::rejected)?;
                info!(target: "workline::undo", task = task_id, "date change committed");
                EditAction::DateChange {
                    task_id,
                    old_start,
                    old_due,
                    new_start,
                    new_due,
                }
            }
            EditIntent::CreateRelation { from, to, kind } => {
                let id = gateway
                    .create_relation(from, to, kind)
                    .await
                    .map_err(EngineError::rejected)?;
                info!(target: "workline::undo", relation = id, kind = kind.as_str(), "relation created");
                EditAction::RelationChange {
                    op: RelationOp::Create,
                    id: Rc::new(Cell::new(id)),
                    from,
                    to,
                    kind,
                }
            }
            EditIntent::DeleteRelation { id, from, to, kind } => {
                gateway
                    .delete_relation(id)
                    .await
                    .map_err(EngineError::rejected)?;
                info!(target: "workline::undo", relation = id, "relation deleted");
                EditAction::RelationChange {
                    op: RelationOp::Delete,
                    id: Rc::new(Cell::new(id)),
                    from,
                    to,
                    kind,
                }
            }
        };
        self.undo.push(action);
        self.redo.clear();
        Ok(())
    }

    /// Revert the most recent action by issuing its inverse mutation.
    /// Returns `false` when there is nothing to undo. If the gateway
    /// refuses, both stacks are left exactly as they were.
    pub async fn undo<G: MutationGateway>(&mut self, gateway: &G) -> EngineResult<bool> {
        // Cloning shares the relation-id cell with the stacked entry.
        let Some(action) = self.undo.last().cloned() else {
            return Ok(false);
        };
        match &action {
            EditAction::DateChange {
                task_id,
                old_start,
                old_due,
                ..
            } => {
                gateway
                    .update_dates(*task_id, *old_start, *old_due)
                    .await
                    .map_err(|e| EngineError::reconciliation("undo", e))?;
            }
            EditAction::RelationChange {
                op: RelationOp::Create,
                id,
                ..
            } => {
                gateway
                    .delete_relation(id.get())
                    .await
                    .map_err(|e| EngineError::reconciliation("undo", e))?;
            }
            EditAction::RelationChange {
                op: RelationOp::Delete,
                id,
                from,
                to,
                kind,
            } => {
                let new_id = gateway
                    .create_relation(*from, *to, *kind)
                    .await
                    .map_err(|e| EngineError::reconciliation("undo", e))?;
                id.set(new_id);
            }
        }
        self.undo.pop();
        self.redo.push(action);
        Ok(true)
    }

    /// Reapply the most recently undone action; the mirror of [`Self::undo`].
    pub async fn redo<G: MutationGateway>(&mut self, gateway: &G) -> EngineResult<bool> {
        let Some(action) = self.redo.last().cloned() else {
            return Ok(false);
        };
        match &action {
            EditAction::DateChange {
                task_id,
                new_start,
                new_due,
                ..
            } => {
                gateway
                    .update_dates(*task_id, *new_start, *new_due)
                    .await
                    .map_err(|e| EngineError::reconciliation("redo", e))?;
            }
            EditAction::RelationChange {
                op: RelationOp::Create,
                id,
                from,
                to,
                kind,
            } => {
                let new_id = gateway
                    .create_relation(*from, *to, *kind)
                    .await
                    .map_err(|e| EngineError::reconciliation("redo", e))?;
                id.set(new_id);
            }
            EditAction::RelationChange {
                op: RelationOp::Delete,
                id,
                ..
            } => {
                gateway
                    .delete_relation(id.get())
                    .await
                    .map_err(|e| EngineError::reconciliation("redo", e))?;
            }
        }
        self.redo.pop();
        self.undo.push(action);
        Ok(true)
    }
}
