use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::model::{RelationId, RelationKind, TaskId};

pub type GatewayResult<T> = Result<T, MutationError>;

/// Failure reported by the tracker for a requested mutation.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct MutationError {
    pub message: String,
    /// Structured validation payload, when the tracker provides one.
    pub details: Option<JsonValue>,
}

impl MutationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(message: impl Into<String>, details: JsonValue) -> Self {
        Self {
            message: message.into(),
            details: Some(details),
        }
    }
}

/// Remote mutation surface of the issue tracker.
///
/// The tracker may apply side effects beyond the requested field — creating
/// a `precedes` relation can shift the successor's own dates — so callers
/// re-fetch the snapshot and re-render after every success rather than
/// assuming the requested change was the only change.
#[async_trait]
pub trait MutationGateway {
    /// Update a task's dates. `None` clears the corresponding date.
    async fn update_dates(
        &self,
        task: TaskId,
        start: Option<NaiveDate>,
        due: Option<NaiveDate>,
    ) -> GatewayResult<()>;

    /// Create a relation; the tracker assigns and returns its identifier.
    async fn create_relation(
        &self,
        from: TaskId,
        to: TaskId,
        kind: RelationKind,
    ) -> GatewayResult<RelationId>;

    async fn delete_relation(&self, id: RelationId) -> GatewayResult<()>;
}
