use thiserror::Error;
use tracing::warn;

use crate::gateway::MutationError;

pub type EngineResult<T> = Result<T, EngineError>;

/// Failures the engine reports to its host. None of these are fatal: the
/// view re-renders from the last known-good snapshot and stays interactive.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The gateway refused a requested edit; nothing was committed to the
    /// undo history.
    #[error("mutation rejected: {message}")]
    MutationRejected {
        message: String,
        #[source]
        source: MutationError,
    },

    /// A compensating mutation during undo or redo failed. Both stacks were
    /// left exactly as they were before the attempt.
    #[error("{op} failed, history preserved: {source}")]
    ReconciliationFailed {
        op: &'static str,
        #[source]
        source: MutationError,
    },
}

impl EngineError {
    pub fn rejected(source: MutationError) -> Self {
        let message = friendly_message(&source.message);
        warn!(target: "workline::gateway", %message, "mutation rejected");
        EngineError::MutationRejected { message, source }
    }

    pub fn reconciliation(op: &'static str, source: MutationError) -> Self {
        warn!(target: "workline::undo", op, error = %source, "compensating mutation failed");
        EngineError::ReconciliationFailed { op, source }
    }
}

/// Map known tracker validation phrasings onto messages fit for the chart;
/// anything unrecognized passes through verbatim.
fn friendly_message(raw: &str) -> String {
    let lower = raw.to_ascii_lowercase();
    if lower.contains("descendant") || lower.contains("subtask") {
        "This task cannot be linked to one of its own subtasks".to_string()
    } else if lower.contains("circular") {
        "This link would create a circular dependency".to_string()
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_validation_patterns_get_friendly_messages() {
        let err = EngineError::rejected(MutationError::new(
            "Relation is invalid: target is a descendant of source",
        ));
        match err {
            EngineError::MutationRejected { message, .. } => {
                assert_eq!(message, "This task cannot be linked to one of its own subtasks");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_messages_pass_through_verbatim() {
        let err = EngineError::rejected(MutationError::new("503 Service Unavailable"));
        match err {
            EngineError::MutationRejected { message, .. } => {
                assert_eq!(message, "503 Service Unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
