//! Workload timeline engine for issue-tracker data.
//!
//! Turns a snapshot of tasks plus a weekly working-hours schedule into a
//! zoomable Gantt scene: hierarchical rows grouped by project, bars
//! classified by scheduling flexibility, routed dependency arrows, and an
//! aggregate workload heatmap. Gesture state machines translate pointer
//! input into edit intents, and a linear undo/redo log replays them against
//! an async mutation gateway, reconciling identifiers the tracker reassigns
//! along the way.
//!
//! Rendering, transport, and persistence stay with the host application:
//! the engine consumes read-only snapshots and emits a renderer-agnostic
//! [`chart::Scene`].

pub mod chart;
pub mod error;
pub mod flexibility;
pub mod gateway;
pub mod model;
pub mod undo;
pub mod workload;

pub use chart::{GestureOutcome, HitTarget, InteractionController, ResizeEdge, Scene};
pub use error::{EngineError, EngineResult};
pub use flexibility::{classify, FlexibilityScore, FlexibilityStatus};
pub use gateway::{GatewayResult, MutationError, MutationGateway};
pub use model::{
    Relation, RelationId, RelationKind, Task, TaskId, TimelineScale, WeeklySchedule, WorkCalendar,
    ZoomLevel,
};
pub use undo::{EditAction, EditIntent, UndoLog};
pub use workload::{aggregate, LoadBand};
