pub mod schedule;
pub mod task;
pub mod timeline;

pub use schedule::{WeeklySchedule, WorkCalendar};
pub use task::{ProjectId, Relation, RelationId, RelationKind, Task, TaskId};
pub use timeline::{TimelineScale, ZoomLevel};
