use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use super::{Point, Rect};
use crate::model::{Relation, RelationId, RelationKind, TaskId};

// Presentation tuning, sized against the 30 px row height. The five routing
// cases and their selection order are the contract; these values are not.
const ARROW_LEN: f32 = 8.0;
const JOG: f32 = 12.0;
const NEAR_ALIGN: f32 = 16.0;
const ROW_CLEARANCE: f32 = 10.0;

/// Geometry of one laid-out bar as the router sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutedBar {
    pub rect: Rect,
    pub row: usize,
}

/// A routed dependency arrow: a polyline stopping one arrow-length short of
/// `tip`, where the host draws the head pointing at `tip`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrowPath {
    pub relation_id: RelationId,
    pub kind: RelationKind,
    pub points: Vec<Point>,
    pub tip: Point,
}

/// Route every renderable relation against the current bar positions.
///
/// Skipped without erroring: reverse kinds (the forward form draws the
/// arrow), self-relations, and relations whose endpoints are not laid out
/// (filtered away or undated).
pub fn route_all<'a>(
    relations: impl IntoIterator<Item = &'a Relation>,
    bars: &HashMap<TaskId, RoutedBar>,
) -> Vec<ArrowPath> {
    let mut paths = Vec::new();
    for relation in relations {
        if !relation.kind.is_forward() || relation.is_self() {
            continue;
        }
        let (Some(source), Some(target)) = (
            bars.get(&relation.from_task),
            bars.get(&relation.to_task),
        ) else {
            debug!(
                target: "workline::router",
                relation = relation.id,
                "endpoint not laid out, arrow skipped"
            );
            continue;
        };
        let (points, tip) = route(*source, *target, relation.kind);
        paths.push(ArrowPath {
            relation_id: relation.id,
            kind: relation.kind,
            points,
            tip,
        });
    }
    paths
}

/// Route one relation between two laid-out bars.
///
/// Temporal kinds connect the source's end edge to the target's start edge;
/// the rest join bar centers. This is a heuristic planar router: it avoids
/// the degenerate shapes below, not every overlap in a dense graph.
pub fn route(source: RoutedBar, target: RoutedBar, kind: RelationKind) -> (Vec<Point>, Point) {
    let (from, to) = if kind.is_temporal() {
        (
            Point::new(source.rect.right, source.rect.center_y()),
            Point::new(target.rect.left, target.rect.center_y()),
        )
    } else {
        (source.rect.center(), target.rect.center())
    };
    let same_row = source.row == target.row;
    let rightward = to.x > from.x;

    if same_row && rightward {
        // Straight shot along the row.
        (vec![from, Point::new(to.x - ARROW_LEN, to.y)], to)
    } else if !same_row && (to.x - from.x).abs() <= NEAR_ALIGN {
        // Near-aligned rows: an S-jog through the inter-row midpoint, so
        // the connector does not read as a stray vertical grid line.
        let mid_y = (from.y + to.y) / 2.0;
        let (entry_y, stop_y) = if to.y > from.y {
            (target.rect.top, target.rect.top - ARROW_LEN)
        } else {
            (target.rect.bottom, target.rect.bottom + ARROW_LEN)
        };
        (
            vec![
                from,
                Point::new(from.x + JOG, from.y),
                Point::new(from.x + JOG, mid_y),
                Point::new(to.x, mid_y),
                Point::new(to.x, stop_y),
            ],
            Point::new(to.x, entry_y),
        )
    } else if !same_row && rightward {
        // Elbow through the horizontal midpoint.
        let mid_x = (from.x + to.x) / 2.0;
        (
            vec![
                from,
                Point::new(mid_x, from.y),
                Point::new(mid_x, to.y),
                Point::new(to.x - ARROW_LEN, to.y),
            ],
            to,
        )
    } else if same_row {
        // Leftward on the same row: loop above the row, otherwise the path
        // doubles back through the source bar.
        let over_y = source.rect.top - ROW_CLEARANCE;
        (
            vec![
                from,
                Point::new(from.x + JOG, from.y),
                Point::new(from.x + JOG, over_y),
                Point::new(to.x - JOG, over_y),
                Point::new(to.x - JOG, to.y),
                Point::new(to.x - ARROW_LEN, to.y),
            ],
            to,
        )
    } else {
        // Leftward across rows: through the inter-row gap midpoint.
        let gap_y = (from.y + to.y) / 2.0;
        (
            vec![
                from,
                Point::new(from.x + JOG, from.y),
                Point::new(from.x + JOG, gap_y),
                Point::new(to.x - JOG, gap_y),
                Point::new(to.x - JOG, to.y),
                Point::new(to.x - ARROW_LEN, to.y),
            ],
            to,
        )
    }
}
