use crate::config::EngineParams;
use crate::geometry::{Arrowhead, Node, OutlinePath};
use crate::math::{dist, Point2, TOLERANCE};
use crate::operations::bezier_offset::{cap_offsets, miter_offsets};
use crate::operations::head_placement::{place_on_segment, HeadPlacement};

use super::straight;

/// Rectilinear ribbon through the connector points.
///
/// Endpoints closer than `elbow_collapse_factor * width` are joined directly.
/// The head goes on the last leg and is dropped when that leg points away
/// from the target.
pub(super) fn build(
    source: &Node,
    target: &Node,
    connectors: &[Point2],
    width: f64,
    head: Option<&Arrowhead>,
    params: &EngineParams,
) -> (OutlinePath, Option<HeadPlacement>) {
    let start = source.position();
    let end = target.position();
    if dist(&start, &end) < params.elbow_collapse_factor * width {
        return straight::build(source, target, width, head);
    }

    let mut spine: Vec<Point2> = Vec::with_capacity(connectors.len() + 2);
    for p in std::iter::once(&start).chain(connectors).chain(std::iter::once(&end)) {
        if spine.last().is_none_or(|last| dist(last, p) > TOLERANCE) {
            spine.push(*p);
        }
    }
    if spine.len() < 3 {
        return straight::build(source, target, width, head);
    }

    let last_leg = spine[spine.len() - 2];
    let placement = head.and_then(|h| place_on_segment(&last_leg, target, h).map(|p| (h, p)));
    if let (Some((_, p)), Some(last)) = (placement, spine.last_mut()) {
        *last = p.position;
    }

    let half = width * 0.5;
    let n = spine.len();
    let offsets: Vec<(Point2, Point2)> = (0..n)
        .map(|i| match i {
            0 => cap_offsets(&spine[0], &spine[1], half, true),
            i if i == n - 1 => cap_offsets(&spine[i], &spine[i - 1], half, false),
            i => miter_offsets(&spine[i - 1], &spine[i], &spine[i + 1], half),
        })
        .collect();

    let mut path = OutlinePath::new();
    path.move_to(offsets[0].0);
    path.extend_lines(offsets[1..].iter().map(|(top, _)| *top));
    if let Some((h, p)) = placement {
        path.extend_lines(h.outline(&p.position, p.angle));
    }
    path.extend_lines(offsets.iter().rev().map(|(_, bottom)| *bottom));
    path.close();
    (path, placement.map(|(_, p)| p))
}
