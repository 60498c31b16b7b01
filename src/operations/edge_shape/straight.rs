use crate::geometry::{are_nodes_close, Arrowhead, Node, OutlinePath};
use crate::operations::head_placement::{place_on_segment, HeadPlacement};

use super::segment_offsets;

/// Rectangle from the source centre to the head base (or the target centre).
///
/// The source end is a flat butt. The target end carries the head outline,
/// unless there is no head, the nodes overlap, or the segment is too short
/// to fit one; then it is a flat butt at the target centre.
pub(super) fn build(
    source: &Node,
    target: &Node,
    width: f64,
    head: Option<&Arrowhead>,
) -> (OutlinePath, Option<HeadPlacement>) {
    let start = source.position();
    let placement = head
        .filter(|_| !are_nodes_close(source, target))
        .and_then(|h| place_on_segment(&start, target, h).map(|p| (h, p)));
    let end = placement.map_or_else(|| target.position(), |(_, p)| p.position);

    let [(top_s, bottom_s), (top_e, bottom_e)] = segment_offsets(&start, &end, width * 0.5);
    let mut path = OutlinePath::new();
    path.move_to(top_s);
    path.line_to(top_e);
    if let Some((h, p)) = placement {
        path.extend_lines(h.outline(&p.position, p.angle));
    }
    path.line_to(bottom_e);
    path.line_to(bottom_s);
    path.close();
    (path, placement.map(|(_, p)| p))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::PathSegment;
    use crate::math::Point2;

    fn nodes(gap: f64) -> (Node, Node) {
        (
            Node::circle(Point2::new(0.0, 0.0), 20.0).unwrap(),
            Node::circle(Point2::new(gap, 0.0), 20.0).unwrap(),
        )
    }

    #[test]
    fn headless_edge_is_a_rectangle() {
        let (a, b) = nodes(140.0);
        let (path, head) = build(&a, &b, 4.0, None);
        assert!(head.is_none());
        assert_eq!(
            path.segments(),
            &[
                PathSegment::MoveTo(Point2::new(0.0, -2.0)),
                PathSegment::LineTo(Point2::new(140.0, -2.0)),
                PathSegment::LineTo(Point2::new(140.0, 2.0)),
                PathSegment::LineTo(Point2::new(0.0, 2.0)),
                PathSegment::Close,
            ]
        );
    }

    #[test]
    fn head_is_spliced_between_lanes() {
        let (a, b) = nodes(140.0);
        let head = Arrowhead::arrow(10.0, 10.0, 4.0).unwrap();
        let (path, placement) = build(&a, &b, 4.0, Some(&head));
        let placement = placement.unwrap();
        // 140 − (20 + 4 + 10)
        assert!((placement.position.x - 106.0).abs() < 1e-9);
        // move, top, 3 head points, bottom, back, close
        assert_eq!(path.segments().len(), 8);
        assert_eq!(
            path.segments()[3],
            PathSegment::LineTo(Point2::new(116.0, 0.0))
        );
        // Apex stops `offset` short of the target boundary.
        assert!((placement.apex.x - 116.0).abs() < 1e-9);
    }

    #[test]
    fn overlapping_nodes_drop_the_head() {
        let (a, b) = nodes(30.0);
        let head = Arrowhead::arrow(10.0, 10.0, 4.0).unwrap();
        let (path, placement) = build(&a, &b, 4.0, Some(&head));
        assert!(placement.is_none());
        assert_eq!(path.segments().len(), 5);
    }
}
