use tracing::warn;

use crate::config::EngineParams;
use crate::error::Result;
use crate::geometry::{are_nodes_close, Arrowhead, Node, OutlinePath, QuadBezier};
use crate::math::Point2;
use crate::operations::bezier_offset::{BezierOffset, OffsetOutline};
use crate::operations::head_placement::{head_reach, place_on_curve, HeadPlacement};

use super::straight;

/// Offset ribbon along the quadratic `source → control → target`.
///
/// Nearly collinear control points and offsetting failures are drawn with the
/// straight builder. With a head, the ribbon ends at the head base found by
/// arc-length search and the head is spliced between the two lanes.
pub(super) fn build(
    source: &Node,
    target: &Node,
    control: Point2,
    width: f64,
    head: Option<&Arrowhead>,
    params: &EngineParams,
) -> (OutlinePath, Option<HeadPlacement>) {
    let start = source.position();
    let curve = QuadBezier::new(start, control, target.position());
    if curve.is_straight(params.straightness_tolerance) {
        return straight::build(source, target, width, head);
    }

    let placement = head
        .filter(|_| !are_nodes_close(source, target))
        .and_then(|h| {
            place_on_curve(&curve, head_reach(target, &start, h), h, params).map(|(p, t)| (h, p, t))
        });
    let body = placement.map_or(curve, |(_, _, t)| curve.split(t).0);

    lanes_or_straight(
        BezierOffset::new(body, width).execute(),
        placement.map(|(h, p, _)| (h, p)),
        source,
        target,
        width,
        head,
    )
}

/// Joins the offset lanes around the head, or draws the edge straight when
/// offsetting failed.
fn lanes_or_straight(
    offset: Result<OffsetOutline>,
    placement: Option<(&Arrowhead, HeadPlacement)>,
    source: &Node,
    target: &Node,
    width: f64,
    head: Option<&Arrowhead>,
) -> (OutlinePath, Option<HeadPlacement>) {
    let offset = match offset {
        Ok(offset) => offset,
        Err(error) => {
            warn!(%error, "curve offset failed, drawing edge straight");
            return straight::build(source, target, width, head);
        }
    };

    let mut path = OutlinePath::new();
    offset.write_top(&mut path);
    if let Some((h, p)) = placement {
        path.extend_lines(h.outline(&p.position, p.angle));
    }
    offset.write_bottom_reversed(&mut path);
    path.close();
    (path, placement.map(|(_, p)| p))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::GeometryError;
    use crate::geometry::PathSegment;
    use crate::math::dist;

    fn scenario() -> (Node, Node, Arrowhead) {
        (
            Node::ellipse(Point2::new(-70.0, 0.0), 40.0, 40.0).unwrap(),
            Node::ellipse(Point2::new(70.0, 0.0), 40.0, 40.0).unwrap(),
            Arrowhead::arrow(10.0, 10.0, 4.0).unwrap(),
        )
    }

    #[test]
    fn collinear_control_matches_straight() {
        let (a, b, head) = scenario();
        let params = EngineParams::default();
        let curved = build(&a, &b, Point2::new(0.0, 0.0), 4.0, Some(&head), &params);
        let direct = straight::build(&a, &b, 4.0, Some(&head));
        assert_eq!(curved, direct);
    }

    #[test]
    fn scenario_places_head_on_curve() {
        let (a, b, head) = scenario();
        let params = EngineParams::default();
        let (path, placement) = build(&a, &b, Point2::new(0.0, -50.0), 4.0, Some(&head), &params);
        let p = placement.unwrap();
        // Base is reach = 20 + 4 + 10 along the curve from B's centre;
        // the chord to the centre is slightly shorter.
        let chord = dist(&p.position, &b.position());
        assert!(chord > 33.0 && chord < 34.0, "chord={chord}");
        assert!((dist(&p.apex, &b.position()) - 24.0).abs() < 0.5);

        let quads = path
            .segments()
            .iter()
            .filter(|s| matches!(s, PathSegment::QuadTo { .. }))
            .count();
        assert_eq!(quads, 8);
        assert_eq!(path.segments().last(), Some(&PathSegment::Close));
    }

    #[test]
    fn headless_curve_spans_both_centres() {
        let (a, b, _) = scenario();
        let params = EngineParams::default();
        let (path, placement) = build(&a, &b, Point2::new(0.0, -50.0), 4.0, None, &params);
        assert!(placement.is_none());
        let rect = path.bounds().unwrap();
        // Butt caps are square to the tangent, which leans at the ends.
        assert!(rect.min.x < -70.0 && rect.min.x > -72.0);
        assert!(rect.max.x > 70.0 && rect.max.x < 72.0);
        // Arch apex at y = −25, lifted by half the width on the top lane.
        assert!((rect.min.y + 27.0).abs() < 0.1, "min_y={}", rect.min.y);
    }

    #[test]
    fn failed_offset_draws_straight() {
        let (a, b, head) = scenario();
        let direct = straight::build(&a, &b, 4.0, Some(&head));
        for error in [
            GeometryError::NonFinite("curve offset"),
            GeometryError::NoValidParameter("nearest point on curve"),
        ] {
            let built = lanes_or_straight(Err(error.into()), None, &a, &b, 4.0, Some(&head));
            assert_eq!(built, direct);
        }
    }

    #[test]
    fn offset_lanes_wrap_the_head() {
        let (a, b, head) = scenario();
        let params = EngineParams::default();
        let curve = QuadBezier::new(a.position(), Point2::new(0.0, -50.0), b.position());
        let reach = head_reach(&b, &a.position(), &head);
        let (placement, t) = place_on_curve(&curve, reach, &head, &params).unwrap();
        let offset = BezierOffset::new(curve.split(t).0, 4.0).execute();
        let (path, placed) =
            lanes_or_straight(offset, Some((&head, placement)), &a, &b, 4.0, Some(&head));
        assert_eq!(placed, Some(placement));
        let apex_drawn = path
            .segments()
            .iter()
            .any(|s| matches!(s, PathSegment::LineTo(p) if dist(p, &placement.apex) < 1e-9));
        assert!(apex_drawn);
    }
}
