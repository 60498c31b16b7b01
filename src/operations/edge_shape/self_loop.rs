use tracing::debug;

use crate::error::{GeometryError, Result};
use crate::geometry::{Arrowhead, Node, OutlinePath};
use crate::math::arc_2d::{arc_point, chord_angle};
use crate::math::{Point2, Vector2};
use crate::operations::head_placement::{place_on_arc, HeadPlacement};

/// Start of the loop, at the bottom of the loop circle (on screen).
const BEGIN_ANGLE: f64 = 270.0;

/// Circle a self-loop runs along, plus the arc it covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopArc {
    pub center: Point2,
    pub radius: f64,
    pub begin: f64,
    pub sweep: f64,
}

impl LoopArc {
    /// Computes the loop arc for `node`, leaving `head_reach` of arc length free
    /// before the loop re-enters the node's bounding box.
    ///
    /// The core radius is `(hw² + hh²) / (2·min(hw, hh))`, and the circle hangs
    /// above the node with its lowest point on the node centre. The sweep stops
    /// where the chord from that point equals the half diagonal, less the head's
    /// angular share `degrees(head_reach / R)` and the attachment's chord angle.
    #[must_use]
    pub fn new(node: &Node, attachment: f64, head_reach: f64) -> Self {
        let hw = node.half_width();
        let hh = node.half_height();
        let diagonal_sq = hw * hw + hh * hh;
        let radius = diagonal_sq / (2.0 * hw.min(hh));
        let center = node.position() - Vector2::new(0.0, radius);

        let bbox_angle = chord_angle(radius, diagonal_sq.sqrt());
        let attach_angle = chord_angle(radius, attachment);
        let offset_angle = (head_reach / radius).to_degrees();
        Self {
            center,
            radius,
            begin: BEGIN_ANGLE + attach_angle,
            sweep: 360.0 - offset_angle - bbox_angle - attach_angle,
        }
    }

    #[must_use]
    pub fn end(&self) -> f64 {
        self.begin + self.sweep
    }
}

/// Annulus sector along the loop arc, closed by the head or a straight cut.
pub(super) fn build(
    node: &Node,
    attachment: f64,
    width: f64,
    head: Option<&Arrowhead>,
) -> Result<(OutlinePath, Option<HeadPlacement>)> {
    let mut arc = LoopArc::new(node, attachment, head.map_or(0.0, Arrowhead::reach));
    let mut head = head;
    if arc.sweep <= 0.0 && head.is_some() {
        debug!(sweep = arc.sweep, "no room for the self-loop head, dropping it");
        arc = LoopArc::new(node, attachment, 0.0);
        head = None;
    }
    if arc.sweep <= 0.0 {
        return Err(GeometryError::Degenerate(format!(
            "self-loop attachment {attachment} leaves no arc to draw"
        ))
        .into());
    }

    let half = width * 0.5;
    let outer = arc.radius + half;
    let inner = arc.radius - half;
    if inner <= 0.0 {
        return Err(GeometryError::Degenerate(format!(
            "edge width {width} exceeds the self-loop diameter"
        ))
        .into());
    }

    let end = arc.end();
    let placement = head.map(|h| {
        (
            h,
            place_on_arc(&arc.center, arc.radius, end, arc.sweep, h),
        )
    });

    let mut path = OutlinePath::new();
    path.move_to(arc_point(&arc.center, outer, arc.begin));
    path.arc_to(arc.center, outer, arc.begin, arc.sweep);
    if let Some((h, p)) = placement {
        // Travel is counter-clockwise, so the head's top side faces inward.
        path.extend_lines(h.outline(&p.position, p.angle).into_iter().rev());
    }
    path.line_to(arc_point(&arc.center, inner, end));
    path.arc_to(arc.center, inner, end, -arc.sweep);
    path.close();
    Ok((path, placement.map(|(_, p)| p)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::dist;
    use approx::assert_abs_diff_eq;

    fn node() -> Node {
        Node::ellipse(Point2::new(0.0, 0.0), 40.0, 40.0).unwrap()
    }

    #[test]
    fn square_node_loop_without_head() {
        let arc = LoopArc::new(&node(), 0.0, 0.0);
        assert_abs_diff_eq!(arc.radius, 20.0, epsilon = 1e-12);
        assert_abs_diff_eq!(arc.center, Point2::new(0.0, -20.0), epsilon = 1e-12);
        assert_abs_diff_eq!(arc.begin, 270.0, epsilon = 1e-9);
        assert_abs_diff_eq!(arc.sweep, 270.0, epsilon = 1e-6);
    }

    #[test]
    fn head_shortens_sweep() {
        let arc = LoopArc::new(&node(), 0.0, 14.0);
        let expected = 270.0 - (14.0_f64 / 20.0).to_degrees();
        assert_abs_diff_eq!(arc.sweep, expected, epsilon = 1e-6);
    }

    #[test]
    fn wide_node_radius() {
        let wide = Node::ellipse(Point2::new(0.0, 0.0), 80.0, 40.0).unwrap();
        let arc = LoopArc::new(&wide, 0.0, 0.0);
        // (40² + 20²) / (2·20)
        assert_abs_diff_eq!(arc.radius, 50.0, epsilon = 1e-12);
    }

    #[test]
    fn outline_is_an_annulus_sector() {
        let head = Arrowhead::arrow(10.0, 10.0, 4.0).unwrap();
        let (path, placement) = build(&node(), 0.0, 4.0, Some(&head)).unwrap();
        let p = placement.unwrap();
        let center = Point2::new(0.0, -20.0);
        assert_abs_diff_eq!(dist(&p.position, &center), 20.0, epsilon = 1e-9);
        // A head of height 10 on a radius-20 circle: the apex sits on the tangent.
        assert_abs_diff_eq!(dist(&p.apex, &center), 500.0_f64.sqrt(), epsilon = 1e-9);
        assert!(path.contains(&Point2::new(0.0, -40.0), 0.01));
        assert!(!path.contains(&center, 0.01));
    }

    #[test]
    fn oversized_width_is_degenerate() {
        assert!(build(&node(), 0.0, 40.0, None).is_err());
    }

    #[test]
    fn head_dropped_when_it_cannot_fit() {
        let head = Arrowhead::arrow(10.0, 400.0, 4.0).unwrap();
        let (_, placement) = build(&node(), 0.0, 4.0, Some(&head)).unwrap();
        assert!(placement.is_none());
    }
}
