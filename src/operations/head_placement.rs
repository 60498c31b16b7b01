//! Arrowhead placement: where the head's base sits and which way it points.

use crate::config::EngineParams;
use crate::geometry::{Arrowhead, Node, QuadBezier};
use crate::math::arc_2d::{arc_point, arc_tangent};
use crate::math::{approach_angle, direction_degrees, dist, internal_division, Point2};

/// Position and orientation of a head along an edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadPlacement {
    /// Anchor of the head: the centre of its base, where the edge body ends.
    pub position: Point2,
    /// Direction the head points, in degrees clockwise from +X on screen.
    pub angle: f64,
    /// Far end of the head along its axis.
    pub apex: Point2,
}

impl HeadPlacement {
    fn new(head: &Arrowhead, position: Point2, angle: f64) -> Self {
        Self {
            position,
            angle,
            apex: head.apex(&position, angle),
        }
    }
}

/// Distance from the target centre to the head's base:
/// boundary radius toward `from` + head offset + head height.
#[must_use]
pub fn head_reach(target: &Node, from: &Point2, head: &Arrowhead) -> f64 {
    target.boundary_radius(approach_angle(from, &target.position())) + head.reach()
}

/// Places a head on the straight segment `start → target centre`.
///
/// The base sits `reach` short of the target centre. The head is suppressed
/// (`None`) when that point does not lie ahead of `start`, which happens when
/// the segment is too short for the head or the last elbow leg points away.
#[must_use]
pub fn place_on_segment(start: &Point2, target: &Node, head: &Arrowhead) -> Option<HeadPlacement> {
    let end = target.position();
    let reach = head_reach(target, start, head);
    let length = dist(start, &end);
    let base = internal_division(start, &end, length - reach, reach);
    if (end - start).dot(&(base - start)) <= 0.0 {
        return None;
    }
    Some(HeadPlacement::new(head, base, direction_degrees(&(end - start))))
}

/// Places a head on a curve ending at the target centre.
///
/// Samples `t = 1, 1 − step, …` down to `params.arc_sample_floor`, measuring
/// the arc length back from the end, and keeps the sample closest to `reach`.
/// The head points along the tangent at that sample (the line from the split
/// sub-control point to the base). Returns the placement and its parameter,
/// or `None` if no sample is within `arc_match_tolerance` of `reach`.
#[must_use]
pub fn place_on_curve(
    curve: &QuadBezier,
    reach: f64,
    head: &Arrowhead,
    params: &EngineParams,
) -> Option<(HeadPlacement, f64)> {
    let step = params.arc_sample_step.max(1e-6);
    let mut best: Option<(f64, f64)> = None;
    let mut k = 0.0_f64;
    loop {
        let t = 1.0 - k * step;
        if t < params.arc_sample_floor {
            break;
        }
        let err = (curve.arc_length(t, 1.0) - reach).abs();
        if best.is_none_or(|(_, e)| err < e) {
            best = Some((t, err));
        } else {
            // Arc length grows monotonically as t falls; the error only rises from here.
            break;
        }
        k += 1.0;
    }

    let (t, err) = best?;
    if err > params.arc_match_tolerance * reach {
        return None;
    }
    let base = curve.evaluate(t);
    let pre_tip = internal_division(&curve.start, &curve.control, t, 1.0 - t);
    let tangent = if dist(&pre_tip, &base) > 1e-9 {
        base - pre_tip
    } else {
        curve.derivative(t)
    };
    Some((HeadPlacement::new(head, base, direction_degrees(&tangent)), t))
}

/// Places a head at `angle_deg` on a circle travelled with the sign of `sweep_deg`.
#[must_use]
pub fn place_on_arc(
    center: &Point2,
    radius: f64,
    angle_deg: f64,
    sweep_deg: f64,
    head: &Arrowhead,
) -> HeadPlacement {
    let base = arc_point(center, radius, angle_deg);
    let tangent = arc_tangent(angle_deg, sweep_deg);
    HeadPlacement::new(head, base, direction_degrees(&tangent))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn head() -> Arrowhead {
        Arrowhead::arrow(10.0, 10.0, 4.0).unwrap()
    }

    #[test]
    fn segment_head_sits_reach_short_of_center() {
        let target = Node::circle(Point2::new(70.0, 0.0), 20.0).unwrap();
        let p = place_on_segment(&Point2::new(-70.0, 0.0), &target, &head()).unwrap();
        assert_abs_diff_eq!(p.position, Point2::new(36.0, 0.0), epsilon = 1e-9);
        assert_abs_diff_eq!(p.apex, Point2::new(46.0, 0.0), epsilon = 1e-9);
        assert!(p.angle.abs() < 1e-9);
    }

    #[test]
    fn segment_head_uses_ellipse_radius_on_approach() {
        let target = Node::ellipse(Point2::new(0.0, 100.0), 60.0, 20.0).unwrap();
        let p = place_on_segment(&Point2::new(0.0, 0.0), &target, &head()).unwrap();
        // Approaching vertically meets the short semi-axis (10).
        assert_abs_diff_eq!(p.position, Point2::new(0.0, 76.0), epsilon = 1e-9);
        assert!((p.angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn segment_too_short_suppresses_head() {
        let target = Node::circle(Point2::new(20.0, 0.0), 10.0).unwrap();
        assert!(place_on_segment(&Point2::new(0.0, 0.0), &target, &head()).is_none());
    }

    #[test]
    fn curve_head_matches_reach() {
        let curve = QuadBezier::new(
            Point2::new(-70.0, 0.0),
            Point2::new(0.0, -50.0),
            Point2::new(70.0, 0.0),
        );
        let params = EngineParams::default();
        let (p, t) = place_on_curve(&curve, 34.0, &head(), &params).unwrap();
        assert!(t < 1.0 && t > 0.5);
        assert!((curve.arc_length(t, 1.0) - 34.0).abs() < 0.2);
        // The apex is one head height further along the tangent.
        assert!((dist(&p.position, &p.apex) - 10.0).abs() < 1e-9);
        // Heading right and down toward the end of the arch.
        assert!(p.angle > 0.0 && p.angle < 45.0, "angle={}", p.angle);
    }

    #[test]
    fn curve_head_takes_closest_sample_not_first_in_tolerance() {
        let curve = QuadBezier::new(
            Point2::new(-70.0, 0.0),
            Point2::new(0.0, -50.0),
            Point2::new(70.0, 0.0),
        );
        let params = EngineParams::default();
        let (_, t) = place_on_curve(&curve, 34.0, &head(), &params).unwrap();
        let err = |t: f64| (curve.arc_length(t, 1.0) - 34.0).abs();
        // t = 0.8 is already within 5% but further from the reach.
        assert!(err(0.8) < 34.0 * params.arc_match_tolerance);
        assert!(t < 0.8, "t={t}");
        assert!(err(t) <= err(t + params.arc_sample_step));
        assert!(err(t) <= err(t - params.arc_sample_step));
    }

    #[test]
    fn curve_too_short_for_head() {
        let curve = QuadBezier::new(Point2::new(0.0, 0.0), Point2::new(5.0, -5.0), Point2::new(10.0, 0.0));
        assert!(place_on_curve(&curve, 40.0, &head(), &EngineParams::default()).is_none());
    }

    #[test]
    fn arc_head_points_along_travel() {
        let p = place_on_arc(&Point2::origin(), 10.0, 270.0, 90.0, &head());
        assert_abs_diff_eq!(p.position, Point2::new(0.0, 10.0), epsilon = 1e-9);
        assert!(p.angle.abs() < 1e-9);
    }
}
