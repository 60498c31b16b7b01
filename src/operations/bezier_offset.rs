//! Width offsetting of a quadratic Bézier by subdivision.
//!
//! The curve is cut into four quasi-linear quadratic pieces (the *spine*).
//! Every on-curve joint gets a top/bottom offset point at half the width,
//! and every sub-control point gets a miter offset control point, so each
//! piece's offset is again a quadratic sharing tangents with its neighbours.

use crate::error::{GeometryError, Result};
use crate::geometry::{OutlinePath, QuadBezier};
use crate::math::{internal_division, rotate, Point2, TOLERANCE};

/// Number of points in a subdivided spine: 5 on-curve points and 4 sub-controls.
pub const SPINE_LEN: usize = 9;

/// Subdivides a quadratic Bézier into four pieces.
///
/// The first cut is at the curve point nearest the control point; each half
/// is then cut again at the point nearest its own sub-control point. The
/// result alternates on-curve points and sub-control points:
/// `[pt0, c01, pt1, c12, pt2, c23, pt3, c34, pt4]`.
///
/// # Errors
///
/// Propagates [`GeometryError::NoValidParameter`] from the nearest-point
/// solve; callers only invoke this on curves that passed the straightness test.
pub fn identify_sps(curve: &QuadBezier) -> Result<[Point2; SPINE_LEN]> {
    let (pt2, t2) = curve.nearest_point(&curve.control)?;
    let p11 = internal_division(&curve.start, &curve.control, t2, 1.0 - t2);
    let p12 = internal_division(&curve.control, &curve.end, t2, 1.0 - t2);

    let left = QuadBezier::new(curve.start, p11, pt2);
    let (pt1, t1) = left.nearest_point(&p11)?;
    let c01 = internal_division(&curve.start, &p11, t1, 1.0 - t1);
    let c12 = internal_division(&p11, &pt2, t1, 1.0 - t1);

    let right = QuadBezier::new(pt2, p12, curve.end);
    let (pt3, t3) = right.nearest_point(&p12)?;
    let c23 = internal_division(&pt2, &p12, t3, 1.0 - t3);
    let c34 = internal_division(&p12, &curve.end, t3, 1.0 - t3);

    Ok([curve.start, c01, pt1, c12, pt2, c23, pt3, c34, curve.end])
}

/// Offset points at a path end, perpendicular to the direction toward `neighbor`.
///
/// `leading` is true at the start of a path (neighbor lies ahead) and false
/// at its end (neighbor lies behind). Returns `(top, bottom)`.
#[must_use]
pub fn cap_offsets(point: &Point2, neighbor: &Point2, half_width: f64, leading: bool) -> (Point2, Point2) {
    let turn = if leading { -90.0 } else { 90.0 };
    (
        rotate(point, neighbor, turn, Some(half_width)),
        rotate(point, neighbor, -turn, Some(half_width)),
    )
}

/// Miter offsets at `joint` between the directions toward `prev` and `next`.
///
/// Both neighbours are rotated a quarter turn about the joint onto the same
/// side (unit length) and summed. Scaling the sum `s` by `2h / |s|²` lands on
/// the intersection of the two lines offset by `h`, so straight runs get
/// exactly `h` and right angles get `h·√2`. Returns `(top, bottom)`.
#[must_use]
pub fn miter_offsets(prev: &Point2, joint: &Point2, next: &Point2, half_width: f64) -> (Point2, Point2) {
    let a = rotate(joint, prev, 90.0, Some(1.0)) - joint;
    let b = rotate(joint, next, -90.0, Some(1.0)) - joint;
    let sum = a + b;
    let norm_sq = sum.norm_squared();
    let offset = if norm_sq < TOLERANCE {
        // Full reversal: the two sides coincide, fall back to the incoming normal.
        a * half_width
    } else {
        sum * (2.0 * half_width / norm_sq)
    };
    (joint + offset, joint - offset)
}

/// Top and bottom offset points at the five on-curve joints of a spine.
///
/// Each joint's control neighbour is rotated ±90° about it with length
/// `width / 2`; the last joint looks back at its preceding control point.
#[must_use]
pub fn identify_qps(sps: &[Point2; SPINE_LEN], width: f64) -> ([Point2; 5], [Point2; 5]) {
    let half = width * 0.5;
    let mut top = [Point2::origin(); 5];
    let mut bottom = [Point2::origin(); 5];
    for (k, idx) in (0..SPINE_LEN).step_by(2).enumerate() {
        let (t, b) = if idx + 1 < SPINE_LEN {
            cap_offsets(&sps[idx], &sps[idx + 1], half, true)
        } else {
            cap_offsets(&sps[idx], &sps[idx - 1], half, false)
        };
        top[k] = t;
        bottom[k] = b;
    }
    (top, bottom)
}

/// Offset control points for the four sub-control points of a spine.
///
/// One miter point per side is shared by the two offset pieces meeting
/// there, which keeps the offset curve continuous across joints.
#[must_use]
pub fn identify_dps(sps: &[Point2; SPINE_LEN], width: f64) -> ([Point2; 4], [Point2; 4]) {
    let half = width * 0.5;
    let mut top = [Point2::origin(); 4];
    let mut bottom = [Point2::origin(); 4];
    for (k, idx) in (1..SPINE_LEN).step_by(2).enumerate() {
        let (t, b) = miter_offsets(&sps[idx - 1], &sps[idx], &sps[idx + 1], half);
        top[k] = t;
        bottom[k] = b;
    }
    (top, bottom)
}

/// Offset lanes of a width-stroked quadratic curve.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetOutline {
    /// Subdivided centre line.
    pub spine: [Point2; SPINE_LEN],
    /// On-curve offset points on the top side.
    pub top: [Point2; 5],
    /// On-curve offset points on the bottom side.
    pub bottom: [Point2; 5],
    /// Offset control points on the top side.
    pub top_controls: [Point2; 4],
    /// Offset control points on the bottom side.
    pub bottom_controls: [Point2; 4],
}

impl OffsetOutline {
    /// The four quadratic pieces of the top lane, start to end.
    #[must_use]
    pub fn top_lane(&self) -> [QuadBezier; 4] {
        std::array::from_fn(|i| QuadBezier::new(self.top[i], self.top_controls[i], self.top[i + 1]))
    }

    /// The four quadratic pieces of the bottom lane, start to end.
    #[must_use]
    pub fn bottom_lane(&self) -> [QuadBezier; 4] {
        std::array::from_fn(|i| {
            QuadBezier::new(self.bottom[i], self.bottom_controls[i], self.bottom[i + 1])
        })
    }

    /// Emits the top lane forward: `move_to` its start, then four `quad_to`s.
    pub fn write_top(&self, path: &mut OutlinePath) {
        path.move_to(self.top[0]);
        for i in 0..4 {
            path.quad_to(self.top_controls[i], self.top[i + 1]);
        }
    }

    /// Emits the bottom lane backward, starting with a line to its far end.
    pub fn write_bottom_reversed(&self, path: &mut OutlinePath) {
        path.line_to(self.bottom[4]);
        for i in (0..4).rev() {
            path.quad_to(self.bottom_controls[i], self.bottom[i]);
        }
    }

    fn is_finite(&self) -> bool {
        self.spine
            .iter()
            .chain(&self.top)
            .chain(&self.bottom)
            .chain(&self.top_controls)
            .chain(&self.bottom_controls)
            .all(|p| p.x.is_finite() && p.y.is_finite())
    }
}

/// Offsets a quadratic Bézier by half a stroke width on each side.
#[derive(Debug)]
pub struct BezierOffset {
    curve: QuadBezier,
    width: f64,
}

impl BezierOffset {
    /// Creates a new offset operation.
    #[must_use]
    pub fn new(curve: QuadBezier, width: f64) -> Self {
        Self { curve, width }
    }

    /// Executes the offset.
    ///
    /// # Errors
    ///
    /// Returns an error if the width is not positive, if the subdivision finds
    /// no valid curve parameter, or if the result contains non-finite values.
    pub fn execute(&self) -> Result<OffsetOutline> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(GeometryError::Degenerate("stroke width must be positive".into()).into());
        }
        let spine = identify_sps(&self.curve)?;
        let (top, bottom) = identify_qps(&spine, self.width);
        let (top_controls, bottom_controls) = identify_dps(&spine, self.width);
        let outline = OffsetOutline {
            spine,
            top,
            bottom,
            top_controls,
            bottom_controls,
        };
        if !outline.is_finite() {
            return Err(GeometryError::NonFinite("curve offset").into());
        }
        Ok(outline)
    }
}
