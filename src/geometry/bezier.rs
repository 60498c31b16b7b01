use crate::error::{GeometryError, Result};
use crate::math::{angle_between, dist, internal_division, solve_cubic, Point2, Vector2, TOLERANCE};

/// Tolerance for accepting a cubic root just outside `[0, 1]`.
const PARAM_EPS: f64 = 1e-9;

/// Quadratic Bézier curve `B(t) = (1−t)²·p0 + 2t(1−t)·pc + t²·p2`, `t ∈ [0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadBezier {
    pub start: Point2,
    pub control: Point2,
    pub end: Point2,
}

impl QuadBezier {
    /// Creates a curve from its three control points.
    #[must_use]
    pub fn new(start: Point2, control: Point2, end: Point2) -> Self {
        Self {
            start,
            control,
            end,
        }
    }

    /// Evaluates the curve at `t`.
    #[must_use]
    pub fn evaluate(&self, t: f64) -> Point2 {
        let u = 1.0 - t;
        Point2::from(
            self.start.coords * (u * u)
                + self.control.coords * (2.0 * u * t)
                + self.end.coords * (t * t),
        )
    }

    /// First derivative `B'(t)`.
    #[must_use]
    pub fn derivative(&self, t: f64) -> Vector2 {
        ((self.control - self.start) * (1.0 - t) + (self.end - self.control) * t) * 2.0
    }

    /// Splits the curve at `t` (de Casteljau), returning the `[0, t]` and `[t, 1]` pieces.
    #[must_use]
    pub fn split(&self, t: f64) -> (Self, Self) {
        let left_ctrl = internal_division(&self.start, &self.control, t, 1.0 - t);
        let right_ctrl = internal_division(&self.control, &self.end, t, 1.0 - t);
        let mid = self.evaluate(t);
        (
            Self::new(self.start, left_ctrl, mid),
            Self::new(mid, right_ctrl, self.end),
        )
    }

    /// Returns whether the control point is (nearly) collinear with the endpoints.
    ///
    /// The angle between `control − start` and `end − control` is compared
    /// against `0` and `π` with the given tolerance in radians. A control
    /// point sitting on an endpoint counts as straight.
    #[must_use]
    pub fn is_straight(&self, tolerance: f64) -> bool {
        let angle = angle_between(&(self.control - self.start), &(self.end - self.control))
            .to_radians();
        angle < tolerance || angle > std::f64::consts::PI - tolerance
    }

    /// Length of the curve between `t_start` and `t_end`.
    ///
    /// Closed-form integral of `|B'(t)| = 2·sqrt(A·t² + B·t + C)` with
    /// `A = |p0 − 2pc + p2|²`, `B = 2·(pc − p0)·(p0 − 2pc + p2)` and
    /// `C = |pc − p0|²`.
    #[must_use]
    pub fn arc_length(&self, t_start: f64, t_end: f64) -> f64 {
        let d1 = self.control - self.start;
        let d2 = self.start.coords - self.control.coords * 2.0 + self.end.coords;
        let a = d2.dot(&d2);
        let b = 2.0 * d1.dot(&d2);
        let c = d1.dot(&d1);

        // No curvature: uniform speed.
        if a < TOLERANCE {
            return 2.0 * c.sqrt() * (t_end - t_start);
        }

        let disc = 4.0 * a * c - b * b;
        if disc <= TOLERANCE * 4.0 * a * c {
            // B'(t) stays on one line: |B'(t)| = 2·sqrt(A)·|t + B/(2A)|.
            let lambda = b / (2.0 * a);
            let g = |u: f64| u * u.abs() * 0.5;
            return 2.0 * a.sqrt() * (g(t_end + lambda) - g(t_start + lambda));
        }

        let sqrt_a = a.sqrt();
        let antiderivative = |t: f64| {
            let q = (a * t * t + b * t + c).max(0.0).sqrt();
            let lin = 2.0 * a * t + b;
            lin * q / (4.0 * a) + disc / (8.0 * a * sqrt_a) * (2.0 * sqrt_a * q + lin).ln()
        };
        2.0 * (antiderivative(t_end) - antiderivative(t_start))
    }

    /// Finds the point on the curve nearest to `target`.
    ///
    /// Setting the derivative of the squared distance to zero gives a cubic
    /// in `t`. Coordinates are normalized per axis (zero mean, unit standard
    /// deviation) before solving so that mixed magnitudes do not blow up the
    /// coefficients. Returns the curve point and its parameter.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NoValidParameter`] if no real root lies in `[0, 1]`.
    pub fn nearest_point(&self, target: &Point2) -> Result<(Point2, f64)> {
        let [p0, pc, p2, q] = normalize([self.start, self.control, self.end, *target]);

        let a1 = pc - p0;
        let a2 = p0.coords - pc.coords * 2.0 + p2.coords;
        let m = p0 - q;

        let roots = solve_cubic(
            a2.dot(&a2),
            3.0 * a1.dot(&a2),
            2.0 * a1.dot(&a1) + m.dot(&a2),
            m.dot(&a1),
        );

        let normalized = Self::new(p0, pc, p2);
        let best = roots
            .into_iter()
            .filter(|t| t.is_finite() && (-PARAM_EPS..=1.0 + PARAM_EPS).contains(t))
            .map(|t| {
                let t = t.clamp(0.0, 1.0);
                (t, dist(&normalized.evaluate(t), &q))
            })
            .min_by(|x, y| x.1.total_cmp(&y.1));

        match best {
            Some((t, _)) => Ok((self.evaluate(t), t)),
            None => Err(GeometryError::NoValidParameter("nearest point on curve").into()),
        }
    }
}

/// Per-axis z-score normalization; an axis without spread is only centered.
fn normalize(points: [Point2; 4]) -> [Point2; 4] {
    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    let mean = points.iter().fold(Vector2::zeros(), |acc, p| acc + p.coords) / n;
    let var = points.iter().fold(Vector2::zeros(), |acc, p| {
        let d = p.coords - mean;
        acc + d.component_mul(&d)
    }) / n;
    let scale = |v: f64| {
        let sd = v.sqrt();
        if sd < TOLERANCE {
            1.0
        } else {
            sd
        }
    };
    let (sx, sy) = (scale(var.x), scale(var.y));
    points.map(|p| Point2::new((p.x - mean.x) / sx, (p.y - mean.y) / sy))
}
