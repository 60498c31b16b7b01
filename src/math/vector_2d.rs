use super::{Point2, Vector2, TOLERANCE};

/// Dot product of two vectors.
#[must_use]
pub fn dot(v1: &Vector2, v2: &Vector2) -> f64 {
    v1.dot(v2)
}

/// Euclidean length of a vector.
#[must_use]
pub fn length(v: &Vector2) -> f64 {
    v.norm()
}

/// Euclidean distance between two points.
#[must_use]
pub fn dist(p1: &Point2, p2: &Point2) -> f64 {
    (p2 - p1).norm()
}

/// Unsigned angle between two vectors, in degrees.
///
/// Returns `0` when either vector has zero length.
#[must_use]
pub fn angle_between(v1: &Vector2, v2: &Vector2) -> f64 {
    let denom = v1.norm() * v2.norm();
    if denom < TOLERANCE {
        return 0.0;
    }
    v1.perp(v2).abs().atan2(v1.dot(v2)).to_degrees()
}

/// Point dividing the segment `p1`–`p2` in the ratio `r1 : r2` measured from `p1`.
///
/// `(r2·p1 + r1·p2) / (r1 + r2)`. A zero ratio sum returns `p1`.
#[must_use]
pub fn internal_division(p1: &Point2, p2: &Point2, r1: f64, r2: f64) -> Point2 {
    let total = r1 + r2;
    if total.abs() < TOLERANCE {
        return *p1;
    }
    Point2::from((p1.coords * r2 + p2.coords * r1) / total)
}

/// Rotates `point` about `axis` by `angle_deg`.
///
/// Positive angles turn clockwise on screen (Y down). When `target_length` is
/// given, the rotated radius is rescaled to it. A `point` coinciding with
/// `axis` has no direction and is returned unchanged.
#[must_use]
pub fn rotate(axis: &Point2, point: &Point2, angle_deg: f64, target_length: Option<f64>) -> Point2 {
    let v = point - axis;
    let len = v.norm();
    if len < TOLERANCE {
        return *point;
    }
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let rotated = Vector2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos);
    match target_length {
        Some(target) => axis + rotated * (target / len),
        None => axis + rotated,
    }
}

/// Direction of `v` in degrees, clockwise from +X on screen. Zero vectors give `0`.
#[must_use]
pub fn direction_degrees(v: &Vector2) -> f64 {
    if v.norm() < TOLERANCE {
        return 0.0;
    }
    v.y.atan2(v.x).to_degrees()
}

/// Polar angle (radians, in `[0, π]`) of the direction `from → to`, as
/// `arccos(Δx / |Δ|)`.
///
/// This is the angle fed to node boundary queries; boundary radii only depend
/// on `cos²`, so the lost sign of `Δy` does not matter. Coincident points give `0`.
#[must_use]
pub fn approach_angle(from: &Point2, to: &Point2) -> f64 {
    let d = to - from;
    let len = d.norm();
    if len < TOLERANCE {
        return 0.0;
    }
    (d.x / len).clamp(-1.0, 1.0).acos()
}

/// Unit direction of `v`, or `None` for a zero vector.
#[must_use]
pub fn unit(v: &Vector2) -> Option<Vector2> {
    let len = v.norm();
    if len < TOLERANCE {
        None
    } else {
        Some(v / len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const TOL: f64 = 1e-10;

    #[test]
    fn dot_and_length() {
        let a = Vector2::new(3.0, 4.0);
        let b = Vector2::new(-4.0, 3.0);
        assert!(dot(&a, &b).abs() < TOL);
        assert!((length(&a) - 5.0).abs() < TOL);
        assert!((dist(&Point2::new(1.0, 1.0), &Point2::new(4.0, 5.0)) - 5.0).abs() < TOL);
    }

    #[test]
    fn angle_between_right_angle() {
        let a = Vector2::new(1.0, 0.0);
        let b = Vector2::new(0.0, 2.0);
        assert!((angle_between(&a, &b) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn angle_between_opposite() {
        let a = Vector2::new(1.0, 1.0);
        let b = Vector2::new(-2.0, -2.0);
        assert!((angle_between(&a, &b) - 180.0).abs() < 1e-6);
    }

    #[test]
    fn angle_between_near_parallel_keeps_precision() {
        let a = Vector2::new(1.0, 0.0);
        let b = Vector2::new(-1.0, 1e-9);
        assert!((angle_between(&a, &b) - (180.0 - 1e-9_f64.to_degrees())).abs() < 1e-12);
        let c = Vector2::new(1.0, 1e-9);
        assert!((angle_between(&a, &c) - 1e-9_f64.to_degrees()).abs() < 1e-15);
    }

    #[test]
    fn angle_between_zero_vector() {
        let a = Vector2::new(0.0, 0.0);
        let b = Vector2::new(1.0, 0.0);
        assert!(angle_between(&a, &b).abs() < TOL);
    }

    #[test]
    fn internal_division_ratio() {
        let p = internal_division(&Point2::new(0.0, 0.0), &Point2::new(10.0, 0.0), 1.0, 3.0);
        assert_abs_diff_eq!(p, Point2::new(2.5, 0.0), epsilon = TOL);
    }

    #[test]
    fn internal_division_zero_sum() {
        let p1 = Point2::new(1.0, 2.0);
        let p = internal_division(&p1, &Point2::new(5.0, 5.0), 0.0, 0.0);
        assert_abs_diff_eq!(p, p1, epsilon = TOL);
    }

    #[test]
    fn rotate_quarter_turn_is_clockwise_on_screen() {
        // +X rotated by +90° points down the screen (+Y).
        let p = rotate(&Point2::origin(), &Point2::new(1.0, 0.0), 90.0, None);
        assert_abs_diff_eq!(p, Point2::new(0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn rotate_with_target_length() {
        let axis = Point2::new(2.0, 2.0);
        let p = rotate(&axis, &Point2::new(5.0, 2.0), -90.0, Some(0.5));
        assert_abs_diff_eq!(p, Point2::new(2.0, 1.5), epsilon = 1e-12);
    }

    #[test]
    fn rotate_degenerate_returns_point() {
        let axis = Point2::new(3.0, -1.0);
        let p = rotate(&axis, &axis, 45.0, Some(10.0));
        assert_abs_diff_eq!(p, axis, epsilon = TOL);
    }

    #[test]
    fn direction_and_approach() {
        assert!((direction_degrees(&Vector2::new(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!(direction_degrees(&Vector2::zeros()).abs() < TOL);
        let a = approach_angle(&Point2::new(0.0, 0.0), &Point2::new(0.0, -3.0));
        assert!((a - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!(approach_angle(&Point2::new(1.0, 1.0), &Point2::new(1.0, 1.0)).abs() < TOL);
    }
}
