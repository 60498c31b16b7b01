/// Circular-arc helpers in the screen convention used by outline paths.
///
/// Arc angles are in degrees and increase counter-clockwise *as seen on
/// screen*: angle `0` is at 3 o'clock, `90` at 12 o'clock, `270` at 6 o'clock.
/// Because screen Y grows downward, a point at angle `a` is
/// `center + r·(cos a, −sin a)`.
use super::{Point2, Vector2};

/// Evaluates the point at `angle_deg` on a circle.
#[must_use]
pub fn arc_point(center: &Point2, radius: f64, angle_deg: f64) -> Point2 {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    Point2::new(center.x + radius * cos, center.y - radius * sin)
}

/// Unit tangent at `angle_deg` pointing in the direction of travel for a
/// sweep of the given sign.
#[must_use]
pub fn arc_tangent(angle_deg: f64, sweep_deg: f64) -> Vector2 {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let sign = if sweep_deg >= 0.0 { 1.0 } else { -1.0 };
    Vector2::new(-sign * sin, -sign * cos)
}

/// Angle (degrees) subtended at the center of a circle of `radius` by a chord
/// of length `chord`, from the law of cosines:
/// `acos((2R² − c²) / (2R²))`.
///
/// Chords longer than the diameter clamp to 180°.
#[must_use]
pub fn chord_angle(radius: f64, chord: f64) -> f64 {
    let r2 = 2.0 * radius * radius;
    if r2 < 1e-20 {
        return 0.0;
    }
    ((r2 - chord * chord) / r2).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Checks whether `angle_deg` lies on an arc starting at `start_deg` and
/// sweeping `sweep_deg` (either sign).
#[must_use]
pub fn angle_in_sweep(angle_deg: f64, start_deg: f64, sweep_deg: f64) -> bool {
    let eps = 1e-9;
    let delta = (angle_deg - start_deg).rem_euclid(360.0);
    if sweep_deg >= 0.0 {
        delta <= sweep_deg + eps || sweep_deg >= 360.0
    } else {
        let back = (360.0 - delta).rem_euclid(360.0);
        back <= -sweep_deg + eps || sweep_deg <= -360.0
    }
}

/// Number of line segments needed to approximate an arc within `tolerance`.
#[must_use]
pub fn arc_subdivision_count(radius: f64, abs_sweep_deg: f64, tolerance: f64) -> u32 {
    if radius < 1e-12 || abs_sweep_deg < 1e-12 || tolerance <= 0.0 {
        return 1;
    }
    // From the sagitta formula: sagitta = r * (1 - cos(θ/2))
    let max_angle = if tolerance >= radius {
        std::f64::consts::PI
    } else {
        2.0 * (1.0 - tolerance / radius).acos()
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (abs_sweep_deg.to_radians() / max_angle).ceil() as u32;
    n.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const TOL: f64 = 1e-10;

    #[test]
    fn arc_point_screen_convention() {
        let c = Point2::new(10.0, 10.0);
        assert_abs_diff_eq!(arc_point(&c, 2.0, 0.0), Point2::new(12.0, 10.0), epsilon = TOL);
        // 90° is the top of the circle, i.e. smaller screen Y.
        assert_abs_diff_eq!(arc_point(&c, 2.0, 90.0), Point2::new(10.0, 8.0), epsilon = TOL);
        assert_abs_diff_eq!(arc_point(&c, 2.0, 270.0), Point2::new(10.0, 12.0), epsilon = TOL);
    }

    #[test]
    fn tangent_follows_travel_direction() {
        // At the bottom of the circle, counter-clockwise travel heads toward +X.
        let t = arc_tangent(270.0, 45.0);
        assert_abs_diff_eq!(t, Vector2::new(1.0, 0.0), epsilon = TOL);
        let back = arc_tangent(270.0, -45.0);
        assert_abs_diff_eq!(back, Vector2::new(-1.0, 0.0), epsilon = TOL);
    }

    #[test]
    fn tangent_matches_finite_difference() {
        let c = Point2::origin();
        let a = 123.0;
        let h = 1e-6;
        let fd = (arc_point(&c, 1.0, a + h) - arc_point(&c, 1.0, a)) / h.to_radians();
        assert_abs_diff_eq!(arc_tangent(a, 1.0), fd, epsilon = 1e-5);
    }

    #[test]
    fn chord_angle_law_of_cosines() {
        // A chord equal to r·√2 subtends a right angle.
        assert!((chord_angle(20.0, 20.0 * 2.0_f64.sqrt()) - 90.0).abs() < 1e-9);
        assert!(chord_angle(5.0, 0.0).abs() < TOL);
        assert!((chord_angle(1.0, 5.0) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn sweep_membership() {
        assert!(angle_in_sweep(0.0, 270.0, 180.0));
        assert!(!angle_in_sweep(180.0, 270.0, 45.0));
        assert!(angle_in_sweep(200.0, 270.0, -90.0));
        assert!(!angle_in_sweep(300.0, 270.0, -90.0));
    }

    #[test]
    fn subdivision_count_grows_with_sweep() {
        let small = arc_subdivision_count(10.0, 30.0, 0.01);
        let large = arc_subdivision_count(10.0, 300.0, 0.01);
        assert!(large > small);
        assert_eq!(arc_subdivision_count(0.0, 90.0, 0.1), 1);
    }
}
