//! Real roots of cubic polynomials via the depressed cubic and Cardano's formula.

use std::f64::consts::PI;

use super::TOLERANCE;

/// Discriminant magnitude treated as zero (repeated-root branch).
const DISCRIMINANT_EPS: f64 = 1e-12;

/// Returns the real roots of `a·t³ + b·t² + c·t + d = 0`, sorted ascending.
///
/// The cubic is reduced to `s³ + p·s + q = 0` with `t = s − b/(3a)` and the
/// discriminant `D = (q/2)² + (p/3)³` selects the branch:
///
/// - `D ≈ 0`: a triple root (`p ≈ 0`) or a double root plus a simple one
/// - `D < 0`: three distinct real roots (trigonometric form)
/// - `D > 0`: one real root (Cardano); the complex pair is discarded
///
/// A vanishing leading coefficient falls back to the quadratic or linear case.
#[must_use]
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
    if a.abs() < TOLERANCE {
        return solve_quadratic(b, c, d);
    }

    let p = (3.0 * a * c - b * b) / (3.0 * a * a);
    let q = (2.0 * b * b * b - 9.0 * a * b * c + 27.0 * a * a * d) / (27.0 * a * a * a);
    let shift = -b / (3.0 * a);
    let disc = (q / 2.0).powi(2) + (p / 3.0).powi(3);

    let mut roots = if disc.abs() < DISCRIMINANT_EPS {
        if p.abs() < DISCRIMINANT_EPS {
            vec![shift]
        } else {
            let u = (-q / 2.0).cbrt();
            vec![2.0 * u + shift, -u + shift]
        }
    } else if disc < 0.0 {
        let r = 2.0 * (-p / 3.0).sqrt();
        let phi = ((3.0 * q / (2.0 * p)) * (-3.0 / p).sqrt()).clamp(-1.0, 1.0).acos() / 3.0;
        (0..3)
            .map(|k| r * (phi - 2.0 * PI * f64::from(k) / 3.0).cos() + shift)
            .collect()
    } else {
        let sq = disc.sqrt();
        let u = (-q / 2.0 + sq).cbrt();
        let v = (-q / 2.0 - sq).cbrt();
        vec![u + v + shift]
    };

    roots.sort_by(f64::total_cmp);
    roots
}

fn solve_quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a.abs() < TOLERANCE {
        if b.abs() < TOLERANCE {
            return Vec::new();
        }
        return vec![-c / b];
    }
    let disc = b * b - 4.0 * a * c;
    if disc < -DISCRIMINANT_EPS {
        return Vec::new();
    }
    if disc.abs() <= DISCRIMINANT_EPS {
        return vec![-b / (2.0 * a)];
    }
    let sq = disc.sqrt();
    let mut roots = vec![(-b - sq) / (2.0 * a), (-b + sq) / (2.0 * a)];
    roots.sort_by(f64::total_cmp);
    roots
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    fn assert_roots(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "roots={actual:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < TOL, "roots={actual:?} expected={expected:?}");
        }
    }

    #[test]
    fn three_distinct_real_roots() {
        // (t-1)(t-2)(t-3)
        assert_roots(&solve_cubic(1.0, -6.0, 11.0, -6.0), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn single_real_root() {
        // t³ - 1 has one real root; the complex pair is dropped.
        assert_roots(&solve_cubic(1.0, 0.0, 0.0, -1.0), &[1.0]);
    }

    #[test]
    fn double_root() {
        // (t-1)²(t-2)
        assert_roots(&solve_cubic(1.0, -4.0, 5.0, -2.0), &[1.0, 2.0]);
    }

    #[test]
    fn triple_root() {
        // (t-2)³
        assert_roots(&solve_cubic(1.0, -6.0, 12.0, -8.0), &[2.0]);
    }

    #[test]
    fn scaled_leading_coefficient() {
        // 2(t+1)(t-0.5)(t-4)
        assert_roots(&solve_cubic(2.0, -7.0, -5.0, 4.0), &[-1.0, 0.5, 4.0]);
    }

    #[test]
    fn quadratic_fallback() {
        assert_roots(&solve_cubic(0.0, 1.0, -3.0, 2.0), &[1.0, 2.0]);
        assert_roots(&solve_cubic(0.0, 0.0, 2.0, -1.0), &[0.5]);
        assert!(solve_cubic(0.0, 1.0, 0.0, 1.0).is_empty());
    }
}
