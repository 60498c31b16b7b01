use super::Point2;

/// Winding number of a closed polygon around `point`.
///
/// Zero means outside. Each full counter-clockwise (Y-up) loop around the
/// point contributes `+1`, each clockwise loop `−1`.
#[must_use]
pub fn winding_number(point: &Point2, polygon: &[Point2]) -> i32 {
    let n = polygon.len();
    if n < 3 {
        return 0;
    }
    let mut winding = 0;
    for i in 0..n {
        let a = &polygon[i];
        let b = &polygon[(i + 1) % n];
        let side = (b.x - a.x) * (point.y - a.y) - (point.x - a.x) * (b.y - a.y);
        if a.y <= point.y {
            if b.y > point.y && side > 0.0 {
                winding += 1;
            }
        } else if b.y <= point.y && side < 0.0 {
            winding -= 1;
        }
    }
    winding
}
