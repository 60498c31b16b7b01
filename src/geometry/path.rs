use crate::math::arc_2d::{angle_in_sweep, arc_point, arc_subdivision_count};
use crate::math::polygon_2d::winding_number;
use crate::math::Point2;

use super::QuadBezier;

/// Fill rule applied when an outline is painted or hit-tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    /// Any non-zero winding count is inside. Keeps overlapping lanes filled.
    #[default]
    NonZero,
    /// Odd winding counts are inside.
    EvenOdd,
}

/// One drawing command of an [`OutlinePath`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    /// Starts a new sub-path.
    MoveTo(Point2),
    /// Straight line from the current point.
    LineTo(Point2),
    /// Quadratic curve from the current point.
    QuadTo { control: Point2, to: Point2 },
    /// Circular arc. A straight line joins the current point to the arc start.
    ///
    /// Angles are in degrees, counter-clockwise on screen (see [`arc_point`]).
    ArcTo {
        center: Point2,
        radius: f64,
        start_deg: f64,
        sweep_deg: f64,
    },
    /// Closes the current sub-path.
    Close,
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point2,
    pub max: Point2,
}

impl Rect {
    /// Degenerate rectangle covering a single point.
    #[must_use]
    pub fn from_point(p: Point2) -> Self {
        Self { min: p, max: p }
    }

    /// Grows the rectangle to include `p`.
    pub fn include(&mut self, p: &Point2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Returns a copy grown by `margin` on every side.
    #[must_use]
    pub fn padded(&self, margin: f64) -> Self {
        Self {
            min: Point2::new(self.min.x - margin, self.min.y - margin),
            max: Point2::new(self.max.x + margin, self.max.y + margin),
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Returns whether `p` lies inside or on the rectangle.
    #[must_use]
    pub fn contains(&self, p: &Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Closed outline of an edge, ready to be filled.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutlinePath {
    segments: Vec<PathSegment>,
    fill_rule: FillRule,
}

impl OutlinePath {
    /// Creates an empty path with the non-zero fill rule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, p: Point2) {
        self.segments.push(PathSegment::MoveTo(p));
    }

    pub fn line_to(&mut self, p: Point2) {
        self.segments.push(PathSegment::LineTo(p));
    }

    pub fn quad_to(&mut self, control: Point2, to: Point2) {
        self.segments.push(PathSegment::QuadTo { control, to });
    }

    pub fn arc_to(&mut self, center: Point2, radius: f64, start_deg: f64, sweep_deg: f64) {
        self.segments.push(PathSegment::ArcTo {
            center,
            radius,
            start_deg,
            sweep_deg,
        });
    }

    pub fn close(&mut self) {
        self.segments.push(PathSegment::Close);
    }

    /// Appends a line to each point in order.
    pub fn extend_lines<I: IntoIterator<Item = Point2>>(&mut self, points: I) {
        self.segments
            .extend(points.into_iter().map(PathSegment::LineTo));
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Sets the rule used by [`OutlinePath::contains`] and by painters.
    #[must_use]
    pub fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    #[must_use]
    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns whether every coordinate in the path is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        let ok = |p: &Point2| p.x.is_finite() && p.y.is_finite();
        self.segments.iter().all(|seg| match seg {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => ok(p),
            PathSegment::QuadTo { control, to } => ok(control) && ok(to),
            PathSegment::ArcTo {
                center,
                radius,
                start_deg,
                sweep_deg,
            } => ok(center) && radius.is_finite() && start_deg.is_finite() && sweep_deg.is_finite(),
            PathSegment::Close => true,
        })
    }

    /// Tight bounds of the drawn geometry, or `None` for an empty path.
    ///
    /// Quadratic extrema and arc extrema at the cardinal angles are included,
    /// so the rectangle hugs the curve rather than its control polygon.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        let mut rect: Option<Rect> = None;
        let mut add = |p: &Point2| match rect.as_mut() {
            Some(r) => r.include(p),
            None => rect = Some(Rect::from_point(*p)),
        };
        let mut current = Point2::origin();
        for seg in &self.segments {
            match *seg {
                PathSegment::MoveTo(p) | PathSegment::LineTo(p) => {
                    add(&p);
                    current = p;
                }
                PathSegment::QuadTo { control, to } => {
                    let curve = QuadBezier::new(current, control, to);
                    add(&to);
                    for t in quad_extrema(&curve) {
                        add(&curve.evaluate(t));
                    }
                    current = to;
                }
                PathSegment::ArcTo {
                    center,
                    radius,
                    start_deg,
                    sweep_deg,
                } => {
                    add(&arc_point(&center, radius, start_deg));
                    let end = arc_point(&center, radius, start_deg + sweep_deg);
                    add(&end);
                    for cardinal in [0.0, 90.0, 180.0, 270.0] {
                        if angle_in_sweep(cardinal, start_deg, sweep_deg) {
                            add(&arc_point(&center, radius, cardinal));
                        }
                    }
                    current = end;
                }
                PathSegment::Close => {}
            }
        }
        rect
    }

    /// Flattens the path into closed polygons, one per sub-path.
    ///
    /// Curves are subdivided so the chords stay within `tolerance` of them.
    #[must_use]
    pub fn flatten(&self, tolerance: f64) -> Vec<Vec<Point2>> {
        let mut polygons = Vec::new();
        let mut poly: Vec<Point2> = Vec::new();
        let mut current = Point2::origin();
        for seg in &self.segments {
            match *seg {
                PathSegment::MoveTo(p) => {
                    if poly.len() > 1 {
                        polygons.push(std::mem::take(&mut poly));
                    }
                    poly.clear();
                    poly.push(p);
                    current = p;
                }
                PathSegment::LineTo(p) => {
                    poly.push(p);
                    current = p;
                }
                PathSegment::QuadTo { control, to } => {
                    let curve = QuadBezier::new(current, control, to);
                    let n = quad_subdivision_count(&curve, tolerance);
                    for i in 1..=n {
                        poly.push(curve.evaluate(f64::from(i) / f64::from(n)));
                    }
                    current = to;
                }
                PathSegment::ArcTo {
                    center,
                    radius,
                    start_deg,
                    sweep_deg,
                } => {
                    let n = arc_subdivision_count(radius, sweep_deg.abs(), tolerance);
                    for i in 0..=n {
                        let angle = start_deg + sweep_deg * f64::from(i) / f64::from(n);
                        poly.push(arc_point(&center, radius, angle));
                    }
                    current = arc_point(&center, radius, start_deg + sweep_deg);
                }
                PathSegment::Close => {
                    if poly.len() > 1 {
                        polygons.push(std::mem::take(&mut poly));
                    }
                }
            }
        }
        if poly.len() > 1 {
            polygons.push(poly);
        }
        polygons
    }

    /// Hit-tests `point` against the filled outline using the path's fill rule.
    #[must_use]
    pub fn contains(&self, point: &Point2, tolerance: f64) -> bool {
        let winding: i32 = self
            .flatten(tolerance)
            .iter()
            .map(|poly| winding_number(point, poly))
            .sum();
        match self.fill_rule {
            FillRule::NonZero => winding != 0,
            FillRule::EvenOdd => winding % 2 != 0,
        }
    }
}

/// Parameters in `(0, 1)` where a quadratic reaches an extremum on either axis.
fn quad_extrema(curve: &QuadBezier) -> Vec<f64> {
    let d1 = curve.start - curve.control;
    let d2 = curve.start.coords - curve.control.coords * 2.0 + curve.end.coords;
    [(d1.x, d2.x), (d1.y, d2.y)]
        .into_iter()
        .filter(|&(_, den)| den.abs() > 1e-12)
        .map(|(num, den)| num / den)
        .filter(|t| *t > 0.0 && *t < 1.0)
        .collect()
}

fn quad_subdivision_count(curve: &QuadBezier, tolerance: f64) -> u32 {
    let dd = (curve.start.coords - curve.control.coords * 2.0 + curve.end.coords).norm();
    if tolerance <= 0.0 || dd < 1e-12 {
        return 1;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (dd / (8.0 * tolerance)).sqrt().ceil() as u32;
    n.clamp(1, 256)
}
