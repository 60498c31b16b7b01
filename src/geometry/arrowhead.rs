use crate::error::{GeometryError, Result};
use crate::math::{rotate, Point2, Vector2};

/// Shape of an edge decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadKind {
    /// Pointed triangle.
    Arrow,
    /// Flat rectangle across the edge.
    Hammer,
}

impl HeadKind {
    /// Persistence tag of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Arrow => "arrow",
            Self::Hammer => "hammer",
        }
    }

    /// Parses a persistence tag.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "arrow" => Some(Self::Arrow),
            "hammer" => Some(Self::Hammer),
            _ => None,
        }
    }
}

/// Head decorating the target end of an edge.
///
/// `width` is measured across the edge, `height` along it, and `offset` is the
/// gap kept between the head's far end and the target node's boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrowhead {
    kind: HeadKind,
    width: f64,
    height: f64,
    offset: f64,
}

impl Arrowhead {
    /// Creates a new head.
    ///
    /// # Errors
    ///
    /// Returns an error if `width` or `height` is not positive, or `offset` is negative.
    pub fn new(kind: HeadKind, width: f64, height: f64, offset: f64) -> Result<Self> {
        if !(width.is_finite() && width > 0.0) {
            return Err(GeometryError::Degenerate("head width must be positive".into()).into());
        }
        if !(height.is_finite() && height > 0.0) {
            return Err(GeometryError::Degenerate("head height must be positive".into()).into());
        }
        if !(offset.is_finite() && offset >= 0.0) {
            return Err(
                GeometryError::Degenerate("head offset must not be negative".into()).into(),
            );
        }
        Ok(Self {
            kind,
            width,
            height,
            offset,
        })
    }

    /// Creates a triangular arrow head.
    ///
    /// # Errors
    ///
    /// See [`Arrowhead::new`].
    pub fn arrow(width: f64, height: f64, offset: f64) -> Result<Self> {
        Self::new(HeadKind::Arrow, width, height, offset)
    }

    /// Creates a flat hammer head.
    ///
    /// # Errors
    ///
    /// See [`Arrowhead::new`].
    pub fn hammer(width: f64, height: f64, offset: f64) -> Result<Self> {
        Self::new(HeadKind::Hammer, width, height, offset)
    }

    #[must_use]
    pub fn kind(&self) -> HeadKind {
        self.kind
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Distance from the head's base to the point it must stop short of:
    /// `offset + height`.
    #[must_use]
    pub fn reach(&self) -> f64 {
        self.offset + self.height
    }

    /// Returns a copy with width and height multiplied by `factor`; the offset is kept.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
            ..*self
        }
    }

    /// Outline of the head anchored at `base` and pointing along `angle_deg`.
    ///
    /// The polygon is built in head-local coordinates (X along the edge,
    /// Y across it) and rotated about `base`. Points run from the local −Y
    /// side to the +Y side, matching the top-to-bottom walk of an edge outline.
    #[must_use]
    pub fn outline(&self, base: &Point2, angle_deg: f64) -> Vec<Point2> {
        let hw = self.width * 0.5;
        let h = self.height;
        let local = match self.kind {
            HeadKind::Arrow => vec![(0.0, -hw), (h, 0.0), (0.0, hw)],
            HeadKind::Hammer => vec![(0.0, -hw), (h, -hw), (h, hw), (0.0, hw)],
        };
        local
            .into_iter()
            .map(|(x, y)| rotate(base, &(base + Vector2::new(x, y)), angle_deg, None))
            .collect()
    }

    /// Far end of the head along its axis (the arrow's point).
    #[must_use]
    pub fn apex(&self, base: &Point2, angle_deg: f64) -> Point2 {
        rotate(base, &(base + Vector2::new(self.height, 0.0)), angle_deg, None)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const TOL: f64 = 1e-9;

    #[test]
    fn arrow_outline_unrotated() {
        let head = Arrowhead::arrow(10.0, 8.0, 2.0).unwrap();
        let pts = head.outline(&Point2::new(1.0, 1.0), 0.0);
        assert_eq!(pts.len(), 3);
        assert_abs_diff_eq!(pts[0], Point2::new(1.0, -4.0), epsilon = TOL);
        assert_abs_diff_eq!(pts[1], Point2::new(9.0, 1.0), epsilon = TOL);
        assert_abs_diff_eq!(pts[2], Point2::new(1.0, 6.0), epsilon = TOL);
    }

    #[test]
    fn hammer_outline_rotated_down() {
        let head = Arrowhead::hammer(4.0, 2.0, 0.0).unwrap();
        // 90° points down the screen.
        let pts = head.outline(&Point2::origin(), 90.0);
        assert_eq!(pts.len(), 4);
        assert_abs_diff_eq!(pts[0], Point2::new(2.0, 0.0), epsilon = TOL);
        assert_abs_diff_eq!(pts[1], Point2::new(2.0, 2.0), epsilon = TOL);
        assert_abs_diff_eq!(pts[2], Point2::new(-2.0, 2.0), epsilon = TOL);
        assert_abs_diff_eq!(pts[3], Point2::new(-2.0, 0.0), epsilon = TOL);
    }

    #[test]
    fn apex_lies_height_ahead() {
        let head = Arrowhead::arrow(10.0, 10.0, 4.0).unwrap();
        let apex = head.apex(&Point2::new(0.0, 0.0), 180.0);
        assert_abs_diff_eq!(apex, Point2::new(-10.0, 0.0), epsilon = TOL);
        assert!((head.reach() - 14.0).abs() < TOL);
    }

    #[test]
    fn scaling_keeps_offset() {
        let head = Arrowhead::arrow(10.0, 6.0, 3.0).unwrap().scaled(2.0);
        assert!((head.width() - 20.0).abs() < TOL);
        assert!((head.height() - 12.0).abs() < TOL);
        assert!((head.offset() - 3.0).abs() < TOL);
    }

    #[test]
    fn invalid_dimensions() {
        assert!(Arrowhead::arrow(0.0, 1.0, 0.0).is_err());
        assert!(Arrowhead::hammer(1.0, -1.0, 0.0).is_err());
        assert!(Arrowhead::arrow(1.0, 1.0, -0.5).is_err());
    }

    #[test]
    fn kind_tags() {
        assert_eq!(HeadKind::parse(HeadKind::Hammer.as_str()), Some(HeadKind::Hammer));
        assert_eq!(HeadKind::parse("diamond"), None);
    }
}
