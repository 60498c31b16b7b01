use crate::error::{GeometryError, Result};
use crate::math::{approach_angle, dist, unit, Point2, TOLERANCE};

/// Outline family of a node.
///
/// `Circle` and `Square` are the regular variants: they are sized by a
/// radius and keep `width == height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    Ellipse,
    Circle,
    Rectangle,
    Square,
}

impl NodeShape {
    /// Returns whether the shape keeps equal width and height.
    #[must_use]
    pub fn is_regular(self) -> bool {
        matches!(self, Self::Circle | Self::Square)
    }
}

/// A diagram node as seen by the edge engine: a center, a size and a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    shape: NodeShape,
    position: Point2,
    width: f64,
    height: f64,
}

impl Node {
    /// Creates an ellipse node.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is not positive.
    pub fn ellipse(position: Point2, width: f64, height: f64) -> Result<Self> {
        Self::new(NodeShape::Ellipse, position, width, height)
    }

    /// Creates a rectangle node.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is not positive.
    pub fn rectangle(position: Point2, width: f64, height: f64) -> Result<Self> {
        Self::new(NodeShape::Rectangle, position, width, height)
    }

    /// Creates a circle node of the given radius.
    ///
    /// # Errors
    ///
    /// Returns an error if `radius` is not positive.
    pub fn circle(position: Point2, radius: f64) -> Result<Self> {
        Self::new(NodeShape::Circle, position, 2.0 * radius, 2.0 * radius)
    }

    /// Creates a square node whose half side is `radius`.
    ///
    /// # Errors
    ///
    /// Returns an error if `radius` is not positive.
    pub fn square(position: Point2, radius: f64) -> Result<Self> {
        Self::new(NodeShape::Square, position, 2.0 * radius, 2.0 * radius)
    }

    fn new(shape: NodeShape, position: Point2, width: f64, height: f64) -> Result<Self> {
        validate_size(width, height)?;
        let height = if shape.is_regular() { width } else { height };
        Ok(Self {
            shape,
            position,
            width,
            height,
        })
    }

    /// Returns the shape family.
    #[must_use]
    pub fn shape(&self) -> NodeShape {
        self.shape
    }

    /// Returns the center of the node.
    #[must_use]
    pub fn position(&self) -> Point2 {
        self.position
    }

    /// Returns the node width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the node height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Half the width.
    #[must_use]
    pub fn half_width(&self) -> f64 {
        self.width * 0.5
    }

    /// Half the height.
    #[must_use]
    pub fn half_height(&self) -> f64 {
        self.height * 0.5
    }

    /// Moves the node center.
    pub fn set_position(&mut self, position: Point2) {
        self.position = position;
    }

    /// Resizes the node. Regular shapes take `width` for both dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is not positive.
    pub fn set_size(&mut self, width: f64, height: f64) -> Result<()> {
        let height = if self.shape.is_regular() { width } else { height };
        validate_size(width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Distance from the center to the boundary along the polar angle `angle` (radians).
    ///
    /// Uses the implicit ellipse boundary with semi-axes `a = width/2`,
    /// `b = height/2`:
    ///
    /// `r(θ) = 1 / sqrt(1/b² + (1/a² − 1/b²)·cos²θ)`
    ///
    /// Rectangle nodes use the same formula, so their radius is the inscribed
    /// ellipse's rather than the true box distance.
    #[must_use]
    pub fn boundary_radius(&self, angle: f64) -> f64 {
        let a = self.half_width();
        let b = self.half_height();
        if a < TOLERANCE || b < TOLERANCE {
            return 0.0;
        }
        let inv_a2 = 1.0 / (a * a);
        let inv_b2 = 1.0 / (b * b);
        let cos = angle.cos();
        1.0 / (inv_b2 + (inv_a2 - inv_b2) * cos * cos).sqrt()
    }

    /// Point on the boundary in the direction of `toward`.
    ///
    /// A `toward` point at the center yields the center itself.
    #[must_use]
    pub fn boundary_point_toward(&self, toward: &Point2) -> Point2 {
        let Some(dir) = unit(&(toward - self.position)) else {
            return self.position;
        };
        let radius = self.boundary_radius(approach_angle(&self.position, toward));
        self.position + dir * radius
    }
}

fn validate_size(width: f64, height: f64) -> Result<()> {
    if !(width.is_finite() && width > TOLERANCE) {
        return Err(GeometryError::Degenerate("node width must be positive".into()).into());
    }
    if !(height.is_finite() && height > TOLERANCE) {
        return Err(GeometryError::Degenerate("node height must be positive".into()).into());
    }
    Ok(())
}

/// Returns whether two nodes visually overlap along the line joining their centers.
///
/// Each node's boundary radius toward the other is taken at
/// `arccos(Δx / |Δ|)`; the nodes are close when the center distance is
/// smaller than the sum of both radii.
#[must_use]
pub fn are_nodes_close(source: &Node, target: &Node) -> bool {
    let angle = approach_angle(&source.position, &target.position);
    let radius_src = source.boundary_radius(angle);
    let radius_tgt = target.boundary_radius(angle);
    dist(&source.position, &target.position) < radius_src + radius_tgt
}
