//! Outline construction per routing style.

mod curved;
mod elbow;
mod self_loop;
mod straight;

pub use self_loop::LoopArc;

use crate::config::EngineParams;
use crate::error::{GeometryError, Result};
use crate::geometry::{Arrowhead, Node, OutlinePath, Rect};
use crate::math::{unit, Point2, Vector2};

use super::head_placement::HeadPlacement;

/// The geometric inputs of one edge, by routing style.
#[derive(Debug, Clone, Copy)]
pub enum ShapeRequest<'a> {
    /// Direct segment between two node centres.
    Straight { source: &'a Node, target: &'a Node },
    /// Quadratic curve through a single control point.
    Curved {
        source: &'a Node,
        target: &'a Node,
        control: Point2,
    },
    /// Orthogonal polyline through the connector points, in order from
    /// the source side to the target side.
    Elbow {
        source: &'a Node,
        target: &'a Node,
        connectors: &'a [Point2],
    },
    /// Circular loop leaving and re-entering a single node. `attachment`
    /// is the distance from the node centre to where the loop starts.
    SelfLoop { node: &'a Node, attachment: f64 },
}

/// Built outline of an edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeGeometry {
    /// Closed fill path: body plus head.
    pub outline: OutlinePath,
    /// Bounds of the outline, padded by half the pen width.
    pub bounds: Rect,
    /// Where the head sits, if one is drawn.
    pub head: Option<HeadPlacement>,
}

/// Builds the outline of an edge for a routing style.
#[derive(Debug)]
pub struct BuildEdgeShape<'a> {
    request: ShapeRequest<'a>,
    width: f64,
    head: Option<&'a Arrowhead>,
    params: &'a EngineParams,
}

impl<'a> BuildEdgeShape<'a> {
    /// Creates a new build operation.
    #[must_use]
    pub fn new(
        request: ShapeRequest<'a>,
        width: f64,
        head: Option<&'a Arrowhead>,
        params: &'a EngineParams,
    ) -> Self {
        Self {
            request,
            width,
            head,
            params,
        }
    }

    /// Executes the build.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if the width is not positive or a
    /// self-loop is too thin for its node, and [`GeometryError::NonFinite`]
    /// if the finished outline contains non-finite coordinates.
    pub fn execute(&self) -> Result<EdgeGeometry> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(GeometryError::Degenerate("edge width must be positive".into()).into());
        }
        let (outline, head) = match self.request {
            ShapeRequest::Straight { source, target } => {
                straight::build(source, target, self.width, self.head)
            }
            ShapeRequest::Curved {
                source,
                target,
                control,
            } => curved::build(source, target, control, self.width, self.head, self.params),
            ShapeRequest::Elbow {
                source,
                target,
                connectors,
            } => elbow::build(source, target, connectors, self.width, self.head, self.params),
            ShapeRequest::SelfLoop { node, attachment } => {
                self_loop::build(node, attachment, self.width, self.head)?
            }
        };

        if !outline.is_finite() {
            return Err(GeometryError::NonFinite("edge outline").into());
        }
        let bounds = outline
            .bounds()
            .ok_or_else(|| GeometryError::Degenerate("empty edge outline".into()))?
            .padded(self.params.pen_width * 0.5);
        Ok(EdgeGeometry {
            outline,
            bounds,
            head,
        })
    }
}

/// Top and bottom offsets of both ends of the segment `start → end`.
///
/// A zero-length segment is treated as pointing along +X.
fn segment_offsets(start: &Point2, end: &Point2, half_width: f64) -> [(Point2, Point2); 2] {
    let dir = unit(&(end - start)).unwrap_or_else(|| Vector2::new(1.0, 0.0));
    // Top is the left-hand side of travel on screen.
    let normal = Vector2::new(dir.y, -dir.x) * half_width;
    [
        (start + normal, start - normal),
        (end + normal, end - normal),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_width() {
        let a = Node::circle(Point2::new(0.0, 0.0), 10.0).unwrap();
        let b = Node::circle(Point2::new(100.0, 0.0), 10.0).unwrap();
        let params = EngineParams::default();
        let request = ShapeRequest::Straight {
            source: &a,
            target: &b,
        };
        assert!(BuildEdgeShape::new(request, 0.0, None, &params).execute().is_err());
        assert!(BuildEdgeShape::new(request, f64::NAN, None, &params).execute().is_err());
    }

    #[test]
    fn bounds_are_padded_by_half_pen() {
        let a = Node::circle(Point2::new(0.0, 0.0), 10.0).unwrap();
        let b = Node::circle(Point2::new(100.0, 0.0), 10.0).unwrap();
        let params = EngineParams {
            pen_width: 2.0,
            ..EngineParams::default()
        };
        let geometry = BuildEdgeShape::new(
            ShapeRequest::Straight {
                source: &a,
                target: &b,
            },
            4.0,
            None,
            &params,
        )
        .execute()
        .unwrap();
        assert!((geometry.bounds.min.x + 1.0).abs() < 1e-9);
        assert!((geometry.bounds.max.x - 101.0).abs() < 1e-9);
        assert!((geometry.bounds.min.y + 3.0).abs() < 1e-9);
        assert!((geometry.bounds.max.y - 3.0).abs() < 1e-9);
    }

    #[test]
    fn zero_length_segment_points_along_x() {
        let p = Point2::new(3.0, 3.0);
        let [(top, bottom), _] = segment_offsets(&p, &p, 1.0);
        assert_eq!(top, Point2::new(3.0, 2.0));
        assert_eq!(bottom, Point2::new(3.0, 4.0));
    }
}
