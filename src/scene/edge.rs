use slotmap::SlotMap;
use tracing::{debug, warn};

use crate::config::EngineParams;
use crate::error::{Result, SceneError};
use crate::geometry::{Arrowhead, Node, OutlinePath, Rect};
use crate::math::Point2;
use crate::operations::{BuildEdgeShape, EdgeGeometry, HeadPlacement, ShapeRequest};

use super::control_point::{ControlPointModel, ElbowOrientation};
use super::NodeId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in a [`Scene`](super::Scene).
    pub struct EdgeId;
}

/// How a two-node edge is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingStyle {
    Straight,
    /// Quadratic curve through one draggable control point.
    Curved,
    /// Orthogonal route through `count` (2 or 3) axis-constrained control points.
    Elbow {
        orientation: ElbowOrientation,
        count: usize,
    },
}

impl RoutingStyle {
    /// Short name used in log events.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Straight => "straight",
            Self::Curved => "curved",
            Self::Elbow {
                orientation: ElbowOrientation::Horizontal,
                ..
            } => "elbow_horizontal",
            Self::Elbow {
                orientation: ElbowOrientation::Vertical,
                ..
            } => "elbow_vertical",
        }
    }

    /// Default control points for this style between `source` and `target`.
    ///
    /// # Errors
    ///
    /// Returns an error for an elbow count other than 2 or 3.
    pub fn default_controls(self, source: &Point2, target: &Point2) -> Result<ControlPointModel> {
        match self {
            Self::Straight => Ok(ControlPointModel::default()),
            Self::Curved => Ok(ControlPointModel::curved(Point2::from(
                (source.coords + target.coords) * 0.5,
            ))),
            Self::Elbow { orientation, count } => {
                ControlPointModel::elbow(orientation, count, source, target)
            }
        }
    }
}

/// What an edge connects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeRoute {
    TwoNode {
        source: NodeId,
        target: NodeId,
        style: RoutingStyle,
    },
    /// Loop on one node. `attachment` is the distance from the node centre to
    /// where the loop leaves it.
    SelfLoop { node: NodeId, attachment: f64 },
}

impl EdgeRoute {
    /// Returns whether the route touches `node`.
    #[must_use]
    pub fn touches(&self, node: NodeId) -> bool {
        match *self {
            Self::TwoNode { source, target, .. } => source == node || target == node,
            Self::SelfLoop { node: own, .. } => own == node,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::TwoNode { style, .. } => style.name(),
            Self::SelfLoop { .. } => "self_loop",
        }
    }
}

/// Whether an edge's outline reflects its current inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryState {
    /// Inputs changed since the last successful rebuild.
    Dirty,
    /// Outline and bounds are current.
    Built,
}

/// An edge: its inputs and its derived outline.
#[derive(Debug, Clone)]
pub struct Edge {
    route: EdgeRoute,
    width: f64,
    head: Option<Arrowhead>,
    controls: ControlPointModel,
    state: GeometryState,
    geometry: Option<EdgeGeometry>,
}

impl Edge {
    pub(crate) fn new(
        route: EdgeRoute,
        width: f64,
        head: Option<Arrowhead>,
        controls: ControlPointModel,
    ) -> Result<Self> {
        validate_width(width)?;
        Ok(Self {
            route,
            width,
            head,
            controls,
            state: GeometryState::Dirty,
            geometry: None,
        })
    }

    #[must_use]
    pub fn route(&self) -> &EdgeRoute {
        &self.route
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn head(&self) -> Option<&Arrowhead> {
        self.head.as_ref()
    }

    #[must_use]
    pub fn controls(&self) -> &ControlPointModel {
        &self.controls
    }

    pub(crate) fn controls_mut(&mut self) -> &mut ControlPointModel {
        &mut self.controls
    }

    #[must_use]
    pub fn state(&self) -> GeometryState {
        self.state
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.state == GeometryState::Dirty
    }

    /// Last successfully built geometry. May be stale while the edge is Dirty.
    #[must_use]
    pub fn geometry(&self) -> Option<&EdgeGeometry> {
        self.geometry.as_ref()
    }

    #[must_use]
    pub fn outline(&self) -> Option<&OutlinePath> {
        self.geometry.as_ref().map(|g| &g.outline)
    }

    /// Bounds of the outline, padded by half the pen width.
    #[must_use]
    pub fn bounding_rect(&self) -> Option<Rect> {
        self.geometry.as_ref().map(|g| g.bounds)
    }

    /// Centre of the head's base, where the body meets the head.
    #[must_use]
    pub fn head_tip_position(&self) -> Option<Point2> {
        self.head_placement().map(|h| h.position)
    }

    /// Direction the head points, in degrees clockwise from +X on screen.
    #[must_use]
    pub fn head_angle_degrees(&self) -> Option<f64> {
        self.head_placement().map(|h| h.angle)
    }

    /// Pointed end of the head.
    #[must_use]
    pub fn head_apex(&self) -> Option<Point2> {
        self.head_placement().map(|h| h.apex)
    }

    fn head_placement(&self) -> Option<&HeadPlacement> {
        self.geometry.as_ref().and_then(|g| g.head.as_ref())
    }

    /// Sets the stroke width, scaling the head by the same ratio.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidInput`] if `width` is not a positive number.
    pub fn set_width(&mut self, width: f64) -> Result<()> {
        validate_width(width)?;
        let ratio = width / self.width;
        self.head = self.head.map(|h| h.scaled(ratio));
        self.width = width;
        self.mark_dirty();
        Ok(())
    }

    pub fn set_head(&mut self, head: Option<Arrowhead>) {
        self.head = head;
        self.mark_dirty();
    }

    /// Sets where a self-loop leaves its node.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidInput`] if the edge is not a self-loop or
    /// `attachment` is negative or not finite.
    pub fn set_loop_attachment(&mut self, attachment: f64) -> Result<()> {
        let EdgeRoute::SelfLoop {
            attachment: current,
            ..
        } = &mut self.route
        else {
            return Err(SceneError::InvalidInput("attachment applies to self-loops only".into()).into());
        };
        if !(attachment.is_finite() && attachment >= 0.0) {
            return Err(SceneError::InvalidInput(format!("invalid loop attachment {attachment}")).into());
        }
        *current = attachment;
        self.mark_dirty();
        Ok(())
    }

    pub(crate) fn set_style(&mut self, style: RoutingStyle, controls: ControlPointModel) -> Result<()> {
        let EdgeRoute::TwoNode { style: current, .. } = &mut self.route else {
            return Err(SceneError::InvalidInput("self-loops have no routing style".into()).into());
        };
        *current = style;
        self.controls = controls;
        self.mark_dirty();
        Ok(())
    }

    pub fn mark_dirty(&mut self) {
        self.state = GeometryState::Dirty;
    }

    /// Hit-tests `point` against the built outline.
    #[must_use]
    pub fn contains(&self, point: &Point2, tolerance: f64) -> bool {
        self.geometry
            .as_ref()
            .is_some_and(|g| g.bounds.contains(point) && g.outline.contains(point, tolerance))
    }

    /// Recomputes the outline from the current inputs.
    ///
    /// On failure the previous geometry is kept and the edge stays Dirty.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NodeNotFound`] if an endpoint is missing, or the
    /// geometry error raised while building.
    pub(crate) fn rebuild(&mut self, nodes: &SlotMap<NodeId, Node>, params: &EngineParams) -> Result<()> {
        match self.build(nodes, params) {
            Ok(geometry) => {
                debug!(
                    style = self.route.name(),
                    segments = geometry.outline.segments().len(),
                    has_head = geometry.head.is_some(),
                    "edge rebuilt"
                );
                self.geometry = Some(geometry);
                self.state = GeometryState::Built;
                Ok(())
            }
            Err(error) => {
                warn!(style = self.route.name(), %error, "edge rebuild failed");
                Err(error)
            }
        }
    }

    fn build(&self, nodes: &SlotMap<NodeId, Node>, params: &EngineParams) -> Result<EdgeGeometry> {
        let node = |id: NodeId| nodes.get(id).ok_or(SceneError::NodeNotFound);
        let connectors;
        let request = match self.route {
            EdgeRoute::TwoNode {
                source,
                target,
                style,
            } => {
                let source = node(source)?;
                let target = node(target)?;
                match style {
                    RoutingStyle::Straight => ShapeRequest::Straight { source, target },
                    RoutingStyle::Curved => ShapeRequest::Curved {
                        source,
                        target,
                        control: self.controls.positions().first().copied().unwrap_or_else(|| {
                            Point2::from((source.position().coords + target.position().coords) * 0.5)
                        }),
                    },
                    RoutingStyle::Elbow { .. } => {
                        connectors = self.controls.connectors();
                        ShapeRequest::Elbow {
                            source,
                            target,
                            connectors: &connectors,
                        }
                    }
                }
            }
            EdgeRoute::SelfLoop { node: id, attachment } => ShapeRequest::SelfLoop {
                node: node(id)?,
                attachment,
            },
        };
        BuildEdgeShape::new(request, self.width, self.head.as_ref(), params).execute()
    }
}

fn validate_width(width: f64) -> Result<()> {
    if width.is_finite() && width > 0.0 {
        Ok(())
    } else {
        Err(SceneError::InvalidInput(format!("edge width must be positive, got {width}")).into())
    }
}
