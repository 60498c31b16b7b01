pub mod attributes;
pub mod control_point;
pub mod edge;

pub use attributes::{AttributeMap, AttributeValue, EdgeEnds};
pub use control_point::{ControlKind, ControlPointId, ControlPointModel, ElbowOrientation};
pub use edge::{Edge, EdgeId, EdgeRoute, GeometryState, RoutingStyle};

use slotmap::SlotMap;
use tracing::warn;

use crate::config::EngineParams;
use crate::error::{AttributeError, Result, SceneError};
use crate::geometry::{Arrowhead, Node};
use crate::math::Point2;
use crate::operations::EdgeGeometry;

use attributes::DecodedRoute;

slotmap::new_key_type! {
    /// Unique identifier for a node in a [`Scene`].
    pub struct NodeId;
}

/// Arena owning the nodes of a diagram and the edges between them.
///
/// Edges refer to nodes by id. Any change to a node marks its edges Dirty;
/// outlines are recomputed by [`Scene::rebuild`] or [`Scene::rebuild_dirty`].
#[derive(Debug, Default)]
pub struct Scene {
    nodes: SlotMap<NodeId, Node>,
    edges: SlotMap<EdgeId, Edge>,
    params: EngineParams,
}

impl Scene {
    /// Creates an empty scene with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_params(params: EngineParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    /// Replaces the parameters and marks every edge Dirty.
    pub fn set_params(&mut self, params: EngineParams) {
        self.params = params;
        for edge in self.edges.values_mut() {
            edge.mark_dirty();
        }
    }

    // --- Nodes ---

    pub fn add_node(&mut self, node: Node) -> NodeId {
        self.nodes.insert(node)
    }

    /// # Errors
    ///
    /// Returns [`SceneError::NodeNotFound`] for an unknown id.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        Ok(self.nodes.get(id).ok_or(SceneError::NodeNotFound)?)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter()
    }

    /// Moves a node; attached edges become Dirty and elbow connectors follow.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NodeNotFound`] for an unknown id.
    pub fn move_node(&mut self, id: NodeId, position: Point2) -> Result<()> {
        self.nodes
            .get_mut(id)
            .ok_or(SceneError::NodeNotFound)?
            .set_position(position);
        self.touch_edges_of(id);
        Ok(())
    }

    /// Resizes a node; attached edges become Dirty.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NodeNotFound`] for an unknown id, or a geometry
    /// error if a dimension is not positive.
    pub fn resize_node(&mut self, id: NodeId, width: f64, height: f64) -> Result<()> {
        self.nodes
            .get_mut(id)
            .ok_or(SceneError::NodeNotFound)?
            .set_size(width, height)?;
        self.touch_edges_of(id);
        Ok(())
    }

    /// Removes a node together with every edge attached to it.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NodeNotFound`] for an unknown id.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node> {
        let node = self.nodes.remove(id).ok_or(SceneError::NodeNotFound)?;
        self.edges.retain(|_, edge| !edge.route().touches(id));
        Ok(node)
    }

    // --- Edges ---

    /// Adds an edge between two distinct nodes.
    ///
    /// # Errors
    ///
    /// Returns an error if either node is unknown, the nodes are the same
    /// (use [`Scene::add_self_loop`]), the width is not positive, or the
    /// style's control-point count is invalid.
    pub fn add_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        style: RoutingStyle,
        width: f64,
        head: Option<Arrowhead>,
    ) -> Result<EdgeId> {
        let (s, t) = self.endpoints(source, target)?;
        let controls = style.default_controls(&s, &t)?;
        let route = EdgeRoute::TwoNode {
            source,
            target,
            style,
        };
        Ok(self.edges.insert(Edge::new(route, width, head, controls)?))
    }

    /// Adds a loop from `node` back to itself, leaving from its centre.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is unknown or the width is not positive.
    pub fn add_self_loop(&mut self, node: NodeId, width: f64, head: Option<Arrowhead>) -> Result<EdgeId> {
        self.node(node)?;
        let route = EdgeRoute::SelfLoop {
            node,
            attachment: 0.0,
        };
        Ok(self
            .edges
            .insert(Edge::new(route, width, head, ControlPointModel::default())?))
    }

    /// Restores an edge saved with [`Edge::to_attributes`].
    ///
    /// # Errors
    ///
    /// Returns an attribute error if the map is incomplete or malformed or
    /// its style does not match `ends`, and a scene error for unknown nodes.
    pub fn add_edge_from_attributes(&mut self, ends: EdgeEnds, attrs: &AttributeMap) -> Result<EdgeId> {
        let decoded = attributes::decode(attrs)?;
        let edge = match (ends, decoded.route) {
            (EdgeEnds::Pair { source, target }, DecodedRoute::TwoNode(style)) => {
                let (s, t) = self.endpoints(source, target)?;
                let controls = match style {
                    RoutingStyle::Straight => ControlPointModel::default(),
                    RoutingStyle::Curved => {
                        let control = decoded.controls.first().copied().unwrap_or(s);
                        ControlPointModel::curved(control)
                    }
                    RoutingStyle::Elbow { orientation, .. } => {
                        ControlPointModel::elbow_from_positions(orientation, &decoded.controls, &s, &t)?
                    }
                };
                let route = EdgeRoute::TwoNode {
                    source,
                    target,
                    style,
                };
                Edge::new(route, decoded.width, decoded.head, controls)?
            }
            (EdgeEnds::Loop { node }, DecodedRoute::SelfLoop { attachment }) => {
                self.node(node)?;
                let route = EdgeRoute::SelfLoop { node, attachment };
                Edge::new(route, decoded.width, decoded.head, ControlPointModel::default())?
            }
            _ => {
                return Err(AttributeError::Invalid {
                    key: "style".into(),
                    reason: "style does not match the edge ends".into(),
                }
                .into())
            }
        };
        Ok(self.edges.insert(edge))
    }

    /// # Errors
    ///
    /// Returns [`SceneError::EdgeNotFound`] for an unknown id.
    pub fn edge(&self, id: EdgeId) -> Result<&Edge> {
        Ok(self.edges.get(id).ok_or(SceneError::EdgeNotFound)?)
    }

    /// Mutable access for the edge's own setters (width, head, attachment).
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::EdgeNotFound`] for an unknown id.
    pub fn edge_mut(&mut self, id: EdgeId) -> Result<&mut Edge> {
        Ok(self.edges.get_mut(id).ok_or(SceneError::EdgeNotFound)?)
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter()
    }

    /// # Errors
    ///
    /// Returns [`SceneError::EdgeNotFound`] for an unknown id.
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<Edge> {
        Ok(self.edges.remove(id).ok_or(SceneError::EdgeNotFound)?)
    }

    /// Ids of every edge attached to `node`.
    #[must_use]
    pub fn edges_of(&self, node: NodeId) -> Vec<EdgeId> {
        self.edges
            .iter()
            .filter(|(_, edge)| edge.route().touches(node))
            .map(|(id, _)| id)
            .collect()
    }

    /// Changes the routing style, resetting control points to the new style's defaults.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown edge, a self-loop, or an invalid elbow count.
    pub fn set_style(&mut self, id: EdgeId, style: RoutingStyle) -> Result<()> {
        let EdgeRoute::TwoNode { source, target, .. } = *self.edge(id)?.route() else {
            return Err(SceneError::InvalidInput("self-loops have no routing style".into()).into());
        };
        let (s, t) = self.endpoints(source, target)?;
        let controls = style.default_controls(&s, &t)?;
        self.edge_mut(id)?.set_style(style, controls)
    }

    // --- Control points ---

    /// Drags a control point of an edge.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::EdgeNotFound`] or
    /// [`SceneError::ControlPointNotFound`] for unknown ids.
    pub fn move_control_point(&mut self, edge: EdgeId, point: ControlPointId, to: Point2) -> Result<()> {
        let edge = self.edges.get_mut(edge).ok_or(SceneError::EdgeNotFound)?;
        edge.controls_mut().drag(point, &to)?;
        edge.mark_dirty();
        Ok(())
    }

    /// Ends a drag, snapping the point onto a nearby axis.
    /// Returns whether it snapped.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown ids.
    pub fn release_control_point(&mut self, edge: EdgeId, point: ControlPointId) -> Result<bool> {
        let snap = self.params.snap_factor;
        let Some((s, t)) = self.route_endpoints(edge)? else {
            return Ok(false);
        };
        let edge = self.edges.get_mut(edge).ok_or(SceneError::EdgeNotFound)?;
        let width = edge.width();
        let snapped = edge.controls_mut().release(point, &s, &t, snap * width)?;
        if snapped {
            edge.mark_dirty();
        }
        Ok(snapped)
    }

    // --- Geometry ---

    /// Rebuilds one edge, Dirty or not.
    ///
    /// # Errors
    ///
    /// Returns the build error; the edge then keeps its previous geometry
    /// and stays Dirty.
    pub fn rebuild(&mut self, id: EdgeId) -> Result<&EdgeGeometry> {
        let edge = self.edges.get_mut(id).ok_or(SceneError::EdgeNotFound)?;
        edge.rebuild(&self.nodes, &self.params)?;
        edge.geometry()
            .ok_or_else(|| SceneError::InvalidInput("edge has no geometry after rebuild".into()).into())
    }

    /// Rebuilds every Dirty edge and returns how many failed.
    pub fn rebuild_dirty(&mut self) -> usize {
        let mut failures = 0;
        for (id, edge) in &mut self.edges {
            if edge.is_dirty() && edge.rebuild(&self.nodes, &self.params).is_err() {
                warn!(?id, "edge left dirty");
                failures += 1;
            }
        }
        failures
    }

    /// Topmost built edge whose outline contains `point`.
    #[must_use]
    pub fn edge_at(&self, point: &Point2) -> Option<EdgeId> {
        let tolerance = self.params.flatten_tolerance;
        self.edges
            .iter()
            .filter(|(_, edge)| edge.contains(point, tolerance))
            .map(|(id, _)| id)
            .last()
    }

    fn endpoints(&self, source: NodeId, target: NodeId) -> Result<(Point2, Point2)> {
        if source == target {
            return Err(SceneError::InvalidInput("an edge to its own source is a self-loop".into()).into());
        }
        Ok((self.node(source)?.position(), self.node(target)?.position()))
    }

    fn route_endpoints(&self, id: EdgeId) -> Result<Option<(Point2, Point2)>> {
        match *self.edge(id)?.route() {
            EdgeRoute::TwoNode { source, target, .. } => self.endpoints(source, target).map(Some),
            EdgeRoute::SelfLoop { .. } => Ok(None),
        }
    }

    fn touch_edges_of(&mut self, node: NodeId) {
        for edge in self.edges.values_mut() {
            if !edge.route().touches(node) {
                continue;
            }
            edge.mark_dirty();
            if let EdgeRoute::TwoNode { source, target, .. } = *edge.route() {
                if let (Some(s), Some(t)) = (self.nodes.get(source), self.nodes.get(target)) {
                    edge.controls_mut().sync_endpoints(&s.position(), &t.position());
                }
            }
        }
    }
}
