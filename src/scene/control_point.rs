//! Draggable control points and the connector points they drive.
//!
//! A curved edge owns one free control point. An elbow edge owns 2 or 3
//! axis-constrained points whose kinds alternate along the route; `k` points
//! drive a chain of `k + 1` connector points, and point `i` sits between
//! connectors `i` and `i + 1`:
//!
//! ```text
//! source ── c0 ┐            (Horizontal, 2 points)
//!              │ cp0 (drives x)
//!              c1 ── cp1 (drives y) ── c2
//!                                      │
//!                                    target
//! ```

use slotmap::SlotMap;

use crate::error::{Result, SceneError};
use crate::math::Point2;

slotmap::new_key_type! {
    /// Identifier of a draggable control point.
    pub struct ControlPointId;
}

slotmap::new_key_type! {
    /// Identifier of a connector point.
    pub struct ConnectorId;
}

/// Which way an elbow route leaves its source node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElbowOrientation {
    Horizontal,
    Vertical,
}

/// Constraint of a control point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// Moves freely; the control point of a curved edge.
    Free,
    /// Sits on a vertical connector segment: drives x.
    VerticalConnector,
    /// Sits on a horizontal connector segment: drives y.
    HorizontalConnector,
}

impl ControlKind {
    /// Index of the coordinate this kind drives (`0` = x, `1` = y).
    fn axis(self) -> Option<usize> {
        match self {
            Self::Free => None,
            Self::VerticalConnector => Some(0),
            Self::HorizontalConnector => Some(1),
        }
    }
}

#[derive(Debug, Clone)]
struct ControlPointData {
    position: Point2,
    kind: ControlKind,
    connectors: Option<(ConnectorId, ConnectorId)>,
}

/// Control points of one edge, in route order.
#[derive(Debug, Clone, Default)]
pub struct ControlPointModel {
    points: SlotMap<ControlPointId, ControlPointData>,
    order: Vec<ControlPointId>,
    connectors: SlotMap<ConnectorId, Point2>,
    chain: Vec<ConnectorId>,
}

impl ControlPointModel {
    /// A single free control point.
    #[must_use]
    pub fn curved(position: Point2) -> Self {
        let mut model = Self::default();
        let id = model.points.insert(ControlPointData {
            position,
            kind: ControlKind::Free,
            connectors: None,
        });
        model.order.push(id);
        model
    }

    /// Elbow control points with their axes at the source/target midpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidInput`] unless `count` is 2 or 3.
    pub fn elbow(
        orientation: ElbowOrientation,
        count: usize,
        source: &Point2,
        target: &Point2,
    ) -> Result<Self> {
        if !(2..=3).contains(&count) {
            return Err(SceneError::InvalidInput(format!(
                "elbow routing takes 2 or 3 control points, got {count}"
            ))
            .into());
        }
        let mid = Point2::from((source.coords + target.coords) * 0.5);
        let mut model = Self::default();
        model.chain = (0..=count).map(|_| model.connectors.insert(mid)).collect();
        for i in 0..count {
            let kind = match (orientation, i % 2) {
                (ElbowOrientation::Horizontal, 0) | (ElbowOrientation::Vertical, 1) => {
                    ControlKind::VerticalConnector
                }
                _ => ControlKind::HorizontalConnector,
            };
            let id = model.points.insert(ControlPointData {
                position: mid,
                kind,
                connectors: Some((model.chain[i], model.chain[i + 1])),
            });
            model.order.push(id);
        }
        model.sync_endpoints(source, target);
        Ok(model)
    }

    /// Elbow control points restored from saved positions.
    ///
    /// Only each point's driven coordinate is taken from `positions`; the
    /// other one is re-derived from the connectors.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidInput`] unless there are 2 or 3 positions.
    pub fn elbow_from_positions(
        orientation: ElbowOrientation,
        positions: &[Point2],
        source: &Point2,
        target: &Point2,
    ) -> Result<Self> {
        let mut model = Self::elbow(orientation, positions.len(), source, target)?;
        for (i, p) in positions.iter().enumerate() {
            let id = model.order[i];
            model.set_driven(id, p);
        }
        model.sync_endpoints(source, target);
        Ok(model)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Control point ids in route order.
    #[must_use]
    pub fn ids(&self) -> &[ControlPointId] {
        &self.order
    }

    #[must_use]
    pub fn position(&self, id: ControlPointId) -> Option<Point2> {
        self.points.get(id).map(|p| p.position)
    }

    #[must_use]
    pub fn kind(&self, id: ControlPointId) -> Option<ControlKind> {
        self.points.get(id).map(|p| p.kind)
    }

    /// Control point positions in route order.
    #[must_use]
    pub fn positions(&self) -> Vec<Point2> {
        self.order.iter().map(|id| self.points[*id].position).collect()
    }

    /// Connector points in route order, source side first.
    #[must_use]
    pub fn connectors(&self) -> Vec<Point2> {
        self.chain.iter().map(|id| self.connectors[*id]).collect()
    }

    /// Moves a control point.
    ///
    /// A free point goes exactly to `to`. A constrained point takes only its
    /// driven coordinate from `to`, pushes it into both of its connectors, and
    /// re-centres its other coordinate between them.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::ControlPointNotFound`] for an unknown id.
    pub fn drag(&mut self, id: ControlPointId, to: &Point2) -> Result<()> {
        let point = self.points.get_mut(id).ok_or(SceneError::ControlPointNotFound)?;
        if point.kind == ControlKind::Free {
            point.position = *to;
            return Ok(());
        }
        self.set_driven(id, to);
        self.clamp_all();
        Ok(())
    }

    /// Finishes a drag, snapping a constrained point onto the coordinate of an
    /// adjacent route point closer than `snap_distance`.
    ///
    /// Returns whether the point snapped.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::ControlPointNotFound`] for an unknown id.
    pub fn release(
        &mut self,
        id: ControlPointId,
        source: &Point2,
        target: &Point2,
        snap_distance: f64,
    ) -> Result<bool> {
        let data = self.points.get(id).ok_or(SceneError::ControlPointNotFound)?;
        let Some(axis) = data.kind.axis() else {
            return Ok(false);
        };
        let Some(index) = self.order.iter().position(|o| *o == id) else {
            return Err(SceneError::ControlPointNotFound.into());
        };
        let value = data.position[axis];

        // Route is [source, c0, .., ck, target]; point `index` spans c_index..c_index+1.
        let mut route = Vec::with_capacity(self.chain.len() + 2);
        route.push(*source);
        route.extend(self.connectors());
        route.push(*target);
        let before = route[index][axis];
        let after = route[index + 3][axis];

        let snapped = [before, after]
            .into_iter()
            .map(|candidate| (candidate, (candidate - value).abs()))
            .filter(|(_, gap)| *gap > 0.0 && *gap < snap_distance)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        let Some((candidate, _)) = snapped else {
            return Ok(false);
        };
        let mut to = data.position;
        to[axis] = candidate;
        self.set_driven(id, &to);
        self.clamp_all();
        Ok(true)
    }

    /// Re-anchors the ends of the connector chain to moved endpoints.
    pub fn sync_endpoints(&mut self, source: &Point2, target: &Point2) {
        let (Some(first), Some(last)) = (self.order.first(), self.order.last()) else {
            return;
        };
        let (Some(first_axis), Some(last_axis)) =
            (self.points[*first].kind.axis(), self.points[*last].kind.axis())
        else {
            return;
        };
        let (Some(head), Some(tail)) = (self.chain.first(), self.chain.last()) else {
            return;
        };
        let free_first = 1 - first_axis;
        let free_last = 1 - last_axis;
        self.connectors[*head][free_first] = source[free_first];
        self.connectors[*tail][free_last] = target[free_last];
        self.clamp_all();
    }

    /// Writes the driven coordinate of `id` into the point and its connectors.
    fn set_driven(&mut self, id: ControlPointId, to: &Point2) {
        let Some(point) = self.points.get_mut(id) else {
            return;
        };
        let (Some(axis), Some((a, b))) = (point.kind.axis(), point.connectors) else {
            return;
        };
        point.position[axis] = to[axis];
        self.connectors[a][axis] = to[axis];
        self.connectors[b][axis] = to[axis];
    }

    /// Centres every constrained point between its connectors on its free axis.
    fn clamp_all(&mut self) {
        for point in self.points.values_mut() {
            let (Some(axis), Some((a, b))) = (point.kind.axis(), point.connectors) else {
                continue;
            };
            let other = 1 - axis;
            point.position[other] = (self.connectors[a][other] + self.connectors[b][other]) * 0.5;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ends() -> (Point2, Point2) {
        (Point2::new(0.0, 0.0), Point2::new(100.0, 60.0))
    }

    #[test]
    fn horizontal_default_is_a_z_route() {
        let (s, t) = ends();
        let model = ControlPointModel::elbow(ElbowOrientation::Horizontal, 2, &s, &t).unwrap();
        let c = model.connectors();
        assert_eq!(c.len(), 3);
        assert_abs_diff_eq!(c[0], Point2::new(50.0, 0.0));
        assert_abs_diff_eq!(c[1], Point2::new(50.0, 30.0));
        assert_abs_diff_eq!(c[2], Point2::new(100.0, 30.0));
        let kinds: Vec<_> = model.ids().iter().map(|id| model.kind(*id).unwrap()).collect();
        assert_eq!(
            kinds,
            [ControlKind::VerticalConnector, ControlKind::HorizontalConnector]
        );
        // Each point sits midway along its connector segment.
        assert_abs_diff_eq!(model.positions()[0], Point2::new(50.0, 15.0));
        assert_abs_diff_eq!(model.positions()[1], Point2::new(75.0, 30.0));
    }

    #[test]
    fn three_point_default_collapses_middle() {
        let (s, t) = ends();
        let model = ControlPointModel::elbow(ElbowOrientation::Horizontal, 3, &s, &t).unwrap();
        let c = model.connectors();
        assert_abs_diff_eq!(c[0], Point2::new(50.0, 0.0));
        assert_abs_diff_eq!(c[1], Point2::new(50.0, 30.0));
        assert_abs_diff_eq!(c[2], Point2::new(50.0, 30.0));
        assert_abs_diff_eq!(c[3], Point2::new(50.0, 60.0));
    }

    #[test]
    fn vertical_orientation_swaps_kinds() {
        let (s, t) = ends();
        let model = ControlPointModel::elbow(ElbowOrientation::Vertical, 2, &s, &t).unwrap();
        let c = model.connectors();
        assert_abs_diff_eq!(c[0], Point2::new(0.0, 30.0));
        assert_abs_diff_eq!(c[1], Point2::new(50.0, 30.0));
        assert_abs_diff_eq!(c[2], Point2::new(50.0, 60.0));
    }

    #[test]
    fn drag_moves_only_the_driven_axis() {
        let (s, t) = ends();
        let mut model = ControlPointModel::elbow(ElbowOrientation::Horizontal, 2, &s, &t).unwrap();
        let id = model.ids()[0];
        model.drag(id, &Point2::new(70.0, 999.0)).unwrap();
        assert_abs_diff_eq!(model.position(id).unwrap(), Point2::new(70.0, 15.0));
        let c = model.connectors();
        assert_abs_diff_eq!(c[0], Point2::new(70.0, 0.0));
        assert_abs_diff_eq!(c[1], Point2::new(70.0, 30.0));
        // The neighbour re-centres on its shortened segment.
        assert_abs_diff_eq!(model.positions()[1], Point2::new(85.0, 30.0));
    }

    #[test]
    fn free_point_drags_anywhere() {
        let mut model = ControlPointModel::curved(Point2::new(1.0, 2.0));
        let id = model.ids()[0];
        model.drag(id, &Point2::new(-5.0, 7.0)).unwrap();
        assert_eq!(model.position(id), Some(Point2::new(-5.0, 7.0)));
        let (s, t) = ends();
        assert!(!model.release(id, &s, &t, 10.0).unwrap());
    }

    #[test]
    fn release_snaps_to_nearby_axis() {
        let (s, t) = ends();
        let mut model = ControlPointModel::elbow(ElbowOrientation::Horizontal, 2, &s, &t).unwrap();
        let id = model.ids()[1];
        // cp1 drives y; the target sits at y = 60.
        model.drag(id, &Point2::new(0.0, 58.5)).unwrap();
        assert!(model.release(id, &s, &t, 2.0).unwrap());
        assert_abs_diff_eq!(model.position(id).unwrap().y, 60.0);
        assert!(!model.release(id, &s, &t, 2.0).unwrap());
    }

    #[test]
    fn endpoints_follow_node_moves() {
        let (s, t) = ends();
        let mut model = ControlPointModel::elbow(ElbowOrientation::Horizontal, 2, &s, &t).unwrap();
        model.sync_endpoints(&Point2::new(0.0, -20.0), &Point2::new(140.0, 60.0));
        let c = model.connectors();
        assert_abs_diff_eq!(c[0], Point2::new(50.0, -20.0));
        assert_abs_diff_eq!(c[2], Point2::new(140.0, 30.0));
    }

    #[test]
    fn invalid_count_is_rejected() {
        let (s, t) = ends();
        assert!(ControlPointModel::elbow(ElbowOrientation::Vertical, 4, &s, &t).is_err());
        assert!(ControlPointModel::elbow(ElbowOrientation::Vertical, 1, &s, &t).is_err());
    }

    #[test]
    fn restores_driven_values() {
        let (s, t) = ends();
        let mut model = ControlPointModel::elbow(ElbowOrientation::Horizontal, 3, &s, &t).unwrap();
        let ids = model.ids().to_vec();
        model.drag(ids[0], &Point2::new(20.0, 0.0)).unwrap();
        model.drag(ids[1], &Point2::new(0.0, 45.0)).unwrap();
        model.drag(ids[2], &Point2::new(80.0, 0.0)).unwrap();
        let restored =
            ControlPointModel::elbow_from_positions(ElbowOrientation::Horizontal, &model.positions(), &s, &t)
                .unwrap();
        assert_eq!(restored.connectors(), model.connectors());
        assert_eq!(restored.positions(), model.positions());
    }
}
