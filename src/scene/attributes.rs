//! Flat key/value form of an edge, for saving and restoring.
//!
//! Keys: `style`, `width`, `head.kind`, `head.width`, `head.height`,
//! `head.offset`, `control.count`, `control.<i>.x`, `control.<i>.y` and
//! `loop.attachment`. Outlines are never stored; they are rebuilt from these.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{AttributeError, Result};
use crate::geometry::{Arrowhead, HeadKind};
use crate::math::Point2;

use super::control_point::ElbowOrientation;
use super::edge::{Edge, EdgeRoute, RoutingStyle};
use super::NodeId;

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Attributes of one edge, sorted by key.
pub type AttributeMap = BTreeMap<String, AttributeValue>;

/// The nodes an edge restored from attributes connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEnds {
    Pair { source: NodeId, target: NodeId },
    Loop { node: NodeId },
}

/// Routing read back from the `style` attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum DecodedRoute {
    TwoNode(RoutingStyle),
    SelfLoop { attachment: f64 },
}

/// Edge inputs read back from an attribute map.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DecodedEdge {
    pub route: DecodedRoute,
    pub width: f64,
    pub head: Option<Arrowhead>,
    pub controls: Vec<Point2>,
}

impl Edge {
    /// Flattens the edge's inputs into an attribute map.
    #[must_use]
    pub fn to_attributes(&self) -> AttributeMap {
        let mut map = AttributeMap::new();
        let style = match self.route() {
            EdgeRoute::TwoNode { style, .. } => style.name(),
            EdgeRoute::SelfLoop { attachment, .. } => {
                map.insert("loop.attachment".into(), (*attachment).into());
                "self_loop"
            }
        };
        map.insert("style".into(), style.into());
        map.insert("width".into(), self.width().into());
        if let Some(head) = self.head() {
            map.insert("head.kind".into(), head.kind().as_str().into());
            map.insert("head.width".into(), head.width().into());
            map.insert("head.height".into(), head.height().into());
            map.insert("head.offset".into(), head.offset().into());
        }
        let positions = self.controls().positions();
        if !positions.is_empty() {
            #[allow(clippy::cast_precision_loss)]
            let count = positions.len() as f64;
            map.insert("control.count".into(), count.into());
            for (i, p) in positions.iter().enumerate() {
                map.insert(format!("control.{i}.x"), p.x.into());
                map.insert(format!("control.{i}.y"), p.y.into());
            }
        }
        map
    }
}

/// Reads edge inputs from `map`.
///
/// # Errors
///
/// Returns [`AttributeError::Missing`] for an absent required key and
/// [`AttributeError::Invalid`] for a value of the wrong type or range.
pub(crate) fn decode(map: &AttributeMap) -> Result<DecodedEdge> {
    let style = text(map, "style")?;
    let (route, controls) = match style {
        "straight" => (DecodedRoute::TwoNode(RoutingStyle::Straight), Vec::new()),
        "curved" => (DecodedRoute::TwoNode(RoutingStyle::Curved), controls(map, Some(1))?),
        "elbow_horizontal" | "elbow_vertical" => {
            let orientation = if style == "elbow_horizontal" {
                ElbowOrientation::Horizontal
            } else {
                ElbowOrientation::Vertical
            };
            let points = controls(map, None)?;
            let style = RoutingStyle::Elbow {
                orientation,
                count: points.len(),
            };
            (DecodedRoute::TwoNode(style), points)
        }
        "self_loop" => {
            let attachment = optional_number(map, "loop.attachment")?.unwrap_or(0.0);
            if attachment < 0.0 {
                return Err(invalid("loop.attachment", "must not be negative"));
            }
            (DecodedRoute::SelfLoop { attachment }, Vec::new())
        }
        other => return Err(invalid("style", &format!("unknown routing style `{other}`"))),
    };

    Ok(DecodedEdge {
        route,
        width: number(map, "width")?,
        head: head(map)?,
        controls,
    })
}

fn head(map: &AttributeMap) -> Result<Option<Arrowhead>> {
    if !map.contains_key("head.kind") {
        return Ok(None);
    }
    let tag = text(map, "head.kind")?;
    let kind = HeadKind::parse(tag).ok_or_else(|| invalid("head.kind", &format!("unknown head `{tag}`")))?;
    let head = Arrowhead::new(
        kind,
        number(map, "head.width")?,
        number(map, "head.height")?,
        number(map, "head.offset")?,
    )
    .map_err(|e| invalid("head", &e.to_string()))?;
    Ok(Some(head))
}

/// Reads `control.<i>.x/y`; `expected` pins the count for styles that fix it.
fn controls(map: &AttributeMap, expected: Option<usize>) -> Result<Vec<Point2>> {
    let raw = number(map, "control.count")?;
    if !(raw >= 0.0 && raw.fract() == 0.0 && raw <= 16.0) {
        return Err(invalid("control.count", "must be a small whole number"));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = raw as usize;
    if let Some(n) = expected.filter(|n| *n != count) {
        return Err(invalid("control.count", &format!("expected {n}, got {count}")));
    }
    (0..count)
        .map(|i| -> Result<Point2> {
            Ok(Point2::new(
                number(map, &format!("control.{i}.x"))?,
                number(map, &format!("control.{i}.y"))?,
            ))
        })
        .collect()
}

fn number(map: &AttributeMap, key: &str) -> Result<f64> {
    optional_number(map, key)?.ok_or_else(|| AttributeError::Missing(key.to_owned()).into())
}

fn optional_number(map: &AttributeMap, key: &str) -> Result<Option<f64>> {
    match map.get(key) {
        None => Ok(None),
        Some(AttributeValue::Number(n)) if n.is_finite() => Ok(Some(*n)),
        Some(AttributeValue::Number(_)) => Err(invalid(key, "not a finite number")),
        Some(AttributeValue::Text(_)) => Err(invalid(key, "expected a number")),
    }
}

fn text<'a>(map: &'a AttributeMap, key: &str) -> Result<&'a str> {
    match map.get(key) {
        Some(AttributeValue::Text(s)) => Ok(s.as_str()),
        Some(AttributeValue::Number(_)) => Err(invalid(key, "expected text")),
        None => Err(AttributeError::Missing(key.to_owned()).into()),
    }
}

fn invalid(key: &str, reason: &str) -> crate::error::EdgeformError {
    AttributeError::Invalid {
        key: key.to_owned(),
        reason: reason.to_owned(),
    }
    .into()
}
