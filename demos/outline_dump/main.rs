//! Outline dump: writes every routing style of a small diagram as SVG.
//!
//! Usage:
//! ```text
//! cargo run --example outline_dump > edges.svg
//! RUST_LOG=edgeform=debug cargo run --example outline_dump > edges.svg
//! ```

use std::fmt::Write as _;

use edgeform::geometry::{Arrowhead, Node, NodeShape, OutlinePath, PathSegment};
use edgeform::math::arc_2d::arc_point;
use edgeform::math::Point2;
use edgeform::scene::{ElbowOrientation, RoutingStyle};
use edgeform::{EdgeformError, Scene};

fn main() -> Result<(), EdgeformError> {
    // Default: WARN for everything, INFO for edgeform.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("edgeform=info".parse().unwrap_or_default());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let mut scene = Scene::new();
    let a = scene.add_node(Node::ellipse(Point2::new(-70.0, 0.0), 40.0, 40.0)?);
    let b = scene.add_node(Node::ellipse(Point2::new(70.0, 0.0), 40.0, 40.0)?);
    let c = scene.add_node(Node::rectangle(Point2::new(70.0, 140.0), 60.0, 30.0)?);
    let head = Arrowhead::arrow(10.0, 10.0, 4.0)?;

    let curved = scene.add_edge(a, b, RoutingStyle::Curved, 4.0, Some(head))?;
    let control = scene.edge(curved)?.controls().ids()[0];
    scene.move_control_point(curved, control, Point2::new(0.0, -50.0))?;
    scene.add_edge(b, c, RoutingStyle::Straight, 3.0, Some(head))?;
    scene.add_edge(
        a,
        c,
        RoutingStyle::Elbow {
            orientation: ElbowOrientation::Vertical,
            count: 2,
        },
        3.0,
        Some(Arrowhead::hammer(12.0, 3.0, 2.0)?),
    )?;
    scene.add_self_loop(c, 2.0, Some(head))?;

    let failures = scene.rebuild_dirty();
    if failures > 0 {
        tracing::warn!(failures, "some edges could not be built");
    }

    let mut svg = String::from(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"-120 -120 260 320\">\n",
    );
    for (_, node) in scene.nodes() {
        let p = node.position();
        let (hw, hh) = (node.half_width(), node.half_height());
        let _ = match node.shape() {
            NodeShape::Ellipse | NodeShape::Circle => writeln!(
                svg,
                "  <ellipse cx=\"{}\" cy=\"{}\" rx=\"{hw}\" ry=\"{hh}\" fill=\"none\" stroke=\"gray\"/>",
                p.x, p.y
            ),
            NodeShape::Rectangle | NodeShape::Square => writeln!(
                svg,
                "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"gray\"/>",
                p.x - hw,
                p.y - hh,
                node.width(),
                node.height()
            ),
        };
    }
    for (_, edge) in scene.edges() {
        if let Some(outline) = edge.outline() {
            let _ = writeln!(svg, "  <path d=\"{}\" fill=\"black\"/>", path_data(outline));
        }
    }
    svg.push_str("</svg>\n");
    print!("{svg}");
    Ok(())
}

/// SVG path data for an outline. Arcs are split into quarter turns.
fn path_data(outline: &OutlinePath) -> String {
    let mut d = String::new();
    for seg in outline.segments() {
        let _ = match *seg {
            PathSegment::MoveTo(p) => write!(d, "M{} {} ", p.x, p.y),
            PathSegment::LineTo(p) => write!(d, "L{} {} ", p.x, p.y),
            PathSegment::QuadTo { control, to } => {
                write!(d, "Q{} {} {} {} ", control.x, control.y, to.x, to.y)
            }
            PathSegment::ArcTo {
                center,
                radius,
                start_deg,
                sweep_deg,
            } => {
                let start = arc_point(&center, radius, start_deg);
                let _ = write!(d, "L{} {} ", start.x, start.y);
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let pieces = (sweep_deg.abs() / 90.0).ceil().max(1.0) as u32;
                // Screen counter-clockwise is SVG's negative sweep direction.
                let flag = u8::from(sweep_deg < 0.0);
                for i in 1..=pieces {
                    let angle = start_deg + sweep_deg * f64::from(i) / f64::from(pieces);
                    let p = arc_point(&center, radius, angle);
                    let _ = write!(d, "A{radius} {radius} 0 0 {flag} {} {} ", p.x, p.y);
                }
                Ok(())
            }
            PathSegment::Close => write!(d, "Z "),
        };
    }
    d.trim_end().to_owned()
}
