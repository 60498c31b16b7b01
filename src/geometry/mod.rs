pub mod arrowhead;
pub mod bezier;
pub mod node;
pub mod path;

pub use arrowhead::{Arrowhead, HeadKind};
pub use bezier::QuadBezier;
pub use node::{are_nodes_close, Node, NodeShape};
pub use path::{FillRule, OutlinePath, PathSegment, Rect};
