pub mod bezier_offset;
pub mod edge_shape;
pub mod head_placement;

pub use bezier_offset::{BezierOffset, OffsetOutline};
pub use edge_shape::{BuildEdgeShape, EdgeGeometry, LoopArc, ShapeRequest};
pub use head_placement::HeadPlacement;
