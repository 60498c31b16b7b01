pub mod arc_2d;
pub mod cubic;
pub mod polygon_2d;
pub mod vector_2d;

pub use cubic::solve_cubic;
pub use vector_2d::{
    angle_between, approach_angle, direction_degrees, dist, dot, internal_division, length,
    rotate, unit,
};

/// 2D point type. Coordinates follow the screen convention (Y grows downward).
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;
